//! # restpack-test
//!
//! Drive a restpack route table in memory: no socket, no runtime setup
//! beyond `#[tokio::test]`.
//!
//! ```rust,ignore
//! use restpack_test::TestClient;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn create_returns_location() {
//!     let server = build_server();
//!     let client = TestClient::from_server(&server);
//!
//!     let response = client
//!         .post("/api/v1/products")
//!         .json(&json!({"name": "Lamp", "price": 20.0, "quantity": 3}))
//!         .send()
//!         .await;
//!
//!     response.assert_status(http::StatusCode::CREATED);
//!     assert!(response.header("location").is_some());
//! }
//! ```

mod client;
mod error;
mod response;

pub use client::{TestClient, TestRequest};
pub use error::TestError;
pub use response::TestResponse;
