//! # restpack-server
//!
//! HTTP server lifecycle for restpack services:
//!
//! - route registration with an optional mount prefix
//! - HTTP/1.1 serving via Hyper on the Tokio runtime
//! - graceful shutdown on SIGINT/SIGTERM, bounded by a deadline
//! - an injected [`tracing::Dispatch`] as the only logger
//!
//! ## Example
//!
//! ```rust,ignore
//! use http::{Method, StatusCode};
//! use restpack_extract::{write_json, ApiRequest};
//! use restpack_server::ApiServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restpack_server::ServerError> {
//!     let logger = tracing::Dispatch::none();
//!     let mut server = ApiServer::new(":8080", "/api/v1", logger);
//!     server.register_route(
//!         "/ping",
//!         |_req: ApiRequest| async { write_json(StatusCode::OK, &"pong") },
//!         &[Method::GET],
//!     );
//!     server.start(None).await
//! }
//! ```

mod config;
mod error;
mod handler;
mod lifecycle;
mod routes;
mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder, DEFAULT_BIND_ADDR, DEFAULT_SHUTDOWN_TIMEOUT_SECS};
pub use error::{RegistrationRejected, ServerError};
pub use handler::{handler_fn, BoxFuture, Handler};
pub use lifecycle::{ServerState, StateWatcher};
pub use routes::RouteTable;
pub use server::ApiServer;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownReceiver, ShutdownSignal};
