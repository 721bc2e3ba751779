//! Product CRUD service on restpack.
//!
//! Routes, mounted under the configured prefix (`/api/v1` by default):
//!
//! | Method | Path             | Success                         |
//! |--------|------------------|---------------------------------|
//! | GET    | `/products`      | 200, JSON array                 |
//! | POST   | `/products`      | 201, `Location` header          |
//! | GET    | `/products/{id}` | 200, product                    |
//! | PUT    | `/products/{id}` | 200, `{"message": ...}`         |
//! | DELETE | `/products/{id}` | 200, `{"message": ...}`         |
//!
//! `GET /products` accepts `pagesize` (default 1000) and `pagenumber`
//! (1-based).

pub mod app;
pub mod handlers;
pub mod store;
pub mod types;

pub use app::{build_server, init_server, InitError};
pub use handlers::ProductHandler;
pub use store::{ProductStore, SqlProductStore, StoreError};
pub use types::{CreateProductPayload, Product, UpdateProductPayload};
