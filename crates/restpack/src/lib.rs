//! # restpack
//!
//! A small HTTP server abstraction for REST services:
//!
//! - route registration with an optional mount prefix and `{param}` paths
//! - graceful shutdown on SIGINT/SIGTERM, bounded by a deadline
//! - database initialization with a deadline-bounded liveness ping
//! - JSON request/response helpers and per-field validation
//! - layered configuration and structured logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restpack::prelude::*;
//!
//! async fn ping(_req: ApiRequest) -> HttpResponse {
//!     write_json(StatusCode::OK, &"pong")
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let logger = build_dispatch(&LogConfig::production()).expect("valid log config");
//!     let mut server = ApiServer::new(":8080", "/api/v1", logger);
//!     server.register_route("/ping", ping, &[Method::GET]);
//!     server.start(None).await
//! }
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! new ─▶ register_route* ─▶ start ─┬─ interrupt ─▶ drain ≤ timeout ─▶ Ok / ShutdownTimeout
//!                                  └─ bind error ─────────────────────▶ Listen
//! ```

#![doc(html_root_url = "https://docs.rs/restpack/0.1.0")]

pub use restpack_config as config;
pub use restpack_db as db;
pub use restpack_extract as extract;
pub use restpack_router as router;
pub use restpack_server as server;
pub use restpack_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use restpack::prelude::*;
/// ```
pub mod prelude {
    pub use http::{Method, StatusCode};

    pub use restpack_config::{AppConfig, ConfigLoader};
    pub use restpack_db::{init_db, open_any_pool, AnyPool, DbInitError, Ping};
    pub use restpack_extract::{
        bad_request, internal_server_error, not_found, write_error_json, write_json, ApiRequest,
        HttpResponse, Pagination, ParseError, Validate, ValidationErrors,
    };
    pub use restpack_server::{
        handler_fn, ApiServer, Handler, ServerConfig, ServerError, ServerState, StateWatcher,
    };
    pub use restpack_telemetry::{build_dispatch, init_logging, log_category, LogConfig};
}
