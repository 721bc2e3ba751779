//! # restpack-config
//!
//! Typed configuration for restpack services.
//!
//! [`AppConfig`] has three sections:
//!
//! - `server`: bind address, public base URL, route prefix, shutdown deadline
//! - `database`: driver and connection parameters
//! - `logging`: a [`restpack_telemetry::LogConfig`]
//!
//! [`ConfigLoader`] layers defaults, a TOML/JSON file, a `.env` file and
//! environment variables. The result is loaded once at startup and passed
//! by reference; nothing is stored globally.
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:8080"
//! base_url = "https://shop.example.com"
//! path_prefix = "/api/v1"
//! shutdown_timeout_secs = 5
//!
//! [database]
//! driver = "mysql"
//! host = "db"
//! port = 3306
//! user = "app"
//! name = "shop"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

mod error;
mod loader;
mod settings;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use restpack_telemetry::{LogConfig, LogFormat};
pub use settings::{AppConfig, DatabaseSettings, ServerSettings};
