//! Logging for restpack services.
//!
//! - [`init_logging`]: install a global `tracing` subscriber (JSON or pretty)
//! - [`build_dispatch`]: build a [`tracing::Dispatch`] to inject into the
//!   server instead of relying on a global
//! - [`log_category`]: emit a `{"category", "message"}` JSON line
//! - [`LogCapture`]: collect logs in memory for assertions in tests
//!
//! # Example
//!
//! ```rust,ignore
//! use restpack_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(addr = "127.0.0.1:8080", "starting server");
//! ```

pub mod capture;
pub mod error;
pub mod logging;

pub use capture::LogCapture;
pub use error::TelemetryError;
pub use logging::{
    build_dispatch, build_dispatch_with_writer, category_message, fields, init_logging,
    log_category, LogConfig, LogFormat,
};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
