//! Structured logging for restpack services.
//!
//! Logging is built on `tracing` and `tracing-subscriber`. A service either
//! installs a global subscriber with [`init_logging`] or builds a
//! [`Dispatch`] with [`build_dispatch`] and hands it to the server, which
//! attaches it to every task it spawns.
//!
//! # Example
//!
//! ```rust,ignore
//! use restpack_telemetry::logging::{build_dispatch, LogConfig};
//!
//! let dispatch = build_dispatch(&LogConfig::production())?;
//! tracing::dispatcher::with_default(&dispatch, || {
//!     tracing::info!(addr = "0.0.0.0:8080", "starting server");
//! });
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. `info`, `restpack_server=debug,sqlx=warn`).
    pub level: String,

    /// Output encoding.
    pub format: LogFormat,

    /// Whether to include span close events.
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name reported when logging starts.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output at debug level.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: "restpack".to_string(),
        }
    }

    /// JSON output at info level.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "restpack".to_string(),
        }
    }

    /// Checks that `level` is a valid filter directive.
    pub fn validate(&self) -> TelemetryResult<()> {
        create_env_filter(&self.level)
            .map(|_| ())
            .map_err(|e| TelemetryError::InvalidConfig(format!("log level '{}': {e}", self.level)))
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing when logging is disabled.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let dispatch = build_dispatch(config)?;
    tracing::dispatcher::set_global_default(dispatch)
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(service = %config.service_name, "logging initialized");
    Ok(())
}

/// Builds a dispatcher writing to stdout, without installing it.
///
/// A disabled config yields a dispatcher that drops everything.
pub fn build_dispatch(config: &LogConfig) -> TelemetryResult<Dispatch> {
    build_dispatch_with_writer(config, std::io::stdout)
}

/// Builds a dispatcher writing to `writer`.
pub fn build_dispatch_with_writer<W>(config: &LogConfig, writer: W) -> TelemetryResult<Dispatch>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if !config.enabled {
        return Ok(Dispatch::none());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(writer)
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed(),
    };

    Ok(Dispatch::new(tracing_subscriber::registry().with(layer)))
}

/// Creates an env filter from a string.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Encodes a category log line: `{"category": .., "message": ..}`.
///
/// `message` is omitted when `details` serializes to `null`.
pub fn category_message<D: Serialize + ?Sized>(
    category: &str,
    details: &D,
) -> Result<String, serde_json::Error> {
    let details = serde_json::to_value(details)?;
    let mut line = Map::new();
    line.insert("category".to_string(), Value::String(category.to_string()));
    if !details.is_null() {
        line.insert("message".to_string(), details);
    }
    serde_json::to_string(&Value::Object(line))
}

/// Emits a category log line at `level`.
///
/// # Example
///
/// ```rust
/// use restpack_telemetry::logging::log_category;
/// use tracing::Level;
///
/// log_category(Level::ERROR, "DB Error", &"connection reset");
/// ```
pub fn log_category<D: Serialize + ?Sized>(level: Level, category: &str, details: &D) {
    let line = match category_message(category, details) {
        Ok(line) => line,
        Err(e) => {
            tracing::error!(category, error = %e, "log error");
            return;
        }
    };

    if level == Level::ERROR {
        tracing::error!(category, "{line}");
    } else if level == Level::WARN {
        tracing::warn!(category, "{line}");
    } else if level == Level::INFO {
        tracing::info!(category, "{line}");
    } else if level == Level::DEBUG {
        tracing::debug!(category, "{line}");
    } else {
        tracing::trace!(category, "{line}");
    }
}

/// Standard log field names.
pub mod fields {
    /// Bound or requested listen address.
    pub const ADDR: &str = "addr";

    /// Registered route path.
    pub const PATH: &str = "path";

    /// HTTP methods bound to a route.
    pub const METHODS: &str = "methods";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP status code field name.
    pub const HTTP_STATUS: &str = "http.status_code";

    /// Open connections at shutdown.
    pub const ACTIVE_CONNECTIONS: &str = "active_connections";

    /// Error field name.
    pub const ERROR: &str = "error";

    /// Category of a [`log_category`](super::log_category) line.
    pub const CATEGORY: &str = "category";
}
