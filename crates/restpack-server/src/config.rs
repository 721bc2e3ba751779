//! Server configuration types.
//!
//! # Example
//!
//! ```rust
//! use restpack_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .bind_addr("0.0.0.0:8080")
//!     .path_prefix("/api/v1/")
//!     .shutdown_timeout(Duration::from_secs(10))
//!     .build();
//!
//! assert_eq!(config.bind_addr(), "0.0.0.0:8080");
//! assert_eq!(config.path_prefix(), Some("/api/v1"));
//! ```

use std::time::Duration;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Server configuration.
///
/// Use [`ServerConfig::builder()`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`host:port`, or `:port` for all interfaces)
    bind_addr: String,

    /// Mount point prepended to every registered path
    path_prefix: Option<String>,

    /// How long shutdown waits for in-flight requests
    shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the configured bind address.
    #[must_use]
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Returns the normalized path prefix, if any.
    #[must_use]
    pub fn path_prefix(&self) -> Option<&str> {
        self.path_prefix.as_deref()
    }

    /// Returns the default graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    bind_addr: String,
    path_prefix: Option<String>,
    shutdown_timeout: Duration,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            path_prefix: None,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    /// Sets the bind address.
    #[must_use]
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Sets the mount prefix. Empty or `/` means no prefix; a missing
    /// leading slash is added and trailing slashes are dropped.
    #[must_use]
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = normalize_prefix(&prefix.into());
        self
    }

    /// Sets the graceful shutdown timeout. Zero keeps the default.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.shutdown_timeout = timeout;
        }
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind_addr,
            path_prefix: self.path_prefix,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(config.path_prefix(), None);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_prefix_normalization() {
        let cases = [
            ("", None),
            ("/", None),
            ("  ", None),
            ("/api/v1", Some("/api/v1")),
            ("/api/v1/", Some("/api/v1")),
            ("api", Some("/api")),
        ];
        for (raw, expected) in cases {
            let config = ServerConfig::builder().path_prefix(raw).build();
            assert_eq!(config.path_prefix(), expected, "prefix {raw:?}");
        }
    }

    #[test]
    fn test_zero_timeout_keeps_default() {
        let config = ServerConfig::builder()
            .shutdown_timeout(Duration::ZERO)
            .build();
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));

        let config = ServerConfig::builder()
            .shutdown_timeout(Duration::from_millis(250))
            .build();
        assert_eq!(config.shutdown_timeout(), Duration::from_millis(250));
    }
}
