//! Database initialization errors.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Boxed error from an open strategy or a ping.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why [`init_db`](crate::init_db) failed.
///
/// The ping variants carry the opened handle so the caller can inspect or
/// close it.
#[derive(Error)]
pub enum DbInitError<H> {
    /// The open strategy failed; there is no handle.
    #[error("failed to open database: {0}")]
    Open(#[source] BoxError),

    /// The handle opened but the liveness ping failed.
    #[error("database ping failed: {source}")]
    Ping {
        /// The opened handle.
        handle: H,
        /// Underlying ping error.
        #[source]
        source: BoxError,
    },

    /// The liveness ping did not answer within the deadline.
    #[error("database ping timed out after {timeout:?}")]
    PingTimeout {
        /// The opened handle.
        handle: H,
        /// Deadline that was exceeded.
        timeout: Duration,
    },
}

impl<H> DbInitError<H> {
    /// The opened handle, if the failure happened after open.
    pub fn into_handle(self) -> Option<H> {
        match self {
            Self::Open(_) => None,
            Self::Ping { handle, .. } | Self::PingTimeout { handle, .. } => Some(handle),
        }
    }

    /// Borrows the opened handle, if any.
    pub fn handle(&self) -> Option<&H> {
        match self {
            Self::Open(_) => None,
            Self::Ping { handle, .. } | Self::PingTimeout { handle, .. } => Some(handle),
        }
    }
}

// Handles such as pools rarely implement a useful `Debug`, so it is not
// required here.
impl<H> fmt::Debug for DbInitError<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(source) => f.debug_tuple("Open").field(source).finish(),
            Self::Ping { source, .. } => f
                .debug_struct("Ping")
                .field("source", source)
                .finish_non_exhaustive(),
            Self::PingTimeout { timeout, .. } => f
                .debug_struct("PingTimeout")
                .field("timeout", timeout)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Handle;

    #[test]
    fn test_open_has_no_handle() {
        let err: DbInitError<Handle> = DbInitError::Open("refused".into());
        assert!(err.to_string().contains("refused"));
        assert!(err.into_handle().is_none());
    }

    #[test]
    fn test_ping_errors_keep_handle() {
        let err = DbInitError::Ping {
            handle: Handle,
            source: "broken pipe".into(),
        };
        assert!(err.to_string().contains("broken pipe"));
        assert!(err.handle().is_some());

        let err = DbInitError::PingTimeout {
            handle: Handle,
            timeout: Duration::from_secs(2),
        };
        assert!(err.to_string().contains("2s"));
        assert!(format!("{err:?}").starts_with("PingTimeout"));
        assert!(err.into_handle().is_some());
    }
}
