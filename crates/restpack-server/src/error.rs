//! Server error types.

use std::io;
use std::time::Duration;

use restpack_router::InsertError;
use thiserror::Error;

/// Fatal outcome of [`ApiServer::start`](crate::ApiServer::start).
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not bind or read its local address.
    #[error("failed to listen on {addr}: {source}")]
    Listen {
        /// Address that was requested.
        addr: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The bind address is empty.
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    /// An OS signal handler could not be installed.
    #[error("failed to register signal handler: {0}")]
    Signal(#[source] io::Error),

    /// The listener task panicked or was cancelled before it drained.
    #[error("listener task failed: {0}")]
    ListenerFailed(#[source] tokio::task::JoinError),

    /// Connections were still open when the shutdown deadline passed.
    #[error("graceful shutdown exceeded {timeout:?} with {active} connection(s) still open")]
    ShutdownTimeout {
        /// Deadline that was applied.
        timeout: Duration,
        /// Connections force-closed at the deadline.
        active: usize,
    },
}

/// Why a route registration was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationRejected {
    /// The path was empty.
    #[error("route path is empty")]
    EmptyPath,

    /// No handler was supplied.
    #[error("route '{0}' has no handler")]
    MissingHandler(String),

    /// The path pattern could not be inserted.
    #[error("route '{path}' is invalid: {source}")]
    InvalidPath {
        /// Full path after applying the prefix.
        path: String,
        /// Router rejection.
        #[source]
        source: InsertError,
    },
}
