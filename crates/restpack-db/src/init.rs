//! Open a database handle and verify it answers.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::{AnyPool, Connection};

use crate::error::{BoxError, DbInitError};

/// Ping deadline used when the caller passes zero.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on pooled connections for [`open_any_pool`].
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// A handle that can prove the database is reachable.
#[async_trait]
pub trait Ping: Send + Sync {
    /// Error returned by a failed ping.
    type Error: Into<BoxError>;

    /// Round-trips to the database once.
    async fn ping(&self) -> Result<(), Self::Error>;
}

#[async_trait]
impl Ping for AnyPool {
    type Error = sqlx::Error;

    async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.acquire().await?;
        conn.ping().await
    }
}

/// Opens a handle with `open` and pings it within `timeout`.
///
/// A zero `timeout` means [`DEFAULT_PING_TIMEOUT`]. There is one attempt
/// and no retry. On a ping failure the error still owns the handle (see
/// [`DbInitError::into_handle`]).
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use restpack_db::{init_db, open_any_pool};
///
/// let pool = init_db(open_any_pool, "mysql", "mysql://app@db:3306/shop", Duration::ZERO).await?;
/// ```
pub async fn init_db<H, E, F>(
    open: F,
    driver: &str,
    dsn: &str,
    timeout: Duration,
) -> Result<H, DbInitError<H>>
where
    H: Ping,
    E: Into<BoxError>,
    F: FnOnce(&str, &str) -> Result<H, E>,
{
    let timeout = effective_timeout(timeout);

    let handle = match open(driver, dsn) {
        Ok(handle) => handle,
        Err(e) => {
            let source = e.into();
            tracing::error!(driver, error = %source, "failed to open database");
            return Err(DbInitError::Open(source));
        }
    };

    match tokio::time::timeout(timeout, handle.ping()).await {
        Ok(Ok(())) => {
            tracing::debug!(driver, "database ping succeeded");
            Ok(handle)
        }
        Ok(Err(e)) => {
            let source = e.into();
            tracing::error!(driver, error = %source, "database ping failed");
            Err(DbInitError::Ping { handle, source })
        }
        Err(_) => {
            tracing::error!(driver, timeout = ?timeout, "database ping timed out");
            Err(DbInitError::PingTimeout { handle, timeout })
        }
    }
}

fn effective_timeout(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        DEFAULT_PING_TIMEOUT
    } else {
        timeout
    }
}

/// Open strategy for [`init_db`] building a lazily connecting
/// [`AnyPool`].
///
/// No connection is made until first use, so this only fails on a
/// malformed URL. A `dsn` without a scheme is prefixed with `driver://`.
pub fn open_any_pool(driver: &str, dsn: &str) -> Result<AnyPool, sqlx::Error> {
    sqlx::any::install_default_drivers();
    AnyPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect_lazy(&connection_url(driver, dsn))
}

fn connection_url(driver: &str, dsn: &str) -> String {
    let has_scheme = dsn.contains("://") || dsn.starts_with(&format!("{driver}:"));
    if has_scheme {
        dsn.to_string()
    } else {
        format!("{driver}://{dsn}")
    }
}
