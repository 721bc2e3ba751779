//! # restpack-db
//!
//! Opens a database handle through an injectable strategy and verifies it
//! with a single, deadline-bounded ping.
//!
//! The shipped strategy, [`open_any_pool`], builds a lazily connecting
//! [`sqlx::AnyPool`] with the MySQL and SQLite drivers installed. Tests and
//! embedders can pass any `FnOnce(&str, &str) -> Result<H, E>` whose handle
//! implements [`Ping`].
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use restpack_db::{init_db, open_any_pool, DbInitError};
//!
//! match init_db(open_any_pool, "sqlite", "sqlite::memory:", Duration::ZERO).await {
//!     Ok(pool) => { /* serve */ }
//!     Err(DbInitError::Open(e)) => eprintln!("bad DSN: {e}"),
//!     Err(e) => {
//!         eprintln!("{e}");
//!         if let Some(pool) = e.into_handle() {
//!             pool.close().await;
//!         }
//!     }
//! }
//! ```

mod error;
mod init;

pub use error::{BoxError, DbInitError};
pub use init::{init_db, open_any_pool, Ping, DEFAULT_MAX_CONNECTIONS, DEFAULT_PING_TIMEOUT};
pub use sqlx::AnyPool;
