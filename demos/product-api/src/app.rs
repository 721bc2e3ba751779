//! Server wiring: database, store, handlers, routes.

use std::sync::Arc;

use restpack::config::{AppConfig, ConfigError};
use restpack::db::{init_db, AnyPool, BoxError, DbInitError};
use restpack::server::{ApiServer, ServerConfig};
use thiserror::Error;
use tracing::Dispatch;

use crate::handlers::ProductHandler;
use crate::store::{ProductStore, SqlProductStore, StoreError};

/// Why the service could not be assembled.
#[derive(Debug, Error)]
pub enum InitError {
    /// The database settings do not form a usable connection URL.
    #[error("invalid database settings: {0}")]
    Config(#[from] ConfigError),

    /// The database could not be opened or did not answer.
    #[error(transparent)]
    Database(#[from] DbInitError<AnyPool>),

    /// The products table could not be created.
    #[error("failed to prepare schema: {0}")]
    Schema(#[from] StoreError),
}

/// Builds a server with the product routes over `store`.
pub fn build_server(config: &AppConfig, store: Arc<dyn ProductStore>, logger: Dispatch) -> ApiServer {
    let server_config = ServerConfig::builder()
        .bind_addr(config.server.addr.as_str())
        .path_prefix(config.server.path_prefix.as_str())
        .shutdown_timeout(config.server.shutdown_timeout())
        .build();

    let mut server = ApiServer::with_config(server_config, logger);
    // Location URLs must use the prefix the routes are actually mounted under.
    let path_prefix = server.config().path_prefix().unwrap_or_default().to_string();
    let handler = ProductHandler::new(store, config.server.base_url.as_str(), path_prefix);
    Arc::new(handler).register(&mut server);
    server
}

/// Opens and pings the database with `open`, prepares the schema and
/// returns a server ready to start.
///
/// On a ping failure the pool is closed before the error is returned.
pub async fn init_server<F, E>(
    config: &AppConfig,
    open: F,
    logger: Dispatch,
) -> Result<ApiServer, InitError>
where
    F: FnOnce(&str, &str) -> Result<AnyPool, E>,
    E: Into<BoxError>,
{
    let db = &config.database;
    let dsn = db.data_source_name()?;
    let pool = match init_db(open, &db.driver, &dsn, db.ping_timeout()).await {
        Ok(pool) => pool,
        Err(e) => {
            if let Some(pool) = e.handle() {
                pool.close().await;
            }
            return Err(e.into());
        }
    };
    tracing::info!(driver = %db.driver, "database initialized");

    let store = SqlProductStore::new(pool);
    store.ensure_schema(&db.driver).await?;

    Ok(build_server(config, Arc::new(store), logger))
}
