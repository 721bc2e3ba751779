//! Product API server.
//!
//! ```text
//! product-api [config.toml]
//! ```
//!
//! Configuration layers: defaults, the optional file, `.env`, the plain
//! `SERVER_ADDR`/`DB_*` variables, then `RESTPACK__*` overrides.

use anyhow::Context;
use product_api::init_server;
use restpack::config::ConfigLoader;
use restpack::db::open_any_pool;
use restpack::telemetry::build_dispatch;

const DEFAULT_CONFIG_FILE: &str = "product-api.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loader = match std::env::args().nth(1) {
        Some(path) => ConfigLoader::new().with_file(path)?,
        None => ConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE)?,
    };
    let config = loader
        .with_dotenv()?
        .with_legacy_env()
        .with_env_prefix("RESTPACK")
        .load()
        .context("loading configuration")?;

    let logger = build_dispatch(&config.logging)?;
    tracing::dispatcher::set_global_default(logger.clone())
        .context("installing the global logger")?;

    let server = init_server(&config, open_any_pool, logger).await.map_err(|e| {
        tracing::error!(error = %e, "error initializing server");
        e
    })?;

    server.start(None).await.map_err(|e| {
        tracing::error!(error = %e, "server exited with an error");
        e
    })?;
    Ok(())
}
