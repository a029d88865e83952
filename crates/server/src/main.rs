//! yaml-schema-bridge entry point.
//!
//! Boots the bridge on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use schemabridge_client::{FetchConfig, SchemaFetcher};
use schemabridge_core::{AppConfig, CacheDb, SchemaCache};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db_path = %config.db_path.display(), "starting yaml-schema-bridge on stdio transport");

    let cache = SchemaCache::load(CacheDb::open(&config.db_path).await?).await?;
    tracing::info!(cached_schemas = cache.len(), "schema cache ready");

    let fetcher = SchemaFetcher::with_reqwest(FetchConfig::from(&config));
    let handler = handler::SchemaBridgeServer::new(handler::BridgeState { config, cache, fetcher });

    let server = serve_server(handler, stdio()).await?;
    server.waiting().await?;

    Ok(())
}
