//! armory server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use armory_core::{ArmoryConfig, Orchestrator, PrometheusSink, RecordDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = ArmoryConfig::load()?;
    tracing::info!(
        db_path = %config.db_path.display(),
        cache_ttl_secs = config.cache_ttl_secs,
        resolve_timeout_ms = config.resolve_timeout_ms,
        "Starting armory server on stdio transport"
    );

    let store = RecordDb::open(&config.db_path).await?;
    let parser = armory_client::from_config(&config)?;
    let metrics = Arc::new(PrometheusSink::new()?);
    let orchestrator = Orchestrator::new(parser, Arc::new(store), metrics.clone());

    let handler = handler::ArmoryServer::new(handler::ArmoryState {
        orchestrator,
        metrics,
        cache_ttl: config.cache_ttl(),
        resolve_timeout: config.resolve_timeout(),
    });
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
