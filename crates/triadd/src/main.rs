//! Triad daemon - three-stage LLM review pipeline.
//!
//! Relays a prompt through draft, review and polish stages across three
//! remote AI backends; the caller drives sequencing over HTTP.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use triadd::config::Config;
use triadd::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("triadd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    server::run(config).await
}
