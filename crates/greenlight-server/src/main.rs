use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use greenlight_server::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment variables
    let config = ServerConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter.clone())),
        )
        .init();

    // Run the server using the library's run function
    greenlight_server::run(config).await.context("Server error")?;

    Ok(())
}
