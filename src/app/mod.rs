pub mod cli;
pub mod config;
pub mod logging;

pub use cli::{Cli, Command};
pub use config::{ClientConfig, ConfigError, LogLevel};
pub use logging::{LoggingError, init_tracing};

use crate::buffer::{BufferedClient, Sender};
use anyhow::Context;
use clap::Parser;
use tracing::info;

pub async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level)?;
    run(&cli).await
}

/// Resolves configuration (file, then environment, then flags) and sends the
/// message described by `cli`.
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.clone_from(endpoint);
    }

    let client = BufferedClient::from_config(&config)?;
    let message = cli.build_message()?;

    client.send(&message).await?;
    info!("Hit delivered to {}", client.endpoint());
    Ok(())
}
