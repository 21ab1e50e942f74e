//! Exoplanet Detector - Main Entry Point

use clap::Parser;
use exoplanet_detector::cli::{cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exoplanet_detector=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, host, backup }) => {
            cmd_serve(&host, port, backup).await?;
        }
        Some(Commands::Train { backup, offline, max_depth }) => {
            cmd_train(backup, offline, max_depth).await?;
        }
        None => {
            // Default: serve with environment configuration
            let config = exoplanet_detector::server::ServerConfig::default();
            cmd_serve(&config.host, config.port, None).await?;
        }
    }

    Ok(())
}
