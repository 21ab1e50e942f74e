//! HTTP server
//!
//! Serves the prediction endpoint, a health summary and the web UI. The
//! dataset is loaded and the model trained before the listener binds, so
//! every request is answered by a ready service.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::PredictRequest;
pub use state::{AppState, Lifecycle};

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::data::DatasetLoader;
use crate::training::ModelTrainer;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: Option<String>,
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            static_dir: Some(std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string())),
            cors_origin: std::env::var("CORS_ORIGIN").ok(),
        }
    }
}

impl ServerConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

async fn shutdown_signal(start_time: chrono::DateTime<chrono::Utc>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install CTRL+C handler, running until killed");
        std::future::pending::<()>().await;
    }
    let stop_time = chrono::Utc::now();
    let uptime = stop_time.signed_duration_since(start_time);
    info!(
        stopped_at = %stop_time.to_rfc3339(),
        uptime_secs = uptime.num_seconds(),
        "Shutdown signal received, stopping server gracefully"
    );
}

/// Load the dataset, train the model, then serve until ctrl+c.
pub async fn run_server(
    config: ServerConfig,
    loader: DatasetLoader,
    trainer: ModelTrainer,
) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    if let Some(ref static_dir) = config.static_dir {
        if !std::path::Path::new(static_dir).exists() {
            warn!(static_dir = %static_dir, "Static directory not found, /static will be unavailable");
        }
    }

    let state = Arc::new(AppState::initialize(config.clone(), &loader, &trainer).await?);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        host = %config.host,
        port = config.port,
        address = %addr,
        started_at = %start_time.to_rfc3339(),
        "Exoplanet detector starting"
    );
    info!(url = %format!("http://{}", addr), "Web UI available");
    info!(url = %format!("http://{}/predict", addr), "Prediction endpoint available");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(start_time))
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
