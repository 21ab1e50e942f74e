//! Application state management

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::data::DatasetLoader;
use crate::error::Result;
use crate::service::{PredictionContext, PredictionService};
use crate::training::ModelTrainer;

use super::ServerConfig;

/// Service lifecycle. `Initializing` moves to `Ready` exactly once; a
/// failure while initializing ends the process instead.
///
/// No listener is bound until an `AppState` exists, so `Initializing` only
/// shows up in the startup log and `/health` always reports `ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Initializing,
    Ready,
}

/// Application state shared across handlers. Read-only once built.
pub struct AppState {
    pub config: ServerConfig,
    pub service: PredictionService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wrap an already trained context. Used directly by tests with fixture data.
    pub fn new(config: ServerConfig, context: Arc<PredictionContext>) -> Self {
        Self {
            config,
            service: PredictionService::new(context),
            started_at: Utc::now(),
        }
    }

    /// Load the dataset and train the model, then become ready.
    pub async fn initialize(
        config: ServerConfig,
        loader: &DatasetLoader,
        trainer: &ModelTrainer,
    ) -> Result<Self> {
        info!(state = ?Lifecycle::Initializing, "Loading dataset and training model");
        let (context, _report) = PredictionContext::initialize(loader, trainer).await?;

        let state = Self::new(config, Arc::new(context));
        info!(state = ?state.lifecycle(), "Service ready");
        Ok(state)
    }

    /// A built state has finished initializing.
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Ready
    }

    /// Health summary
    pub fn health(&self) -> serde_json::Value {
        let context = self.service.context();
        serde_json::json!({
            "status": self.lifecycle(),
            "version": env!("CARGO_PKG_VERSION"),
            "features": context.features(),
            "training_rows": context.table().height(),
            "labels": context.model().classes(),
            "started_at": self.started_at.to_rfc3339(),
        })
    }
}
