//! Exoplanet Detector - disposition classifier served over HTTP
//!
//! At startup the planetary systems table is fetched from the NASA
//! Exoplanet Archive (falling back to a local CSV), two numeric features are
//! selected and a depth-limited decision tree is trained on the archive
//! disposition. Each prediction request is answered with the predicted
//! label, a randomly drawn reference planet and two PNG charts.
//!
//! # Modules
//!
//! - [`data`] - Dataset loading, column layout, feature selection
//! - [`training`] - Decision tree, seeded split, label encoding
//! - [`charts`] - Histogram and scatter rendering to PNG
//! - [`service`] - Shared prediction context and request handling
//!
//! ## Services
//! - [`server`] - HTTP server with the prediction API and web UI
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

pub mod data;
pub mod training;
pub mod charts;
pub mod service;

// Services
pub mod server;
pub mod cli;

pub use error::{DetectorError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{DetectorError, Result};

    pub use crate::data::{DatasetLoader, LoaderConfig, FeatureNames, FeatureSelector, ReferenceRow};

    pub use crate::training::{DecisionTree, ModelTrainer, TrainerConfig, TrainingReport, ExoplanetClassifier};

    pub use crate::charts::ChartImage;

    pub use crate::service::{PredictionContext, PredictionService, PredictionResult};

    pub use crate::server::{AppState, ServerConfig, create_router, run_server};
}
