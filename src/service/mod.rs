//! Prediction service
//!
//! [`PredictionContext`] is the process-wide (model, feature names, training
//! table) triple built once at startup. [`PredictionService`] answers each
//! request from it without mutating anything; the only per-request
//! randomness is the reference-row draw, taken from a caller-supplied RNG.

use std::sync::Arc;

use polars::prelude::*;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::charts;
use crate::data::{DatasetLoader, FeatureNames, FeatureSelector, ReferenceRow};
use crate::error::{DetectorError, Result};
use crate::training::{ExoplanetClassifier, ModelTrainer, TrainingReport};

/// Immutable state shared by all requests
#[derive(Debug)]
pub struct PredictionContext {
    model: ExoplanetClassifier,
    table: DataFrame,
}

impl PredictionContext {
    /// Pair a trained model with the table it was trained on.
    pub fn new(model: ExoplanetClassifier, table: DataFrame) -> Self {
        Self { model, table }
    }

    /// Select features on a raw table and train on the result.
    pub fn from_raw_table(raw: DataFrame, trainer: &ModelTrainer) -> Result<(Self, TrainingReport)> {
        let (table, features) = FeatureSelector::select(raw)?;
        let (model, report) = trainer.train(&table, &features)?;
        Ok((Self::new(model, table), report))
    }

    /// Full startup sequence: load, select, train.
    pub async fn initialize(loader: &DatasetLoader, trainer: &ModelTrainer) -> Result<(Self, TrainingReport)> {
        let raw = loader.load().await?;
        let (context, report) = Self::from_raw_table(raw, trainer)?;
        info!(
            features = %context.features(),
            training_rows = context.table.height(),
            accuracy = report.accuracy,
            "Prediction context ready"
        );
        Ok((context, report))
    }

    pub fn model(&self) -> &ExoplanetClassifier {
        &self.model
    }

    pub fn features(&self) -> &FeatureNames {
        self.model.features()
    }

    pub fn table(&self) -> &DataFrame {
        &self.table
    }
}

/// Response payload of one prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub features: FeatureNames,
    pub input: [f64; 2],
    pub prediction: String,
    pub pred_label: String,
    pub planet_name: Option<String>,
    pub disc_year: Option<i64>,
    pub method: Option<String>,
    pub radius: Option<f64>,
    pub mass: Option<f64>,
    pub disposition: Option<String>,
    /// Base64 PNG histogram
    pub histograma: String,
    /// Base64 PNG scatter plot
    pub dispersion: String,
}

/// Answers prediction requests from a shared [`PredictionContext`]
#[derive(Debug, Clone)]
pub struct PredictionService {
    context: Arc<PredictionContext>,
}

impl PredictionService {
    pub fn new(context: Arc<PredictionContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &PredictionContext {
        &self.context
    }

    /// Predict with a fresh thread-local RNG for the reference row.
    pub fn predict(&self, val1: f64, val2: f64) -> Result<PredictionResult> {
        self.predict_with_rng(val1, val2, &mut rand::thread_rng())
    }

    /// Predict, drawing the reference row from `rng`. Failures surface as
    /// [`DetectorError::PredictionFailure`].
    pub fn predict_with_rng<R: Rng>(&self, val1: f64, val2: f64, rng: &mut R) -> Result<PredictionResult> {
        self.try_predict([val1, val2], rng).map_err(|e| match e {
            DetectorError::PredictionFailure(_) => e,
            other => DetectorError::PredictionFailure(other.to_string()),
        })
    }

    fn try_predict<R: Rng>(&self, input: [f64; 2], rng: &mut R) -> Result<PredictionResult> {
        let ctx = &*self.context;
        let features = ctx.features();

        let label = ctx.model.predict(input)?;

        let n_rows = ctx.table.height();
        if n_rows == 0 {
            return Err(DetectorError::PredictionFailure(
                "training table has no rows to sample".to_string(),
            ));
        }
        let idx = rng.gen_range(0..n_rows);
        let reference = ReferenceRow::from_table(&ctx.table, idx, features)?;

        let histogram = charts::histogram(&ctx.table, features, &reference)?;
        let scatter = charts::scatter(&ctx.table, features, &reference)?;

        debug!(input = ?input, prediction = %label, reference_row = idx, "Prediction served");

        Ok(PredictionResult {
            features: features.clone(),
            input,
            prediction: label.clone(),
            pred_label: label,
            planet_name: reference.name,
            disc_year: reference.disc_year,
            method: reference.method,
            radius: reference.radius,
            mass: reference.mass,
            disposition: reference.disposition,
            histograma: histogram.to_base64(),
            dispersion: scatter.to_base64(),
        })
    }
}
