//! Error types for the exoplanet detector

use thiserror::Error;

/// Main error type for the detector
#[derive(Error, Debug)]
pub enum DetectorError {
    /// Neither the remote archive nor the local backup could be loaded
    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    /// The classifier could not be fit
    #[error("Training failed: {0}")]
    TrainingFailure(String),

    /// A single prediction request failed
    #[error("Prediction failed: {0}")]
    PredictionFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for detector operations
pub type Result<T> = std::result::Result<T, DetectorError>;

impl From<polars::error::PolarsError> for DetectorError {
    fn from(err: polars::error::PolarsError) -> Self {
        DetectorError::DataError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for DetectorError {
    fn from(err: ndarray::ShapeError) -> Self {
        DetectorError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

impl From<image::ImageError> for DetectorError {
    fn from(err: image::ImageError) -> Self {
        DetectorError::PredictionFailure(format!("chart encoding: {}", err))
    }
}
