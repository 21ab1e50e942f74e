//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::DetectorError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DetectorError> for ServerError {
    fn from(err: DetectorError) -> Self {
        match err {
            DetectorError::InvalidInput(msg) => ServerError::BadRequest(msg),
            DetectorError::PredictionFailure(msg) => ServerError::Prediction(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Prediction(msg) => {
                tracing::error!(detail = %msg, "Prediction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
            }
            ServerError::Json(e) => (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e)),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
