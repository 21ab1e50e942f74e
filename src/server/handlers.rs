//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::Html,
    Json,
};
use serde::Deserialize;

use crate::service::PredictionResult;

use super::error::{Result, ServerError};
use super::state::AppState;

// ============================================================================
// Prediction
// ============================================================================

/// Body of `POST /predict`. Absent or null values read as zero.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub val1: Option<f64>,
    #[serde(default)]
    pub val2: Option<f64>,
}

impl PredictRequest {
    /// Parse a request body; an empty body is an empty object.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(body)?)
    }

    pub fn values(&self) -> (f64, f64) {
        (self.val1.unwrap_or(0.0), self.val2.unwrap_or(0.0))
    }
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictionResult>> {
    let (val1, val2) = PredictRequest::from_body(&body)?.values();

    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.predict(val1, val2))
        .await
        .map_err(|e| ServerError::Internal(format!("Prediction task failed: {}", e)))??;

    Ok(Json(result))
}

// ============================================================================
// System
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.health())
}

// ============================================================================
// UI Handler
// ============================================================================

pub async fn serve_index() -> Html<&'static str> {
    // Embedded HTML for portability
    Html(EMBEDDED_INDEX_HTML)
}

const EMBEDDED_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Exoplanet Detector</title>
    <style>
        body { background: #0b0d17; color: #e6e6e6; font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 24px; }
        button { background: #3b82f6; color: white; border: 0; border-radius: 6px; padding: 10px 20px; font-size: 16px; cursor: pointer; }
        .charts img { background: white; max-width: 48%; margin: 1%; display: none; }
        .label { font-weight: bold; }
    </style>
</head>
<body>
    <h1>Exoplanet Detector</h1>
    <button id="detect">Detect a planet</button>
    <div id="result"></div>
    <div class="charts">
        <img id="histogram" alt="histogram">
        <img id="scatter" alt="scatter plot">
    </div>
    <script>
        const show = (v, unit) => (v === null || v === undefined) ? "N/A" : (unit ? v + " " + unit : v);
        document.getElementById("detect").addEventListener("click", async () => {
            const out = document.getElementById("result");
            out.textContent = "Querying model...";
            try {
                const res = await fetch("/predict", {
                    method: "POST",
                    headers: { "Content-Type": "application/json" },
                    body: JSON.stringify({ val1: Math.random() * 10, val2: Math.random() * 5 })
                });
                const r = await res.json();
                if (!res.ok) throw new Error(r.error || res.statusText);
                out.innerHTML =
                    "<p><span class='label'>Name:</span> " + show(r.planet_name) + "</p>" +
                    "<p><span class='label'>Discovered:</span> " + show(r.disc_year) + "</p>" +
                    "<p><span class='label'>Method:</span> " + show(r.method) + "</p>" +
                    "<p><span class='label'>Radius:</span> " + show(r.radius, "Earth radii") + "</p>" +
                    "<p><span class='label'>Mass:</span> " + show(r.mass, "Earth masses") + "</p>" +
                    "<p><span class='label'>Archive disposition:</span> " + show(r.disposition) + "</p>" +
                    "<p><span class='label'>Model prediction:</span> " + r.pred_label + "</p>" +
                    "<p><span class='label'>Features:</span> " + r.features.join(", ") + " = " + JSON.stringify(r.input) + "</p>";
                for (const [id, key] of [["histogram", "histograma"], ["scatter", "dispersion"]]) {
                    const img = document.getElementById(id);
                    img.src = "data:image/png;base64," + r[key];
                    img.style.display = "inline-block";
                }
            } catch (e) {
                out.textContent = "Request failed: " + e.message;
            }
        });
    </script>
</body>
</html>
"#;
