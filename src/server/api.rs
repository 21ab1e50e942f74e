//! API route definitions

use std::sync::Arc;
use axum::{
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use super::{handlers, state::AppState};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found. Visit / for the web UI or POST /predict for a prediction.",
        })),
    )
}

async fn handle_405() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Method not allowed.",
        })),
    )
}

/// CORS configured via CORS_ORIGIN; unset or `*` allows any origin.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        Some(origin) if !origin.is_empty() && origin != "*" => match origin.parse::<HeaderValue>() {
            Ok(value) => base.allow_origin(value),
            Err(_) => {
                warn!(origin = %origin, "Invalid CORS_ORIGIN, allowing any origin");
                base.allow_origin(Any)
            }
        },
        _ => base.allow_origin(Any),
    }
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();
    let cors_origin = state.config.cors_origin.clone();

    let mut app = Router::new()
        .route("/", get(handlers::serve_index))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health_check))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .with_state(state);

    // Serve static files if directory exists
    if let Some(dir) = static_dir {
        let path = std::path::Path::new(&dir);
        if path.exists() {
            app = app.nest_service("/static", ServeDir::new(path));
        }
    }

    app.layer(CompressionLayer::new())
        .layer(cors_layer(cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_any_origin_value() {
        // Construction must not panic for any input.
        let _ = cors_layer(None);
        let _ = cors_layer(Some("*"));
        let _ = cors_layer(Some("http://localhost:3000"));
        let _ = cors_layer(Some("bad\nvalue"));
    }
}
