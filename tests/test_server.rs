//! Integration test: Server API endpoints

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use exoplanet_detector::server::{create_router, AppState, Lifecycle, ServerConfig};
use exoplanet_detector::service::PredictionContext;
use exoplanet_detector::training::ModelTrainer;
use polars::prelude::*;
use std::sync::Arc;
use tower::ServiceExt;

// Features come first so they are the first two numeric columns.
fn fixture_table() -> DataFrame {
    df!(
        "pl_name" => &["A b", "B b", "C b", "D b", "E b", "F b", "G b", "H b", "I b", "J b"],
        "pl_rade" => &[1.0, 1.1, 1.3, 1.5, 1.7, 11.0, 11.5, 12.0, 12.5, 13.0],
        "pl_bmasse" => &[2.0, 2.5, 3.0, 3.5, 4.0, 310.0, 320.0, 330.0, 340.0, 350.0],
        "disc_year" => &[1995i64, 2001, 2005, 2009, 2010, 2012, 2014, 2016, 2018, 2020],
        "discoverymethod" => &["Transit"; 10],
        "default_flag" => &[1i64; 10],
        "disposition" => &["CONFIRMED", "CONFIRMED", "CONFIRMED", "CONFIRMED", "CONFIRMED",
                           "CANDIDATE", "CANDIDATE", "CANDIDATE", "CANDIDATE", "CANDIDATE"]
    )
    .unwrap()
}

fn test_state() -> Arc<AppState> {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: None,
        cors_origin: None,
    };
    let (context, _) = PredictionContext::from_raw_table(fixture_table(), &ModelTrainer::default()).unwrap();
    Arc::new(AppState::new(config, Arc::new(context)))
}

fn test_app() -> axum::Router {
    create_router(test_state())
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_predict(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_predict_returns_all_fields() {
    let response = test_app()
        .oneshot(post_predict(r#"{"val1": 1.2, "val2": 3.0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["features"], serde_json::json!(["pl_rade", "pl_bmasse"]));
    assert_eq!(json["input"], serde_json::json!([1.2, 3.0]));
    assert_eq!(json["prediction"], json["pred_label"]);
    let label = json["prediction"].as_str().unwrap();
    assert!(label == "CONFIRMED" || label == "CANDIDATE");
    assert!(json["planet_name"].is_string());
    assert!(json["disc_year"].is_i64());
    assert_eq!(json["method"], "Transit");
    assert!(json["histograma"].as_str().unwrap().starts_with("iVBORw0KGgo"));
    assert!(json["dispersion"].as_str().unwrap().starts_with("iVBORw0KGgo"));
}

#[tokio::test]
async fn test_predict_empty_object_defaults_to_zero() {
    let response = test_app().oneshot(post_predict("{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["input"], serde_json::json!([0.0, 0.0]));
}

#[tokio::test]
async fn test_predict_empty_body_defaults_to_zero() {
    let response = test_app().oneshot(post_predict("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["input"], serde_json::json!([0.0, 0.0]));
}

#[tokio::test]
async fn test_predict_separates_classes() {
    let app = test_app();
    let small = json_body(app.clone().oneshot(post_predict(r#"{"val1": 1.0, "val2": 2.0}"#)).await.unwrap()).await;
    let large = json_body(app.oneshot(post_predict(r#"{"val1": 12.0, "val2": 330.0}"#)).await.unwrap()).await;
    assert_eq!(small["prediction"], "CONFIRMED");
    assert_eq!(large["prediction"], "CANDIDATE");
}

#[tokio::test]
async fn test_predict_malformed_json_is_bad_request() {
    let response = test_app().oneshot(post_predict("{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_predict_get_not_allowed() {
    let response = test_app()
        .oneshot(Request::builder().uri("/predict").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = test_state();
    assert_eq!(state.lifecycle(), Lifecycle::Ready);

    let response = create_router(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["training_rows"], 10);
    assert_eq!(json["labels"], serde_json::json!(["CANDIDATE", "CONFIRMED"]));
}

#[tokio::test]
async fn test_root_serves_html() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("/predict"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = test_app()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert!(json["error"].is_string());
}
