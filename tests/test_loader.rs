//! Integration test: dataset acquisition with remote and backup sources

use axum::{http::StatusCode, response::Html, routing::get, Router};
use exoplanet_detector::data::{DatasetLoader, FeatureNames, FeatureSelector, LoaderConfig};
use exoplanet_detector::error::DetectorError;
use std::io::Write;

const ARCHIVE_CSV: &str = "# Exoplanet archive export\n\
pl_name,disc_year,discoverymethod,pl_rade,pl_bmasse,default_flag,disposition\n\
Kepler-10 b,2011,Transit,1.47,3.26,1,CONFIRMED\n\
Kepler-22 b,2011,Transit,2.1,,1,CONFIRMED\n\
TOI-700 d,2020,Transit,1.07,1.72,1,CONFIRMED\n";

const BACKUP_CSV: &str = "pl_name,disc_year,discoverymethod,pl_rade,pl_bmasse,default_flag,disposition\n\
Backup b,2000,Radial Velocity,11.0,300.0,1,CANDIDATE\n";

// Nothing listens on port 1.
const UNREACHABLE: &str = "http://127.0.0.1:1/";

/// Serve `router` on an ephemeral local port and return its base URL.
async fn spawn_archive(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/sync", addr)
}

fn backup_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_remote_source_preferred() {
    let url = spawn_archive(Router::new().route("/sync", get(|| async { ARCHIVE_CSV }))).await;
    let backup = backup_file(BACKUP_CSV);

    let loader = DatasetLoader::new(
        LoaderConfig::default().with_url(url).with_backup_path(backup.path()).with_timeout_secs(5),
    );
    let df = loader.load().await.unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.column("pl_bmasse").unwrap().null_count(), 1);
}

#[tokio::test]
async fn test_error_status_falls_back_to_backup() {
    let url = spawn_archive(Router::new().route(
        "/sync",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    ))
    .await;
    let backup = backup_file(BACKUP_CSV);

    let loader = DatasetLoader::new(
        LoaderConfig::default().with_url(url).with_backup_path(backup.path()).with_timeout_secs(5),
    );
    let df = loader.load().await.unwrap();
    assert_eq!(df.height(), 1);
}

#[tokio::test]
async fn test_unreachable_remote_falls_back_to_backup() {
    let backup = backup_file(BACKUP_CSV);
    let loader = DatasetLoader::new(
        LoaderConfig::default()
            .with_url(UNREACHABLE)
            .with_backup_path(backup.path())
            .with_timeout_secs(5),
    );
    let df = loader.load().await.unwrap();
    assert_eq!(df.height(), 1);
}

#[tokio::test]
async fn test_both_sources_unavailable() {
    let loader = DatasetLoader::new(
        LoaderConfig::default()
            .with_url(UNREACHABLE)
            .with_backup_path("/nonexistent/exoplanets_backup.csv")
            .with_timeout_secs(5),
    );
    assert!(matches!(loader.load().await, Err(DetectorError::DataUnavailable(_))));
}

#[tokio::test]
async fn test_empty_backup_is_unavailable() {
    let backup = backup_file("");
    let loader = DatasetLoader::new(
        LoaderConfig::default()
            .with_url(UNREACHABLE)
            .with_backup_path(backup.path())
            .with_timeout_secs(5),
    );
    assert!(matches!(loader.load().await, Err(DetectorError::DataUnavailable(_))));
}

#[tokio::test]
async fn test_backup_without_archive_columns_loads() {
    let backup = backup_file("a,b,disposition_code\n1.0,2.0,x\n3.0,4.0,y\n5.0,6.0,x\n");
    let loader = DatasetLoader::new(
        LoaderConfig::default()
            .with_url(UNREACHABLE)
            .with_backup_path(backup.path())
            .with_timeout_secs(5),
    );
    let df = loader.load().await.unwrap();
    assert_eq!(df.height(), 3);

    // Selection fills in the archive columns and keeps the numeric pair.
    let (table, features) = FeatureSelector::select(df).unwrap();
    assert_eq!(features, FeatureNames::new("a", "b"));
    assert_eq!(table.height(), 3);
    assert!(table.column("disposition").is_ok());
}

#[tokio::test]
async fn test_html_remote_falls_back_to_backup() {
    let url = spawn_archive(Router::new().route(
        "/sync",
        get(|| async { Html("<html><body>pl_name,pl_rade</body></html>") }),
    ))
    .await;
    let backup = backup_file(BACKUP_CSV);

    let loader = DatasetLoader::new(
        LoaderConfig::default().with_url(url).with_backup_path(backup.path()).with_timeout_secs(5),
    );
    let df = loader.load().await.unwrap();
    assert_eq!(df.height(), 1);
    assert_eq!(df.column("pl_name").unwrap().str().unwrap().get(0), Some("Backup b"));
}
