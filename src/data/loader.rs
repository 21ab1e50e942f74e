//! Dataset acquisition
//!
//! The remote exoplanet archive is queried first; on any network or parse
//! failure the local backup file is read instead. Only when both fail does
//! loading return [`DetectorError::DataUnavailable`].

use crate::error::{DetectorError, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// NASA Exoplanet Archive TAP query: top 2000 rows of the seven columns as CSV.
pub const DEFAULT_DATASET_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync?query=select+top+2000+pl_name,disc_year,discoverymethod,pl_rade,pl_bmasse,default_flag,disposition+from+ps&format=csv";

/// Backup file looked up in the working directory.
pub const DEFAULT_BACKUP_PATH: &str = "exoplanets_backup.csv";

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub url: String,
    pub backup_path: PathBuf,
    pub timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATASET_URL").unwrap_or_else(|_| DEFAULT_DATASET_URL.to_string()),
            backup_path: std::env::var("DATASET_BACKUP")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_BACKUP_PATH)),
            timeout_secs: std::env::var("DATASET_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl LoaderConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_path = path.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Loads the raw exoplanet table
pub struct DatasetLoader {
    config: LoaderConfig,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl DatasetLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the dataset, falling back to the backup file if the archive is unreachable.
    pub async fn load(&self) -> Result<DataFrame> {
        info!(url = %self.config.url, "Downloading exoplanet dataset");

        let remote_err = match self.fetch_remote().await {
            Ok(df) => {
                info!(rows = df.height(), columns = df.width(), source = "remote", "Dataset loaded");
                return Ok(df);
            }
            Err(e) => {
                warn!(error = %e, backup = %self.config.backup_path.display(), "Remote dataset unavailable, trying local backup");
                e
            }
        };

        match self.load_backup() {
            Ok(df) => {
                info!(rows = df.height(), columns = df.width(), source = "backup", "Dataset loaded");
                Ok(df)
            }
            Err(backup_err) => {
                error!(remote = %remote_err, backup = %backup_err, "No dataset source available");
                Err(DetectorError::DataUnavailable(format!(
                    "remote: {}; backup {}: {}",
                    remote_err,
                    self.config.backup_path.display(),
                    backup_err
                )))
            }
        }
    }

    async fn fetch_remote(&self) -> Result<DataFrame> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| DetectorError::DataError(format!("Failed to create HTTP client: {}", e)))?;

        let response = client
            .get(&self.config.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DetectorError::DataError(format!("Request failed: {}", e)))?;

        // An HTML body is an error page or portal, not the archive export.
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.to_ascii_lowercase().contains("text/html"));
        if is_html {
            return Err(DetectorError::DataError(
                "Remote returned an HTML page instead of CSV".to_string(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DetectorError::DataError(format!("Failed to read response body: {}", e)))?;

        parse_csv(&body)
    }

    /// Read the local backup file.
    pub fn load_backup(&self) -> Result<DataFrame> {
        let bytes = std::fs::read(&self.config.backup_path)?;
        parse_csv(&bytes)
    }
}

/// Parse archive CSV, skipping `#` comment lines and inferring types from every row.
pub fn parse_csv(bytes: &[u8]) -> Result<DataFrame> {
    let parse_opts = CsvParseOptions::default().with_comment_prefix(Some("#"));

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(parse_opts)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    Ok(df)
}
