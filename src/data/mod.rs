//! Dataset module
//!
//! Loading of the raw exoplanet table, the fixed column layout, feature
//! selection and reference-row extraction.

pub mod schema;
pub mod loader;
pub mod features;
pub mod row;

pub use loader::{DatasetLoader, LoaderConfig, parse_csv, DEFAULT_DATASET_URL, DEFAULT_BACKUP_PATH};
pub use features::{FeatureNames, FeatureSelector, is_numeric_dtype};
pub use row::ReferenceRow;
