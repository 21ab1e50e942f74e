//! Chart rendering
//!
//! Both charts are pure functions of (table, feature names, reference row)
//! and return PNG bytes. They are drawn with plotters on an in-memory bitmap.

pub mod canvas;
pub mod histogram;
pub mod scatter;

pub use canvas::{padded_range, render_png, ChartImage};

use crate::data::{FeatureNames, ReferenceRow};
use crate::error::{DetectorError, Result};
use polars::prelude::*;

/// Histogram of the first feature.
pub fn histogram(table: &DataFrame, features: &FeatureNames, reference: &ReferenceRow) -> Result<ChartImage> {
    histogram::render(table, features, reference)
}

/// Scatter plot of the two features.
pub fn scatter(table: &DataFrame, features: &FeatureNames, reference: &ReferenceRow) -> Result<ChartImage> {
    scatter::render(table, features, reference)
}

/// Values of `name` as f64; nulls and non-finite values are `None`.
pub(crate) fn column_values(table: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = table
        .column(name)
        .map_err(|_| DetectorError::DataError(format!("Column not found: {}", name)))?;
    let values = column.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}
