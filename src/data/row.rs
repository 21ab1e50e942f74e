//! Reference row extraction

use crate::error::{DetectorError, Result};
use polars::prelude::*;
use serde::Serialize;

use super::features::FeatureNames;
use super::schema::{DISCOVERY_METHOD, DISC_YEAR, DISPOSITION, PL_BMASSE, PL_NAME, PL_RADE};

/// One planet drawn from the training table, shown next to a prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRow {
    pub name: Option<String>,
    pub disc_year: Option<i64>,
    pub method: Option<String>,
    pub radius: Option<f64>,
    pub mass: Option<f64>,
    pub disposition: Option<String>,
    /// Values of the two model features for this row
    pub feature_values: [Option<f64>; 2],
}

impl ReferenceRow {
    /// Read row `idx` of `df`. Missing columns read as absent.
    pub fn from_table(df: &DataFrame, idx: usize, features: &FeatureNames) -> Result<Self> {
        if idx >= df.height() {
            return Err(DetectorError::InvalidInput(format!(
                "row {} out of range for table with {} rows",
                idx,
                df.height()
            )));
        }

        Ok(Self {
            name: value_at(df, PL_NAME, idx)?.and_then(|v| as_string(&v)),
            disc_year: value_at(df, DISC_YEAR, idx)?.and_then(|v| as_i64(&v)),
            method: value_at(df, DISCOVERY_METHOD, idx)?.and_then(|v| as_string(&v)),
            radius: value_at(df, PL_RADE, idx)?.and_then(|v| as_f64(&v)),
            mass: value_at(df, PL_BMASSE, idx)?.and_then(|v| as_f64(&v)),
            disposition: value_at(df, DISPOSITION, idx)?.and_then(|v| as_string(&v)),
            feature_values: [
                value_at(df, features.first(), idx)?.and_then(|v| as_f64(&v)),
                value_at(df, features.second(), idx)?.and_then(|v| as_f64(&v)),
            ],
        })
    }
}

fn value_at<'a>(df: &'a DataFrame, column: &str, idx: usize) -> Result<Option<AnyValue<'a>>> {
    match df.column(column) {
        Ok(col) => Ok(Some(col.get(idx)?)),
        Err(_) => Ok(None),
    }
}

pub(crate) fn as_f64(value: &AnyValue) -> Option<f64> {
    if value.is_null() {
        return None;
    }
    value.extract::<f64>().filter(|v| v.is_finite())
}

fn as_i64(value: &AnyValue) -> Option<i64> {
    as_f64(value).map(|v| v as i64)
}

fn as_string(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}
