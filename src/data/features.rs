//! Feature selection
//!
//! The model's two input dimensions are the first two numeric columns in
//! table order. Column order in the source therefore decides what the model
//! learns: a reordered archive response silently changes the features.

use crate::error::{DetectorError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use super::schema::{DEFAULT_FEATURES, REQUIRED_COLUMNS};

/// Ordered pair of feature column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureNames([String; 2]);

impl FeatureNames {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self([first.into(), second.into()])
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn second(&self) -> &str {
        &self.0[1]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }
}

impl fmt::Display for FeatureNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0[0], self.0[1])
    }
}

/// Returns true for the integer and float dtypes.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Selects model features from the raw table and builds the training table
pub struct FeatureSelector;

impl FeatureSelector {
    /// Add every required column missing from `df` as an all-null column.
    ///
    /// Returns the names of the synthesized columns.
    pub fn ensure_columns(df: &mut DataFrame) -> Result<Vec<String>> {
        let height = df.height();
        let mut synthesized = Vec::new();

        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                df.with_column(Column::full_null(name.into(), height, &DataType::Null))?;
                synthesized.push(name.to_string());
            }
        }

        Ok(synthesized)
    }

    /// Names of numeric columns, in table order.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// First two numeric columns, or the default pair when fewer exist.
    pub fn pick_features(df: &DataFrame) -> (FeatureNames, bool) {
        let numeric = Self::numeric_columns(df);
        match numeric.as_slice() {
            [first, second, ..] => (FeatureNames::new(first.as_str(), second.as_str()), false),
            _ => (FeatureNames::new(DEFAULT_FEATURES[0], DEFAULT_FEATURES[1]), true),
        }
    }

    /// Keep only rows where both features are present.
    pub fn drop_incomplete(df: &DataFrame, features: &FeatureNames) -> Result<DataFrame> {
        let first = df
            .column(features.first())
            .map_err(|_| DetectorError::DataError(format!("Feature column not found: {}", features.first())))?;
        let second = df
            .column(features.second())
            .map_err(|_| DetectorError::DataError(format!("Feature column not found: {}", features.second())))?;

        let mask = first.is_not_null() & second.is_not_null();
        Ok(df.filter(&mask)?)
    }

    /// Run the full selection: guarantee columns, pick features, drop incomplete rows.
    pub fn select(mut df: DataFrame) -> Result<(DataFrame, FeatureNames)> {
        let synthesized = Self::ensure_columns(&mut df)?;
        if !synthesized.is_empty() {
            warn!(columns = ?synthesized, "Columns missing from dataset, filled with nulls");
        }

        let (features, used_default) = Self::pick_features(&df);
        if used_default {
            warn!(features = %features, "Fewer than two numeric columns, using default feature pair");
        }

        let raw_rows = df.height();
        let table = Self::drop_incomplete(&df, &features)?;

        if table.height() == 0 {
            warn!(features = %features, "Training table is empty after dropping incomplete rows");
        }
        info!(
            features = %features,
            raw_rows,
            training_rows = table.height(),
            "Feature selection complete"
        );

        Ok((table, features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_columns_adds_missing() {
        let mut df = df!("pl_name" => &["a", "b"], "pl_rade" => &[1.0, 2.0]).unwrap();
        let added = FeatureSelector::ensure_columns(&mut df).unwrap();

        assert_eq!(added.len(), 5);
        assert_eq!(df.width(), 7);
        for name in REQUIRED_COLUMNS {
            assert!(df.column(name).is_ok(), "missing {}", name);
        }
        assert_eq!(df.column("disposition").unwrap().null_count(), 2);
    }

    #[test]
    fn test_numeric_columns_in_table_order() {
        let df = df!(
            "name" => &["x", "y"],
            "b" => &[1i64, 2],
            "a" => &[0.5, 1.5],
            "c" => &[3.0, 4.0]
        )
        .unwrap();

        assert_eq!(FeatureSelector::numeric_columns(&df), vec!["b", "a", "c"]);
        let (features, used_default) = FeatureSelector::pick_features(&df);
        assert_eq!(features, FeatureNames::new("b", "a"));
        assert!(!used_default);
    }

    #[test]
    fn test_all_empty_column_is_not_numeric() {
        let df = crate::data::parse_csv(b"pl_name,disc_year,pl_rade,pl_bmasse\nx,,1.0,2.0\ny,,3.0,4.0\n").unwrap();
        assert_eq!(df.column("disc_year").unwrap().dtype(), &DataType::String);

        let (features, used_default) = FeatureSelector::pick_features(&df);
        assert_eq!(features, FeatureNames::new("pl_rade", "pl_bmasse"));
        assert!(!used_default);
    }

    #[test]
    fn test_default_pair_when_not_enough_numeric() {
        let df = df!("pl_name" => &["x"], "pl_rade" => &[1.0]).unwrap();
        let (features, used_default) = FeatureSelector::pick_features(&df);
        assert!(used_default);
        assert_eq!(features, FeatureNames::new("pl_rade", "pl_bmasse"));
    }

    #[test]
    fn test_default_pair_on_synthesized_columns_yields_empty_table() {
        let df = df!("pl_name" => &["x", "y"]).unwrap();
        let (table, features) = FeatureSelector::select(df).unwrap();
        assert_eq!(features, FeatureNames::new("pl_rade", "pl_bmasse"));
        assert_eq!(table.height(), 0);
    }

    #[test]
    fn test_drop_incomplete_rows() {
        let df = df!(
            "a" => &[Some(1.0), None, Some(3.0), Some(4.0)],
            "b" => &[Some(1.0), Some(2.0), None, Some(4.0)]
        )
        .unwrap();

        let table = FeatureSelector::drop_incomplete(&df, &FeatureNames::new("a", "b")).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.column("a").unwrap().null_count(), 0);
        assert_eq!(table.column("b").unwrap().null_count(), 0);
    }

    #[test]
    fn test_feature_names_serialize_as_array() {
        let json = serde_json::to_string(&FeatureNames::new("pl_rade", "pl_bmasse")).unwrap();
        assert_eq!(json, r#"["pl_rade","pl_bmasse"]"#);
    }
}
