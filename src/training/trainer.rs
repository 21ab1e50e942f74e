//! One-shot model training on the feature-selected table

use crate::data::schema::{LABEL_COLUMN, UNKNOWN_LABEL};
use crate::data::FeatureNames;
use crate::error::{DetectorError, Result};
use ndarray::{Array2, Axis};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use super::decision_tree::DecisionTree;
use super::labels::LabelEncoder;
use super::split::train_test_split;

/// Trainer configuration
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub max_depth: usize,
    pub test_size: f64,
    pub random_seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            test_size: 0.3,
            random_seed: 42,
        }
    }
}

/// Outcome of a training run, reported once at startup
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub classes: Vec<String>,
    pub depth: usize,
    pub n_leaves: usize,
    pub feature_importances: Vec<f64>,
}

/// Immutable classifier mapping a feature pair to a disposition label
#[derive(Debug, Clone)]
pub struct ExoplanetClassifier {
    tree: DecisionTree,
    labels: LabelEncoder,
    features: FeatureNames,
}

impl ExoplanetClassifier {
    /// Predict the disposition label for one feature pair.
    pub fn predict(&self, input: [f64; 2]) -> Result<String> {
        let class = self.tree.predict_one(&input)?;
        self.labels
            .decode(class)
            .map(str::to_string)
            .ok_or_else(|| DetectorError::PredictionFailure(format!("unknown class index {}", class)))
    }

    pub fn features(&self) -> &FeatureNames {
        &self.features
    }

    /// Labels the model can emit, sorted.
    pub fn classes(&self) -> &[String] {
        self.labels.classes()
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }
}

/// Fits the disposition classifier
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Split, fit and score. Every failure is reported as [`DetectorError::TrainingFailure`].
    pub fn train(
        &self,
        table: &DataFrame,
        features: &FeatureNames,
    ) -> Result<(ExoplanetClassifier, TrainingReport)> {
        self.try_train(table, features).map_err(|e| match e {
            DetectorError::TrainingFailure(_) => e,
            other => DetectorError::TrainingFailure(other.to_string()),
        })
    }

    fn try_train(
        &self,
        table: &DataFrame,
        features: &FeatureNames,
    ) -> Result<(ExoplanetClassifier, TrainingReport)> {
        if table.height() == 0 {
            return Err(DetectorError::TrainingFailure(format!(
                "training table is empty for features {}",
                features
            )));
        }

        let x = feature_matrix(table, features)?;
        let labels = label_values(table)?;
        let (encoder, y) = LabelEncoder::fit_transform(&labels);

        let split = train_test_split(table.height(), self.config.test_size, self.config.random_seed)?;
        let x_train = x.select(Axis(0), &split.train);
        let x_test = x.select(Axis(0), &split.test);
        let y_train: Vec<usize> = split.train.iter().map(|&i| y[i]).collect();
        let y_test: Vec<usize> = split.test.iter().map(|&i| y[i]).collect();

        let mut tree = DecisionTree::new().with_max_depth(self.config.max_depth);
        tree.fit(&x_train, &y_train)?;

        let predictions = tree.predict(&x_test)?;
        let accuracy = accuracy_score(&y_test, &predictions);

        let report = TrainingReport {
            accuracy,
            n_train: y_train.len(),
            n_test: y_test.len(),
            classes: encoder.classes().to_vec(),
            depth: tree.get_depth(),
            n_leaves: tree.get_n_leaves(),
            feature_importances: tree
                .feature_importances()
                .map(|imp| imp.to_vec())
                .unwrap_or_default(),
        };

        info!(
            accuracy = report.accuracy,
            n_train = report.n_train,
            n_test = report.n_test,
            classes = ?report.classes,
            depth = report.depth,
            leaves = report.n_leaves,
            "Model trained"
        );

        let model = ExoplanetClassifier {
            tree,
            labels: encoder,
            features: features.clone(),
        };

        Ok((model, report))
    }
}

/// Fraction of equal entries; 0 for empty input.
pub fn accuracy_score(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(a, b)| a == b).count();
    correct as f64 / y_true.len() as f64
}

/// Extract the two feature columns into a row-major matrix.
pub fn feature_matrix(df: &DataFrame, features: &FeatureNames) -> Result<Array2<f64>> {
    let n_rows = df.height();

    let col_data: Vec<Vec<f64>> = features
        .as_slice()
        .iter()
        .map(|name| {
            let column = df
                .column(name)
                .map_err(|_| DetectorError::DataError(format!("Feature column not found: {}", name)))?;
            let values = column.cast(&DataType::Float64)?;
            values
                .f64()?
                .into_iter()
                .map(|v| {
                    v.ok_or_else(|| {
                        DetectorError::DataError(format!("Feature column {} contains nulls", name))
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn((n_rows, col_data.len()), |(r, c)| col_data[c][r]))
}

/// Disposition labels with absent values replaced by `UNKNOWN`.
pub fn label_values(df: &DataFrame) -> Result<Vec<String>> {
    let Ok(column) = df.column(LABEL_COLUMN) else {
        return Ok(vec![UNKNOWN_LABEL.to_string(); df.height()]);
    };

    let as_str = column.cast(&DataType::String)?;
    Ok(as_str
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(UNKNOWN_LABEL).to_string())
        .collect())
}
