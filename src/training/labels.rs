//! String label encoding

use serde::Serialize;
use std::collections::BTreeSet;

/// Maps string labels to dense class indices in sorted label order
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on `labels` and return their encoded indices.
    pub fn fit_transform(labels: &[String]) -> (Self, Vec<usize>) {
        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let encoder = Self { classes };
        let encoded = labels
            .iter()
            .map(|label| encoder.encode(label).unwrap_or_default())
            .collect();
        (encoder, encoded)
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn decode(&self, class: usize) -> Option<&str> {
        self.classes.get(class).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
