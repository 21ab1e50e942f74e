//! Decision tree classifier

use crate::error::{DetectorError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;

/// A node needs at least this many samples to be split.
const MIN_SAMPLES_SPLIT: usize = 2;
/// Each side of a split keeps at least this many samples.
const MIN_SAMPLES_LEAF: usize = 1;

/// Decision tree node
#[derive(Debug, Clone)]
pub enum TreeNode {
    /// Leaf node with predicted class index
    Leaf {
        class: usize,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Gini decision tree classifier over integer class indices
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    n_features: usize,
    n_classes: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            n_features: 0,
            n_classes: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Fit the tree. `y` holds class indices in `0..n_classes`.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(DetectorError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        if n_samples == 0 {
            return Err(DetectorError::TrainingFailure(
                "cannot fit a tree on zero samples".to_string(),
            ));
        }

        self.n_features = n_features;
        self.n_classes = y.iter().copied().max().map_or(0, |m| m + 1);

        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_tree(x, y, &indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn class_counts(&self, y: &[usize], indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[y[i]] += 1;
        }
        counts
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &[usize],
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let counts = self.class_counts(y, indices);
        let parent_impurity = gini(&counts, n_samples);

        let should_stop = n_samples < MIN_SAMPLES_SPLIT
            || self.max_depth.map_or(false, |d| depth >= d)
            || parent_impurity <= f64::EPSILON;

        if should_stop {
            return TreeNode::Leaf {
                class: majority_class(&counts),
                n_samples,
            };
        }

        let Some((feature_idx, threshold, gain)) = self.find_best_split(x, y, indices, parent_impurity) else {
            return TreeNode::Leaf {
                class: majority_class(&counts),
                n_samples,
            };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature_idx]] <= threshold);

        importances[feature_idx] += n_samples as f64 * gain;

        let left = Box::new(self.build_tree(x, y, &left_indices, depth + 1, importances));
        let right = Box::new(self.build_tree(x, y, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx,
            threshold,
            left,
            right,
            n_samples,
            impurity: parent_impurity,
        }
    }

    /// Best (feature, threshold, gain) over all features. Ties keep the lower feature index.
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &[usize],
        indices: &[usize],
        parent_impurity: f64,
    ) -> Option<(usize, f64, f64)> {
        let n = indices.len();

        let feature_results: Vec<Option<(usize, f64, f64)>> = (0..x.ncols())
            .into_par_iter()
            .map(|feature_idx| {
                let mut pairs: Vec<(f64, usize)> =
                    indices.iter().map(|&i| (x[[i, feature_idx]], y[i])).collect();
                pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                let mut left_counts = vec![0usize; self.n_classes];
                let mut right_counts = vec![0usize; self.n_classes];
                for &(_, class) in &pairs {
                    right_counts[class] += 1;
                }

                let mut best: Option<(f64, f64)> = None;

                // Sweep split positions; a split lies between two distinct values
                for pos in 0..n.saturating_sub(1) {
                    let class = pairs[pos].1;
                    left_counts[class] += 1;
                    right_counts[class] -= 1;

                    let (value, next_value) = (pairs[pos].0, pairs[pos + 1].0);
                    if next_value <= value {
                        continue;
                    }

                    let left_n = pos + 1;
                    let right_n = n - left_n;
                    if left_n < MIN_SAMPLES_LEAF || right_n < MIN_SAMPLES_LEAF {
                        continue;
                    }

                    let weighted = (left_n as f64 * gini(&left_counts, left_n)
                        + right_n as f64 * gini(&right_counts, right_n))
                        / n as f64;
                    let gain = parent_impurity - weighted;

                    if gain > best.map_or(0.0, |(g, _)| g) {
                        best = Some((gain, (value + next_value) / 2.0));
                    }
                }

                best.map(|(gain, threshold)| (feature_idx, threshold, gain))
            })
            .collect();

        feature_results
            .into_iter()
            .flatten()
            .fold(None, |acc: Option<(usize, f64, f64)>, cand| match acc {
                Some(best) if best.2 >= cand.2 => Some(best),
                _ => Some(cand),
            })
    }

    /// Predict class indices for each row of `x`
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let root = self.root.as_ref().ok_or(DetectorError::ModelNotFitted)?;
        self.check_width(x.ncols())?;

        Ok(x.rows()
            .into_iter()
            .map(|row| Self::predict_sample(root, row))
            .collect())
    }

    /// Predict the class index of a single sample
    pub fn predict_one(&self, sample: &[f64]) -> Result<usize> {
        let root = self.root.as_ref().ok_or(DetectorError::ModelNotFitted)?;
        self.check_width(sample.len())?;
        Ok(Self::predict_sample(root, ArrayView1::from(sample)))
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.n_features {
            return Err(DetectorError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", width),
            });
        }
        Ok(())
    }

    fn predict_sample(node: &TreeNode, sample: ArrayView1<f64>) -> usize {
        match node {
            TreeNode::Leaf { class, .. } => *class,
            TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                if sample[*feature_idx] <= *threshold {
                    Self::predict_sample(left, sample)
                } else {
                    Self::predict_sample(right, sample)
                }
            }
        }
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get tree depth (number of split levels)
    pub fn get_depth(&self) -> usize {
        fn depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        self.root.as_ref().map_or(0, depth)
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        fn leaves(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => leaves(left) + leaves(right),
            }
        }
        self.root.as_ref().map_or(0, leaves)
    }
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

/// Most frequent class; the lowest index wins ties.
fn majority_class(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .fold((0, 0), |(best, best_count), (class, &count)| {
            if count > best_count {
                (class, count)
            } else {
                (best, best_count)
            }
        })
        .0
}
