//! Model training module
//!
//! Provides the disposition classifier:
//! - Gini decision tree over class indices
//! - Seeded train/test split
//! - String label encoding
//! - The startup trainer producing an immutable [`ExoplanetClassifier`]

pub mod decision_tree;
pub mod split;
pub mod labels;
pub mod trainer;

pub use decision_tree::{DecisionTree, TreeNode};
pub use split::{train_test_split, TrainTestSplit};
pub use labels::LabelEncoder;
pub use trainer::{ModelTrainer, TrainerConfig, TrainingReport, ExoplanetClassifier, accuracy_score, feature_matrix, label_values};
