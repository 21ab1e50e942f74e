//! Seeded train/test partitioning

use crate::error::{DetectorError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_samples` with a seeded RNG and cut it into train and test.
///
/// The test partition holds `ceil(test_size * n_samples)` rows.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(0.0..1.0).contains(&test_size) || test_size == 0.0 {
        return Err(DetectorError::InvalidInput(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_train == 0 {
        return Err(DetectorError::TrainingFailure(format!(
            "{} rows leave no training samples after a {:.0}% test split",
            n_samples,
            test_size * 100.0
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit { train, test: indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_sizes() {
        let split = train_test_split(10, 0.3, 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 7);

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = train_test_split(50, 0.3, 42).unwrap();
        let b = train_test_split(50, 0.3, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_few_rows() {
        assert!(matches!(
            train_test_split(1, 0.3, 42),
            Err(DetectorError::TrainingFailure(_))
        ));
        assert!(matches!(
            train_test_split(0, 0.3, 42),
            Err(DetectorError::TrainingFailure(_))
        ));
    }

    #[test]
    fn test_invalid_test_size() {
        assert!(train_test_split(10, 1.5, 42).is_err());
        assert!(train_test_split(10, 0.0, 42).is_err());
    }
}
