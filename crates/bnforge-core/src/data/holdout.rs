//! Single train/test split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::DataFrame;
use crate::error::{BnForgeError, Result};

/// Splits a frame once into training and test data.
///
/// Rows are shuffled with a seeded generator, so a given `(df, ratio, seed)`
/// always yields the same split.
#[derive(Debug, Clone)]
pub struct HoldOut {
    training: DataFrame,
    test: DataFrame,
}

impl HoldOut {
    /// Creates the split. The test part holds `floor(n * test_ratio)` rows,
    /// adjusted so that both parts keep at least one row.
    ///
    /// # Errors
    ///
    /// Returns [`BnForgeError::InvalidArgument`] if the ratio is outside
    /// `(0, 1)` or the frame has fewer than two rows.
    pub fn new(df: &DataFrame, test_ratio: f64, seed: u64) -> Result<Self> {
        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(BnForgeError::InvalidArgument(format!(
                "test ratio must be in (0, 1), got {test_ratio}"
            )));
        }
        let n = df.num_rows();
        if n < 2 {
            return Err(BnForgeError::InvalidArgument(format!(
                "holdout needs at least 2 rows, got {n}"
            )));
        }

        let mut rows: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        rows.shuffle(&mut rng);

        let test_rows = ((n as f64 * test_ratio).floor() as usize).clamp(1, n - 1);
        let (test, training) = rows.split_at(test_rows);

        Ok(Self {
            training: df.take_rows(training),
            test: df.take_rows(test),
        })
    }

    pub fn training_data(&self) -> &DataFrame {
        &self.training
    }

    pub fn test_data(&self) -> &DataFrame {
        &self.test
    }
}
