//! K-fold partitioning.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::DataFrame;
use crate::error::{BnForgeError, Result};

/// K-fold cross-validation splits of a frame.
///
/// Rows are shuffled once with the seed and cut into `k` contiguous folds whose
/// sizes differ by at most one. Fold `i` is the test part of split `i`; the
/// remaining folds form its training part. Both parts are materialized up front
/// so repeated scoring never re-splits.
#[derive(Debug, Clone)]
pub struct CrossValidation {
    folds: Vec<(DataFrame, DataFrame)>,
}

impl CrossValidation {
    /// # Errors
    ///
    /// Returns [`BnForgeError::InvalidArgument`] if `k < 2` or `k` exceeds the
    /// number of rows.
    pub fn new(df: &DataFrame, k: usize, seed: u64) -> Result<Self> {
        let n = df.num_rows();
        if k < 2 || k > n {
            return Err(BnForgeError::InvalidArgument(format!(
                "cannot build {k} folds from {n} rows"
            )));
        }

        let mut rows: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        rows.shuffle(&mut rng);

        let base = n / k;
        let extra = n % k;
        let mut bounds = Vec::with_capacity(k + 1);
        bounds.push(0);
        for i in 0..k {
            let size = base + usize::from(i < extra);
            bounds.push(bounds[i] + size);
        }

        let folds = (0..k)
            .map(|i| {
                let test = &rows[bounds[i]..bounds[i + 1]];
                let training: Vec<usize> = rows[..bounds[i]]
                    .iter()
                    .chain(&rows[bounds[i + 1]..])
                    .copied()
                    .collect();
                (df.take_rows(&training), df.take_rows(test))
            })
            .collect();

        Ok(Self { folds })
    }

    pub fn k(&self) -> usize {
        self.folds.len()
    }

    /// Returns `(training, test)` for fold `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= k()`.
    pub fn fold(&self, i: usize) -> (&DataFrame, &DataFrame) {
        let (training, test) = &self.folds[i];
        (training, test)
    }

    pub fn folds(&self) -> impl Iterator<Item = (&DataFrame, &DataFrame)> {
        self.folds.iter().map(|(training, test)| (training, test))
    }
}
