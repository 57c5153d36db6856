//! Linear Gaussian conditional distribution.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

use super::complete_columns;
use crate::data::DataFrame;

/// Lower bound applied to every variance estimate.
///
/// A deterministic relationship would otherwise give a zero variance and an
/// infinite log-likelihood.
pub const MIN_VARIANCE: f64 = 1e-10;

/// Least-squares fit of `variable = beta_0 + sum(beta_i * evidence_i) + noise`.
#[derive(Debug, Clone)]
pub struct LinearGaussianFit {
    variable: String,
    evidence: Vec<String>,
    beta: Vec<f64>,
    variance: f64,
    rows: usize,
}

impl LinearGaussianFit {
    /// Fits on the rows of `df` where the variable and all evidence are present.
    ///
    /// The variance is the residual sum of squares divided by
    /// `rows - evidence - 1` (at least 1), clamped to [`MIN_VARIANCE`].
    pub fn fit<S: AsRef<str>>(df: &DataFrame, variable: &str, evidence: &[S]) -> Self {
        let (columns, rows) = complete_columns(df, variable, evidence);
        let k = evidence.len();
        let n = rows.len();
        let evidence: Vec<String> = evidence.iter().map(|e| e.as_ref().to_string()).collect();

        if n == 0 {
            return Self {
                variable: variable.to_string(),
                evidence,
                beta: vec![0.0; k + 1],
                variance: 1.0,
                rows: 0,
            };
        }

        let x = DMatrix::from_fn(n, k + 1, |r, c| {
            if c == 0 {
                1.0
            } else {
                columns[c][rows[r]]
            }
        });
        let y = DVector::from_fn(n, |r, _| columns[0][rows[r]]);

        let xt = x.transpose();
        let xtx = &xt * &x;
        let xty = &xt * &y;
        let beta = match xtx.clone().cholesky() {
            Some(chol) => chol.solve(&xty),
            None => xtx
                .pseudo_inverse(1e-12)
                .map(|inv| inv * &xty)
                .unwrap_or_else(|_| DVector::zeros(k + 1)),
        };

        let rss = (&y - &x * &beta).norm_squared();
        let dof = n.saturating_sub(k + 1).max(1) as f64;
        let variance = (rss / dof).max(MIN_VARIANCE);

        Self {
            variable: variable.to_string(),
            evidence,
            beta: beta.iter().copied().collect(),
            variance,
            rows: n,
        }
    }

    /// Intercept followed by one coefficient per evidence variable.
    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Number of rows used by the fit.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Gaussian log-likelihood of the complete rows of `df`.
    pub fn loglik(&self, df: &DataFrame) -> f64 {
        let (columns, rows) = complete_columns(df, &self.variable, &self.evidence);
        let log_norm = -0.5 * (2.0 * PI * self.variance).ln();
        rows.iter()
            .map(|&r| {
                let mean = self.beta[0]
                    + self.beta[1..]
                        .iter()
                        .zip(&columns[1..])
                        .map(|(b, c)| b * c[r])
                        .sum::<f64>();
                let residual = columns[0][r] - mean;
                log_norm - residual * residual / (2.0 * self.variance)
            })
            .sum()
    }
}
