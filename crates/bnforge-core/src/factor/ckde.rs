//! Conditional kernel density estimate.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

use super::{complete_columns, MIN_VARIANCE};
use crate::data::DataFrame;

/// Gaussian-kernel density of `variable` given `evidence`, computed as the
/// ratio of a joint KDE over `(variable, evidence)` and a marginal KDE over
/// `evidence`.
///
/// The bandwidth follows Scott's rule, `H = n^(-2/(d+4)) * cov`. The marginal
/// reuses the evidence block of the joint bandwidth.
#[derive(Debug, Clone)]
pub struct CkdeFit {
    variable: String,
    evidence: Vec<String>,
    joint: Kde,
    marginal: Option<Kde>,
}

#[derive(Debug, Clone)]
struct Kde {
    /// Inverse Cholesky factor of the bandwidth.
    whitening: DMatrix<f64>,
    /// Training points premultiplied by `whitening`, one per column.
    points: DMatrix<f64>,
    /// `-d/2 ln(2 pi) - 1/2 ln det H - ln n`.
    log_norm: f64,
}

impl CkdeFit {
    pub fn fit<S: AsRef<str>>(df: &DataFrame, variable: &str, evidence: &[S]) -> Self {
        let (columns, rows) = complete_columns(df, variable, evidence);
        let d = evidence.len() + 1;
        let n = rows.len();

        let samples = DMatrix::from_fn(d, n, |c, r| columns[c][rows[r]]);
        let bandwidth = scott_bandwidth(&samples);

        let joint = Kde::new(&samples, bandwidth.clone());
        let marginal = (d > 1).then(|| {
            let sub_samples = samples.rows(1, d - 1).into_owned();
            let sub_bandwidth = bandwidth.view((1, 1), (d - 1, d - 1)).into_owned();
            Kde::new(&sub_samples, sub_bandwidth)
        });

        Self {
            variable: variable.to_string(),
            evidence: evidence.iter().map(|e| e.as_ref().to_string()).collect(),
            joint,
            marginal,
        }
    }

    /// Conditional log-likelihood of the complete rows of `df`.
    pub fn loglik(&self, df: &DataFrame) -> f64 {
        let (columns, rows) = complete_columns(df, &self.variable, &self.evidence);
        let d = columns.len();
        rows.iter()
            .map(|&r| {
                let point = DVector::from_fn(d, |c, _| columns[c][r]);
                let joint = self.joint.log_density(&point);
                match &self.marginal {
                    Some(marginal) => joint - marginal.log_density(&point.rows(1, d - 1).into_owned()),
                    None => joint,
                }
            })
            .sum()
    }
}

impl Kde {
    fn new(samples: &DMatrix<f64>, bandwidth: DMatrix<f64>) -> Self {
        let d = samples.nrows();
        let n = samples.ncols().max(1) as f64;
        let (whitening, half_log_det) = whiten(bandwidth);
        Self {
            points: &whitening * samples,
            whitening,
            log_norm: -0.5 * d as f64 * (2.0 * PI).ln() - half_log_det - n.ln(),
        }
    }

    fn log_density(&self, x: &DVector<f64>) -> f64 {
        if self.points.ncols() == 0 {
            return f64::NEG_INFINITY;
        }
        let z = &self.whitening * x;
        let exponents: Vec<f64> = self
            .points
            .column_iter()
            .map(|p| -0.5 * (&z - p).norm_squared())
            .collect();
        log_sum_exp(&exponents) + self.log_norm
    }
}

fn scott_bandwidth(samples: &DMatrix<f64>) -> DMatrix<f64> {
    let d = samples.nrows();
    let n = samples.ncols();
    if n < 2 {
        return DMatrix::identity(d, d);
    }
    let mean = samples.column_mean();
    let centered = DMatrix::from_fn(d, n, |i, j| samples[(i, j)] - mean[i]);
    let covariance = (&centered * centered.transpose()) / (n - 1) as f64;
    let factor = (n as f64).powf(-2.0 / (d as f64 + 4.0));
    covariance * factor
}

/// Returns `L^-1` and `sum(ln L_ii)` for the Cholesky factor `L` of `h`,
/// adding a growing diagonal jitter until `h` factorizes.
fn whiten(mut h: DMatrix<f64>) -> (DMatrix<f64>, f64) {
    let d = h.nrows();
    let mut jitter = MIN_VARIANCE;
    for _ in 0..32 {
        if let Some(chol) = h.clone().cholesky() {
            let l = chol.l();
            if let Some(inverse) = l.solve_lower_triangular(&DMatrix::identity(d, d)) {
                let half_log_det = l.diagonal().iter().map(|v| v.ln()).sum();
                return (inverse, half_log_det);
            }
        }
        for i in 0..d {
            h[(i, i)] += jitter;
        }
        jitter *= 10.0;
    }
    (DMatrix::identity(d, d), 0.0)
}

fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}
