//! Maximum-likelihood fitting of local factors.
//!
//! Scores fit a factor on one frame and evaluate its log-likelihood on another
//! (or the same) frame. [`FittedFactor`] dispatches on [`FactorType`].

mod ckde;
mod linear_gaussian;

use crate::data::DataFrame;
use crate::domain::FactorType;

pub use ckde::CkdeFit;
pub use linear_gaussian::{LinearGaussianFit, MIN_VARIANCE};

/// A fitted local conditional distribution of one variable given its evidence.
#[derive(Debug, Clone)]
pub enum FittedFactor {
    LinearGaussian(LinearGaussianFit),
    Ckde(CkdeFit),
}

impl FittedFactor {
    pub fn fit<S: AsRef<str>>(
        factor_type: FactorType,
        df: &DataFrame,
        variable: &str,
        evidence: &[S],
    ) -> Self {
        match factor_type {
            FactorType::LinearGaussian => {
                FittedFactor::LinearGaussian(LinearGaussianFit::fit(df, variable, evidence))
            }
            FactorType::Ckde => FittedFactor::Ckde(CkdeFit::fit(df, variable, evidence)),
        }
    }

    pub fn factor_type(&self) -> FactorType {
        match self {
            FittedFactor::LinearGaussian(_) => FactorType::LinearGaussian,
            FittedFactor::Ckde(_) => FactorType::Ckde,
        }
    }

    /// Log-likelihood of the complete rows of `df`.
    pub fn loglik(&self, df: &DataFrame) -> f64 {
        match self {
            FittedFactor::LinearGaussian(f) => f.loglik(df),
            FittedFactor::Ckde(f) => f.loglik(df),
        }
    }
}

/// Gathers the columns of `variable` followed by `evidence` and the rows where
/// all of them are present.
pub(crate) fn complete_columns<'a, S: AsRef<str>>(
    df: &'a DataFrame,
    variable: &str,
    evidence: &[S],
) -> (Vec<&'a [f64]>, Vec<usize>) {
    let mut names: Vec<&str> = Vec::with_capacity(evidence.len() + 1);
    names.push(variable);
    names.extend(evidence.iter().map(AsRef::as_ref));
    let columns = names.iter().filter_map(|n| df.column(n)).collect::<Vec<_>>();
    if columns.len() != names.len() {
        return (columns, Vec::new());
    }
    let rows = df.complete_rows(&names);
    (columns, rows)
}
