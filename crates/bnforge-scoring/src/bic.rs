//! Bayesian information criterion.

use std::f64::consts::PI;

use bnforge_core::{BayesianNetwork, BnForgeError, DataFrame, FactorType, LinearGaussianFit, Result};

use crate::score::{evidence_names, Score, ScoreType};

/// BIC for linear Gaussian nodes.
///
/// For a node with `k` parents fitted on the `n` rows where the node and all
/// parents are present:
///
/// ```text
/// loglik = 0.5 * (1 + k - n) - 0.5 * n * ln(2 pi) - n * ln(sqrt(variance))
/// bic    = loglik - ln(n) * 0.5 * (k + 2)
/// ```
///
/// The penalty counts the intercept, the variance and one coefficient per
/// parent.
#[derive(Debug, Clone)]
pub struct Bic {
    df: DataFrame,
}

impl Bic {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn data(&self) -> &DataFrame {
        &self.df
    }

    /// Like [`Score::local_score_node_type`], but reports factor types BIC
    /// has no formula for.
    pub fn try_local_score(
        &self,
        model: &BayesianNetwork,
        node_type: FactorType,
        variable: usize,
        parents: &[usize],
    ) -> Result<f64> {
        if node_type != FactorType::LinearGaussian {
            return Err(BnForgeError::UnsupportedModelType {
                score: ScoreType::Bic.to_string(),
                model: node_type.to_string(),
            });
        }
        let evidence = evidence_names(model, parents);
        let fit = LinearGaussianFit::fit(&self.df, model.name(variable), &evidence);
        Ok(bic_from_fit(&fit, parents.len()))
    }
}

fn bic_from_fit(fit: &LinearGaussianFit, num_evidence: usize) -> f64 {
    let rows = fit.rows() as f64;
    if fit.rows() == 0 {
        return f64::NEG_INFINITY;
    }
    let k = num_evidence as f64;
    let loglik = 0.5 * (1.0 + k - rows)
        - 0.5 * rows * (2.0 * PI).ln()
        - rows * fit.variance().sqrt().ln();
    loglik - rows.ln() * 0.5 * (k + 2.0)
}

impl Score for Bic {
    fn score_type(&self) -> ScoreType {
        ScoreType::Bic
    }

    fn compatible(&self, model: &BayesianNetwork) -> bool {
        self.df.has_columns(model.names())
    }

    /// Non linear Gaussian node types score `-inf`, so no search operator
    /// ever moves towards them. Use [`Score::validate`] to reject such models.
    fn local_score_node_type(
        &self,
        model: &BayesianNetwork,
        node_type: FactorType,
        variable: usize,
        parents: &[usize],
    ) -> f64 {
        self.try_local_score(model, node_type, variable, parents)
            .unwrap_or(f64::NEG_INFINITY)
    }
}
