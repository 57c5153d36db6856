//! K-fold cross-validated log-likelihood.

use bnforge_core::{
    BayesianNetwork, CrossValidation, DataFrame, FactorType, FittedFactor, Result,
};

use crate::score::{evidence_names, Score, ScoreType};

/// Average held-out log-likelihood over `k` folds.
///
/// For every fold the factor is fitted on the other folds and evaluated on
/// the fold itself.
#[derive(Debug, Clone)]
pub struct CvLikelihood {
    cv: CrossValidation,
}

impl CvLikelihood {
    /// # Errors
    ///
    /// Fails like [`CrossValidation::new`].
    pub fn new(df: &DataFrame, k: usize, seed: u64) -> Result<Self> {
        Ok(Self {
            cv: CrossValidation::new(df, k, seed)?,
        })
    }

    pub fn cv(&self) -> &CrossValidation {
        &self.cv
    }
}

impl Score for CvLikelihood {
    fn score_type(&self) -> ScoreType {
        ScoreType::CvLikelihood
    }

    fn compatible(&self, model: &BayesianNetwork) -> bool {
        self.cv.fold(0).0.has_columns(model.names())
    }

    fn local_score_node_type(
        &self,
        model: &BayesianNetwork,
        node_type: FactorType,
        variable: usize,
        parents: &[usize],
    ) -> f64 {
        let evidence = evidence_names(model, parents);
        let variable = model.name(variable);
        let total: f64 = self
            .cv
            .folds()
            .map(|(training, test)| {
                FittedFactor::fit(node_type, training, variable, &evidence).loglik(test)
            })
            .sum();
        total / self.cv.k() as f64
    }
}
