//! Holdout log-likelihood.

use bnforge_core::{BayesianNetwork, DataFrame, FactorType, FittedFactor, HoldOut, Result};

use crate::score::{evidence_names, Score, ScoreType};

/// Log-likelihood of a test split under factors fitted on the training split.
#[derive(Debug, Clone)]
pub struct HoldoutLikelihood {
    holdout: HoldOut,
}

impl HoldoutLikelihood {
    /// # Errors
    ///
    /// Fails like [`HoldOut::new`].
    pub fn new(df: &DataFrame, test_ratio: f64, seed: u64) -> Result<Self> {
        Ok(Self {
            holdout: HoldOut::new(df, test_ratio, seed)?,
        })
    }

    pub fn from_holdout(holdout: HoldOut) -> Self {
        Self { holdout }
    }

    pub fn holdout(&self) -> &HoldOut {
        &self.holdout
    }

    pub fn training_data(&self) -> &DataFrame {
        self.holdout.training_data()
    }

    pub fn test_data(&self) -> &DataFrame {
        self.holdout.test_data()
    }
}

impl Score for HoldoutLikelihood {
    fn score_type(&self) -> ScoreType {
        ScoreType::HoldoutLikelihood
    }

    fn compatible(&self, model: &BayesianNetwork) -> bool {
        self.holdout.training_data().has_columns(model.names())
    }

    fn local_score_node_type(
        &self,
        model: &BayesianNetwork,
        node_type: FactorType,
        variable: usize,
        parents: &[usize],
    ) -> f64 {
        let evidence = evidence_names(model, parents);
        FittedFactor::fit(
            node_type,
            self.holdout.training_data(),
            model.name(variable),
            &evidence,
        )
        .loglik(self.holdout.test_data())
    }
}
