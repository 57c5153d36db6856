//! Cross-validated training score paired with a holdout validation score.

use bnforge_core::{BayesianNetwork, DataFrame, FactorType, HoldOut, Result};

use crate::cv_likelihood::CvLikelihood;
use crate::holdout_likelihood::HoldoutLikelihood;
use crate::score::{Score, ScoreType};

/// Splits the data once. The training part drives a k-fold
/// [`CvLikelihood`]; the test part is kept aside for [`HoldoutLikelihood`].
///
/// As a [`Score`] it behaves like its training score. The search can query
/// [`ValidatedLikelihood::validation`] to gate progress on unseen data.
#[derive(Debug, Clone)]
pub struct ValidatedLikelihood {
    training: CvLikelihood,
    validation: HoldoutLikelihood,
}

impl ValidatedLikelihood {
    /// # Errors
    ///
    /// Fails if the holdout or the fold split of its training part cannot be
    /// built.
    pub fn new(df: &DataFrame, test_ratio: f64, k: usize, seed: u64) -> Result<Self> {
        let holdout = HoldOut::new(df, test_ratio, seed)?;
        let training = CvLikelihood::new(holdout.training_data(), k, seed)?;
        Ok(Self {
            training,
            validation: HoldoutLikelihood::from_holdout(holdout),
        })
    }

    pub fn training(&self) -> &CvLikelihood {
        &self.training
    }

    pub fn validation(&self) -> &HoldoutLikelihood {
        &self.validation
    }
}

impl Score for ValidatedLikelihood {
    fn score_type(&self) -> ScoreType {
        ScoreType::ValidatedLikelihood
    }

    fn compatible(&self, model: &BayesianNetwork) -> bool {
        self.training.compatible(model) && self.validation.compatible(model)
    }

    fn local_score_node_type(
        &self,
        model: &BayesianNetwork,
        node_type: FactorType,
        variable: usize,
        parents: &[usize],
    ) -> f64 {
        self.training
            .local_score_node_type(model, node_type, variable, parents)
    }
}
