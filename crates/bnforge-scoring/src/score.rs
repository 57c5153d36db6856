//! Score trait definition

use std::fmt::{self, Debug};
use std::str::FromStr;

use bnforge_core::{BayesianNetwork, BnForgeError, FactorType, NetworkType, Result};

/// Identifies a score strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreType {
    Bic,
    CvLikelihood,
    HoldoutLikelihood,
    /// Cross-validated training score with a holdout validation score.
    ValidatedLikelihood,
}

impl ScoreType {
    /// Score used when the caller does not name one.
    pub fn default_for(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Gaussian => ScoreType::Bic,
            NetworkType::Semiparametric => ScoreType::ValidatedLikelihood,
        }
    }

    /// True if the score has a formula for every factor type of the class.
    pub fn supports(self, network_type: NetworkType) -> bool {
        match self {
            ScoreType::Bic => network_type == NetworkType::Gaussian,
            _ => true,
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreType::Bic => "bic",
            ScoreType::CvLikelihood => "cv-lik",
            ScoreType::HoldoutLikelihood => "holdout-lik",
            ScoreType::ValidatedLikelihood => "validated-lik",
        };
        f.write_str(s)
    }
}

impl FromStr for ScoreType {
    type Err = BnForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bic" => Ok(ScoreType::Bic),
            "cv-lik" => Ok(ScoreType::CvLikelihood),
            "holdout-lik" => Ok(ScoreType::HoldoutLikelihood),
            "validated-lik" => Ok(ScoreType::ValidatedLikelihood),
            other => Err(BnForgeError::InvalidArgument(format!(
                "unknown score {other}"
            ))),
        }
    }
}

/// A decomposable network score over a fixed data set.
///
/// Implementations are read-only: querying a local score for a hypothetical
/// parent set or factor type never mutates the stored data, so the same score
/// can be shared across threads while operator deltas are refreshed.
///
/// The network score is the sum of the local scores of the regular nodes.
/// Interface nodes of a conditional network carry no factor and contribute
/// nothing.
pub trait Score: Send + Sync + Debug {
    fn score_type(&self) -> ScoreType;

    fn is_decomposable(&self) -> bool {
        true
    }

    /// True if the data holds a column for every node of `model`.
    fn compatible(&self, model: &BayesianNetwork) -> bool;

    /// Local score of `variable` with the given factor type and parents.
    fn local_score_node_type(
        &self,
        model: &BayesianNetwork,
        node_type: FactorType,
        variable: usize,
        parents: &[usize],
    ) -> f64;

    /// Local score of `variable` with its current factor type and the given
    /// parents.
    fn local_score(&self, model: &BayesianNetwork, variable: usize, parents: &[usize]) -> f64 {
        self.local_score_node_type(model, model.node_type(variable), variable, parents)
    }

    /// Local score of `variable` as it currently stands in `model`.
    fn node_score(&self, model: &BayesianNetwork, variable: usize) -> f64 {
        self.local_score(model, variable, model.parents(variable))
    }

    /// Total score of `model`.
    fn score(&self, model: &BayesianNetwork) -> f64 {
        model.nodes().map(|n| self.node_score(model, n)).sum()
    }

    /// Checks the score can evaluate `model`.
    ///
    /// # Errors
    ///
    /// [`BnForgeError::InvalidArgument`] if the data lacks a model column,
    /// [`BnForgeError::UnsupportedModelType`] if the score has no formula for
    /// the model's network class.
    fn validate(&self, model: &BayesianNetwork) -> Result<()> {
        if !self.compatible(model) {
            return Err(BnForgeError::InvalidArgument(format!(
                "data for score {} does not cover every node of the model",
                self.score_type()
            )));
        }
        if !self.score_type().supports(model.network_type()) {
            return Err(BnForgeError::UnsupportedModelType {
                score: self.score_type().to_string(),
                model: model.network_type().to_string(),
            });
        }
        Ok(())
    }
}

/// Names of the given parent indices.
pub fn evidence_names<'a>(model: &'a BayesianNetwork, parents: &[usize]) -> Vec<&'a str> {
    parents.iter().map(|&p| model.name(p)).collect()
}
