//! Identifier-driven entry point.

use bnforge_config::HillClimbingConfig;
use bnforge_core::{BayesianNetwork, BnForgeError, DataFrame, NetworkType, Result};
use bnforge_scoring::{
    Bic, CvLikelihood, HoldoutLikelihood, ScoreType, ValidatedLikelihood,
};

use super::{GreedyHillClimbing, SearchOptions, SearchStatistics, StructureConstraints};
use crate::operator::{OperatorPool, OperatorSetType};

/// Learns a network structure from `df`.
///
/// The network class comes from `start` when given, otherwise from
/// `config.network_type`, and the default start model has one node per
/// column and no arcs. `seed` drives every data split.
///
/// # Errors
///
/// [`BnForgeError::InvalidArgument`] for unknown identifiers, invalid
/// numeric options and score or operator kinds the network class does not
/// support, plus every error [`GreedyHillClimbing`] reports during setup.
pub fn hc(
    df: &DataFrame,
    start: Option<BayesianNetwork>,
    config: &HillClimbingConfig,
    seed: u64,
) -> Result<BayesianNetwork> {
    hc_with_statistics(df, start, config, seed).map(|(model, _)| model)
}

/// Like [`hc`], also returning the statistics of the search.
pub fn hc_with_statistics(
    df: &DataFrame,
    start: Option<BayesianNetwork>,
    config: &HillClimbingConfig,
    seed: u64,
) -> Result<(BayesianNetwork, SearchStatistics)> {
    config
        .validate()
        .map_err(|e| BnForgeError::InvalidArgument(e.to_string()))?;

    let network_type = match &start {
        Some(model) => model.network_type(),
        None => config.network_type.parse::<NetworkType>()?,
    };
    let score_type = match &config.score {
        Some(name) => name.parse::<ScoreType>()?,
        None => ScoreType::default_for(network_type),
    };
    if !score_type.supports(network_type) {
        return Err(BnForgeError::InvalidArgument(format!(
            "score {score_type} is not defined for {network_type}"
        )));
    }
    let operator_types = match &config.operators {
        Some(names) => names
            .iter()
            .map(|name| name.parse::<OperatorSetType>())
            .collect::<Result<Vec<_>>>()?,
        None => OperatorSetType::default_for(network_type),
    };
    if network_type.is_homogeneous() && operator_types.contains(&OperatorSetType::NodeType) {
        return Err(BnForgeError::InvalidArgument(format!(
            "operator set node_type is not defined for {network_type}"
        )));
    }

    let start = match start {
        Some(model) => model,
        None => BayesianNetwork::new(network_type, df.names())?,
    };
    let mut pool = OperatorPool::from_types(&operator_types)?;
    let constraints = StructureConstraints::from(config);
    let options = SearchOptions::from(config);
    let mut search = GreedyHillClimbing::new();

    let model = match score_type {
        ScoreType::Bic => {
            let score = Bic::new(df.clone());
            search.estimate(&mut pool, &score, start, &constraints, &options)?
        }
        ScoreType::CvLikelihood => {
            let score = CvLikelihood::new(df, config.num_folds, seed)?;
            search.estimate(&mut pool, &score, start, &constraints, &options)?
        }
        ScoreType::HoldoutLikelihood => {
            let score = HoldoutLikelihood::new(df, config.test_holdout_ratio, seed)?;
            search.estimate(&mut pool, &score, start, &constraints, &options)?
        }
        ScoreType::ValidatedLikelihood => {
            let score =
                ValidatedLikelihood::new(df, config.test_holdout_ratio, config.num_folds, seed)?;
            search.estimate_validation(
                &mut pool,
                score.training(),
                score.validation(),
                start,
                &constraints,
                &options,
            )?
        }
    };

    let statistics = search.last_statistics().cloned().ok_or_else(|| {
        BnForgeError::InvalidArgument("search finished without statistics".to_string())
    })?;
    Ok((model, statistics))
}
