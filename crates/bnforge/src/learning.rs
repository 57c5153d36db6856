//! Seed-drawing wrappers around [`bnforge_solver::hc`].

use bnforge_config::HillClimbingConfig;
use bnforge_core::{BayesianNetwork, DataFrame, Result};
use bnforge_solver::{hc_with_statistics, SearchStatistics};

/// Learns a network structure from `df` as configured.
///
/// Uses `config.random_seed` when set, otherwise draws a fresh seed, so two
/// unseeded runs may split the data differently.
pub fn learn(
    df: &DataFrame,
    start: Option<BayesianNetwork>,
    config: &HillClimbingConfig,
) -> Result<BayesianNetwork> {
    learn_with_statistics(df, start, config).map(|(model, _)| model)
}

/// Like [`learn`], also returning the search statistics.
pub fn learn_with_statistics(
    df: &DataFrame,
    start: Option<BayesianNetwork>,
    config: &HillClimbingConfig,
) -> Result<(BayesianNetwork, SearchStatistics)> {
    let seed = config.random_seed.unwrap_or_else(rand::random);
    hc_with_statistics(df, start, config, seed)
}
