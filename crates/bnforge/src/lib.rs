//! bnforge - Bayesian network structure learning in Rust
//!
//! Learns a DAG over the columns of a data set by greedy hill climbing,
//! guided by a decomposable score.
//!
//! # Example
//!
//! ```rust
//! use bnforge::prelude::*;
//!
//! let x: Vec<f64> = (0..60).map(|i| (i as f64 * 0.37).sin()).collect();
//! let y: Vec<f64> = x.iter().enumerate().map(|(i, v)| 2.0 * v + 0.1 * (i as f64).cos()).collect();
//! let df = DataFrame::new(vec![("x", x), ("y", y)]).unwrap();
//!
//! let config = HillClimbingConfig::default().with_score("bic").with_random_seed(7);
//! let model = learn(&df, None, &config).unwrap();
//! assert_eq!(model.num_arcs(), 1);
//! ```

// Data and model types
pub use bnforge_core::{
    BayesianNetwork, BnForgeError, CrossValidation, DataFrame, FactorType, HoldOut, NetworkType,
    Result,
};

// Scores
pub use bnforge_scoring::{
    Bic, CvLikelihood, HoldoutLikelihood, Score, ScoreType, ValidatedLikelihood,
};

// Search
pub use bnforge_solver::{
    hc, hc_with_statistics, GreedyHillClimbing, Operator, OperatorPool, OperatorSetType,
    RestrictionSet, SearchOptions, SearchStatistics, StopReason, StructureConstraints,
};

pub use bnforge_config::{ConfigError, HillClimbingConfig};

#[cfg(feature = "console")]
pub mod console;

mod learning;
pub use learning::{learn, learn_with_statistics};

pub mod prelude {
    pub use super::{learn, learn_with_statistics};
    pub use super::{BayesianNetwork, DataFrame, FactorType, NetworkType};
    pub use super::{HillClimbingConfig, Score, ScoreType, SearchStatistics};
}
