//! bnforge structure search
//!
//! This crate provides:
//! - Restriction resolution (arc and edge black/whitelists, type whitelists)
//! - Structural operators with incrementally cached score deltas
//! - The greedy hill-climbing driver, plain and validation-gated
//! - The identifier-driven `hc` entry point

pub mod hillclimbing;
pub mod operator;
pub mod restrictions;

pub use hillclimbing::{
    hc, hc_with_statistics, GreedyHillClimbing, SearchOptions, SearchStatistics, StopReason,
    StructureConstraints,
};
pub use operator::{
    ArcOperatorSet, ChangeNodeTypeSet, Legality, LocalScoreCache, Operator, OperatorKey,
    OperatorPool, OperatorSet, OperatorSetType, OperatorTabuSet,
};
pub use restrictions::{
    edge, force_restrictions, resolve, resolve_type_whitelist, validate_structure, NodePair,
    RestrictionSet,
};
