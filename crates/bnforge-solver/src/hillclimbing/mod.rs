//! Greedy hill-climbing structure search.

mod entry;
mod greedy;

use std::fmt;

use bnforge_config::HillClimbingConfig;

pub use entry::{hc, hc_with_statistics};
pub use greedy::GreedyHillClimbing;

/// Numeric limits of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of parents per node (0 = unbounded).
    pub max_indegree: usize,
    /// Maximum number of applied operators (0 = unbounded).
    pub max_iters: usize,
    /// An operator is applied only if its delta exceeds this.
    pub epsilon: f64,
    /// Non-improving validation steps tolerated before stopping.
    pub patience: usize,
    /// Logs every step at INFO instead of DEBUG.
    pub verbose: u8,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_indegree: 0,
            max_iters: 0,
            epsilon: 0.0,
            patience: 0,
            verbose: 0,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_indegree(mut self, max_indegree: usize) -> Self {
        self.max_indegree = max_indegree;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub(crate) fn iteration_limit(&self) -> usize {
        if self.max_iters == 0 {
            usize::MAX
        } else {
            self.max_iters
        }
    }
}

impl From<&HillClimbingConfig> for SearchOptions {
    fn from(config: &HillClimbingConfig) -> Self {
        Self {
            max_indegree: config.max_indegree,
            max_iters: config.max_iters,
            epsilon: config.epsilon,
            patience: config.patience,
            verbose: config.verbose,
        }
    }
}

/// Name-based structural restrictions, resolved at the start of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureConstraints {
    pub arc_blacklist: Vec<(String, String)>,
    pub arc_whitelist: Vec<(String, String)>,
    pub edge_blacklist: Vec<(String, String)>,
    pub edge_whitelist: Vec<(String, String)>,
    /// `(node, factor type)` pairs.
    pub type_whitelist: Vec<(String, String)>,
}

impl StructureConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arc_blacklist(mut self, arcs: Vec<(String, String)>) -> Self {
        self.arc_blacklist = arcs;
        self
    }

    pub fn with_arc_whitelist(mut self, arcs: Vec<(String, String)>) -> Self {
        self.arc_whitelist = arcs;
        self
    }

    pub fn with_edge_blacklist(mut self, edges: Vec<(String, String)>) -> Self {
        self.edge_blacklist = edges;
        self
    }

    pub fn with_edge_whitelist(mut self, edges: Vec<(String, String)>) -> Self {
        self.edge_whitelist = edges;
        self
    }

    pub fn with_type_whitelist(mut self, types: Vec<(String, String)>) -> Self {
        self.type_whitelist = types;
        self
    }
}

impl From<&HillClimbingConfig> for StructureConstraints {
    fn from(config: &HillClimbingConfig) -> Self {
        Self {
            arc_blacklist: config.arc_blacklist.clone(),
            arc_whitelist: config.arc_whitelist.clone(),
            edge_blacklist: config.edge_blacklist.clone(),
            edge_whitelist: config.edge_whitelist.clone(),
            type_whitelist: config.type_whitelist.clone(),
        }
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No legal operator has a delta above epsilon.
    NoImprovingOperator,
    MaxIterations,
    PatienceExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NoImprovingOperator => f.write_str("no improving operator"),
            StopReason::MaxIterations => f.write_str("max iterations"),
            StopReason::PatienceExhausted => f.write_str("patience exhausted"),
        }
    }
}

/// Summary of a finished search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    /// Applied operators.
    pub iterations: usize,
    /// Local score evaluations spent on operator deltas.
    pub evaluations: u64,
    pub stop_reason: StopReason,
    /// Training score of the returned model.
    pub score: f64,
    /// Validation score of the returned model, in validation mode.
    pub validation_score: Option<f64>,
}
