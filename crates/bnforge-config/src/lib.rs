//! Configuration system for bnforge.
//!
//! Load hill-climbing configuration from TOML or YAML files to control the
//! network class, score, operators, structural restrictions and limits
//! without code changes.
//!
//! # Examples
//!
//! ```
//! use bnforge_config::HillClimbingConfig;
//!
//! let config = HillClimbingConfig::from_toml_str(r#"
//!     network_type = "gbn"
//!     score = "bic"
//!     operators = ["arcs"]
//!     max_indegree = 2
//!     arc_blacklist = [["a", "b"]]
//! "#).unwrap();
//!
//! assert_eq!(config.max_indegree, 2);
//! assert_eq!(config.arc_blacklist, vec![("a".to_string(), "b".to_string())]);
//! ```
//!
//! Use defaults when the file is missing:
//!
//! ```
//! use bnforge_config::HillClimbingConfig;
//!
//! let config = HillClimbingConfig::load("hc.toml").unwrap_or_default();
//! assert_eq!(config.num_folds, 10);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A `(from, to)` pair of variable names.
pub type NamePair = (String, String);

/// Hill-climbing configuration.
///
/// Identifiers stay as strings here; the solver parses them and rejects
/// unknown ones.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct HillClimbingConfig {
    /// Network class: `"gbn"` or `"spbn"`. Ignored when a start model is given.
    pub network_type: String,

    /// Score identifier; the network class picks a default when absent.
    pub score: Option<String>,

    /// Operator set identifiers; the network class picks a default when absent.
    pub operators: Option<Vec<String>>,

    pub arc_blacklist: Vec<NamePair>,
    pub arc_whitelist: Vec<NamePair>,
    pub edge_blacklist: Vec<NamePair>,
    pub edge_whitelist: Vec<NamePair>,

    /// `(node, factor type)` pairs restricting the types a node may take.
    pub type_whitelist: Vec<NamePair>,

    /// Maximum number of parents per node (0 = unbounded).
    pub max_indegree: usize,

    /// Maximum number of applied operators (0 = unbounded).
    pub max_iters: usize,

    /// Minimum delta an operator needs to be applied.
    pub epsilon: f64,

    /// Consecutive non-improving validation steps tolerated.
    pub patience: usize,

    /// Random seed for fold assignment and holdout split.
    pub random_seed: Option<u64>,

    pub num_folds: usize,
    pub test_holdout_ratio: f64,

    /// Diagnostic verbosity. Has no effect on the search.
    pub verbose: u8,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            network_type: "gbn".to_string(),
            score: None,
            operators: None,
            arc_blacklist: Vec::new(),
            arc_whitelist: Vec::new(),
            edge_blacklist: Vec::new(),
            edge_whitelist: Vec::new(),
            type_whitelist: Vec::new(),
            max_indegree: 0,
            max_iters: 0,
            epsilon: 0.0,
            patience: 0,
            random_seed: None,
            num_folds: 10,
            test_holdout_ratio: 0.2,
            verbose: 0,
        }
    }
}

impl HillClimbingConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Checks numeric options that the search cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_folds < 2 {
            return Err(ConfigError::Invalid(format!(
                "num_folds must be at least 2, got {}",
                self.num_folds
            )));
        }
        if !(self.test_holdout_ratio > 0.0 && self.test_holdout_ratio < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "test_holdout_ratio must be in (0, 1), got {}",
                self.test_holdout_ratio
            )));
        }
        if !self.epsilon.is_finite() {
            return Err(ConfigError::Invalid("epsilon must be finite".to_string()));
        }
        Ok(())
    }

    pub fn with_network_type(mut self, network_type: impl Into<String>) -> Self {
        self.network_type = network_type.into();
        self
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = Some(score.into());
        self
    }

    pub fn with_operators<S: Into<String>>(mut self, operators: impl IntoIterator<Item = S>) -> Self {
        self.operators = Some(operators.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_arc_blacklist(mut self, arcs: Vec<NamePair>) -> Self {
        self.arc_blacklist = arcs;
        self
    }

    pub fn with_arc_whitelist(mut self, arcs: Vec<NamePair>) -> Self {
        self.arc_whitelist = arcs;
        self
    }

    pub fn with_edge_blacklist(mut self, edges: Vec<NamePair>) -> Self {
        self.edge_blacklist = edges;
        self
    }

    pub fn with_edge_whitelist(mut self, edges: Vec<NamePair>) -> Self {
        self.edge_whitelist = edges;
        self
    }

    pub fn with_type_whitelist(mut self, types: Vec<NamePair>) -> Self {
        self.type_whitelist = types;
        self
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

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_num_folds(mut self, num_folds: usize) -> Self {
        self.num_folds = num_folds;
        self
    }

    pub fn with_test_holdout_ratio(mut self, ratio: f64) -> Self {
        self.test_holdout_ratio = ratio;
        self
    }

    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests;
