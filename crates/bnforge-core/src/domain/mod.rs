//! Graph model: network classes, factor types and the DAG container.

mod factor_type;
mod network;

pub use factor_type::{FactorType, NetworkType};
pub use network::{BayesianNetwork, ParentSet};

#[cfg(test)]
mod tests;
