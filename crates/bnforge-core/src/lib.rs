//! bnforge core - data, model and factor types for structure learning
//!
//! This crate provides the collaborators the structure search consumes:
//! - Tabular data with holdout and k-fold splits
//! - The Bayesian network container with acyclicity checks
//! - Local factor fitting (linear Gaussian and CKDE)
//! - The crate-wide error type

pub mod data;
pub mod domain;
pub mod error;
pub mod factor;

pub use data::{CrossValidation, DataFrame, HoldOut};
pub use domain::{BayesianNetwork, FactorType, NetworkType, ParentSet};
pub use error::{BnForgeError, Result};
pub use factor::{CkdeFit, FittedFactor, LinearGaussianFit, MIN_VARIANCE};
