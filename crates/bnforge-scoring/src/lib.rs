//! Decomposable scores for bnforge structure learning.
//!
//! This crate provides:
//! - The [`Score`] trait: a read-only oracle computing per-node local scores
//! - [`Bic`]: closed-form Bayesian information criterion for linear Gaussian nodes
//! - [`CvLikelihood`]: k-fold cross-validated log-likelihood
//! - [`HoldoutLikelihood`]: log-likelihood of a held-out test split
//! - [`ValidatedLikelihood`]: cross-validated training score paired with a
//!   holdout validation score
//!
//! Scores are selected once by [`ScoreType`] and used through `&dyn Score`.

pub mod bic;
pub mod cv_likelihood;
pub mod holdout_likelihood;
pub mod score;
pub mod validated_likelihood;

pub use bic::Bic;
pub use cv_likelihood::CvLikelihood;
pub use holdout_likelihood::HoldoutLikelihood;
pub use score::{evidence_names, Score, ScoreType};
pub use validated_likelihood::ValidatedLikelihood;

#[cfg(test)]
mod tests;
