//! Error types for bnforge

use thiserror::Error;

/// Main error type for bnforge operations.
///
/// Every variant is a configuration error detected before the search starts.
/// Illegal structural moves found while enumerating operators are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BnForgeError {
    /// Unknown identifier, or a combination of options that has no meaning.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A pair is both forced and forbidden.
    #[error("Restriction conflict on {pair}: {first} is incompatible with {second}")]
    RestrictionConflict {
        pair: String,
        first: String,
        second: String,
    },

    /// A restriction or type whitelist names a variable the model does not have.
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A restriction that cannot be honoured by the model.
    #[error("Invalid restriction: {0}")]
    InvalidRestriction(String),

    /// The score has no formula for the model's factor types.
    #[error("Score {score} does not support model type {model}")]
    UnsupportedModelType { score: String, model: String },

    /// Malformed tabular data.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for bnforge operations
pub type Result<T> = std::result::Result<T, BnForgeError>;
