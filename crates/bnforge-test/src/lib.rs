//! Shared test fixtures for bnforge crates.
//!
//! This crate provides synthetic data generators. It depends only on
//! `bnforge-core` so every other crate can use it as a dev-dependency.
//!
//! - [`gaussian`] - seeded Gaussian data sets with known structure
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! bnforge-test = { workspace = true }
//! ```

pub mod gaussian;

pub use gaussian::{
    generate_chain_data, generate_deterministic_data, generate_independent_data,
    generate_normal_data, NORMAL_DATA_COLUMNS,
};
