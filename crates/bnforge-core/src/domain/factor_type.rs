//! Local factor kinds and the network classes that admit them.

use std::fmt;
use std::str::FromStr;

use crate::error::BnForgeError;

/// Kind of local conditional distribution attached to a node.
///
/// Declaration order is the enumeration order used when listing
/// candidate type changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FactorType {
    /// Linear Gaussian conditional distribution.
    LinearGaussian,
    /// Conditional kernel density estimate.
    Ckde,
}

impl FactorType {
    pub const ALL: [FactorType; 2] = [FactorType::LinearGaussian, FactorType::Ckde];

    /// Returns the factor type that is not `self`.
    pub fn opposite(self) -> Self {
        match self {
            FactorType::LinearGaussian => FactorType::Ckde,
            FactorType::Ckde => FactorType::LinearGaussian,
        }
    }
}

impl fmt::Display for FactorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorType::LinearGaussian => write!(f, "LinearGaussianCPD"),
            FactorType::Ckde => write!(f, "CKDE"),
        }
    }
}

impl FromStr for FactorType {
    type Err = BnForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LinearGaussianCPD" | "linear_gaussian" | "lg" => Ok(FactorType::LinearGaussian),
            "CKDE" | "ckde" => Ok(FactorType::Ckde),
            other => Err(BnForgeError::InvalidArgument(format!(
                "unknown factor type {other}"
            ))),
        }
    }
}

/// Class of Bayesian network, fixing which factor types nodes may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetworkType {
    /// Every node is linear Gaussian.
    Gaussian,
    /// Nodes are linear Gaussian or CKDE.
    Semiparametric,
}

impl NetworkType {
    pub fn allowed_factor_types(self) -> &'static [FactorType] {
        match self {
            NetworkType::Gaussian => &[FactorType::LinearGaussian],
            NetworkType::Semiparametric => &FactorType::ALL,
        }
    }

    pub fn default_factor_type(self) -> FactorType {
        FactorType::LinearGaussian
    }

    /// True when all nodes share a single factor type.
    pub fn is_homogeneous(self) -> bool {
        self.allowed_factor_types().len() == 1
    }

    pub fn allows(self, factor_type: FactorType) -> bool {
        self.allowed_factor_types().contains(&factor_type)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Gaussian => write!(f, "GaussianNetwork"),
            NetworkType::Semiparametric => write!(f, "SemiparametricBN"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = BnForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gbn" | "GaussianNetwork" => Ok(NetworkType::Gaussian),
            "spbn" | "SemiparametricBN" => Ok(NetworkType::Semiparametric),
            other => Err(BnForgeError::InvalidArgument(format!(
                "unknown network type {other}"
            ))),
        }
    }
}
