//! Structural operators and the sets that enumerate them.
//!
//! An [`Operator`] is one structural move with its score delta relative to
//! the current model. [`OperatorSet`] implementations keep those deltas
//! cached and refresh only what a move invalidates.

mod arc_set;
mod local_score_cache;
mod node_type_set;
mod pool;
mod tabu;

use std::fmt::{self, Debug};
use std::str::FromStr;

use bnforge_core::{BayesianNetwork, BnForgeError, FactorType, NetworkType, Result};
use bnforge_scoring::Score;
use smallvec::{smallvec, SmallVec};

use crate::restrictions::RestrictionSet;

pub use arc_set::ArcOperatorSet;
pub use local_score_cache::LocalScoreCache;
pub use node_type_set::ChangeNodeTypeSet;
pub use pool::OperatorPool;
pub use tabu::OperatorTabuSet;

/// A structural move and its score delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    AddArc {
        source: usize,
        target: usize,
        delta: f64,
    },
    RemoveArc {
        source: usize,
        target: usize,
        delta: f64,
    },
    FlipArc {
        source: usize,
        target: usize,
        delta: f64,
    },
    ChangeNodeType {
        node: usize,
        new_type: FactorType,
        delta: f64,
    },
}

/// Identity of an operator, ignoring its delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKey {
    AddArc(usize, usize),
    RemoveArc(usize, usize),
    FlipArc(usize, usize),
    ChangeNodeType(usize, FactorType),
}

impl Operator {
    pub fn delta(&self) -> f64 {
        match *self {
            Operator::AddArc { delta, .. }
            | Operator::RemoveArc { delta, .. }
            | Operator::FlipArc { delta, .. }
            | Operator::ChangeNodeType { delta, .. } => delta,
        }
    }

    pub fn key(&self) -> OperatorKey {
        match *self {
            Operator::AddArc { source, target, .. } => OperatorKey::AddArc(source, target),
            Operator::RemoveArc { source, target, .. } => OperatorKey::RemoveArc(source, target),
            Operator::FlipArc { source, target, .. } => OperatorKey::FlipArc(source, target),
            Operator::ChangeNodeType { node, new_type, .. } => {
                OperatorKey::ChangeNodeType(node, new_type)
            }
        }
    }

    /// Nodes whose parent set or factor type the operator changes.
    pub fn nodes_changed(&self) -> SmallVec<[usize; 2]> {
        match *self {
            Operator::AddArc { target, .. } | Operator::RemoveArc { target, .. } => {
                smallvec![target]
            }
            Operator::FlipArc { source, target, .. } => smallvec![source, target],
            Operator::ChangeNodeType { node, .. } => smallvec![node],
        }
    }

    /// The operator undoing this one, evaluated against `model` before this
    /// operator is applied.
    pub fn opposite(&self, model: &BayesianNetwork) -> Operator {
        match *self {
            Operator::AddArc {
                source,
                target,
                delta,
            } => Operator::RemoveArc {
                source,
                target,
                delta: -delta,
            },
            Operator::RemoveArc {
                source,
                target,
                delta,
            } => Operator::AddArc {
                source,
                target,
                delta: -delta,
            },
            Operator::FlipArc {
                source,
                target,
                delta,
            } => Operator::FlipArc {
                source: target,
                target: source,
                delta: -delta,
            },
            Operator::ChangeNodeType { node, delta, .. } => Operator::ChangeNodeType {
                node,
                new_type: model.node_type(node),
                delta: -delta,
            },
        }
    }

    /// Applies the operator to `model`.
    ///
    /// # Errors
    ///
    /// Returns [`BnForgeError::InvalidArgument`] if the move is not applicable
    /// to the current structure.
    pub fn apply(&self, model: &mut BayesianNetwork) -> Result<()> {
        match *self {
            Operator::AddArc { source, target, .. } => {
                if !model.can_add_arc(source, target) {
                    return Err(self.not_applicable(model));
                }
                model.add_arc(source, target);
            }
            Operator::RemoveArc { source, target, .. } => {
                if !model.has_arc(source, target) {
                    return Err(self.not_applicable(model));
                }
                model.remove_arc(source, target);
            }
            Operator::FlipArc { source, target, .. } => {
                if !model.can_flip_arc(source, target) {
                    return Err(self.not_applicable(model));
                }
                model.flip_arc(source, target);
            }
            Operator::ChangeNodeType { node, new_type, .. } => {
                model.set_node_type(node, new_type)?;
            }
        }
        Ok(())
    }

    fn not_applicable(&self, model: &BayesianNetwork) -> BnForgeError {
        BnForgeError::InvalidArgument(format!(
            "operator {} is not applicable",
            self.describe(model)
        ))
    }

    /// Renders the operator with node names.
    pub fn describe(&self, model: &BayesianNetwork) -> String {
        match *self {
            Operator::AddArc { source, target, .. } => {
                format!("AddArc({} -> {})", model.name(source), model.name(target))
            }
            Operator::RemoveArc { source, target, .. } => {
                format!("RemoveArc({} -> {})", model.name(source), model.name(target))
            }
            Operator::FlipArc { source, target, .. } => {
                format!("FlipArc({} -> {})", model.name(source), model.name(target))
            }
            Operator::ChangeNodeType { node, new_type, .. } => {
                format!("ChangeNodeType({}, {new_type})", model.name(node))
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operator::AddArc {
                source,
                target,
                delta,
            } => write!(f, "AddArc({source} -> {target}; {delta})"),
            Operator::RemoveArc {
                source,
                target,
                delta,
            } => write!(f, "RemoveArc({source} -> {target}; {delta})"),
            Operator::FlipArc {
                source,
                target,
                delta,
            } => write!(f, "FlipArc({source} -> {target}; {delta})"),
            Operator::ChangeNodeType {
                node,
                new_type,
                delta,
            } => write!(f, "ChangeNodeType({node}, {new_type}; {delta})"),
        }
    }
}

/// Outcome of a legality check. Anything but `Legal` silently excludes the
/// operator from the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legality {
    Legal,
    /// The move needs an arc that does not exist, or adds one that does.
    NotApplicable,
    /// The resulting arc is blacklisted.
    Forbidden,
    /// The move removes or reverses a whitelisted arc or edge.
    Forced,
    /// The move changes an interface node.
    InterfaceNode,
    IndegreeExceeded,
    AcyclicityViolation,
    /// The factor type is outside the type whitelist.
    TypeNotPermitted,
}

impl Legality {
    pub fn is_legal(self) -> bool {
        self == Legality::Legal
    }
}

/// Identifies an operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorSetType {
    /// Add, remove and flip arcs.
    Arcs,
    /// Change the factor type of a node.
    NodeType,
}

impl OperatorSetType {
    /// Operator sets used when the caller does not name any.
    pub fn default_for(network_type: NetworkType) -> Vec<Self> {
        if network_type.is_homogeneous() {
            vec![OperatorSetType::Arcs]
        } else {
            vec![OperatorSetType::Arcs, OperatorSetType::NodeType]
        }
    }

    /// Creates an empty operator set of this type.
    pub fn build(self) -> Box<dyn OperatorSet> {
        match self {
            OperatorSetType::Arcs => Box::new(ArcOperatorSet::new()),
            OperatorSetType::NodeType => Box::new(ChangeNodeTypeSet::new()),
        }
    }
}

impl fmt::Display for OperatorSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorSetType::Arcs => f.write_str("arcs"),
            OperatorSetType::NodeType => f.write_str("node_type"),
        }
    }
}

impl FromStr for OperatorSetType {
    type Err = BnForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "arcs" => Ok(OperatorSetType::Arcs),
            "node_type" => Ok(OperatorSetType::NodeType),
            other => Err(BnForgeError::InvalidArgument(format!(
                "unknown operator set {other}"
            ))),
        }
    }
}

/// A family of structural operators with cached deltas.
///
/// The lifecycle is: configure (`set_*`), `validate`, `cache_scores` against
/// the start model, then `update_scores` after every applied operator. An
/// operator set never mutates the model.
pub trait OperatorSet: Send + Sync + Debug {
    fn set_type(&self) -> OperatorSetType;

    /// Checks the set can work on `model`.
    fn validate(&self, model: &BayesianNetwork) -> Result<()>;

    fn set_restrictions(&mut self, _restrictions: &RestrictionSet) {}

    fn set_max_indegree(&mut self, _max_indegree: usize) {}

    fn set_type_whitelist(&mut self, _permitted: &[Vec<FactorType>]) {}

    /// Computes every delta from scratch.
    fn cache_scores(&mut self, model: &BayesianNetwork, score: &dyn Score, cache: &LocalScoreCache);

    /// Recomputes the deltas that depend on the `changed` nodes.
    ///
    /// `cache` must already reflect the current model.
    fn update_scores(
        &mut self,
        model: &BayesianNetwork,
        score: &dyn Score,
        cache: &LocalScoreCache,
        changed: &[usize],
    );

    /// Operators with a delta above `epsilon` that pass the cheap legality
    /// checks, in enumeration order.
    ///
    /// Acyclicity is left to [`OperatorSet::legality`].
    fn candidates(&self, model: &BayesianNetwork, epsilon: f64) -> Vec<Operator>;

    /// Full legality check of an operator of this set.
    fn legality(&self, model: &BayesianNetwork, op: &Operator) -> Legality;

    fn is_legal(&self, model: &BayesianNetwork, op: &Operator) -> bool {
        self.legality(model, op).is_legal()
    }

    /// Number of local score evaluations performed so far.
    fn evaluations(&self) -> u64;
}

#[cfg(test)]
mod tests;
