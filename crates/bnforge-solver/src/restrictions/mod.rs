//! Structural restrictions.
//!
//! Four user lists of name pairs are reconciled into one [`RestrictionSet`]
//! of node indices. Resolution either proves the lists consistent or fails
//! before any search work is done.

use std::collections::BTreeSet;

use bnforge_core::{BayesianNetwork, BnForgeError, FactorType, Result};

/// An ordered `(source, target)` pair of node indices.
pub type NodePair = (usize, usize);

/// Canonical form of an undirected edge: smaller index first.
pub fn edge(a: usize, b: usize) -> NodePair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Resolved, conflict-free restrictions.
///
/// Arcs are ordered pairs; edges are stored in [`edge`] form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestrictionSet {
    pub arc_blacklist: BTreeSet<NodePair>,
    pub arc_whitelist: BTreeSet<NodePair>,
    pub edge_blacklist: BTreeSet<NodePair>,
    pub edge_whitelist: BTreeSet<NodePair>,
}

impl RestrictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `source -> target` must never be present.
    pub fn is_arc_forbidden(&self, source: usize, target: usize) -> bool {
        self.arc_blacklist.contains(&(source, target))
            || self.edge_blacklist.contains(&edge(source, target))
    }

    /// True if `source -> target` must always be present.
    pub fn is_arc_forced(&self, source: usize, target: usize) -> bool {
        self.arc_whitelist.contains(&(source, target))
    }

    /// True if some arc between the two nodes must be present.
    pub fn is_edge_forced(&self, a: usize, b: usize) -> bool {
        self.edge_whitelist.contains(&edge(a, b))
    }

    /// True if the existing arc `source -> target` may not be removed.
    pub fn is_removal_forbidden(&self, source: usize, target: usize) -> bool {
        self.is_arc_forced(source, target) || self.is_edge_forced(source, target)
    }

    pub fn is_empty(&self) -> bool {
        self.arc_blacklist.is_empty()
            && self.arc_whitelist.is_empty()
            && self.edge_blacklist.is_empty()
            && self.edge_whitelist.is_empty()
    }
}

fn pair_indices(model: &BayesianNetwork, pair: &(String, String)) -> Result<NodePair> {
    Ok((model.check_index(&pair.0)?, model.check_index(&pair.1)?))
}

fn describe(model: &BayesianNetwork, (a, b): NodePair, sep: &str) -> String {
    format!("{}{sep}{}", model.name(a), model.name(b))
}

fn conflict(model: &BayesianNetwork, pair: NodePair, first: &str, second: &str) -> BnForgeError {
    BnForgeError::RestrictionConflict {
        pair: describe(model, pair, " -> "),
        first: first.to_string(),
        second: second.to_string(),
    }
}

/// Reconciles the four restriction lists against `model`.
///
/// Rules are applied in a fixed order:
/// 1. the edge blacklist is taken as given;
/// 2. a whitelisted edge that is also blacklisted is a conflict;
/// 3. a whitelisted arc conflicts with a blacklisted edge, and replaces a
///    whitelisted edge over the same pair;
/// 4. a blacklisted arc conflicts with a whitelisted arc; over a whitelisted
///    edge it forces the opposite arc; over a blacklisted edge it is dropped.
///
/// # Errors
///
/// [`BnForgeError::UnknownVariable`] for a name the model lacks,
/// [`BnForgeError::RestrictionConflict`] for a pair both forced and forbidden,
/// [`BnForgeError::InvalidRestriction`] for a restriction the model cannot
/// honour (self loops, arcs into interface nodes).
pub fn resolve(
    model: &BayesianNetwork,
    arc_blacklist: &[(String, String)],
    arc_whitelist: &[(String, String)],
    edge_blacklist: &[(String, String)],
    edge_whitelist: &[(String, String)],
) -> Result<RestrictionSet> {
    let mut set = RestrictionSet::new();

    for pair in edge_blacklist {
        let (a, b) = pair_indices(model, pair)?;
        set.edge_blacklist.insert(edge(a, b));
    }

    for pair in edge_whitelist {
        let (a, b) = pair_indices(model, pair)?;
        if set.edge_blacklist.contains(&edge(a, b)) {
            return Err(conflict(model, (a, b), "edge whitelist", "edge blacklist"));
        }
        set.edge_whitelist.insert(edge(a, b));
    }

    for pair in arc_whitelist {
        let (s, t) = pair_indices(model, pair)?;
        if set.edge_blacklist.contains(&edge(s, t)) {
            return Err(conflict(model, (s, t), "arc whitelist", "edge blacklist"));
        }
        set.edge_whitelist.remove(&edge(s, t));
        set.arc_whitelist.insert((s, t));
    }

    for pair in arc_blacklist {
        let (s, t) = pair_indices(model, pair)?;
        if set.arc_whitelist.contains(&(s, t)) {
            return Err(conflict(model, (s, t), "arc blacklist", "arc whitelist"));
        } else if set.edge_whitelist.contains(&edge(s, t)) {
            set.edge_whitelist.remove(&edge(s, t));
            set.arc_whitelist.insert((t, s));
        } else if !set.edge_blacklist.contains(&edge(s, t)) {
            set.arc_blacklist.insert((s, t));
        }
    }

    validate_structure(model, &set)?;
    Ok(set)
}

/// Checks that resolved restrictions are expressible in `model`.
pub fn validate_structure(model: &BayesianNetwork, set: &RestrictionSet) -> Result<()> {
    let all = set
        .arc_blacklist
        .iter()
        .chain(&set.arc_whitelist)
        .chain(&set.edge_blacklist)
        .chain(&set.edge_whitelist);
    for &(a, b) in all {
        if a == b {
            return Err(BnForgeError::InvalidRestriction(format!(
                "restriction on {} relates a node to itself",
                model.name(a)
            )));
        }
    }

    for &(s, t) in &set.arc_whitelist {
        if model.is_interface(t) {
            return Err(BnForgeError::InvalidRestriction(format!(
                "whitelisted arc {} ends at an interface node",
                describe(model, (s, t), " -> ")
            )));
        }
    }

    for &(a, b) in &set.edge_whitelist {
        if model.is_interface(a) && model.is_interface(b) {
            return Err(BnForgeError::InvalidRestriction(format!(
                "whitelisted edge {} joins two interface nodes",
                describe(model, (a, b), " -- ")
            )));
        }
    }

    Ok(())
}

/// Resolves `(node, factor type)` pairs into a per-node permitted list.
///
/// A node without entries gets an empty list, meaning any type of the
/// network class is permitted.
///
/// # Errors
///
/// [`BnForgeError::UnknownVariable`] for an unknown node,
/// [`BnForgeError::InvalidRestriction`] for an interface node,
/// [`BnForgeError::InvalidArgument`] for an unknown type or one the network
/// class does not admit.
pub fn resolve_type_whitelist(
    model: &BayesianNetwork,
    type_whitelist: &[(String, String)],
) -> Result<Vec<Vec<FactorType>>> {
    let mut permitted = vec![Vec::new(); model.num_nodes()];
    for (name, type_name) in type_whitelist {
        let node = model.check_index(name)?;
        if model.is_interface(node) {
            return Err(BnForgeError::InvalidRestriction(format!(
                "interface node {name} has no factor type"
            )));
        }
        let factor_type: FactorType = type_name.parse()?;
        if !model.network_type().allows(factor_type) {
            return Err(BnForgeError::InvalidArgument(format!(
                "{} does not admit factor type {factor_type} for node {name}",
                model.network_type()
            )));
        }
        let types: &mut Vec<FactorType> = &mut permitted[node];
        if !types.contains(&factor_type) {
            types.push(factor_type);
        }
    }
    Ok(permitted)
}

/// Adds the forced arcs and edges of `set` to `model`.
///
/// A whitelisted edge without an arc in either direction is added lower index
/// first, or the other way round when that is the only acyclic option.
pub fn force_restrictions(model: &mut BayesianNetwork, set: &RestrictionSet) -> Result<()> {
    let arcs: Vec<NodePair> = set.arc_whitelist.iter().copied().collect();
    model.force_whitelist(&arcs)?;

    for &(a, b) in &set.edge_whitelist {
        if model.has_arc(a, b) || model.has_arc(b, a) {
            continue;
        }
        if model.can_add_arc(a, b) {
            model.add_arc(a, b);
        } else if model.can_add_arc(b, a) {
            model.add_arc(b, a);
        } else {
            return Err(BnForgeError::InvalidRestriction(format!(
                "whitelisted edge {} cannot be added without a cycle",
                describe(model, (a, b), " -- ")
            )));
        }
    }
    Ok(())
}
