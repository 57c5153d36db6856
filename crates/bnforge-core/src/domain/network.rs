//! DAG container with per-node factor types.

use std::collections::HashMap;

use smallvec::SmallVec;

use super::{FactorType, NetworkType};
use crate::error::{BnForgeError, Result};

/// Sorted set of node indices.
pub type ParentSet = SmallVec<[usize; 8]>;

/// A Bayesian network structure over named nodes.
///
/// Nodes have dense indices fixed at construction. A conditional network also
/// holds *interface* nodes: they may be parents of regular nodes but never
/// have parents themselves and carry no factor of their own.
///
/// The arc mutators (`add_arc`, `remove_arc`, `flip_arc`) do not check
/// acyclicity; callers check with `can_add_arc`/`can_flip_arc` first. Use
/// `add_arc_checked` where a failure must be reported.
#[derive(Debug, Clone, PartialEq)]
pub struct BayesianNetwork {
    network_type: NetworkType,
    names: Vec<String>,
    index: HashMap<String, usize>,
    interface: Vec<bool>,
    parents: Vec<ParentSet>,
    children: Vec<ParentSet>,
    node_types: Vec<FactorType>,
    num_arcs: usize,
}

impl BayesianNetwork {
    /// Creates an arcless network with every node set to the network's default
    /// factor type.
    pub fn new<S: AsRef<str>>(network_type: NetworkType, nodes: &[S]) -> Result<Self> {
        Self::conditional::<S, &str>(network_type, nodes, &[])
    }

    /// Creates an arcless conditional network. Interface nodes are indexed
    /// after the regular nodes.
    pub fn conditional<S: AsRef<str>, I: AsRef<str>>(
        network_type: NetworkType,
        nodes: &[S],
        interface_nodes: &[I],
    ) -> Result<Self> {
        let total = nodes.len() + interface_nodes.len();
        let mut names = Vec::with_capacity(total);
        let mut index = HashMap::with_capacity(total);
        let mut interface = Vec::with_capacity(total);

        let all = nodes
            .iter()
            .map(|n| (n.as_ref(), false))
            .chain(interface_nodes.iter().map(|n| (n.as_ref(), true)));
        for (name, is_interface) in all {
            if index.insert(name.to_string(), names.len()).is_some() {
                return Err(BnForgeError::InvalidArgument(format!(
                    "node {name} declared more than once"
                )));
            }
            names.push(name.to_string());
            interface.push(is_interface);
        }

        Ok(Self {
            network_type,
            names,
            index,
            interface,
            parents: vec![ParentSet::new(); total],
            children: vec![ParentSet::new(); total],
            node_types: vec![network_type.default_factor_type(); total],
            num_arcs: 0,
        })
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    /// Total number of nodes, interface nodes included.
    pub fn num_nodes(&self) -> usize {
        self.names.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, node: usize) -> &str {
        &self.names[node]
    }

    pub fn index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Looks up a node index, failing with [`BnForgeError::UnknownVariable`].
    pub fn check_index(&self, name: &str) -> Result<usize> {
        self.index(name)
            .ok_or_else(|| BnForgeError::UnknownVariable(name.to_string()))
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_interface(&self, node: usize) -> bool {
        self.interface[node]
    }

    pub fn is_conditional(&self) -> bool {
        self.interface.iter().any(|&i| i)
    }

    /// Indices of the regular (non-interface) nodes.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_nodes()).filter(|&n| !self.interface[n])
    }

    pub fn interface_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_nodes()).filter(|&n| self.interface[n])
    }

    pub fn parents(&self, node: usize) -> &[usize] {
        &self.parents[node]
    }

    pub fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    pub fn parent_names(&self, node: usize) -> Vec<&str> {
        self.parents[node].iter().map(|&p| self.name(p)).collect()
    }

    pub fn has_arc(&self, source: usize, target: usize) -> bool {
        self.parents[target].binary_search(&source).is_ok()
    }

    /// All arcs, ordered by source then target.
    pub fn arcs(&self) -> Vec<(usize, usize)> {
        let mut arcs: Vec<(usize, usize)> = self
            .children
            .iter()
            .enumerate()
            .flat_map(|(s, ch)| ch.iter().map(move |&t| (s, t)))
            .collect();
        arcs.sort_unstable();
        arcs
    }

    pub fn node_type(&self, node: usize) -> FactorType {
        self.node_types[node]
    }

    /// Changes the factor type of a regular node.
    ///
    /// # Errors
    ///
    /// Returns [`BnForgeError::InvalidArgument`] if the network class does not
    /// admit the type or the node is an interface node.
    pub fn set_node_type(&mut self, node: usize, factor_type: FactorType) -> Result<()> {
        if !self.network_type.allows(factor_type) {
            return Err(BnForgeError::InvalidArgument(format!(
                "{} does not admit factor type {factor_type}",
                self.network_type
            )));
        }
        if self.interface[node] {
            return Err(BnForgeError::InvalidArgument(format!(
                "interface node {} has no factor type",
                self.names[node]
            )));
        }
        self.node_types[node] = factor_type;
        Ok(())
    }

    /// True if a directed path leads from `from` to `to`.
    pub fn has_path(&self, from: usize, to: usize) -> bool {
        self.has_path_avoiding(from, to, None)
    }

    fn has_path_avoiding(&self, from: usize, to: usize, skip: Option<(usize, usize)>) -> bool {
        if from == to {
            return true;
        }
        let mut visited = vec![false; self.num_nodes()];
        let mut stack = vec![from];
        visited[from] = true;
        while let Some(node) = stack.pop() {
            for &child in &self.children[node] {
                if skip == Some((node, child)) || visited[child] {
                    continue;
                }
                if child == to {
                    return true;
                }
                visited[child] = true;
                stack.push(child);
            }
        }
        false
    }

    /// True if `source -> target` can be added without a cycle.
    pub fn can_add_arc(&self, source: usize, target: usize) -> bool {
        source != target
            && !self.interface[target]
            && !self.has_arc(source, target)
            && !self.has_path(target, source)
    }

    /// True if the existing arc `source -> target` can be reversed without a
    /// cycle.
    pub fn can_flip_arc(&self, source: usize, target: usize) -> bool {
        self.has_arc(source, target)
            && !self.interface[source]
            && !self.has_path_avoiding(source, target, Some((source, target)))
    }

    pub fn add_arc(&mut self, source: usize, target: usize) {
        debug_assert!(!self.has_arc(source, target));
        insert_sorted(&mut self.parents[target], source);
        insert_sorted(&mut self.children[source], target);
        self.num_arcs += 1;
    }

    pub fn remove_arc(&mut self, source: usize, target: usize) {
        if let Ok(pos) = self.parents[target].binary_search(&source) {
            self.parents[target].remove(pos);
            if let Ok(pos) = self.children[source].binary_search(&target) {
                self.children[source].remove(pos);
            }
            self.num_arcs -= 1;
        }
    }

    /// Replaces `source -> target` by `target -> source`.
    pub fn flip_arc(&mut self, source: usize, target: usize) {
        self.remove_arc(source, target);
        self.add_arc(target, source);
    }

    /// Adds an arc, reporting why it cannot be added.
    ///
    /// Adding an arc that already exists is a no-op.
    pub fn add_arc_checked(&mut self, source: usize, target: usize) -> Result<()> {
        if self.has_arc(source, target) {
            return Ok(());
        }
        if self.interface[target] {
            return Err(BnForgeError::InvalidRestriction(format!(
                "arc {} -> {} ends at an interface node",
                self.names[source], self.names[target]
            )));
        }
        if !self.can_add_arc(source, target) {
            return Err(BnForgeError::InvalidRestriction(format!(
                "arc {} -> {} would create a cycle",
                self.names[source], self.names[target]
            )));
        }
        self.add_arc(source, target);
        Ok(())
    }

    /// Adds every arc in `arcs` that is not already present.
    pub fn force_whitelist(&mut self, arcs: &[(usize, usize)]) -> Result<()> {
        for &(s, t) in arcs {
            self.add_arc_checked(s, t)?;
        }
        Ok(())
    }

    /// Ensures each regular node has a type from its permitted list.
    ///
    /// `permitted[node]` empty means any type is allowed. A node whose current
    /// type is not permitted takes the first permitted type.
    pub fn force_type_whitelist(&mut self, permitted: &[Vec<FactorType>]) -> Result<()> {
        for (node, types) in permitted.iter().enumerate() {
            if types.is_empty() || self.interface[node] {
                continue;
            }
            if !types.contains(&self.node_types[node]) {
                self.set_node_type(node, types[0])?;
            }
        }
        Ok(())
    }
}

fn insert_sorted(set: &mut ParentSet, value: usize) {
    if let Err(pos) = set.binary_search(&value) {
        set.insert(pos, value);
    }
}
