//! Change node type operators.

use bnforge_core::{BayesianNetwork, BnForgeError, FactorType, Result};
use bnforge_scoring::Score;
use smallvec::SmallVec;
use tracing::trace;

use super::{Legality, LocalScoreCache, Operator, OperatorSet, OperatorSetType};

type TypeDeltas = SmallVec<[(FactorType, f64); 2]>;

/// Operators changing the factor type of a regular node.
///
/// A node's deltas depend on its own parents and type only.
#[derive(Debug, Clone, Default)]
pub struct ChangeNodeTypeSet {
    deltas: Vec<TypeDeltas>,
    type_whitelist: Vec<Vec<FactorType>>,
    evaluations: u64,
}

impl ChangeNodeTypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_permitted(&self, node: usize, factor_type: FactorType) -> bool {
        match self.type_whitelist.get(node) {
            Some(types) if !types.is_empty() => types.contains(&factor_type),
            _ => true,
        }
    }

    fn node_deltas(
        &self,
        model: &BayesianNetwork,
        score: &dyn Score,
        cache: &LocalScoreCache,
        node: usize,
    ) -> TypeDeltas {
        if model.is_interface(node) {
            return TypeDeltas::new();
        }
        let current_type = model.node_type(node);
        let current = cache.get(node);
        model
            .network_type()
            .allowed_factor_types()
            .iter()
            .copied()
            .filter(|&t| t != current_type && self.is_permitted(node, t))
            .map(|t| {
                let local = score.local_score_node_type(model, t, node, model.parents(node));
                (t, local - current)
            })
            .collect()
    }

    fn refresh(
        &mut self,
        model: &BayesianNetwork,
        score: &dyn Score,
        cache: &LocalScoreCache,
        nodes: &[usize],
    ) {
        for &node in nodes {
            let deltas = self.node_deltas(model, score, cache, node);
            self.evaluations += deltas.len() as u64;
            self.deltas[node] = deltas;
        }
        trace!(event = "operator_refresh", set = "node_type", columns = nodes.len());
    }
}

impl OperatorSet for ChangeNodeTypeSet {
    fn set_type(&self) -> OperatorSetType {
        OperatorSetType::NodeType
    }

    fn validate(&self, model: &BayesianNetwork) -> Result<()> {
        if model.network_type().is_homogeneous() {
            return Err(BnForgeError::InvalidArgument(format!(
                "node_type operators need a network with several factor types, got {}",
                model.network_type()
            )));
        }
        Ok(())
    }

    fn set_type_whitelist(&mut self, permitted: &[Vec<FactorType>]) {
        self.type_whitelist = permitted.to_vec();
    }

    fn cache_scores(&mut self, model: &BayesianNetwork, score: &dyn Score, cache: &LocalScoreCache) {
        self.deltas = vec![TypeDeltas::new(); model.num_nodes()];
        let nodes: Vec<usize> = (0..model.num_nodes()).collect();
        self.refresh(model, score, cache, &nodes);
    }

    fn update_scores(
        &mut self,
        model: &BayesianNetwork,
        score: &dyn Score,
        cache: &LocalScoreCache,
        changed: &[usize],
    ) {
        self.refresh(model, score, cache, changed);
    }

    fn candidates(&self, _model: &BayesianNetwork, epsilon: f64) -> Vec<Operator> {
        self.deltas
            .iter()
            .enumerate()
            .flat_map(|(node, deltas)| {
                deltas.iter().map(move |&(new_type, delta)| Operator::ChangeNodeType {
                    node,
                    new_type,
                    delta,
                })
            })
            .filter(|op| op.delta() > epsilon)
            .collect()
    }

    fn legality(&self, model: &BayesianNetwork, op: &Operator) -> Legality {
        match *op {
            Operator::ChangeNodeType { node, new_type, .. } => {
                if model.is_interface(node) {
                    Legality::InterfaceNode
                } else if !model.network_type().allows(new_type)
                    || model.node_type(node) == new_type
                {
                    Legality::NotApplicable
                } else if !self.is_permitted(node, new_type) {
                    Legality::TypeNotPermitted
                } else {
                    Legality::Legal
                }
            }
            _ => Legality::NotApplicable,
        }
    }

    fn evaluations(&self) -> u64 {
        self.evaluations
    }
}
