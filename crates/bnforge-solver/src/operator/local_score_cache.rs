//! Cached local scores of the current model.

use bnforge_core::BayesianNetwork;
use bnforge_scoring::Score;

/// Local score of every node of the current model.
///
/// Interface nodes always hold 0.0. Must be updated for the changed nodes
/// after every applied operator, before any delta is refreshed.
#[derive(Debug, Clone, Default)]
pub struct LocalScoreCache {
    local: Vec<f64>,
}

impl LocalScoreCache {
    pub fn new(model: &BayesianNetwork, score: &dyn Score) -> Self {
        let local = (0..model.num_nodes())
            .map(|node| node_score(model, score, node))
            .collect();
        Self { local }
    }

    pub fn get(&self, node: usize) -> f64 {
        self.local[node]
    }

    pub fn update(&mut self, model: &BayesianNetwork, score: &dyn Score, nodes: &[usize]) {
        for &node in nodes {
            self.local[node] = node_score(model, score, node);
        }
    }

    /// Score of the whole model.
    pub fn sum(&self) -> f64 {
        self.local.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }
}

fn node_score(model: &BayesianNetwork, score: &dyn Score, node: usize) -> f64 {
    if model.is_interface(node) {
        0.0
    } else {
        score.node_score(model, node)
    }
}
