//! Add, remove and flip arc operators.

use bnforge_core::{BayesianNetwork, ParentSet, Result};
use bnforge_scoring::Score;
use rayon::prelude::*;
use tracing::trace;

use super::{Legality, LocalScoreCache, Operator, OperatorSet, OperatorSetType};
use crate::restrictions::RestrictionSet;

/// Arc operators over every ordered pair of nodes.
///
/// Entry `(source, target)` of the delta matrix holds the delta of adding
/// `source -> target` when the arc is absent, or of removing it when present.
/// It depends only on the parents and type of `target`, so an applied operator
/// invalidates exactly the columns of the nodes it changed. The delta of
/// flipping `source -> target` is the removal delta at `(source, target)`
/// plus the addition delta at `(target, source)`.
#[derive(Debug, Clone, Default)]
pub struct ArcOperatorSet {
    num_nodes: usize,
    delta: Vec<f64>,
    restrictions: RestrictionSet,
    max_indegree: usize,
    evaluations: u64,
}

impl ArcOperatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restrictions(mut self, restrictions: RestrictionSet) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn with_max_indegree(mut self, max_indegree: usize) -> Self {
        self.max_indegree = max_indegree;
        self
    }

    /// Cached delta at `(source, target)`.
    pub fn delta(&self, source: usize, target: usize) -> f64 {
        self.delta[source * self.num_nodes + target]
    }

    fn indegree_exceeded(&self, indegree: usize) -> bool {
        self.max_indegree > 0 && indegree > self.max_indegree
    }

    fn refresh_columns(
        &mut self,
        model: &BayesianNetwork,
        score: &dyn Score,
        cache: &LocalScoreCache,
        targets: &[usize],
    ) {
        let n = self.num_nodes;
        let columns: Vec<(usize, Vec<f64>)> = targets
            .par_iter()
            .map(|&target| (target, column(model, score, cache, target)))
            .collect();

        for (target, values) in columns {
            for (source, value) in values.into_iter().enumerate() {
                self.delta[source * n + target] = value;
            }
            if !model.is_interface(target) {
                self.evaluations += n as u64 - 1;
            }
        }
        trace!(
            event = "operator_refresh",
            set = "arcs",
            columns = targets.len(),
        );
    }

    fn add_legality(&self, model: &BayesianNetwork, source: usize, target: usize) -> Legality {
        if source == target || model.has_arc(source, target) {
            return Legality::NotApplicable;
        }
        if model.is_interface(target) {
            return Legality::InterfaceNode;
        }
        if self.restrictions.is_arc_forbidden(source, target) {
            return Legality::Forbidden;
        }
        if !self.restrictions.is_arc_forced(source, target)
            && self.indegree_exceeded(model.parents(target).len() + 1)
        {
            return Legality::IndegreeExceeded;
        }
        Legality::Legal
    }

    fn remove_legality(&self, model: &BayesianNetwork, source: usize, target: usize) -> Legality {
        if !model.has_arc(source, target) {
            return Legality::NotApplicable;
        }
        if self.restrictions.is_removal_forbidden(source, target) {
            return Legality::Forced;
        }
        Legality::Legal
    }

    fn flip_legality(&self, model: &BayesianNetwork, source: usize, target: usize) -> Legality {
        if !model.has_arc(source, target) {
            return Legality::NotApplicable;
        }
        if self.restrictions.is_arc_forced(source, target) {
            return Legality::Forced;
        }
        if model.is_interface(source) {
            return Legality::InterfaceNode;
        }
        if self.restrictions.is_arc_forbidden(target, source) {
            return Legality::Forbidden;
        }
        if self.indegree_exceeded(model.parents(source).len() + 1) {
            return Legality::IndegreeExceeded;
        }
        Legality::Legal
    }
}

/// Deltas of toggling every candidate parent of `target`.
fn column(
    model: &BayesianNetwork,
    score: &dyn Score,
    cache: &LocalScoreCache,
    target: usize,
) -> Vec<f64> {
    let n = model.num_nodes();
    if model.is_interface(target) {
        return vec![f64::NEG_INFINITY; n];
    }
    let current = cache.get(target);
    let parents = model.parents(target);

    (0..n)
        .map(|source| {
            if source == target {
                return f64::NEG_INFINITY;
            }
            let mut candidate: ParentSet = parents.iter().copied().collect();
            match candidate.binary_search(&source) {
                Ok(pos) => {
                    candidate.remove(pos);
                }
                Err(pos) => candidate.insert(pos, source),
            }
            score.local_score(model, target, &candidate) - current
        })
        .collect()
}

impl OperatorSet for ArcOperatorSet {
    fn set_type(&self) -> OperatorSetType {
        OperatorSetType::Arcs
    }

    fn validate(&self, _model: &BayesianNetwork) -> Result<()> {
        Ok(())
    }

    fn set_restrictions(&mut self, restrictions: &RestrictionSet) {
        self.restrictions = restrictions.clone();
    }

    fn set_max_indegree(&mut self, max_indegree: usize) {
        self.max_indegree = max_indegree;
    }

    fn cache_scores(&mut self, model: &BayesianNetwork, score: &dyn Score, cache: &LocalScoreCache) {
        self.num_nodes = model.num_nodes();
        self.delta = vec![f64::NEG_INFINITY; self.num_nodes * self.num_nodes];
        let targets: Vec<usize> = (0..self.num_nodes).collect();
        self.refresh_columns(model, score, cache, &targets);
    }

    fn update_scores(
        &mut self,
        model: &BayesianNetwork,
        score: &dyn Score,
        cache: &LocalScoreCache,
        changed: &[usize],
    ) {
        let mut targets = changed.to_vec();
        targets.sort_unstable();
        targets.dedup();
        self.refresh_columns(model, score, cache, &targets);
    }

    fn candidates(&self, model: &BayesianNetwork, epsilon: f64) -> Vec<Operator> {
        let n = self.num_nodes;
        let mut out = Vec::new();
        for source in 0..n {
            for target in 0..n {
                if source == target {
                    continue;
                }
                if model.has_arc(source, target) {
                    let remove = self.delta(source, target);
                    if remove > epsilon && self.remove_legality(model, source, target).is_legal() {
                        out.push(Operator::RemoveArc {
                            source,
                            target,
                            delta: remove,
                        });
                    }
                    let flip = remove + self.delta(target, source);
                    if flip > epsilon && self.flip_legality(model, source, target).is_legal() {
                        out.push(Operator::FlipArc {
                            source,
                            target,
                            delta: flip,
                        });
                    }
                } else if !model.has_arc(target, source) {
                    let add = self.delta(source, target);
                    if add > epsilon && self.add_legality(model, source, target).is_legal() {
                        out.push(Operator::AddArc {
                            source,
                            target,
                            delta: add,
                        });
                    }
                }
            }
        }
        out
    }

    fn legality(&self, model: &BayesianNetwork, op: &Operator) -> Legality {
        match *op {
            Operator::AddArc { source, target, .. } => {
                let legality = self.add_legality(model, source, target);
                if legality.is_legal() && model.has_path(target, source) {
                    Legality::AcyclicityViolation
                } else {
                    legality
                }
            }
            Operator::RemoveArc { source, target, .. } => {
                self.remove_legality(model, source, target)
            }
            Operator::FlipArc { source, target, .. } => {
                let legality = self.flip_legality(model, source, target);
                if legality.is_legal() && !model.can_flip_arc(source, target) {
                    Legality::AcyclicityViolation
                } else {
                    legality
                }
            }
            Operator::ChangeNodeType { .. } => Legality::NotApplicable,
        }
    }

    fn evaluations(&self) -> u64 {
        self.evaluations
    }
}
