//! A collection of operator sets searched together.

use bnforge_core::{BayesianNetwork, BnForgeError, FactorType, Result};
use bnforge_scoring::Score;

use super::{LocalScoreCache, Operator, OperatorSet, OperatorSetType, OperatorTabuSet};
use crate::restrictions::RestrictionSet;

/// Operator sets sharing one local score cache.
///
/// Selection is deterministic: candidates are gathered set by set in the
/// order the sets were given, each in its own enumeration order, and the
/// earliest legal candidate with the largest delta wins.
#[derive(Debug, Default)]
pub struct OperatorPool {
    sets: Vec<Box<dyn OperatorSet>>,
    cache: LocalScoreCache,
}

impl OperatorPool {
    pub fn new(sets: Vec<Box<dyn OperatorSet>>) -> Self {
        Self {
            sets,
            cache: LocalScoreCache::default(),
        }
    }

    /// Builds one set per type. Duplicate types are rejected.
    pub fn from_types(types: &[OperatorSetType]) -> Result<Self> {
        let mut sets: Vec<Box<dyn OperatorSet>> = Vec::with_capacity(types.len());
        for (i, set_type) in types.iter().enumerate() {
            if types[..i].contains(set_type) {
                return Err(BnForgeError::InvalidArgument(format!(
                    "operator set {set_type} given twice"
                )));
            }
            sets.push(set_type.build());
        }
        if sets.is_empty() {
            return Err(BnForgeError::InvalidArgument(
                "at least one operator set is required".to_string(),
            ));
        }
        Ok(Self::new(sets))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn set_types(&self) -> Vec<OperatorSetType> {
        self.sets.iter().map(|s| s.set_type()).collect()
    }

    pub fn validate(&self, model: &BayesianNetwork) -> Result<()> {
        self.sets.iter().try_for_each(|s| s.validate(model))
    }

    pub fn set_restrictions(&mut self, restrictions: &RestrictionSet) {
        for set in &mut self.sets {
            set.set_restrictions(restrictions);
        }
    }

    pub fn set_max_indegree(&mut self, max_indegree: usize) {
        for set in &mut self.sets {
            set.set_max_indegree(max_indegree);
        }
    }

    pub fn set_type_whitelist(&mut self, permitted: &[Vec<FactorType>]) {
        for set in &mut self.sets {
            set.set_type_whitelist(permitted);
        }
    }

    /// Scores `model` from scratch.
    pub fn cache_scores(&mut self, model: &BayesianNetwork, score: &dyn Score) {
        self.cache = LocalScoreCache::new(model, score);
        for set in &mut self.sets {
            set.cache_scores(model, score, &self.cache);
        }
    }

    pub fn local_scores(&self) -> &LocalScoreCache {
        &self.cache
    }

    /// Every candidate of every set, tagged by the index of its set.
    fn tagged_candidates(&self, model: &BayesianNetwork, epsilon: f64) -> Vec<(usize, Operator)> {
        self.sets
            .iter()
            .enumerate()
            .flat_map(|(i, set)| set.candidates(model, epsilon).into_iter().map(move |op| (i, op)))
            .collect()
    }

    /// Legal operators with a delta above `epsilon`, best first.
    pub fn operators(&self, model: &BayesianNetwork, epsilon: f64) -> Vec<Operator> {
        let mut tagged = self.tagged_candidates(model, epsilon);
        tagged.sort_by(|a, b| b.1.delta().total_cmp(&a.1.delta()));
        tagged
            .into_iter()
            .filter(|(i, op)| self.sets[*i].is_legal(model, op))
            .map(|(_, op)| op)
            .collect()
    }

    /// The best legal operator with a delta above `epsilon`, skipping tabu
    /// operators.
    pub fn find_max(
        &self,
        model: &BayesianNetwork,
        epsilon: f64,
        tabu: Option<&OperatorTabuSet>,
    ) -> Option<Operator> {
        let mut tagged = self.tagged_candidates(model, epsilon);
        // stable: ties keep enumeration order
        tagged.sort_by(|a, b| b.1.delta().total_cmp(&a.1.delta()));
        tagged
            .into_iter()
            .filter(|(_, op)| tabu.map_or(true, |t| !t.contains(op)))
            .find(|(i, op)| self.sets[*i].is_legal(model, op))
            .map(|(_, op)| op)
    }

    /// Applies `op` to `model` and refreshes the invalidated deltas.
    pub fn apply(
        &mut self,
        model: &mut BayesianNetwork,
        score: &dyn Score,
        op: &Operator,
    ) -> Result<()> {
        op.apply(model)?;
        let changed = op.nodes_changed();
        self.cache.update(model, score, &changed);
        for set in &mut self.sets {
            set.update_scores(model, score, &self.cache, &changed);
        }
        Ok(())
    }

    /// Total number of local score evaluations.
    pub fn evaluations(&self) -> u64 {
        self.sets.iter().map(|s| s.evaluations()).sum()
    }
}
