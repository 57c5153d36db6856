//! Tabu set of operators.

use std::collections::HashSet;

use super::{Operator, OperatorKey};

/// Operators that must not be selected, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct OperatorTabuSet {
    keys: HashSet<OperatorKey>,
}

impl OperatorTabuSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, op: &Operator) {
        self.keys.insert(op.key());
    }

    pub fn contains(&self, op: &Operator) -> bool {
        self.keys.contains(&op.key())
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
