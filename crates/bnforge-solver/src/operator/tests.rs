//! Tests for operators, operator sets and the pool.

use bnforge_core::{BayesianNetwork, FactorType, NetworkType};
use bnforge_scoring::{Bic, CvLikelihood, Score, ScoreType};
use bnforge_test::{generate_normal_data, NORMAL_DATA_COLUMNS};

use super::*;
use crate::restrictions::{resolve, RestrictionSet};

fn assert_close(a: f64, b: f64) {
    assert!(
        a == b || (a - b).abs() <= 1e-8 * (1.0 + a.abs().max(b.abs())),
        "{a} != {b}"
    );
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

/// Every parent is worth one point, whatever the data.
#[derive(Debug)]
struct ParentCountScore;

impl Score for ParentCountScore {
    fn score_type(&self) -> ScoreType {
        ScoreType::Bic
    }

    fn compatible(&self, _model: &BayesianNetwork) -> bool {
        true
    }

    fn local_score_node_type(
        &self,
        _model: &BayesianNetwork,
        _node_type: FactorType,
        _variable: usize,
        parents: &[usize],
    ) -> f64 {
        parents.len() as f64
    }
}

fn gaussian(names: &[&str]) -> BayesianNetwork {
    BayesianNetwork::new(NetworkType::Gaussian, names).unwrap()
}

fn arc_set(
    model: &BayesianNetwork,
    score: &dyn Score,
    restrictions: RestrictionSet,
    max_indegree: usize,
) -> (ArcOperatorSet, LocalScoreCache) {
    let cache = LocalScoreCache::new(model, score);
    let mut set = ArcOperatorSet::new()
        .with_restrictions(restrictions)
        .with_max_indegree(max_indegree);
    set.cache_scores(model, score, &cache);
    (set, cache)
}

fn add(source: usize, target: usize) -> Operator {
    Operator::AddArc {
        source,
        target,
        delta: 0.0,
    }
}

fn remove(source: usize, target: usize) -> Operator {
    Operator::RemoveArc {
        source,
        target,
        delta: 0.0,
    }
}

fn flip(source: usize, target: usize) -> Operator {
    Operator::FlipArc {
        source,
        target,
        delta: 0.0,
    }
}

#[test]
fn test_incremental_deltas_match_full_recomputation() {
    let score = Bic::new(generate_normal_data(300, 0));
    let mut bn = gaussian(&NORMAL_DATA_COLUMNS);
    let (mut set, mut cache) = arc_set(&bn, &score, RestrictionSet::new(), 0);

    for op in [add(0, 1), add(1, 2), flip(0, 1), add(3, 2), remove(1, 2)] {
        op.apply(&mut bn).unwrap();
        let changed = op.nodes_changed();
        cache.update(&bn, &score, &changed);
        set.update_scores(&bn, &score, &cache, &changed);
    }

    let (fresh, fresh_cache) = arc_set(&bn, &score, RestrictionSet::new(), 0);
    for s in 0..bn.num_nodes() {
        for t in 0..bn.num_nodes() {
            assert_close(set.delta(s, t), fresh.delta(s, t));
        }
    }
    assert_close(cache.sum(), fresh_cache.sum());
    assert_close(cache.sum(), score.score(&bn));
}

#[test]
fn test_delta_is_score_difference() {
    let score = Bic::new(generate_normal_data(200, 1));
    let mut bn = gaussian(&NORMAL_DATA_COLUMNS);
    bn.add_arc(0, 1);
    let (set, _) = arc_set(&bn, &score, RestrictionSet::new(), 0);

    for op in set.candidates(&bn, f64::NEG_INFINITY) {
        if !set.is_legal(&bn, &op) {
            continue;
        }
        let before = score.score(&bn);
        let mut after_model = bn.clone();
        op.apply(&mut after_model).unwrap();
        assert_close(op.delta(), score.score(&after_model) - before);
    }
}

#[test]
fn test_whitelisted_arc_is_never_removed_or_flipped() {
    let bn0 = gaussian(&["a", "b", "c"]);
    let restrictions = resolve(&bn0, &[], &pairs(&[("a", "b")]), &[], &[]).unwrap();
    let mut bn = bn0;
    bn.add_arc(0, 1);
    let (set, _) = arc_set(&bn, &ParentCountScore, restrictions, 0);

    let offered = set.candidates(&bn, f64::NEG_INFINITY);
    assert!(!offered.iter().any(|op| matches!(
        op,
        Operator::RemoveArc { source: 0, target: 1, .. } | Operator::FlipArc { source: 0, target: 1, .. }
    )));
    assert_eq!(set.legality(&bn, &remove(0, 1)), Legality::Forced);
    assert_eq!(set.legality(&bn, &flip(0, 1)), Legality::Forced);
}

#[test]
fn test_edge_whitelist_allows_flip_but_not_removal() {
    let bn0 = gaussian(&["a", "b"]);
    let restrictions = resolve(&bn0, &[], &[], &[], &pairs(&[("a", "b")])).unwrap();
    let mut bn = bn0;
    bn.add_arc(0, 1);
    let (set, _) = arc_set(&bn, &ParentCountScore, restrictions, 0);

    assert_eq!(set.legality(&bn, &remove(0, 1)), Legality::Forced);
    assert_eq!(set.legality(&bn, &flip(0, 1)), Legality::Legal);
}

#[test]
fn test_edge_blacklist_forbids_both_directions() {
    let bn = gaussian(&["a", "b", "c"]);
    let restrictions = resolve(&bn, &[], &[], &pairs(&[("b", "a")]), &[]).unwrap();
    let (set, _) = arc_set(&bn, &ParentCountScore, restrictions, 0);

    assert_eq!(set.legality(&bn, &add(0, 1)), Legality::Forbidden);
    assert_eq!(set.legality(&bn, &add(1, 0)), Legality::Forbidden);
    assert_eq!(set.legality(&bn, &add(0, 2)), Legality::Legal);
    let offered = set.candidates(&bn, 0.0);
    assert_eq!(offered.len(), 4);
}

#[test]
fn test_indegree_bound() {
    let mut bn = gaussian(&["a", "b", "c"]);
    bn.add_arc(0, 2);
    let (set, _) = arc_set(&bn, &ParentCountScore, RestrictionSet::new(), 1);

    assert_eq!(set.legality(&bn, &add(1, 2)), Legality::IndegreeExceeded);
    assert_eq!(set.legality(&bn, &add(1, 0)), Legality::Legal);
    // a has no parents yet, so reversing a -> c stays within the bound
    assert_eq!(set.legality(&bn, &flip(0, 2)), Legality::Legal);
}

#[test]
fn test_whitelist_bypasses_indegree() {
    let bn0 = gaussian(&["a", "b", "c"]);
    let restrictions = resolve(&bn0, &[], &pairs(&[("b", "c")]), &[], &[]).unwrap();
    let mut bn = bn0;
    bn.add_arc(0, 2);
    let (set, _) = arc_set(&bn, &ParentCountScore, restrictions, 1);
    assert_eq!(set.legality(&bn, &add(1, 2)), Legality::Legal);
}

#[test]
fn test_cycles_are_rejected_silently() {
    let mut bn = gaussian(&["a", "b", "c"]);
    bn.add_arc(0, 1);
    bn.add_arc(1, 2);
    let (set, _) = arc_set(&bn, &ParentCountScore, RestrictionSet::new(), 0);

    assert_eq!(set.legality(&bn, &add(2, 0)), Legality::AcyclicityViolation);
    assert_eq!(set.legality(&bn, &flip(0, 1)), Legality::Legal);

    let mut with_shortcut = bn.clone();
    with_shortcut.add_arc(0, 2);
    let (set, _) = arc_set(&with_shortcut, &ParentCountScore, RestrictionSet::new(), 0);
    assert_eq!(
        set.legality(&with_shortcut, &flip(0, 2)),
        Legality::AcyclicityViolation
    );
}

#[test]
fn test_pool_operators_keep_the_graph_acyclic() {
    let score = Bic::new(generate_normal_data(200, 2));
    let mut bn = gaussian(&NORMAL_DATA_COLUMNS);
    bn.add_arc(0, 1);
    bn.add_arc(1, 2);
    bn.add_arc(2, 3);
    let mut pool = OperatorPool::from_types(&[OperatorSetType::Arcs]).unwrap();
    pool.cache_scores(&bn, &score);

    for op in pool.operators(&bn, f64::NEG_INFINITY) {
        let mut next = bn.clone();
        op.apply(&mut next).unwrap();
        for (s, t) in next.arcs() {
            assert!(!next.has_path(t, s), "{op} created a cycle");
        }
    }
}

#[test]
fn test_interface_nodes_are_never_targets() {
    let mut bn = BayesianNetwork::conditional(NetworkType::Gaussian, &["a", "b"], &["i"]).unwrap();
    let i = bn.index("i").unwrap();
    bn.add_arc(i, 0);
    let (set, cache) = arc_set(&bn, &ParentCountScore, RestrictionSet::new(), 0);

    for op in set.candidates(&bn, f64::NEG_INFINITY) {
        match op {
            Operator::AddArc { target, .. } => assert_ne!(target, i),
            Operator::FlipArc { source, .. } => assert_ne!(source, i),
            _ => {}
        }
    }
    assert_eq!(set.legality(&bn, &add(0, i)), Legality::InterfaceNode);
    assert_eq!(set.legality(&bn, &flip(i, 0)), Legality::InterfaceNode);
    assert_eq!(cache.get(i), 0.0);
    assert_eq!(set.delta(0, i), f64::NEG_INFINITY);
}

#[test]
fn test_find_max_breaks_ties_in_enumeration_order() {
    let bn = gaussian(&["a", "b", "c"]);
    let mut pool = OperatorPool::from_types(&[OperatorSetType::Arcs]).unwrap();
    pool.cache_scores(&bn, &ParentCountScore);

    let best = pool.find_max(&bn, 0.0, None).unwrap();
    assert_eq!(best.key(), OperatorKey::AddArc(0, 1));
    assert_eq!(best.delta(), 1.0);
}

#[test]
fn test_find_max_skips_tabu() {
    let bn = gaussian(&["a", "b", "c"]);
    let mut pool = OperatorPool::from_types(&[OperatorSetType::Arcs]).unwrap();
    pool.cache_scores(&bn, &ParentCountScore);

    let mut tabu = OperatorTabuSet::new();
    tabu.insert(&add(0, 1));
    let best = pool.find_max(&bn, 0.0, Some(&tabu)).unwrap();
    assert_eq!(best.key(), OperatorKey::AddArc(0, 2));
    assert_eq!(tabu.len(), 1);
}

#[test]
fn test_find_max_respects_epsilon() {
    let bn = gaussian(&["a", "b"]);
    let mut pool = OperatorPool::from_types(&[OperatorSetType::Arcs]).unwrap();
    pool.cache_scores(&bn, &ParentCountScore);
    assert!(pool.find_max(&bn, 1.0, None).is_none());
    assert!(pool.find_max(&bn, 0.5, None).is_some());
}

#[test]
fn test_pool_apply_refreshes_cache() {
    let score = Bic::new(generate_normal_data(200, 3));
    let mut bn = gaussian(&NORMAL_DATA_COLUMNS);
    let mut pool = OperatorPool::from_types(&[OperatorSetType::Arcs]).unwrap();
    pool.cache_scores(&bn, &score);

    let mut total = pool.local_scores().sum();
    for _ in 0..3 {
        let op = pool.find_max(&bn, 0.0, None).unwrap();
        pool.apply(&mut bn, &score, &op).unwrap();
        total += op.delta();
    }
    assert_close(total, score.score(&bn));
    assert_close(pool.local_scores().sum(), score.score(&bn));
}

#[test]
fn test_opposite_operators() {
    let mut bn = BayesianNetwork::new(NetworkType::Semiparametric, &["a", "b"]).unwrap();
    bn.add_arc(0, 1);

    assert_eq!(add(0, 1).opposite(&bn).key(), OperatorKey::RemoveArc(0, 1));
    assert_eq!(flip(0, 1).opposite(&bn).key(), OperatorKey::FlipArc(1, 0));
    let change = Operator::ChangeNodeType {
        node: 1,
        new_type: FactorType::Ckde,
        delta: 2.0,
    };
    let back = change.opposite(&bn);
    assert_eq!(back.key(), OperatorKey::ChangeNodeType(1, FactorType::LinearGaussian));
    assert_eq!(back.delta(), -2.0);
}

#[test]
fn test_apply_rejects_inapplicable_operator() {
    let mut bn = gaussian(&["a", "b"]);
    bn.add_arc(0, 1);
    assert!(add(1, 0).apply(&mut bn).is_err());
    assert!(remove(1, 0).apply(&mut bn).is_err());
    assert_eq!(bn.num_arcs(), 1);
}

#[test]
fn test_node_type_set() {
    let df = generate_normal_data(120, 4);
    let score = CvLikelihood::new(&df, 3, 0).unwrap();
    let bn = BayesianNetwork::new(NetworkType::Semiparametric, &NORMAL_DATA_COLUMNS).unwrap();
    let cache = LocalScoreCache::new(&bn, &score);
    let mut set = ChangeNodeTypeSet::new();
    set.validate(&bn).unwrap();
    set.set_type_whitelist(&[vec![], vec![FactorType::LinearGaussian], vec![], vec![]]);
    set.cache_scores(&bn, &score, &cache);

    let offered = set.candidates(&bn, f64::NEG_INFINITY);
    assert_eq!(offered.len(), 3);
    assert!(offered
        .iter()
        .all(|op| matches!(op, Operator::ChangeNodeType { new_type: FactorType::Ckde, node, .. } if *node != 1)));

    let op = offered[0];
    let mut changed = bn.clone();
    op.apply(&mut changed).unwrap();
    assert_close(op.delta(), score.score(&changed) - score.score(&bn));

    let blocked = Operator::ChangeNodeType {
        node: 1,
        new_type: FactorType::Ckde,
        delta: 0.0,
    };
    assert_eq!(set.legality(&bn, &blocked), Legality::TypeNotPermitted);
}

#[test]
fn test_node_type_set_rejects_homogeneous_network() {
    let bn = gaussian(&["a"]);
    assert!(ChangeNodeTypeSet::new().validate(&bn).is_err());
}

#[test]
fn test_operator_set_type_parsing() {
    assert_eq!("arcs".parse::<OperatorSetType>().unwrap(), OperatorSetType::Arcs);
    assert_eq!(
        "node_type".parse::<OperatorSetType>().unwrap(),
        OperatorSetType::NodeType
    );
    assert!("arc".parse::<OperatorSetType>().is_err());
    assert_eq!(
        OperatorSetType::default_for(NetworkType::Semiparametric),
        vec![OperatorSetType::Arcs, OperatorSetType::NodeType]
    );
}

#[test]
fn test_pool_rejects_duplicate_sets() {
    assert!(OperatorPool::from_types(&[OperatorSetType::Arcs, OperatorSetType::Arcs]).is_err());
    assert!(OperatorPool::from_types(&[]).is_err());
}
