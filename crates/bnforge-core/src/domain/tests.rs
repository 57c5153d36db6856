use super::*;
use crate::error::BnForgeError;

fn network() -> BayesianNetwork {
    BayesianNetwork::new(NetworkType::Gaussian, &["a", "b", "c", "d"]).unwrap()
}

#[test]
fn test_new_network_has_no_arcs() {
    let bn = network();
    assert_eq!(bn.num_nodes(), 4);
    assert_eq!(bn.num_arcs(), 0);
    assert_eq!(bn.index("c"), Some(2));
    assert!(!bn.is_conditional());
    assert!(bn.nodes().all(|n| bn.node_type(n) == FactorType::LinearGaussian));
}

#[test]
fn test_duplicate_nodes_rejected() {
    let err = BayesianNetwork::new(NetworkType::Gaussian, &["a", "a"]).unwrap_err();
    assert!(matches!(err, BnForgeError::InvalidArgument(_)));
}

#[test]
fn test_add_remove_flip() {
    let mut bn = network();
    bn.add_arc(0, 1);
    bn.add_arc(2, 1);
    assert_eq!(bn.parents(1), &[0, 2]);
    assert_eq!(bn.num_arcs(), 2);

    bn.flip_arc(0, 1);
    assert!(bn.has_arc(1, 0));
    assert!(!bn.has_arc(0, 1));
    assert_eq!(bn.num_arcs(), 2);

    bn.remove_arc(2, 1);
    assert_eq!(bn.arcs(), vec![(1, 0)]);
}

#[test]
fn test_cycle_detection() {
    let mut bn = network();
    bn.add_arc(0, 1);
    bn.add_arc(1, 2);
    assert!(bn.has_path(0, 2));
    assert!(!bn.can_add_arc(2, 0));
    assert!(bn.can_add_arc(0, 2));
    assert!(!bn.can_add_arc(0, 0));
}

#[test]
fn test_flip_detects_indirect_path() {
    let mut bn = network();
    bn.add_arc(0, 1);
    bn.add_arc(1, 2);
    bn.add_arc(0, 2);
    // Reversing 0 -> 2 would close 0 -> 1 -> 2 -> 0.
    assert!(!bn.can_flip_arc(0, 2));
    assert!(bn.can_flip_arc(1, 2));
}

#[test]
fn test_add_arc_checked_reports_cycle() {
    let mut bn = network();
    bn.add_arc(0, 1);
    let err = bn.add_arc_checked(1, 0).unwrap_err();
    assert!(matches!(err, BnForgeError::InvalidRestriction(_)));
}

#[test]
fn test_conditional_network_interface() {
    let mut bn =
        BayesianNetwork::conditional(NetworkType::Gaussian, &["a", "b"], &["i"]).unwrap();
    let i = bn.index("i").unwrap();
    assert!(bn.is_conditional());
    assert!(bn.is_interface(i));
    assert_eq!(bn.nodes().collect::<Vec<_>>(), vec![0, 1]);
    assert!(bn.can_add_arc(i, 0));
    assert!(!bn.can_add_arc(0, i));

    bn.add_arc(i, 0);
    assert!(!bn.can_flip_arc(i, 0));
}

#[test]
fn test_set_node_type_respects_network_class() {
    let mut gbn = network();
    assert!(gbn.set_node_type(0, FactorType::Ckde).is_err());

    let mut spbn = BayesianNetwork::new(NetworkType::Semiparametric, &["a", "b"]).unwrap();
    spbn.set_node_type(1, FactorType::Ckde).unwrap();
    assert_eq!(spbn.node_type(1), FactorType::Ckde);
}

#[test]
fn test_force_type_whitelist() {
    let mut spbn = BayesianNetwork::new(NetworkType::Semiparametric, &["a", "b"]).unwrap();
    spbn.force_type_whitelist(&[vec![], vec![FactorType::Ckde]]).unwrap();
    assert_eq!(spbn.node_type(0), FactorType::LinearGaussian);
    assert_eq!(spbn.node_type(1), FactorType::Ckde);
}

#[test]
fn test_factor_type_parsing() {
    assert_eq!("CKDE".parse::<FactorType>().unwrap(), FactorType::Ckde);
    assert_eq!("lg".parse::<FactorType>().unwrap(), FactorType::LinearGaussian);
    assert!("kde".parse::<FactorType>().is_err());
    assert_eq!("spbn".parse::<NetworkType>().unwrap(), NetworkType::Semiparametric);
    assert!("dbn".parse::<NetworkType>().is_err());
}
