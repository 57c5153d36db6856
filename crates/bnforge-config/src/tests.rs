//! Tests for hill-climbing configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        network_type = "spbn"
        score = "validated-lik"
        operators = ["arcs", "node_type"]
        random_seed = 42
        max_indegree = 3
        patience = 5
        epsilon = 0.5
        arc_whitelist = [["a", "b"]]
        edge_blacklist = [["c", "d"]]
        type_whitelist = [["a", "CKDE"]]
    "#;

    let config = HillClimbingConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.network_type, "spbn");
    assert_eq!(config.score.as_deref(), Some("validated-lik"));
    assert_eq!(config.operators.as_ref().map(Vec::len), Some(2));
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.max_indegree, 3);
    assert_eq!(config.patience, 5);
    assert_eq!(config.epsilon, 0.5);
    assert_eq!(config.edge_blacklist, vec![("c".to_string(), "d".to_string())]);
    assert_eq!(config.type_whitelist[0].1, "CKDE");
    // untouched fields keep their defaults
    assert_eq!(config.num_folds, 10);
    assert_eq!(config.test_holdout_ratio, 0.2);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        network_type: gbn
        score: bic
        max_iters: 20
        arc_blacklist:
          - [a, b]
          - [b, c]
    "#;

    let config = HillClimbingConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.score.as_deref(), Some("bic"));
    assert_eq!(config.max_iters, 20);
    assert_eq!(config.arc_blacklist.len(), 2);
}

#[test]
fn test_builder() {
    let config = HillClimbingConfig::new()
        .with_network_type("spbn")
        .with_operators(["arcs"])
        .with_random_seed(123)
        .with_patience(3)
        .with_arc_blacklist(vec![("x".into(), "y".into())]);

    assert_eq!(config.network_type, "spbn");
    assert_eq!(config.operators, Some(vec!["arcs".to_string()]));
    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.patience, 3);
    assert_eq!(config.arc_blacklist.len(), 1);
}

#[test]
fn test_validate() {
    assert!(HillClimbingConfig::default().validate().is_ok());
    assert!(matches!(
        HillClimbingConfig::default().with_num_folds(1).validate(),
        Err(ConfigError::Invalid(_))
    ));
    assert!(HillClimbingConfig::default()
        .with_test_holdout_ratio(1.5)
        .validate()
        .is_err());
}

#[test]
fn test_missing_file_falls_back_to_default() {
    let config = HillClimbingConfig::load("does/not/exist.toml").unwrap_or_default();
    assert_eq!(config, HillClimbingConfig::default());
}
