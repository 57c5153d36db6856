//! Tests for the score strategies.

use bnforge_core::{
    BayesianNetwork, BnForgeError, CkdeFit, FactorType, LinearGaussianFit, NetworkType,
};
use bnforge_test::{generate_deterministic_data, generate_normal_data, NORMAL_DATA_COLUMNS};

use super::*;

fn assert_close(a: f64, b: f64) {
    assert!(
        (a - b).abs() <= 1e-8 * (1.0 + a.abs().max(b.abs())),
        "{a} != {b}"
    );
}

fn gaussian_network() -> BayesianNetwork {
    BayesianNetwork::new(NetworkType::Gaussian, &NORMAL_DATA_COLUMNS).unwrap()
}

#[test]
fn test_bic_matches_closed_form() {
    let df = generate_normal_data(500, 0);
    let bic = Bic::new(df.clone());
    let bn = gaussian_network();

    let fit = LinearGaussianFit::fit(&df, "c", &["a", "b"]);
    let n = fit.rows() as f64;
    let expected = 0.5 * (1.0 + 2.0 - n)
        - 0.5 * n * (2.0 * std::f64::consts::PI).ln()
        - n * fit.variance().sqrt().ln()
        - n.ln() * 0.5 * 4.0;

    assert_close(bic.local_score(&bn, 2, &[0, 1]), expected);
}

#[test]
fn test_bic_prefers_true_parent() {
    let bic = Bic::new(generate_normal_data(500, 1));
    let bn = gaussian_network();
    assert!(bic.local_score(&bn, 1, &[0]) > bic.local_score(&bn, 1, &[]));
}

#[test]
fn test_bic_is_score_equivalent() {
    let bic = Bic::new(generate_normal_data(300, 2));
    let bn = gaussian_network();

    let ab = bic.local_score(&bn, 0, &[]) + bic.local_score(&bn, 1, &[0]);
    let ba = bic.local_score(&bn, 1, &[]) + bic.local_score(&bn, 0, &[1]);
    assert_close(ab, ba);
}

#[test]
fn test_score_is_sum_of_local_scores() {
    let bic = Bic::new(generate_normal_data(200, 3));
    let mut bn = gaussian_network();
    bn.add_arc(0, 1);
    bn.add_arc(1, 2);
    bn.add_arc(0, 3);

    let total: f64 = bn.nodes().map(|n| bic.node_score(&bn, n)).sum();
    assert_close(bic.score(&bn), total);
}

#[test]
fn test_bic_deterministic_relationship_is_finite() {
    let df = generate_deterministic_data(100, 4);
    let bic = Bic::new(df);
    let bn = BayesianNetwork::new(NetworkType::Gaussian, &["x", "y"]).unwrap();

    let with_parent = bic.local_score(&bn, 1, &[0]);
    assert!(with_parent.is_finite());
    assert!(with_parent > bic.local_score(&bn, 1, &[]));
}

#[test]
fn test_bic_rejects_semiparametric_networks() {
    let bic = Bic::new(generate_normal_data(100, 5));
    let spbn = BayesianNetwork::new(NetworkType::Semiparametric, &NORMAL_DATA_COLUMNS).unwrap();

    let err = bic.validate(&spbn).unwrap_err();
    assert!(matches!(err, BnForgeError::UnsupportedModelType { .. }));

    let err = bic.try_local_score(&spbn, FactorType::Ckde, 0, &[]).unwrap_err();
    assert!(matches!(err, BnForgeError::UnsupportedModelType { .. }));
    assert_eq!(
        bic.local_score_node_type(&spbn, FactorType::Ckde, 0, &[]),
        f64::NEG_INFINITY
    );
}

#[test]
fn test_compatible_checks_columns() {
    let bic = Bic::new(generate_normal_data(50, 6));
    let bn = BayesianNetwork::new(NetworkType::Gaussian, &["a", "b", "z"]).unwrap();
    assert!(!bic.compatible(&bn));
    assert!(matches!(
        bic.validate(&bn).unwrap_err(),
        BnForgeError::InvalidArgument(_)
    ));
}

#[test]
fn test_cv_likelihood_is_reproducible() {
    let df = generate_normal_data(200, 7);
    let cv1 = CvLikelihood::new(&df, 5, 42).unwrap();
    let cv2 = CvLikelihood::new(&df, 5, 42).unwrap();
    let bn = gaussian_network();

    assert_eq!(
        cv1.local_score(&bn, 2, &[0, 1]),
        cv2.local_score(&bn, 2, &[0, 1])
    );
    assert!(cv1.local_score(&bn, 2, &[1]) > cv1.local_score(&bn, 2, &[]));
}

#[test]
fn test_cv_likelihood_averages_held_out_folds() {
    let df = generate_normal_data(200, 13);
    let cv = CvLikelihood::new(&df, 5, 21).unwrap();
    let bn = gaussian_network();

    let per_fold: Vec<f64> = cv
        .cv()
        .folds()
        .map(|(training, test)| LinearGaussianFit::fit(training, "c", &["a", "b"]).loglik(test))
        .collect();
    assert_eq!(per_fold.len(), 5);
    let mean = per_fold.iter().sum::<f64>() / 5.0;
    assert_close(cv.local_score(&bn, 2, &[0, 1]), mean);
}

#[test]
fn test_cv_likelihood_ckde_averages_held_out_folds() {
    let df = generate_normal_data(100, 14);
    let cv = CvLikelihood::new(&df, 4, 2).unwrap();
    let spbn = BayesianNetwork::new(NetworkType::Semiparametric, &NORMAL_DATA_COLUMNS).unwrap();

    let mean = cv
        .cv()
        .folds()
        .map(|(training, test)| CkdeFit::fit(training, "b", &["a"]).loglik(test))
        .sum::<f64>()
        / 4.0;
    assert_close(
        cv.local_score_node_type(&spbn, FactorType::Ckde, 1, &[0]),
        mean,
    );
}

#[test]
fn test_cv_likelihood_supports_ckde() {
    let df = generate_normal_data(120, 8);
    let cv = CvLikelihood::new(&df, 4, 1).unwrap();
    let spbn = BayesianNetwork::new(NetworkType::Semiparametric, &NORMAL_DATA_COLUMNS).unwrap();

    assert!(cv.validate(&spbn).is_ok());
    assert!(cv
        .local_score_node_type(&spbn, FactorType::Ckde, 1, &[0])
        .is_finite());
}

#[test]
fn test_holdout_likelihood_uses_split() {
    let df = generate_normal_data(200, 9);
    let holdout = HoldoutLikelihood::new(&df, 0.25, 3).unwrap();
    assert_eq!(holdout.test_data().num_rows(), 50);
    assert_eq!(holdout.training_data().num_rows(), 150);

    let bn = gaussian_network();
    assert!(holdout.local_score(&bn, 1, &[0]) > holdout.local_score(&bn, 1, &[]));
}

#[test]
fn test_holdout_likelihood_fits_training_and_scores_test() {
    let df = generate_normal_data(200, 15);
    let holdout = HoldoutLikelihood::new(&df, 0.2, 4).unwrap();
    let bn = gaussian_network();

    let expected = LinearGaussianFit::fit(holdout.training_data(), "c", &["a", "b"])
        .loglik(holdout.test_data());
    assert_close(holdout.local_score(&bn, 2, &[0, 1]), expected);

    let spbn = BayesianNetwork::new(NetworkType::Semiparametric, &NORMAL_DATA_COLUMNS).unwrap();
    let ckde = CkdeFit::fit(holdout.training_data(), "b", &["a"]).loglik(holdout.test_data());
    assert_close(
        holdout.local_score_node_type(&spbn, FactorType::Ckde, 1, &[0]),
        ckde,
    );
}

#[test]
fn test_validated_likelihood_delegates_to_training() {
    let df = generate_normal_data(200, 10);
    let vl = ValidatedLikelihood::new(&df, 0.2, 5, 11).unwrap();
    let bn = gaussian_network();

    assert_eq!(vl.score_type(), ScoreType::ValidatedLikelihood);
    assert_eq!(
        vl.local_score(&bn, 3, &[1]),
        vl.training().local_score(&bn, 3, &[1])
    );
    assert_eq!(vl.validation().test_data().num_rows(), 40);
    assert_eq!(vl.training().cv().k(), 5);
}

#[test]
fn test_score_type_strings() {
    for ty in [
        ScoreType::Bic,
        ScoreType::CvLikelihood,
        ScoreType::HoldoutLikelihood,
        ScoreType::ValidatedLikelihood,
    ] {
        assert_eq!(ty.to_string().parse::<ScoreType>().unwrap(), ty);
    }
    assert!("aic".parse::<ScoreType>().is_err());
    assert!(!ScoreType::Bic.supports(NetworkType::Semiparametric));
    assert_eq!(
        ScoreType::default_for(NetworkType::Semiparametric),
        ScoreType::ValidatedLikelihood
    );
}
