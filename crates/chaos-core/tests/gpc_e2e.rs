// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — End-to-End Scenarios
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use chaos_core::adaptive::AdaptiveRefinement;
use chaos_core::basis::{Basis, DesignMatrix};
use chaos_core::model::{Evaluator, FnEvaluator};
use chaos_core::random::RandomGrid;
use chaos_core::solver::{MoorePenrose, Solver};
use chaos_core::validate::loocv;
use chaos_types::config::{AdaptiveConfig, ErrorMetric};
use chaos_types::parameter::RandomParameter;
use ndarray::ArrayView1;

fn params2() -> Vec<RandomParameter> {
    vec![
        RandomParameter::uniform(-1.0, 1.0),
        RandomParameter::uniform(-1.0, 1.0),
    ]
}

#[test]
fn test_fifty_point_order_three_regression() {
    // 2-D bounded inputs, 50-point random grid, total degree 3:
    // the design matrix is 50 x C(5, 2) = 50 x 10 and a model that is
    // linear in the basis monomials is recovered to solver tolerance
    let params = params2();
    let grid = RandomGrid::new(&params, 50, Some(1234)).unwrap();
    let basis = Basis::new(2, 3, 1.0, 2);

    let model = FnEvaluator::new(|x: ArrayView1<'_, f64>| vec![3.0 - 2.0 * x[0] + x[1]]);
    let results = model.evaluate(grid.points().coords()).unwrap();

    let mut design = DesignMatrix::new();
    design.update(&basis, grid.points(), &params).unwrap();
    assert_eq!(design.matrix().dim(), (50, 10));

    let solver = MoorePenrose { sv_cutoff: 1e-10 };
    let coeffs = solver
        .fit(design.matrix().view(), results.view())
        .unwrap();

    for (j, idx) in basis.multi_indices().iter().enumerate() {
        let expected = match (idx[0], idx[1]) {
            (0, 0) => 3.0,
            (1, 0) => -2.0,
            (0, 1) => 1.0,
            _ => 0.0,
        };
        assert!(
            (coeffs[[j, 0]] - expected).abs() < 1e-8,
            "coefficient for {idx:?}: {} != {expected}",
            coeffs[[j, 0]]
        );
    }

    let err = loocv(design.matrix().view(), results.view(), 1e-10).unwrap();
    assert!(err < 1e-6, "loocv = {err}");
}

#[test]
fn test_adaptive_terminates_at_known_degree() {
    // the model is an exact degree-2 polynomial; the loop must converge
    // without growing the basis past degree 2 or the order budget
    let params = params2();
    let model = FnEvaluator::new(|x: ArrayView1<'_, f64>| {
        let v = x[0] + 0.5 * x[1];
        vec![v * v]
    });
    let config = AdaptiveConfig {
        order_end: 6,
        eps: 1e-6,
        seed: Some(321),
        ..AdaptiveConfig::default()
    };

    let result = AdaptiveRefinement::new(&params, config, &model, None)
        .unwrap()
        .run()
        .unwrap();

    assert!(result.converged);
    assert!(result.error <= 1e-6, "error = {}", result.error);
    assert!(result.surrogate.basis().max_total_order() <= 2);
    assert!(!result.error_history.is_empty());
    assert_eq!(
        result.error,
        result
            .error_history
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min)
    );

    // the fitted surrogate reproduces the model away from the grid
    let check = ndarray::array![[0.3, -0.8], [-0.6, 0.1]];
    let pred = result.surrogate.predict_norm(check.view()).unwrap();
    for (i, row) in check.rows().into_iter().enumerate() {
        let v = row[0] + 0.5 * row[1];
        assert!((pred[[i, 0]] - v * v).abs() < 1e-6);
    }
}

#[test]
fn test_non_converged_run_returns_best_snapshot() {
    // a transcendental model cannot hit eps = 1e-12 with order_end = 2;
    // the run must finish non-converged with the best expansion found
    let params = params2();
    let model = FnEvaluator::new(|x: ArrayView1<'_, f64>| vec![(1.5 * x[0]).exp() + x[1]]);
    let config = AdaptiveConfig {
        order_end: 2,
        eps: 1e-12,
        seed: Some(77),
        ..AdaptiveConfig::default()
    };

    let result = AdaptiveRefinement::new(&params, config, &model, None)
        .unwrap()
        .run()
        .unwrap();

    assert!(!result.converged);
    assert!(result.error > 1e-12);
    assert!(result.surrogate.basis().max_total_order() <= 2);
    assert!(result.error_history.len() >= 2);
    assert_eq!(
        result.error,
        result
            .error_history
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min)
    );
    // grid, results and design stay row-aligned
    assert_eq!(result.grid.n_grid(), result.results.nrows());
    assert_eq!(result.design.nrows(), result.grid.n_grid());
}

#[test]
fn test_adaptive_with_nrmsd_metric() {
    let params = params2();
    let model = FnEvaluator::new(|x: ArrayView1<'_, f64>| vec![2.0 + x[0] - 3.0 * x[1]]);
    let config = AdaptiveConfig {
        eps: 1e-8,
        error_metric: ErrorMetric::Nrmsd,
        n_validation: 500,
        seed: Some(5),
        ..AdaptiveConfig::default()
    };

    let result = AdaptiveRefinement::new(&params, config, &model, None)
        .unwrap()
        .run()
        .unwrap();

    assert!(result.converged);
    assert!(result.error <= 1e-8);
    assert!(result.surrogate.basis().max_total_order() <= 1);
}

#[test]
fn test_adaptive_with_mixed_parameter_kinds() {
    let params = vec![
        RandomParameter::uniform(2.0, 6.0),
        RandomParameter::Normal {
            mean: 0.0,
            std_dev: 0.5,
        },
    ];
    // linear in the original units, so degree 1 in canonical coordinates
    let model = FnEvaluator::new(|x: ArrayView1<'_, f64>| vec![10.0 * x[0] - 4.0 * x[1]]);
    let config = AdaptiveConfig {
        eps: 1e-8,
        order_end: 4,
        seed: Some(42),
        ..AdaptiveConfig::default()
    };

    let result = AdaptiveRefinement::new(&params, config, &model, None)
        .unwrap()
        .run()
        .unwrap();

    assert!(result.converged);
    assert!(result.surrogate.basis().max_total_order() <= 1);
    // E[10 x0 - 4 x1] = 10 * 4 = 40
    assert!((result.surrogate.mean()[0] - 40.0).abs() < 1e-6);
}
