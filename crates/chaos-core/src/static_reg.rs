// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Static Regression
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One-shot regression with a fixed basis and a fixed grid.
//!
//! Same pipeline as the adaptive loop (evaluate, design matrix, fit,
//! error estimate), without refinement. Works with any grid kind; this is
//! the driver that exercises the deterministic tensor and sparse grids.

use chaos_types::config::SolverKind;
use chaos_types::error::ChaosResult;
use chaos_types::parameter::RandomParameter;
use ndarray::Array2;

use crate::basis::{Basis, DesignMatrix};
use crate::grid::GridPoints;
use crate::model::Evaluator;
use crate::solver::{MoorePenrose, Solver};
use crate::surrogate::Surrogate;
use crate::validate::loocv;

/// Result of a static fit.
#[derive(Debug, Clone)]
pub struct StaticFit {
    pub surrogate: Surrogate,
    pub grid: GridPoints,
    pub results: Array2<f64>,
    /// LOOCV estimate; absent when the design is not overdetermined.
    pub error: Option<f64>,
}

/// Fit a fixed basis on a fixed grid.
pub fn static_regression(
    params: &[RandomParameter],
    grid: GridPoints,
    basis: Basis,
    evaluator: &dyn Evaluator,
    solver_kind: &SolverKind,
) -> ChaosResult<StaticFit> {
    for p in params {
        p.validate()?;
    }
    let solver = MoorePenrose::from_kind(solver_kind);
    let results = evaluator.evaluate(grid.coords())?;

    let mut design = DesignMatrix::new();
    design.update(&basis, &grid, params)?;
    let coeffs = solver.fit(design.matrix().view(), results.view())?;

    let error = if grid.n_grid() > basis.n_basis() {
        Some(loocv(
            design.matrix().view(),
            results.view(),
            solver.sv_cutoff,
        )?)
    } else {
        None
    };

    let surrogate = Surrogate::new(params.to_vec(), basis, coeffs)?;
    Ok(StaticFit {
        surrogate,
        grid,
        results,
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tensor_grid;
    use crate::model::FnEvaluator;
    use crate::random::RandomGrid;
    use crate::sparse::sparse_grid;
    use chaos_types::config::{
        GridRule, OrderSequence, SparseGridConfig, TensorGridConfig,
    };
    use ndarray::{array, ArrayView1};

    fn params2() -> Vec<RandomParameter> {
        vec![
            RandomParameter::uniform(-1.0, 1.0),
            RandomParameter::uniform(-1.0, 1.0),
        ]
    }

    fn cubic_model() -> FnEvaluator<impl Fn(ArrayView1<'_, f64>) -> Vec<f64>> {
        FnEvaluator::new(|x: ArrayView1<'_, f64>| {
            vec![1.0 + x[0] - 0.5 * x[1] + x[0] * x[0] * x[1]]
        })
    }

    #[test]
    fn test_static_fit_on_tensor_grid() {
        let params = params2();
        let grid = tensor_grid(
            &params,
            &TensorGridConfig {
                rules: vec![GridRule::Jacobi, GridRule::Jacobi],
                n_nodes: vec![5, 5],
            },
        )
        .unwrap();
        let basis = Basis::new(2, 3, 1.0, 2);
        let fit = static_regression(
            &params,
            grid,
            basis,
            &cubic_model(),
            &SolverKind::default(),
        )
        .unwrap();

        assert!(fit.error.unwrap() < 1e-8);
        let pred = fit.surrogate.predict_norm(array![[0.3, -0.7]].view()).unwrap();
        let exact = 1.0 + 0.3 + 0.35 + 0.09 * (-0.7);
        assert!((pred[[0, 0]] - exact).abs() < 1e-9);
        // constant-term coefficient is the expansion mean: E[model] = 1
        assert!((fit.surrogate.mean()[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_static_fit_on_sparse_grid() {
        let params = params2();
        let grid = sparse_grid(
            &params,
            &SparseGridConfig {
                rules: vec![GridRule::ClenshawCurtis, GridRule::ClenshawCurtis],
                level: vec![3, 3],
                level_max: 3,
                interaction_order: 2,
                order_sequence: OrderSequence::Exp,
            },
        )
        .unwrap();
        let basis = Basis::new(2, 3, 1.0, 2);
        let fit = static_regression(
            &params,
            grid,
            basis,
            &cubic_model(),
            &SolverKind::default(),
        )
        .unwrap();

        assert!(fit.error.unwrap() < 1e-7);
        let pred = fit.surrogate.predict_norm(array![[-0.2, 0.9]].view()).unwrap();
        let exact = 1.0 - 0.2 - 0.45 + 0.04 * 0.9;
        assert!((pred[[0, 0]] - exact).abs() < 1e-8);
    }

    #[test]
    fn test_static_fit_on_random_grid() {
        let params = params2();
        let grid = RandomGrid::new(&params, 40, Some(2024)).unwrap();
        let basis = Basis::new(2, 3, 1.0, 2);
        let fit = static_regression(
            &params,
            grid.points().clone(),
            basis,
            &cubic_model(),
            &SolverKind::default(),
        )
        .unwrap();
        assert!(fit.error.unwrap() < 1e-8);
    }

    #[test]
    fn test_underdetermined_fit_has_no_error_estimate() {
        let params = params2();
        let grid = RandomGrid::new(&params, 5, Some(8)).unwrap();
        let basis = Basis::new(2, 3, 1.0, 2);
        let fit = static_regression(
            &params,
            grid.points().clone(),
            basis,
            &cubic_model(),
            &SolverKind::default(),
        )
        .unwrap();
        assert!(fit.error.is_none());
    }
}
