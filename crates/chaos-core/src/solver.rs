// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Solvers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coefficient solvers for the regression problem A c = y.

use chaos_math::linalg::pinv_svd;
use chaos_types::config::SolverKind;
use chaos_types::error::{ChaosError, ChaosResult};
use ndarray::{Array2, ArrayView2};

/// Solves the (generally overdetermined) linear system of a gPC fit.
pub trait Solver {
    /// Coefficients [n_basis x n_out] for a design [n_grid x n_basis] and
    /// targets [n_grid x n_out].
    fn fit(&self, design: ArrayView2<'_, f64>, targets: ArrayView2<'_, f64>)
        -> ChaosResult<Array2<f64>>;
}

/// Moore-Penrose pseudoinverse least squares.
#[derive(Debug, Clone, Copy)]
pub struct MoorePenrose {
    pub sv_cutoff: f64,
}

impl MoorePenrose {
    pub fn from_kind(kind: &SolverKind) -> Self {
        match *kind {
            SolverKind::MoorePenrose { sv_cutoff } => MoorePenrose { sv_cutoff },
        }
    }
}

impl Solver for MoorePenrose {
    fn fit(
        &self,
        design: ArrayView2<'_, f64>,
        targets: ArrayView2<'_, f64>,
    ) -> ChaosResult<Array2<f64>> {
        if design.nrows() != targets.nrows() {
            return Err(ChaosError::ShapeMismatch {
                expected: design.nrows(),
                actual: targets.nrows(),
            });
        }
        if design.nrows() == 0 || design.ncols() == 0 {
            return Err(ChaosError::Solver(
                "cannot fit an empty design matrix".to_string(),
            ));
        }

        let pinv = pinv_svd(&design.to_owned(), self.sv_cutoff)?;
        let coeffs = pinv.dot(&targets);
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(ChaosError::Solver(
                "non-finite coefficients from pseudoinverse fit".to_string(),
            ));
        }
        Ok(coeffs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_exact_square_system() {
        let a = array![[1.0, 0.0], [0.0, 2.0]];
        let y = array![[3.0], [4.0]];
        let solver = MoorePenrose { sv_cutoff: 1e-10 };
        let c = solver.fit(a.view(), y.view()).unwrap();
        assert!((c[[0, 0]] - 3.0).abs() < 1e-12);
        assert!((c[[1, 0]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_overdetermined_least_squares() {
        // y = 1 + 2x sampled without noise at 4 points
        let xs = [-1.0, 0.0, 0.5, 1.0];
        let mut a = Array2::zeros((4, 2));
        let mut y = Array2::zeros((4, 1));
        for (i, &x) in xs.iter().enumerate() {
            a[[i, 0]] = 1.0;
            a[[i, 1]] = x;
            y[[i, 0]] = 1.0 + 2.0 * x;
        }
        let solver = MoorePenrose { sv_cutoff: 1e-10 };
        let c = solver.fit(a.view(), y.view()).unwrap();
        assert!((c[[0, 0]] - 1.0).abs() < 1e-10);
        assert!((c[[1, 0]] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_multi_output_columns_independent() {
        let a = array![[1.0, -1.0], [1.0, 0.0], [1.0, 1.0]];
        let mut y = Array2::zeros((3, 2));
        for (i, &x) in [-1.0, 0.0, 1.0].iter().enumerate() {
            y[[i, 0]] = 2.0 * x;
            y[[i, 1]] = 5.0 - x;
        }
        let solver = MoorePenrose { sv_cutoff: 1e-10 };
        let c = solver.fit(a.view(), y.view()).unwrap();
        assert!((c[[1, 0]] - 2.0).abs() < 1e-10);
        assert!((c[[0, 1]] - 5.0).abs() < 1e-10);
        assert!((c[[1, 1]] + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let a = array![[1.0, 0.0], [0.0, 1.0]];
        let y = array![[1.0]];
        let solver = MoorePenrose { sv_cutoff: 1e-10 };
        assert!(solver.fit(a.view(), y.view()).is_err());
    }
}
