// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Surrogate
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The fitted expansion as a standalone predictor.

use chaos_types::error::{ChaosError, ChaosResult};
use chaos_types::parameter::{normalize_coords, RandomParameter};
use ndarray::{Array1, Array2, ArrayView2};

use crate::basis::Basis;

/// A fitted gPC expansion: basis, coefficients, and the input transforms
/// needed to evaluate it anywhere in the parameter domain.
#[derive(Debug, Clone)]
pub struct Surrogate {
    params: Vec<RandomParameter>,
    basis: Basis,
    coeffs: Array2<f64>,
}

impl Surrogate {
    pub fn new(
        params: Vec<RandomParameter>,
        basis: Basis,
        coeffs: Array2<f64>,
    ) -> ChaosResult<Self> {
        if coeffs.nrows() != basis.n_basis() {
            return Err(ChaosError::ShapeMismatch {
                expected: basis.n_basis(),
                actual: coeffs.nrows(),
            });
        }
        if basis.dim() != params.len() {
            return Err(ChaosError::ShapeMismatch {
                expected: params.len(),
                actual: basis.dim(),
            });
        }
        Ok(Surrogate {
            params,
            basis,
            coeffs,
        })
    }

    pub fn params(&self) -> &[RandomParameter] {
        &self.params
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Coefficients [n_basis x n_out], rows aligned with the basis order.
    pub fn coeffs(&self) -> &Array2<f64> {
        &self.coeffs
    }

    pub fn n_out(&self) -> usize {
        self.coeffs.ncols()
    }

    /// Predict at canonical-domain coordinates [n x dim].
    pub fn predict_norm(&self, coords_norm: ArrayView2<'_, f64>) -> ChaosResult<Array2<f64>> {
        if coords_norm.ncols() != self.basis.dim() {
            return Err(ChaosError::ShapeMismatch {
                expected: self.basis.dim(),
                actual: coords_norm.ncols(),
            });
        }
        let mut out = Array2::zeros((coords_norm.nrows(), self.n_out()));
        for (i, point) in coords_norm.rows().into_iter().enumerate() {
            let row = self.basis.row(&self.params, point);
            let pred = row.dot(&self.coeffs);
            out.row_mut(i).assign(&pred);
        }
        Ok(out)
    }

    /// Predict at original-unit coordinates [n x dim].
    pub fn predict(&self, coords: ArrayView2<'_, f64>) -> ChaosResult<Array2<f64>> {
        let norm = normalize_coords(&self.params, coords);
        self.predict_norm(norm.view())
    }

    /// Expansion mean per output: the coefficients of the constant term.
    pub fn mean(&self) -> Array1<f64> {
        match self
            .basis
            .multi_indices()
            .iter()
            .position(|idx| idx.iter().all(|&o| o == 0))
        {
            Some(c) => self.coeffs.row(c).to_owned(),
            None => Array1::zeros(self.n_out()),
        }
    }
}
