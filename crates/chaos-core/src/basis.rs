// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Basis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multivariate polynomial basis and the regression design matrix.
//!
//! A basis is an ordered list of multi-indices; the basis function of an
//! index is the product over dimensions of the parameter-native 1-D
//! polynomials at the indexed degrees. Growth is append-only and produces
//! a new snapshot with a bumped version, so a design matrix can tell a
//! grown basis from a replaced one and update incrementally.

use chaos_math::multi_index::{filter_interaction_order, multi_indices_max_order, MultiIndex};
use chaos_math::poly::parameter_basis_eval;
use chaos_types::error::{ChaosError, ChaosResult};
use chaos_types::parameter::RandomParameter;
use ndarray::{Array1, Array2, ArrayView1};

use crate::grid::GridPoints;

/// Ordered, append-only polynomial basis.
#[derive(Debug, Clone)]
pub struct Basis {
    indices: Vec<MultiIndex>,
    dim: usize,
    version: u64,
}

impl Basis {
    /// Initial truncated basis: q-norm bound `order_max_norm` at
    /// `order_max`, then the interaction-order cap.
    pub fn new(
        dim: usize,
        order_max: usize,
        order_max_norm: f64,
        interaction_order: usize,
    ) -> Basis {
        let indices = filter_interaction_order(
            multi_indices_max_order(dim, order_max, order_max_norm),
            interaction_order,
        );
        Basis {
            indices,
            dim,
            version: 0,
        }
    }

    pub fn n_basis(&self) -> usize {
        self.indices.len()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn multi_indices(&self) -> &[MultiIndex] {
        &self.indices
    }

    /// Largest total degree present.
    pub fn max_total_order(&self) -> usize {
        self.indices
            .iter()
            .map(|idx| idx.iter().sum::<usize>())
            .max()
            .unwrap_or(0)
    }

    /// New snapshot with `added` terms appended after the existing ones.
    /// Existing terms keep their positions, so fitted coefficient vectors
    /// of the old snapshot remain index-compatible prefixes.
    pub fn extended(&self, added: Vec<MultiIndex>) -> ChaosResult<Basis> {
        if added.iter().any(|idx| idx.len() != self.dim) {
            return Err(ChaosError::ShapeMismatch {
                expected: self.dim,
                actual: added.iter().map(|i| i.len()).find(|&l| l != self.dim).unwrap_or(0),
            });
        }
        let mut indices = self.indices.clone();
        indices.extend(added);
        Ok(Basis {
            indices,
            dim: self.dim,
            version: self.version + 1,
        })
    }

    /// Evaluate every basis function at one canonical-domain point.
    pub fn row(&self, params: &[RandomParameter], xi: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = Array1::zeros(self.n_basis());
        for (j, idx) in self.indices.iter().enumerate() {
            let mut v = 1.0;
            for (d, &order) in idx.iter().enumerate() {
                if order > 0 {
                    v *= parameter_basis_eval(&params[d], order, xi[d]);
                }
            }
            out[j] = v;
        }
        out
    }
}

/// Regression design matrix [n_grid x n_basis], kept in sync with an
/// append-only basis and grid pair.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    matrix: Array2<f64>,
    basis_version: Option<u64>,
    grid_version: Option<u64>,
}

impl Default for DesignMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl DesignMatrix {
    pub fn new() -> Self {
        DesignMatrix {
            matrix: Array2::zeros((0, 0)),
            basis_version: None,
            grid_version: None,
        }
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Bring the matrix up to date with the current basis and grid
    /// snapshots. Only the new columns (basis growth) and new rows (grid
    /// growth) are evaluated; surviving entries are carried over unchanged.
    pub fn update(
        &mut self,
        basis: &Basis,
        grid: &GridPoints,
        params: &[RandomParameter],
    ) -> ChaosResult<()> {
        let (r0, c0) = self.matrix.dim();
        let r1 = grid.n_grid();
        let c1 = basis.n_basis();
        if r1 < r0 || c1 < c0 {
            return Err(ChaosError::ShapeMismatch {
                expected: r0.max(c0),
                actual: r1.min(c1),
            });
        }
        if r1 == r0 && c1 == c0 && self.is_current(basis, grid) {
            return Ok(());
        }

        let coords = grid.coords_norm();
        let mut next = Array2::zeros((r1, c1));
        next.slice_mut(ndarray::s![..r0, ..c0])
            .assign(&self.matrix);

        let indices = basis.multi_indices();
        let fill = |i: usize, j: usize, next: &mut Array2<f64>| {
            let mut v = 1.0;
            for (d, &order) in indices[j].iter().enumerate() {
                if order > 0 {
                    v *= parameter_basis_eval(&params[d], order, coords[[i, d]]);
                }
            }
            next[[i, j]] = v;
        };
        for j in c0..c1 {
            for i in 0..r1 {
                fill(i, j, &mut next);
            }
        }
        for i in r0..r1 {
            for j in 0..c0 {
                fill(i, j, &mut next);
            }
        }

        self.matrix = next;
        self.basis_version = Some(basis.version());
        self.grid_version = Some(grid.version());
        Ok(())
    }

    fn is_current(&self, basis: &Basis, grid: &GridPoints) -> bool {
        self.basis_version == Some(basis.version()) && self.grid_version == Some(grid.version())
    }
}
