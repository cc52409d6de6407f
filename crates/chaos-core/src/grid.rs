// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Grids
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sampling-point containers and full tensor-product quadrature grids.
//!
//! Every grid kind ends up in the same [`GridPoints`] container: canonical
//! coordinates, original-unit coordinates, optional quadrature weights, and
//! a stable id per point. Ids are append-only and never reassigned, so
//! model results cached against an id stay valid across grid extensions.

use chaos_math::quadrature;
use chaos_types::config::{GridRule, TensorGridConfig};
use chaos_types::error::{ChaosError, ChaosResult};
use chaos_types::parameter::{denormalize_coords, RandomParameter};
use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};

/// Canonical coordinates of unbounded dimensions are stretched by this
/// factor when a bounded-domain rule samples them, so that the [-1, 1]
/// knots cover roughly the central 95 % of the standard normal.
pub const UNBOUNDED_STRETCH: f64 = 1.960;

/// A set of sampling points shared by all grid kinds.
#[derive(Debug, Clone)]
pub struct GridPoints {
    coords_norm: Array2<f64>,
    coords: Array2<f64>,
    weights: Option<Array1<f64>>,
    ids: Vec<u64>,
    next_id: u64,
    version: u64,
}

impl GridPoints {
    /// Build from canonical coordinates; original-unit coordinates follow
    /// from the per-dimension affine transforms.
    pub fn from_norm(
        params: &[RandomParameter],
        coords_norm: Array2<f64>,
        weights: Option<Array1<f64>>,
    ) -> ChaosResult<Self> {
        if coords_norm.ncols() != params.len() {
            return Err(ChaosError::ShapeMismatch {
                expected: params.len(),
                actual: coords_norm.ncols(),
            });
        }
        if let Some(w) = &weights {
            if w.len() != coords_norm.nrows() {
                return Err(ChaosError::ShapeMismatch {
                    expected: coords_norm.nrows(),
                    actual: w.len(),
                });
            }
        }
        let n = coords_norm.nrows();
        let coords = denormalize_coords(params, coords_norm.view());
        Ok(GridPoints {
            coords_norm,
            coords,
            weights,
            ids: (0..n as u64).collect(),
            next_id: n as u64,
            version: 0,
        })
    }

    pub fn n_grid(&self) -> usize {
        self.coords_norm.nrows()
    }

    pub fn dim(&self) -> usize {
        self.coords_norm.ncols()
    }

    /// Canonical-domain coordinates, [n_grid x dim].
    pub fn coords_norm(&self) -> ArrayView2<'_, f64> {
        self.coords_norm.view()
    }

    /// Original-unit coordinates, [n_grid x dim]. This is what the forward
    /// model is evaluated on.
    pub fn coords(&self) -> ArrayView2<'_, f64> {
        self.coords.view()
    }

    /// Quadrature weights, present only on deterministic grids.
    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    /// Stable per-point ids, in row order.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Bumped once per extension; unchanged rows keep their ids and values.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Append a block of canonical-coordinate rows. Existing rows and ids
    /// are untouched; weights are dropped since an extended grid is no
    /// longer a quadrature rule.
    pub(crate) fn append_norm(
        &mut self,
        params: &[RandomParameter],
        block: Array2<f64>,
    ) -> ChaosResult<()> {
        if block.ncols() != self.dim() {
            return Err(ChaosError::ShapeMismatch {
                expected: self.dim(),
                actual: block.ncols(),
            });
        }
        let n_new = block.nrows();
        let new_coords = denormalize_coords(params, block.view());
        self.coords_norm = concatenate![Axis(0), self.coords_norm, block];
        self.coords = concatenate![Axis(0), self.coords, new_coords];
        self.weights = None;
        for _ in 0..n_new {
            self.ids.push(self.next_id);
            self.next_id += 1;
        }
        self.version += 1;
        Ok(())
    }
}

/// 1-D knots and weights of a rule paired with its parameter.
pub(crate) fn rule_1d(
    rule: GridRule,
    param: &RandomParameter,
    n: usize,
) -> ChaosResult<(Array1<f64>, Array1<f64>)> {
    rule.check_parameter(param)?;
    match rule {
        GridRule::Jacobi => {
            // check_parameter guarantees a bounded parameter here
            let (alpha, beta) = param.jacobi_exponents().ok_or_else(|| {
                ChaosError::ConfigError("jacobi rule on unbounded parameter".to_string())
            })?;
            quadrature::jacobi_1d(n, beta, alpha)
        }
        GridRule::Hermite => quadrature::hermite_1d(n),
        GridRule::ClenshawCurtis => quadrature::clenshaw_curtis_1d(n),
        GridRule::Fejer1 => quadrature::fejer1_1d(n),
        GridRule::Fejer2 => quadrature::fejer2_1d(n),
        GridRule::Patterson => quadrature::patterson_1d(n),
    }
}

/// Stretch the canonical coordinates of unbounded dimensions sampled by a
/// bounded-domain rule. Hermite rules already produce unscaled normal knots.
pub(crate) fn stretch_unbounded(
    coords_norm: &mut Array2<f64>,
    params: &[RandomParameter],
    rules: &[GridRule],
) {
    for (d, (param, rule)) in params.iter().zip(rules).enumerate() {
        if !param.is_bounded() && *rule != GridRule::Hermite {
            for v in coords_norm.column_mut(d) {
                *v *= UNBOUNDED_STRETCH;
            }
        }
    }
}

/// Cartesian product of per-dimension value lists, one combination per row.
/// The first dimension varies slowest.
pub(crate) fn cartesian(lists: &[Array1<f64>]) -> Array2<f64> {
    let dim = lists.len();
    let total: usize = lists.iter().map(|l| l.len()).product();
    let mut out = Array2::zeros((total, dim));
    let mut idx = vec![0usize; dim];
    for row in 0..total {
        for d in 0..dim {
            out[[row, d]] = lists[d][idx[d]];
        }
        for d in (0..dim).rev() {
            idx[d] += 1;
            if idx[d] < lists[d].len() {
                break;
            }
            idx[d] = 0;
        }
    }
    out
}

/// Full tensor-product quadrature grid.
///
/// Weights are the products of the 1-D weights divided by 2^dim, the
/// canonical-domain volume, so they sum to 1 and integrate against the
/// joint probability measure directly.
pub fn tensor_grid(
    params: &[RandomParameter],
    config: &TensorGridConfig,
) -> ChaosResult<GridPoints> {
    config.validate(params)?;
    let dim = params.len();

    let mut knot_lists = Vec::with_capacity(dim);
    let mut weight_lists = Vec::with_capacity(dim);
    for d in 0..dim {
        let (k, w) = rule_1d(config.rules[d], &params[d], config.n_nodes[d])?;
        knot_lists.push(k);
        weight_lists.push(w);
    }

    let mut coords_norm = cartesian(&knot_lists);
    let weight_rows = cartesian(&weight_lists);
    let scale = 2f64.powi(dim as i32);
    let weights = weight_rows
        .rows()
        .into_iter()
        .map(|r| r.product() / scale)
        .collect::<Array1<f64>>();

    stretch_unbounded(&mut coords_norm, params, &config.rules);
    GridPoints::from_norm(params, coords_norm, Some(weights))
}
