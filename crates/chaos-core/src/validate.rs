// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Error Estimation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Expansion error estimates.
//!
//! LOOCV is computed from the hat matrix of the already-fitted design, so
//! it costs one pseudoinverse and no extra model evaluations. NRMSD
//! compares surrogate predictions against a held-out validation set. Both
//! are normalized per output column and averaged, so multi-output models
//! report one scalar.

use chaos_math::linalg::pinv_svd;
use chaos_types::error::{ChaosError, ChaosResult};
use chaos_types::parameter::RandomParameter;
use ndarray::{Array2, ArrayView2};

use crate::grid::GridPoints;
use crate::model::Evaluator;
use crate::random::RandomGrid;

/// Floor for normalization denominators. Outputs that are constant over
/// the sample normalize by 1 instead, keeping the estimate finite.
const EPS_SPREAD: f64 = 1e-15;

/// Leverages h_ii this close to 1 mean the point determines its own fit;
/// the residual inflation is clamped there.
const MAX_LEVERAGE: f64 = 1.0 - 1e-12;

/// Leave-one-out cross-validation error of a least-squares fit.
///
/// Uses the closed form e_i = r_i / (1 - h_ii) with the hat matrix
/// H = A A^+; one fit instead of n_grid refits. The RMS of the inflated
/// residuals is normalized by the sample standard deviation per output.
pub fn loocv(
    design: ArrayView2<'_, f64>,
    results: ArrayView2<'_, f64>,
    sv_cutoff: f64,
) -> ChaosResult<f64> {
    let n = design.nrows();
    if n != results.nrows() {
        return Err(ChaosError::ShapeMismatch {
            expected: n,
            actual: results.nrows(),
        });
    }
    if n <= design.ncols() {
        return Err(ChaosError::Solver(format!(
            "loocv needs more grid points than basis terms, got {n} <= {}",
            design.ncols()
        )));
    }

    let pinv = pinv_svd(&design.to_owned(), sv_cutoff)?;
    let coeffs = pinv.dot(&results);
    let fitted = design.dot(&coeffs);
    let hat = design.dot(&pinv);

    let mut total = 0.0;
    for col in 0..results.ncols() {
        let mut sq_sum = 0.0;
        for i in 0..n {
            let r = results[[i, col]] - fitted[[i, col]];
            let h = hat[[i, i]].min(MAX_LEVERAGE);
            let e = r / (1.0 - h);
            sq_sum += e * e;
        }
        let rms = (sq_sum / n as f64).sqrt();

        let mean = results.column(col).sum() / n as f64;
        let var = results
            .column(col)
            .iter()
            .map(|y| (y - mean) * (y - mean))
            .sum::<f64>()
            / n as f64;
        let spread = var.sqrt();
        total += if spread > EPS_SPREAD { rms / spread } else { rms };
    }
    Ok(total / results.ncols() as f64)
}

/// Normalized root-mean-square deviation of predictions against reference
/// values, normalized by the reference range per output column.
pub fn nrmsd(
    predicted: ArrayView2<'_, f64>,
    reference: ArrayView2<'_, f64>,
) -> ChaosResult<f64> {
    if predicted.dim() != reference.dim() {
        return Err(ChaosError::ShapeMismatch {
            expected: reference.nrows(),
            actual: predicted.nrows(),
        });
    }
    let n = reference.nrows();
    if n == 0 {
        return Err(ChaosError::Evaluation(
            "empty validation set".to_string(),
        ));
    }

    let mut total = 0.0;
    for col in 0..reference.ncols() {
        let mut sq_sum = 0.0;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for i in 0..n {
            let d = predicted[[i, col]] - reference[[i, col]];
            sq_sum += d * d;
            lo = lo.min(reference[[i, col]]);
            hi = hi.max(reference[[i, col]]);
        }
        let rms = (sq_sum / n as f64).sqrt();
        let range = hi - lo;
        total += if range > EPS_SPREAD { rms / range } else { rms };
    }
    Ok(total / reference.ncols() as f64)
}

/// Held-out Monte-Carlo set for NRMSD validation.
#[derive(Debug, Clone)]
pub struct ValidationSet {
    grid: GridPoints,
    results: Array2<f64>,
}

impl ValidationSet {
    /// Draw a validation grid and evaluate the model on it once.
    pub fn generate(
        params: &[RandomParameter],
        n_validation: usize,
        seed: Option<u64>,
        evaluator: &dyn Evaluator,
    ) -> ChaosResult<Self> {
        let grid = RandomGrid::new(params, n_validation, seed)?;
        let results = evaluator.evaluate(grid.points().coords())?;
        Ok(ValidationSet {
            grid: grid.points().clone(),
            results,
        })
    }

    pub fn from_parts(grid: GridPoints, results: Array2<f64>) -> ChaosResult<Self> {
        if grid.n_grid() != results.nrows() {
            return Err(ChaosError::ShapeMismatch {
                expected: grid.n_grid(),
                actual: results.nrows(),
            });
        }
        Ok(ValidationSet { grid, results })
    }

    pub fn grid(&self) -> &GridPoints {
        &self.grid
    }

    pub fn results(&self) -> ArrayView2<'_, f64> {
        self.results.view()
    }
}
