// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Model Evaluation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The forward-model seam.
//!
//! The refinement loop only ever talks to a model through [`Evaluator`]:
//! a batch of original-unit coordinates in, a result row per point out,
//! order preserved. Everything about how the model runs (in-process
//! closure, external process, cached lookups) stays behind this trait.

use chaos_types::error::{ChaosError, ChaosResult};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Batch evaluation of the forward model at original-unit coordinates.
pub trait Evaluator {
    /// Results [n x n_out] for coordinates [n x dim]; row i belongs to
    /// coordinate row i. The output width must be the same on every call.
    fn evaluate(&self, coords: ArrayView2<'_, f64>) -> ChaosResult<Array2<f64>>;
}

/// Evaluator backed by a plain closure returning one result row per point.
pub struct FnEvaluator<F>
where
    F: Fn(ArrayView1<'_, f64>) -> Vec<f64>,
{
    f: F,
}

impl<F> FnEvaluator<F>
where
    F: Fn(ArrayView1<'_, f64>) -> Vec<f64>,
{
    pub fn new(f: F) -> Self {
        FnEvaluator { f }
    }
}

impl<F> Evaluator for FnEvaluator<F>
where
    F: Fn(ArrayView1<'_, f64>) -> Vec<f64>,
{
    fn evaluate(&self, coords: ArrayView2<'_, f64>) -> ChaosResult<Array2<f64>> {
        let n = coords.nrows();
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(n);
        for point in coords.rows() {
            let row = (self.f)(point);
            if let Some(first) = rows.first() {
                if row.len() != first.len() {
                    return Err(ChaosError::Evaluation(format!(
                        "model returned {} outputs, expected {}",
                        row.len(),
                        first.len()
                    )));
                }
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(ChaosError::Evaluation(
                    "model returned a non-finite value".to_string(),
                ));
            }
            rows.push(row);
        }

        let n_out = rows.first().map_or(0, |r| r.len());
        let mut out = Array2::zeros((n, n_out));
        for (i, row) in rows.into_iter().enumerate() {
            for (j, v) in row.into_iter().enumerate() {
                out[[i, j]] = v;
            }
        }
        Ok(out)
    }
}
