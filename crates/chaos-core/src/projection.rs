// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Projection Reduction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Principal-direction reduction from gradient samples.
//!
//! When the model varies only along a few directions of the input space,
//! the right singular vectors of the gradient sample matrix span them.
//! Callers project their parameters onto the returned rows and run the
//! ordinary refinement loop in the reduced dimension, re-deriving the
//! projection whenever new gradient samples arrive.

use chaos_math::linalg::svd;
use chaos_types::error::{ChaosError, ChaosResult};
use ndarray::{Array2, ArrayView2, Axis};

/// Projection matrix [n_reduced x dim] from gradient samples [n x dim].
///
/// Keeps the right singular vectors whose singular value exceeds
/// `sv_ratio_cutoff` times the largest one. Rows are orthonormal and
/// ordered by decreasing singular value.
pub fn projection_matrix(
    gradients: ArrayView2<'_, f64>,
    sv_ratio_cutoff: f64,
) -> ChaosResult<Array2<f64>> {
    if gradients.nrows() == 0 || gradients.ncols() == 0 {
        return Err(ChaosError::LinAlg(
            "projection needs a non-empty gradient sample matrix".to_string(),
        ));
    }
    if !(0.0..1.0).contains(&sv_ratio_cutoff) {
        return Err(ChaosError::ConfigError(format!(
            "sv_ratio_cutoff must lie in [0, 1), got {sv_ratio_cutoff}"
        )));
    }

    let (_, sigma, vt) = svd(&gradients.to_owned())?;
    let sigma_max = sigma[0];
    if sigma_max <= 0.0 {
        return Err(ChaosError::LinAlg(
            "all gradient samples are zero".to_string(),
        ));
    }

    let kept = sigma
        .iter()
        .take_while(|&&s| s > sv_ratio_cutoff * sigma_max)
        .count()
        .max(1);
    Ok(vt.slice_axis(Axis(0), ndarray::Slice::from(..kept)).to_owned())
}
