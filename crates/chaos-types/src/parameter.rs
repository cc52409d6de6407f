// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Random Parameters
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Random input parameters of a gPC problem.
//!
//! Each random dimension carries its distribution kind, the shape/limit
//! parameters needed to build its native quadrature and sampling rule, and
//! the affine transform between the canonical gPC domain and the original
//! parameter units. Bounded (beta) dimensions live on [-1, 1] in canonical
//! coordinates; unbounded (normal) dimensions stay unscaled standard-normal.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ChaosError, ChaosResult};

/// One random input dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "pdf", rename_all = "lowercase")]
pub enum RandomParameter {
    /// Beta-distributed bounded input with shape (p, q) on [lo, hi].
    Beta {
        shape: (f64, f64),
        limits: (f64, f64),
    },
    /// Normally distributed unbounded input.
    #[serde(alias = "norm")]
    Normal { mean: f64, std_dev: f64 },
}

impl RandomParameter {
    /// Uniform distribution on [lo, hi] (beta with p = q = 1).
    pub fn uniform(lo: f64, hi: f64) -> Self {
        RandomParameter::Beta {
            shape: (1.0, 1.0),
            limits: (lo, hi),
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, RandomParameter::Beta { .. })
    }

    /// Jacobi weight exponents (alpha, beta) of the native polynomial family.
    /// Beta(p, q) on [-1, 1] has weight (1-x)^(q-1) (1+x)^(p-1).
    pub fn jacobi_exponents(&self) -> Option<(f64, f64)> {
        match self {
            RandomParameter::Beta { shape: (p, q), .. } => Some((q - 1.0, p - 1.0)),
            RandomParameter::Normal { .. } => None,
        }
    }

    /// Canonical coordinate -> original parameter units.
    pub fn denormalize(&self, xi: f64) -> f64 {
        match *self {
            RandomParameter::Beta {
                limits: (lo, hi), ..
            } => (xi + 1.0) / 2.0 * (hi - lo) + lo,
            RandomParameter::Normal { mean, std_dev } => xi * std_dev + mean,
        }
    }

    /// Original parameter units -> canonical coordinate.
    pub fn normalize(&self, x: f64) -> f64 {
        match *self {
            RandomParameter::Beta {
                limits: (lo, hi), ..
            } => (x - lo) / (hi - lo) * 2.0 - 1.0,
            RandomParameter::Normal { mean, std_dev } => (x - mean) / std_dev,
        }
    }

    /// Eager sanity checks, run before any model evaluation.
    pub fn validate(&self) -> ChaosResult<()> {
        match *self {
            RandomParameter::Beta {
                shape: (p, q),
                limits: (lo, hi),
            } => {
                if p <= 0.0 || q <= 0.0 {
                    return Err(ChaosError::ConfigError(format!(
                        "beta shape parameters must be positive, got ({p}, {q})"
                    )));
                }
                if lo >= hi {
                    return Err(ChaosError::ConfigError(format!(
                        "beta limits must satisfy lo < hi, got ({lo}, {hi})"
                    )));
                }
            }
            RandomParameter::Normal { std_dev, .. } => {
                if std_dev <= 0.0 {
                    return Err(ChaosError::ConfigError(format!(
                        "normal std_dev must be positive, got {std_dev}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Denormalize a whole [n x dim] block of canonical coordinates.
pub fn denormalize_coords(
    params: &[RandomParameter],
    coords_norm: ArrayView2<'_, f64>,
) -> Array2<f64> {
    let mut coords = Array2::zeros(coords_norm.raw_dim());
    for (d, p) in params.iter().enumerate() {
        for i in 0..coords_norm.nrows() {
            coords[[i, d]] = p.denormalize(coords_norm[[i, d]]);
        }
    }
    coords
}

/// Normalize a whole [n x dim] block of original-unit coordinates.
pub fn normalize_coords(params: &[RandomParameter], coords: ArrayView2<'_, f64>) -> Array2<f64> {
    let mut coords_norm = Array2::zeros(coords.raw_dim());
    for (d, p) in params.iter().enumerate() {
        for i in 0..coords.nrows() {
            coords_norm[[i, d]] = p.normalize(coords[[i, d]]);
        }
    }
    coords_norm
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_beta_transform_endpoints() {
        let p = RandomParameter::Beta {
            shape: (2.0, 3.0),
            limits: (10.0, 30.0),
        };
        assert!((p.denormalize(-1.0) - 10.0).abs() < 1e-14);
        assert!((p.denormalize(1.0) - 30.0).abs() < 1e-14);
        assert!((p.normalize(20.0)).abs() < 1e-14);
    }

    #[test]
    fn test_normal_transform() {
        let p = RandomParameter::Normal {
            mean: 5.0,
            std_dev: 2.0,
        };
        assert!((p.denormalize(1.5) - 8.0).abs() < 1e-14);
        assert!((p.normalize(8.0) - 1.5).abs() < 1e-14);
    }

    #[test]
    fn test_uniform_is_legendre_weighted() {
        let p = RandomParameter::uniform(-1.0, 1.0);
        assert_eq!(p.jacobi_exponents(), Some((0.0, 0.0)));
    }

    #[test]
    fn test_validate_rejects_bad_shape() {
        let p = RandomParameter::Beta {
            shape: (0.0, 1.0),
            limits: (0.0, 1.0),
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_block_transforms_roundtrip() {
        let params = vec![
            RandomParameter::uniform(0.0, 4.0),
            RandomParameter::Normal {
                mean: -1.0,
                std_dev: 0.5,
            },
        ];
        let xi = array![[-1.0, 0.0], [0.5, 2.0]];
        let x = denormalize_coords(&params, xi.view());
        let back = normalize_coords(&params, x.view());
        for (a, b) in xi.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
