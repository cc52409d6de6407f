// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Linear Algebra
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Symmetric eigendecomposition, SVD and pseudoinverse.
//!
//! The cyclic Jacobi rotation sweep is the single numerical workhorse:
//! quadrature companion matrices go through `eig_sym` directly, the SVD is
//! built on `eig_sym(A^T A)`, and the Moore-Penrose pseudoinverse with
//! singular value cutoff sits on top of the SVD. The matrices in this
//! project stay small (design matrices up to a few hundred columns), so a
//! dense O(n^3) sweep is sufficient.

use chaos_types::error::{ChaosError, ChaosResult};
use ndarray::{Array1, Array2};

/// Off-diagonal mass below which a sweep is considered converged.
const JACOBI_OFF_TOL: f64 = 1e-14;

/// Maximum number of cyclic Jacobi sweeps.
const JACOBI_MAX_SWEEPS: usize = 100;

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns (eigenvalues ascending, eigenvectors as matching columns).
/// The input is only read from its upper triangle mirrored symmetrically;
/// a materially asymmetric matrix is rejected.
pub fn eig_sym(a: &Array2<f64>) -> ChaosResult<(Array1<f64>, Array2<f64>)> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(ChaosError::LinAlg(format!(
            "eig_sym requires a square matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (a[[i, j]] - a[[j, i]]).abs() > 1e-10 * (1.0 + a[[i, j]].abs()) {
                return Err(ChaosError::LinAlg(
                    "eig_sym requires a symmetric matrix".to_string(),
                ));
            }
        }
    }

    let mut m = a.clone();
    let mut v = Array2::eye(n);

    if n > 1 {
        for _ in 0..JACOBI_MAX_SWEEPS {
            let mut off_diag = 0.0;
            for i in 0..n {
                for j in (i + 1)..n {
                    off_diag += m[[i, j]].abs();
                }
            }
            if off_diag < JACOBI_OFF_TOL {
                break;
            }

            for i in 0..n {
                for j in (i + 1)..n {
                    if m[[i, j]].abs() < 1e-15 {
                        continue;
                    }
                    let tau = (m[[j, j]] - m[[i, i]]) / (2.0 * m[[i, j]]);
                    let t = if tau >= 0.0 {
                        1.0 / (tau + (1.0 + tau * tau).sqrt())
                    } else {
                        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
                    };
                    let cos = 1.0 / (1.0 + t * t).sqrt();
                    let sin = t * cos;

                    let mii = m[[i, i]];
                    let mjj = m[[j, j]];
                    let mij = m[[i, j]];
                    m[[i, i]] = cos * cos * mii - 2.0 * sin * cos * mij + sin * sin * mjj;
                    m[[j, j]] = sin * sin * mii + 2.0 * sin * cos * mij + cos * cos * mjj;
                    m[[i, j]] = 0.0;
                    m[[j, i]] = 0.0;

                    for r in 0..n {
                        if r == i || r == j {
                            continue;
                        }
                        let ri = m[[r, i]];
                        let rj = m[[r, j]];
                        m[[r, i]] = cos * ri - sin * rj;
                        m[[i, r]] = m[[r, i]];
                        m[[r, j]] = sin * ri + cos * rj;
                        m[[j, r]] = m[[r, j]];
                    }

                    for r in 0..n {
                        let vi = v[[r, i]];
                        let vj = v[[r, j]];
                        v[[r, i]] = cos * vi - sin * vj;
                        v[[r, j]] = sin * vi + cos * vj;
                    }
                }
            }
        }
    }

    // Sort ascending by eigenvalue, reorder eigenvector columns to match.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        m[[i, i]]
            .partial_cmp(&m[[j, j]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut values = Array1::zeros(n);
    let mut vectors = Array2::zeros((n, n));
    for (idx, &col) in order.iter().enumerate() {
        values[idx] = m[[col, col]];
        for r in 0..n {
            vectors[[r, idx]] = v[[r, col]];
        }
    }

    Ok((values, vectors))
}

/// Thin SVD through the symmetric eigenproblem of A^T A.
///
/// Returns (U, sigma, Vt) with singular values descending and
/// A ≈ U * diag(sigma) * Vt. Columns of U belonging to singular values
/// at numerical zero are left as zero vectors.
pub fn svd(a: &Array2<f64>) -> ChaosResult<(Array2<f64>, Array1<f64>, Array2<f64>)> {
    let (m, n) = a.dim();
    let k = m.min(n);

    let mut ata = Array2::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let mut sum = 0.0;
            for r in 0..m {
                sum += a[[r, i]] * a[[r, j]];
            }
            ata[[i, j]] = sum;
            ata[[j, i]] = sum;
        }
    }

    let (values, vectors) = eig_sym(&ata)?;

    // eig_sym sorts ascending; singular values come out descending.
    let mut sigma = Array1::zeros(k);
    let mut vt = Array2::zeros((k, n));
    for idx in 0..k {
        let col = n - 1 - idx;
        sigma[idx] = values[col].max(0.0).sqrt();
        for j in 0..n {
            vt[[idx, j]] = vectors[[j, col]];
        }
    }

    let mut u = Array2::zeros((m, k));
    for idx in 0..k {
        if sigma[idx] > 1e-14 {
            let inv_s = 1.0 / sigma[idx];
            for i in 0..m {
                let mut sum = 0.0;
                for j in 0..n {
                    sum += a[[i, j]] * vt[[idx, j]];
                }
                u[[i, idx]] = sum * inv_s;
            }
        }
    }

    Ok((u, sigma, vt))
}

/// Moore-Penrose pseudoinverse with singular value cutoff.
pub fn pinv_svd(a: &Array2<f64>, sv_cutoff: f64) -> ChaosResult<Array2<f64>> {
    let (u, sigma, vt) = svd(a)?;
    let (m, n) = a.dim();
    let k = sigma.len();

    let mut result = Array2::zeros((n, m));
    for idx in 0..k {
        if sigma[idx] > sv_cutoff {
            let inv_s = 1.0 / sigma[idx];
            for i in 0..n {
                for j in 0..m {
                    result[[i, j]] += vt[[idx, i]] * inv_s * u[[j, idx]];
                }
            }
        }
    }

    Ok(result)
}
