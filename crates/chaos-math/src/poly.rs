// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Orthogonal Polynomials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 1-D orthogonal polynomial evaluation by three-term recurrence.
//!
//! These are the per-dimension factors of the multivariate gPC basis:
//! Jacobi polynomials for bounded (beta) inputs, probabilists' Hermite for
//! unbounded (normal) inputs.

use chaos_types::parameter::RandomParameter;

/// Jacobi polynomial P_n^(alpha, beta) at x.
pub fn jacobi_eval(n: usize, alpha: f64, beta: f64, x: f64) -> f64 {
    if n == 0 {
        return 1.0;
    }
    let p1 = (alpha + beta + 2.0) / 2.0 * x + (alpha - beta) / 2.0;
    if n == 1 {
        return p1;
    }

    let mut pm2 = 1.0;
    let mut pm1 = p1;
    for k in 2..=n {
        let kf = k as f64;
        let c = 2.0 * kf + alpha + beta;
        let a1 = 2.0 * kf * (kf + alpha + beta) * (c - 2.0);
        let a2 = (c - 1.0) * (alpha * alpha - beta * beta);
        let a3 = (c - 2.0) * (c - 1.0) * c;
        let a4 = 2.0 * (kf + alpha - 1.0) * (kf + beta - 1.0) * c;
        let p = ((a2 + a3 * x) * pm1 - a4 * pm2) / a1;
        pm2 = pm1;
        pm1 = p;
    }
    pm1
}

/// Probabilists' Hermite polynomial He_n at x.
pub fn hermite_prob_eval(n: usize, x: f64) -> f64 {
    if n == 0 {
        return 1.0;
    }
    if n == 1 {
        return x;
    }

    let mut hm2 = 1.0;
    let mut hm1 = x;
    for k in 2..=n {
        let h = x * hm1 - (k as f64 - 1.0) * hm2;
        hm2 = hm1;
        hm1 = h;
    }
    hm1
}

/// Evaluate the native 1-D basis polynomial of a random parameter at a
/// canonical-domain coordinate.
pub fn parameter_basis_eval(param: &RandomParameter, order: usize, xi: f64) -> f64 {
    match param.jacobi_exponents() {
        Some((alpha, beta)) => jacobi_eval(order, alpha, beta, xi),
        None => hermite_prob_eval(order, xi),
    }
}
