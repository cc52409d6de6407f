// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Multi-Index Sets
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Truncated multivariate index sets.
//!
//! A multi-index is one integer per random dimension: the per-dimension
//! polynomial degree of a basis term, or a sparse-grid level combination.
//! Sets are truncated by a q-norm bound (order_max_norm = 1 is the plain
//! total-degree simplex, values below 1 thin out interaction terms) and
//! optionally by the interaction order, the count of non-zero entries.

use std::collections::HashSet;

pub type MultiIndex = Vec<usize>;

/// Slack for the floating q-norm comparison. Integer tuples sitting exactly
/// on the bound must not be lost to rounding.
const QNORM_TOL: f64 = 1e-9;

/// q-norm of an index: (sum_k i_k^q)^(1/q).
pub fn q_norm(index: &[usize], q: f64) -> f64 {
    index
        .iter()
        .map(|&i| (i as f64).powf(q))
        .sum::<f64>()
        .powf(1.0 / q)
}

/// Number of non-zero entries (dimensions jointly active in the term).
pub fn interaction_order(index: &[usize]) -> usize {
    index.iter().filter(|&&i| i > 0).count()
}

/// All multi-indices with q-norm at most order_max.
///
/// Enumeration walks the total-degree shells 0..=order_max in ascending
/// order; within a shell no ordering is promised. For order_norm = 1 the
/// q-norm filter is skipped entirely and the result is the exact simplex
/// of C(order_max + dim, dim) indices.
pub fn multi_indices_max_order(dim: usize, order_max: usize, order_norm: f64) -> Vec<MultiIndex> {
    let mut out = Vec::new();
    let mut current = vec![0usize; dim];
    for total in 0..=order_max {
        enumerate_shell(0, total, &mut current, &mut out);
    }

    if order_norm < 1.0 {
        let bound = order_max as f64 + QNORM_TOL;
        out.retain(|idx| q_norm(idx, order_norm) <= bound);
    }
    out
}

fn enumerate_shell(dim: usize, remaining: usize, current: &mut [usize], out: &mut Vec<MultiIndex>) {
    if dim + 1 == current.len() {
        current[dim] = remaining;
        out.push(current.to_vec());
        return;
    }
    for v in 0..=remaining {
        current[dim] = v;
        enumerate_shell(dim + 1, remaining - v, current, out);
    }
}

/// Drop indices with more than `cap` jointly active dimensions.
pub fn filter_interaction_order(indices: Vec<MultiIndex>, cap: usize) -> Vec<MultiIndex> {
    indices
        .into_iter()
        .filter(|idx| interaction_order(idx) <= cap)
        .collect()
}

/// Indices admissible at `order` that are not yet in `existing`.
///
/// Exact integer set difference; no floating tolerance is involved here,
/// unlike sparse-grid knot merging.
pub fn new_indices_for_order(
    dim: usize,
    order: usize,
    order_norm: f64,
    existing: &[MultiIndex],
) -> Vec<MultiIndex> {
    let known: HashSet<&[usize]> = existing.iter().map(|v| v.as_slice()).collect();
    multi_indices_max_order(dim, order, order_norm)
        .into_iter()
        .filter(|idx| !known.contains(idx.as_slice()))
        .collect()
}
