// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Sparse Grids
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Smolyak sparse quadrature grids.
//!
//! The combination technique tensors 1-D difference rules over all level
//! combinations with total level at most `level_max`. Coinciding knots from
//! different combinations are merged and their weights summed; merging
//! clusters one coordinate at a time, so the result does not depend on the
//! order in which combinations were enumerated.

use chaos_math::multi_index::multi_indices_max_order;
use chaos_types::config::{GridRule, OrderSequence, SparseGridConfig};
use chaos_types::error::{ChaosError, ChaosResult};
use chaos_types::parameter::RandomParameter;
use ndarray::{Array1, Array2};

use crate::grid::{rule_1d, stretch_unbounded, GridPoints};

/// Knots closer than this in every coordinate are one point.
const EPS_KNOT: f64 = 1e-6;

/// Combination weights below this magnitude (before volume normalization)
/// carry no information and are pruned.
const EPS_WEIGHT: f64 = 1e-8;

/// 1-D rule order at a sparse-grid level.
fn order_for(rule: GridRule, seq: OrderSequence, level: usize) -> usize {
    match seq {
        OrderSequence::Lin => {
            if rule.starts_at_level_one() {
                level
            } else {
                level + 1
            }
        }
        OrderSequence::Exp => match rule {
            GridRule::Fejer2 => {
                if level == 1 {
                    1
                } else {
                    2usize.pow(level as u32) - 1
                }
            }
            // stays on the tabulated sequence 1, 3, 7, 15, 31
            GridRule::Patterson => 2usize.pow(level as u32 + 1) - 1,
            _ => {
                if level == 0 {
                    1
                } else {
                    2usize.pow(level as u32) + 1
                }
            }
        },
    }
}

/// Difference rules per dimension, indexed by level position. Position 0 is
/// the first-level rule itself; position t is rule(t) with rule(t-1)
/// subtracted (same knots, negated weights, concatenated).
fn difference_rules(
    rule: GridRule,
    param: &RandomParameter,
    seq: OrderSequence,
    first_level: usize,
    max_level: usize,
) -> ChaosResult<Vec<(Vec<f64>, Vec<f64>)>> {
    let mut out = Vec::with_capacity(max_level - first_level + 1);
    let mut prev: Option<(Array1<f64>, Array1<f64>)> = None;
    for level in first_level..=max_level {
        let (k, w) = rule_1d(rule, param, order_for(rule, seq, level))?;
        let (mut knots, mut weights) = (k.to_vec(), w.to_vec());
        if let Some((pk, pw)) = &prev {
            knots.extend(pk.iter());
            weights.extend(pw.iter().map(|w| -w));
        }
        out.push((knots, weights));
        prev = Some((k, w));
    }
    Ok(out)
}

/// Merge coinciding candidate knots, summing their weights. Candidates are
/// clustered one coordinate at a time, so knots within the tolerance merge
/// even when another candidate falls between them in a flat lexicographic
/// sweep. The output is sorted lexicographically.
pub(crate) fn merge_points(candidates: Vec<(Vec<f64>, f64)>) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut merged: Vec<(Vec<f64>, f64)> = Vec::new();
    if !candidates.is_empty() {
        let all: Vec<usize> = (0..candidates.len()).collect();
        cluster_dim(&candidates, all, 0, &mut merged);
    }
    merged.sort_by(|a, b| {
        a.0.iter()
            .zip(&b.0)
            .map(|(x, y)| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
            .find(|c| *c != std::cmp::Ordering::Equal)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged.into_iter().unzip()
}

/// Split `group` along coordinate `d` wherever consecutive sorted values are
/// `EPS_KNOT` or more apart, then recurse into the next coordinate. A group
/// past the last coordinate is a single knot; its weights sum.
fn cluster_dim(
    candidates: &[(Vec<f64>, f64)],
    mut group: Vec<usize>,
    d: usize,
    out: &mut Vec<(Vec<f64>, f64)>,
) {
    let dim = candidates[group[0]].0.len();
    if d == dim {
        let weight = group.iter().map(|&i| candidates[i].1).sum();
        out.push((candidates[group[0]].0.clone(), weight));
        return;
    }
    group.sort_by(|&a, &b| {
        candidates[a].0[d]
            .partial_cmp(&candidates[b].0[d])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut start = 0;
    for k in 1..=group.len() {
        let split = k == group.len()
            || candidates[group[k]].0[d] - candidates[group[k - 1]].0[d] >= EPS_KNOT;
        if split {
            cluster_dim(candidates, group[start..k].to_vec(), d + 1, out);
            start = k;
        }
    }
}

/// Level combinations entering the sum. Fejer-2 sequences start at level 1,
/// which shifts the whole simplex by one in every dimension.
fn level_combinations(config: &SparseGridConfig, dim: usize) -> ChaosResult<Vec<Vec<usize>>> {
    let fejer2 = config.rules.contains(&GridRule::Fejer2);
    let shift = usize::from(fejer2);
    if fejer2 && config.level_max < dim {
        return Err(ChaosError::ConfigError(format!(
            "fejer2 sparse grid needs level_max >= dim, got {} < {dim}",
            config.level_max
        )));
    }

    let mut rows = multi_indices_max_order(dim, config.level_max - dim * shift, 1.0);
    if shift == 1 {
        for row in &mut rows {
            for l in row.iter_mut() {
                *l += 1;
            }
        }
    }

    rows.retain(|row| row.iter().zip(&config.level).all(|(l, cap)| l <= cap));
    if config.interaction_order < dim {
        rows.retain(|row| {
            row.iter().filter(|&&l| l > shift).count() <= config.interaction_order
        });
    }
    Ok(rows)
}

/// Build a sparse quadrature grid.
pub fn sparse_grid(
    params: &[RandomParameter],
    config: &SparseGridConfig,
) -> ChaosResult<GridPoints> {
    config.validate(params)?;
    let dim = params.len();

    let mut diffs = Vec::with_capacity(dim);
    for d in 0..dim {
        let rule = config.rules[d];
        let first = usize::from(rule.starts_at_level_one());
        // combinations never exceed the per-dimension cap or the global one
        let max_level = config.level[d].min(config.level_max).max(first);
        diffs.push(difference_rules(
            rule,
            &params[d],
            config.order_sequence,
            first,
            max_level,
        )?);
    }

    let mut candidates: Vec<(Vec<f64>, f64)> = Vec::new();
    for combo in level_combinations(config, dim)? {
        let selected: Vec<&(Vec<f64>, Vec<f64>)> = combo
            .iter()
            .enumerate()
            .map(|(d, &l)| {
                let first = usize::from(config.rules[d].starts_at_level_one());
                &diffs[d][l - first]
            })
            .collect();

        // odometer over the per-dimension difference knots
        let total: usize = selected.iter().map(|(k, _)| k.len()).product();
        let mut idx = vec![0usize; dim];
        for _ in 0..total {
            let mut point = Vec::with_capacity(dim);
            let mut weight = 1.0;
            for d in 0..dim {
                point.push(selected[d].0[idx[d]]);
                weight *= selected[d].1[idx[d]];
            }
            candidates.push((point, weight));
            for d in (0..dim).rev() {
                idx[d] += 1;
                if idx[d] < selected[d].0.len() {
                    break;
                }
                idx[d] = 0;
            }
        }
    }

    let (points, raw_weights) = merge_points(candidates);
    let scale = 2f64.powi(dim as i32);
    let mut kept_points: Vec<Vec<f64>> = Vec::with_capacity(points.len());
    let mut kept_weights: Vec<f64> = Vec::with_capacity(points.len());
    for (p, w) in points.into_iter().zip(raw_weights) {
        if w.abs() > EPS_WEIGHT {
            kept_points.push(p);
            kept_weights.push(w / scale);
        }
    }

    let mut coords_norm = Array2::zeros((kept_points.len(), dim));
    for (i, p) in kept_points.iter().enumerate() {
        for d in 0..dim {
            coords_norm[[i, d]] = p[d];
        }
    }
    stretch_unbounded(&mut coords_norm, params, &config.rules);
    GridPoints::from_norm(params, coords_norm, Some(Array1::from_vec(kept_weights)))
}
