// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Property-Based Tests (proptest) for chaos-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for chaos-math using proptest.
//!
//! Covers: quadrature normalization and exactness, polynomial
//! orthogonality under the matching rule, multi-index set invariants.

use chaos_math::multi_index::{multi_indices_max_order, new_indices_for_order, q_norm};
use chaos_math::poly::jacobi_eval;
use chaos_math::quadrature::{clenshaw_curtis_1d, hermite_1d, jacobi_1d};
use proptest::prelude::*;
use std::collections::HashSet;

fn binomial(n: usize, k: usize) -> usize {
    let mut r = 1usize;
    for i in 0..k {
        r = r * (n - i) / (i + 1);
    }
    r
}

proptest! {
    /// Gauss-Jacobi weights sum to 2 for any admissible exponents, and the
    /// knots stay inside the open canonical interval.
    #[test]
    fn jacobi_rule_normalized(n in 1usize..12, p in 0.0f64..4.0, q in 0.0f64..4.0) {
        let (knots, weights) = jacobi_1d(n, p, q).unwrap();
        prop_assert!((weights.sum() - 2.0).abs() < 1e-9);
        prop_assert!(knots.iter().all(|x| x.abs() < 1.0));
    }

    /// The Legendre special case integrates x^2 exactly from two knots up.
    #[test]
    fn legendre_rule_exact_for_x2(n in 2usize..10) {
        let (knots, weights) = jacobi_1d(n, 0.0, 0.0).unwrap();
        let e_x2: f64 = knots.iter().zip(&weights).map(|(x, w)| w * x * x).sum();
        prop_assert!((e_x2 - 2.0 / 3.0).abs() < 1e-10);
    }

    /// Gauss-Hermite rules are normalized to weight sum 2 and symmetric
    /// about the origin.
    #[test]
    fn hermite_rule_normalized_and_symmetric(n in 1usize..12) {
        let (knots, weights) = hermite_1d(n).unwrap();
        prop_assert!((weights.sum() - 2.0).abs() < 1e-10);
        let mean: f64 = knots.iter().zip(&weights).map(|(x, w)| w * x).sum();
        prop_assert!(mean.abs() < 1e-8);
    }

    /// Clenshaw-Curtis weights are positive, sum to 2, and the knots cover
    /// the closed canonical interval.
    #[test]
    fn clenshaw_curtis_normalized(n in 1usize..33) {
        let (knots, weights) = clenshaw_curtis_1d(n).unwrap();
        prop_assert!((weights.sum() - 2.0).abs() < 1e-10);
        prop_assert!(weights.iter().all(|w| *w > 0.0));
        prop_assert!(knots.iter().all(|x| x.abs() <= 1.0 + 1e-15));
    }

    /// Distinct Legendre polynomials are orthogonal under a Gauss rule that
    /// resolves both degrees.
    #[test]
    fn legendre_pair_orthogonal(a in 0usize..5, b in 0usize..5) {
        prop_assume!(a != b);
        let (knots, weights) = jacobi_1d(8, 0.0, 0.0).unwrap();
        let inner: f64 = knots
            .iter()
            .zip(&weights)
            .map(|(x, w)| w * jacobi_eval(a, 0.0, 0.0, *x) * jacobi_eval(b, 0.0, 0.0, *x))
            .sum();
        prop_assert!(inner.abs() < 1e-9);
    }

    /// The full simplex has exactly C(order + dim, dim) indices and every
    /// index respects the total-degree bound.
    #[test]
    fn simplex_count_and_bound(dim in 1usize..5, order in 0usize..7) {
        let set = multi_indices_max_order(dim, order, 1.0);
        prop_assert_eq!(set.len(), binomial(order + dim, dim));
        prop_assert!(set.iter().all(|idx| idx.iter().sum::<usize>() <= order));
    }

    /// A q-norm below one thins the simplex to a subset, keeps the pure
    /// axis terms, and every survivor satisfies the q-norm bound.
    #[test]
    fn qnorm_thins_to_subset(dim in 2usize..5, order in 1usize..5, q in 0.3f64..1.0) {
        let full = multi_indices_max_order(dim, order, 1.0);
        let thin = multi_indices_max_order(dim, order, q);
        let full_set: HashSet<_> = full.iter().collect();
        prop_assert!(thin.iter().all(|idx| full_set.contains(idx)));
        prop_assert!(thin
            .iter()
            .all(|idx| q_norm(idx, q) <= order as f64 + 1e-6));
        let mut axis = vec![0usize; dim];
        axis[0] = order;
        prop_assert!(thin.iter().any(|idx| idx == &axis));
    }

    /// Growing the order by one adds exactly the new shell: disjoint from
    /// the existing set, and their union is the larger simplex.
    #[test]
    fn order_growth_partitions(dim in 1usize..4, order in 1usize..5) {
        let prev = multi_indices_max_order(dim, order - 1, 1.0);
        let next = multi_indices_max_order(dim, order, 1.0);
        let added = new_indices_for_order(dim, order, 1.0, &prev);

        let prev_set: HashSet<_> = prev.iter().cloned().collect();
        let added_set: HashSet<_> = added.iter().cloned().collect();
        prop_assert!(prev_set.is_disjoint(&added_set));
        let union: HashSet<_> = prev_set.union(&added_set).cloned().collect();
        let next_set: HashSet<_> = next.into_iter().collect();
        prop_assert_eq!(union, next_set);
    }
}
