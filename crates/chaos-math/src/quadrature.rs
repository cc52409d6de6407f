// ─────────────────────────────────────────────────────────────────────
// SCPN Chaos Core — Quadrature Rules
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 1-D quadrature knot/weight generators.
//!
//! Every rule returns knots sorted ascending and weights summing to 2, the
//! measure of the canonical [-1, 1] domain (Hermite rules are renormalized
//! to the same convention). Gauss rules (Jacobi, Hermite) are computed by
//! eigendecomposition of the symmetric tridiagonal recurrence matrix; the
//! nested families (Clenshaw-Curtis, Fejer 1/2) use direct cosine sums and
//! Gauss-Patterson comes from its fixed table.

use chaos_types::error::{ChaosError, ChaosResult};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

use crate::linalg::eig_sym;

/// Gauss-Jacobi rule for the weight (1-x)^q (1+x)^p on [-1, 1].
/// A Beta(a, b) input on the canonical domain therefore takes p = a - 1,
/// q = b - 1.
///
/// Knots are the eigenvalues of the tridiagonal companion matrix of the
/// Jacobi recurrence; weights follow from the first eigenvector components,
/// w_i = 2 v_0i^2. The eigenproblem is numerically sensitive for larger n
/// and uneven (p, q), which is why it goes through the general symmetric
/// eigensolver rather than a closed form.
pub fn jacobi_1d(n: usize, p: f64, q: f64) -> ChaosResult<(Array1<f64>, Array1<f64>)> {
    if n == 0 {
        return Err(ChaosError::ConfigError(
            "quadrature rule requires at least one knot".to_string(),
        ));
    }

    let mut companion = Array2::zeros((n, n));
    companion[[0, 0]] = (p - q) / (2.0 + q + p);
    for k in 1..n {
        let kf = k as f64;
        companion[[k, k]] =
            ((p - q) * (q + p)) / ((2.0 * kf + q + p) * (2.0 * kf + 2.0 + q + p));
        let off = ((4.0 * kf * (kf + q) * (kf + p) * (kf + q + p))
            / ((2.0 * kf - 1.0 + q + p)
                * (2.0 * kf + q + p).powi(2)
                * (2.0 * kf + 1.0 + q + p)))
            .sqrt();
        companion[[k - 1, k]] = off;
        companion[[k, k - 1]] = off;
    }

    let (values, vectors) = eig_sym(&companion)?;
    let mut weights = Array1::zeros(n);
    for i in 0..n {
        weights[i] = 2.0 * vectors[[0, i]] * vectors[[0, i]];
    }

    Ok((values, weights))
}

/// Gauss-Hermite rule (probabilists' convention, standard normal weight).
///
/// Companion matrix has zero diagonal and off-diagonal sqrt(k). Weights are
/// explicitly renormalized to sum to exactly 2.
pub fn hermite_1d(n: usize) -> ChaosResult<(Array1<f64>, Array1<f64>)> {
    if n == 0 {
        return Err(ChaosError::ConfigError(
            "quadrature rule requires at least one knot".to_string(),
        ));
    }

    let mut companion = Array2::zeros((n, n));
    for k in 1..n {
        let off = (k as f64).sqrt();
        companion[[k - 1, k]] = off;
        companion[[k, k - 1]] = off;
    }

    let (values, vectors) = eig_sym(&companion)?;
    let mut weights = Array1::zeros(n);
    for i in 0..n {
        weights[i] = vectors[[0, i]] * vectors[[0, i]];
    }
    let total: f64 = weights.sum();
    weights.mapv_inplace(|w| 2.0 * w / total);

    Ok((values, weights))
}

/// Clenshaw-Curtis rule (nested, includes the endpoints for n > 1).
pub fn clenshaw_curtis_1d(n: usize) -> ChaosResult<(Array1<f64>, Array1<f64>)> {
    if n == 0 {
        return Err(ChaosError::ConfigError(
            "quadrature rule requires at least one knot".to_string(),
        ));
    }
    if n == 1 {
        return Ok((Array1::zeros(1), Array1::from_elem(1, 2.0)));
    }

    let big_n = n - 1;
    let nf = big_n as f64;
    let mut knots = Array1::zeros(n);
    let mut weights = Array1::zeros(n);

    for i in 0..n {
        let theta = (big_n - i) as f64 * PI / nf;
        knots[i] = theta.cos();

        let mut w = 1.0;
        for j in 1..=(big_n / 2) {
            let b = if 2 * j == big_n { 1.0 } else { 2.0 };
            w -= b * (2.0 * j as f64 * theta).cos() / ((4 * j * j - 1) as f64);
        }
        let c = if i == 0 || i == big_n { 1.0 } else { 2.0 };
        weights[i] = c * w / nf;
    }

    Ok((knots, weights))
}

/// Fejer type 1 rule (midpoint-shifted Chebyshev nodes, no endpoints).
pub fn fejer1_1d(n: usize) -> ChaosResult<(Array1<f64>, Array1<f64>)> {
    if n == 0 {
        return Err(ChaosError::ConfigError(
            "quadrature rule requires at least one knot".to_string(),
        ));
    }

    let nf = n as f64;
    let mut knots = Array1::zeros(n);
    let mut weights = Array1::zeros(n);

    for i in 0..n {
        let theta = (2 * n - 1 - 2 * i) as f64 * PI / (2.0 * nf);
        knots[i] = theta.cos();

        let mut w = 1.0;
        for j in 1..=(n / 2) {
            w -= 2.0 * (2.0 * j as f64 * theta).cos() / ((4 * j * j - 1) as f64);
        }
        weights[i] = 2.0 * w / nf;
    }

    Ok((knots, weights))
}

/// Fejer type 2 rule (Clenshaw-Curtis without the boundary nodes).
pub fn fejer2_1d(n: usize) -> ChaosResult<(Array1<f64>, Array1<f64>)> {
    if n == 0 {
        return Err(ChaosError::ConfigError(
            "quadrature rule requires at least one knot".to_string(),
        ));
    }
    if n == 1 {
        return Ok((Array1::zeros(1), Array1::from_elem(1, 2.0)));
    }
    if n == 2 {
        return Ok((
            Array1::from_vec(vec![-0.5, 0.5]),
            Array1::from_vec(vec![1.0, 1.0]),
        ));
    }

    let nf = n as f64;
    let p = (2 * ((n + 1) / 2) - 1) as f64;
    let mut knots = Array1::zeros(n);
    let mut weights = Array1::zeros(n);

    for i in 0..n {
        let theta = (n - i) as f64 * PI / (nf + 1.0);
        knots[i] = theta.cos();

        let mut w = 1.0;
        for j in 1..=((n - 1) / 2) {
            w -= 2.0 * (2.0 * j as f64 * theta).cos() / ((4 * j * j - 1) as f64);
        }
        w -= ((p + 1.0) * theta).cos() / p;
        weights[i] = 2.0 * w / (nf + 1.0);
    }

    Ok((knots, weights))
}

/// Nested Gauss-Patterson rule, valid only for n in {1, 3, 7, 15, 31}.
/// Any other node count is a fatal configuration error.
pub fn patterson_1d(n: usize) -> ChaosResult<(Array1<f64>, Array1<f64>)> {
    // Non-negative halves of the symmetric knot/weight tables.
    const X3: [f64; 2] = [0.0, 0.774_596_669_241_483_377_04];
    const W3: [f64; 2] = [0.888_888_888_888_888_888_889, 0.555_555_555_555_555_555_556];

    const X7: [f64; 4] = [
        0.0,
        0.434_243_749_346_802_558_00,
        0.774_596_669_241_483_377_04,
        0.960_491_268_708_020_283_42,
    ];
    const W7: [f64; 4] = [
        0.450_916_538_658_474_142_345,
        0.401_397_414_775_962_222_905,
        0.268_488_089_868_333_440_729,
        0.104_656_226_026_467_265_194,
    ];

    const X15: [f64; 8] = [
        0.0,
        0.223_386_686_428_966_881_63,
        0.434_243_749_346_802_558_00,
        0.621_102_946_737_226_402_94,
        0.774_596_669_241_483_377_04,
        0.888_459_232_872_256_998_89,
        0.960_491_268_708_020_283_42,
        0.993_831_963_212_755_022_21,
    ];
    const W15: [f64; 8] = [
        0.225_510_499_798_206_687_386,
        0.219_156_858_401_587_496_404,
        0.200_628_529_376_989_021_034,
        0.171_511_909_136_391_380_787,
        0.134_415_255_243_784_220_360,
        0.092_927_195_315_124_537_685_9,
        0.051_603_282_997_079_739_696_9,
        0.017_001_719_629_940_260_339_0,
    ];

    const X31: [f64; 16] = [
        0.0,
        0.112_488_943_133_186_625_75,
        0.223_386_686_428_966_881_63,
        0.331_135_393_257_976_833_09,
        0.434_243_749_346_802_558_00,
        0.531_319_743_644_375_623_97,
        0.621_102_946_737_226_402_94,
        0.702_496_206_491_527_078_61,
        0.774_596_669_241_483_377_04,
        0.836_725_938_168_868_735_50,
        0.888_459_232_872_256_998_89,
        0.929_654_857_429_740_056_67,
        0.960_491_268_708_020_283_42,
        0.981_531_149_553_740_106_87,
        0.993_831_963_212_755_022_21,
        0.999_098_124_967_667_597_66,
    ];
    const W31: [f64; 16] = [
        0.112_755_256_720_768_691_607,
        0.111_956_873_020_953_456_880,
        0.109_578_421_055_924_638_237,
        0.105_669_893_580_234_809_744,
        0.100_314_278_611_795_578_771,
        0.093_627_109_981_264_473_616_7,
        0.085_755_920_049_990_351_154_2,
        0.076_879_620_499_003_531_042_7,
        0.067_207_754_295_990_703_540_4,
        0.056_979_509_494_123_357_412_2,
        0.046_462_893_261_757_986_541_4,
        0.035_957_103_307_129_322_096_8,
        0.025_807_598_096_176_653_564_6,
        0.016_446_049_854_387_810_933_8,
        0.008_434_565_739_321_106_246_31,
        0.002_544_780_791_561_874_415_40,
    ];

    fn unfold(half_x: &[f64], half_w: &[f64]) -> (Array1<f64>, Array1<f64>) {
        let n = 2 * half_x.len() - 1;
        let mut x = Array1::zeros(n);
        let mut w = Array1::zeros(n);
        let mid = half_x.len() - 1;
        for (k, (&xi, &wi)) in half_x.iter().zip(half_w).enumerate() {
            x[mid + k] = xi;
            x[mid - k] = -xi;
            w[mid + k] = wi;
            w[mid - k] = wi;
        }
        (x, w)
    }

    match n {
        1 => Ok((Array1::zeros(1), Array1::from_elem(1, 2.0))),
        3 => Ok(unfold(&X3, &W3)),
        7 => Ok(unfold(&X7, &W7)),
        15 => Ok(unfold(&X15, &W15)),
        31 => Ok(unfold(&X31, &W31)),
        _ => Err(ChaosError::ConfigError(format!(
            "Gauss-Patterson rule is only tabulated for n in {{1, 3, 7, 15, 31}}, got {n}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sorted_and_normalized(knots: &Array1<f64>, weights: &Array1<f64>) {
        for i in 1..knots.len() {
            assert!(knots[i] > knots[i - 1], "knots not ascending at {i}");
        }
        let total: f64 = weights.sum();
        assert!(
            (total - 2.0).abs() < 1e-10,
            "weights sum to {total}, expected 2"
        );
    }

    fn integrate(knots: &Array1<f64>, weights: &Array1<f64>, f: impl Fn(f64) -> f64) -> f64 {
        knots.iter().zip(weights).map(|(&x, &w)| w * f(x)).sum()
    }

    #[test]
    fn test_all_families_weight_sums() {
        for n in 1..=31 {
            let (k, w) = jacobi_1d(n, 0.0, 0.0).unwrap();
            assert_sorted_and_normalized(&k, &w);
            let (k, w) = jacobi_1d(n, 1.5, 0.5).unwrap();
            assert_sorted_and_normalized(&k, &w);
            let (k, w) = hermite_1d(n).unwrap();
            assert_sorted_and_normalized(&k, &w);
            let (k, w) = clenshaw_curtis_1d(n).unwrap();
            assert_sorted_and_normalized(&k, &w);
            let (k, w) = fejer1_1d(n).unwrap();
            assert_sorted_and_normalized(&k, &w);
            let (k, w) = fejer2_1d(n).unwrap();
            assert_sorted_and_normalized(&k, &w);
        }
        for n in [1, 3, 7, 15, 31] {
            let (k, w) = patterson_1d(n).unwrap();
            assert_sorted_and_normalized(&k, &w);
        }
    }

    #[test]
    fn test_legendre_gauss_exactness() {
        // n-point Gauss-Legendre integrates degree 2n-1 exactly
        let (k, w) = jacobi_1d(3, 0.0, 0.0).unwrap();
        assert!((integrate(&k, &w, |x| x.powi(4)) - 2.0 / 5.0).abs() < 1e-12);
        assert!((integrate(&k, &w, |x| x.powi(5))).abs() < 1e-12);
        let (k, w) = jacobi_1d(5, 0.0, 0.0).unwrap();
        assert!((integrate(&k, &w, |x| x.powi(8)) - 2.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_jacobi_weights_nonnegative() {
        for n in 1..=20 {
            let (_, w) = jacobi_1d(n, 2.0, 3.0).unwrap();
            assert!(w.iter().all(|&x| x > 0.0));
        }
    }

    #[test]
    fn test_hermite_moments() {
        // Against the standard normal measure (weights scaled to 2):
        // E[x^2] = 1, E[x^4] = 3
        let (k, w) = hermite_1d(8).unwrap();
        assert!((integrate(&k, &w, |x| x * x) / 2.0 - 1.0).abs() < 1e-10);
        assert!((integrate(&k, &w, |x| x.powi(4)) / 2.0 - 3.0).abs() < 1e-9);
        // symmetric rule
        assert!((k[0] + k[7]).abs() < 1e-10);
    }

    #[test]
    fn test_clenshaw_curtis_known_weights() {
        // Simpson for n = 3
        let (k, w) = clenshaw_curtis_1d(3).unwrap();
        assert!((k[0] + 1.0).abs() < 1e-14);
        assert!(k[1].abs() < 1e-14);
        assert!((k[2] - 1.0).abs() < 1e-14);
        assert!((w[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((w[1] - 4.0 / 3.0).abs() < 1e-12);
        assert!((w[2] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_clenshaw_curtis_nesting() {
        // Knots of the 5-point rule contain all knots of the 3-point rule
        let (k3, _) = clenshaw_curtis_1d(3).unwrap();
        let (k5, _) = clenshaw_curtis_1d(5).unwrap();
        for &x in k3.iter() {
            assert!(k5.iter().any(|&y| (x - y).abs() < 1e-13));
        }
    }

    #[test]
    fn test_fejer2_small_rules() {
        let (k, w) = fejer2_1d(2).unwrap();
        assert!((k[0] + 0.5).abs() < 1e-14 && (k[1] - 0.5).abs() < 1e-14);
        assert!((w[0] - 1.0).abs() < 1e-14 && (w[1] - 1.0).abs() < 1e-14);

        // n = 3 integrates x^2 exactly
        let (k, w) = fejer2_1d(3).unwrap();
        assert!((integrate(&k, &w, |x| x * x) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_patterson_rejects_untabulated_counts() {
        for n in [0, 2, 5, 8, 16, 32] {
            assert!(matches!(
                patterson_1d(n),
                Err(ChaosError::ConfigError(_))
            ));
        }
    }

    #[test]
    fn test_patterson_nested_in_next_level() {
        let (k7, _) = patterson_1d(7).unwrap();
        let (k15, _) = patterson_1d(15).unwrap();
        for &x in k7.iter() {
            assert!(k15.iter().any(|&y| (x - y).abs() < 1e-14));
        }
    }

    #[test]
    fn test_patterson_exactness() {
        // 3-point Patterson is the 3-point Gauss-Legendre rule
        let (k, w) = patterson_1d(3).unwrap();
        assert!((integrate(&k, &w, |x| x.powi(4)) - 2.0 / 5.0).abs() < 1e-12);
    }
}
