//! Special functions shared by every distribution.
//!
//! Everything here is a total function over its argument type: no validation,
//! no errors. Out-of-domain inputs follow IEEE semantics (`inf`/`NaN`).

use std::f64::consts::{E, PI, SQRT_2};

/// Lanczos parameter `g`.
const LANCZOS_G: f64 = 7.0;

/// Lanczos coefficients for `g = 7`, `n = 9`.
#[allow(clippy::excessive_precision, clippy::unreadable_literal)]
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.99999999999980993,
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];

/// Arguments above this switch the gamma function to Stirling's formula.
const STIRLING_THRESHOLD: f64 = 170.0;

/// `n!` as a floating-point number.
///
/// Returns `1` for `n <= 1`. There is no overflow guard: `n > 170` yields `inf`.
///
/// # Examples
///
/// ```
/// use probscope_core::math::factorial;
/// assert_eq!(factorial(0), 1.0);
/// assert_eq!(factorial(5), 120.0);
/// assert!(factorial(200).is_infinite());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn factorial(n: u64) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * i as f64)
}

/// Binomial coefficient `C(n, k)`.
///
/// Uses the multiplicative formula `∏_{i=1}^{k} (n - i + 1) / i` so that no
/// intermediate factorial overflows; `k` is first reflected to `min(k, n - k)`.
///
/// # Examples
///
/// ```
/// use probscope_core::math::combination;
/// assert_eq!(combination(5, 2), 10.0);
/// assert_eq!(combination(3, 4), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn combination(n: u64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    if k == 0 || k == n {
        return 1.0;
    }
    let k = k.min(n - k);
    (1..=k).fold(1.0, |acc, i| acc * (n - i + 1) as f64 / i as f64)
}

/// Gamma function `Γ(x)`.
///
/// - `x > 170`: Stirling's approximation `√(2π/x)·(x/e)^x`.
/// - `x < 0.5`: reflection formula `π / (sin(πx)·Γ(1 - x))`.
/// - otherwise: Lanczos approximation (`g = 7`, 9 coefficients), accurate to
///   at least 10 significant digits.
///
/// # Examples
///
/// ```
/// use probscope_core::math::gamma;
/// assert!((gamma(5.0) - 24.0).abs() < 1e-9);
/// assert!((gamma(0.5) - std::f64::consts::PI.sqrt()).abs() < 1e-10);
/// ```
#[must_use]
pub fn gamma(x: f64) -> f64 {
    if x > STIRLING_THRESHOLD {
        return (2.0 * PI / x).sqrt() * (x / E).powf(x);
    }
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    let (series, t) = lanczos_series(x - 1.0);
    // Split t^(x - 0.5) in two halves so the power does not overflow before e^-t is applied.
    let half_power = t.powf((x - 0.5) / 2.0);
    (2.0 * PI).sqrt() * half_power * ((-t).exp() * half_power) * series
}

/// Natural logarithm of `|Γ(x)|`.
///
/// Stays finite where [`gamma`] overflows, which keeps Gamma and Beta
/// densities usable for large shape parameters.
///
/// # Examples
///
/// ```
/// use probscope_core::math::ln_gamma;
/// assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
/// assert!(ln_gamma(500.0).is_finite());
/// ```
#[must_use]
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        return (PI / (PI * x).sin()).abs().ln() - ln_gamma(1.0 - x);
    }
    let (series, t) = lanczos_series(x - 1.0);
    0.5 * (2.0 * PI).ln() + (x - 0.5) * t.ln() - t + series.ln()
}

/// Lanczos partial-fraction sum and `t = z + g + 0.5` for `z = x - 1`.
#[expect(clippy::cast_precision_loss)]
fn lanczos_series(z: f64) -> (f64, f64) {
    let series = LANCZOS_COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, &c)| acc + c / (z + i as f64));
    (series, z + LANCZOS_G + 0.5)
}

/// Beta function `B(a, b) = Γ(a)Γ(b) / Γ(a + b)`, computed in log space.
#[must_use]
pub fn beta_fn(a: f64, b: f64) -> f64 {
    ln_beta(a, b).exp()
}

/// `ln B(a, b)`.
#[must_use]
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Error function, Abramowitz & Stegun formula 7.1.26.
///
/// Maximum absolute error ≈ 1.5 × 10⁻⁷. Odd symmetry `erf(-x) = -erf(x)` is
/// exact because the approximation is evaluated on `|x|` and the sign is
/// reapplied.
///
/// # Examples
///
/// ```
/// use probscope_core::math::erf;
/// assert!(erf(0.0).abs() < 1e-8);
/// assert!(erf(6.0) > 0.999_999);
/// assert_eq!(erf(-0.7), -erf(0.7));
/// ```
#[allow(clippy::unreadable_literal)]
#[must_use]
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal cumulative distribution function `Φ(x) = (1 + erf(x/√2)) / 2`.
///
/// # Examples
///
/// ```
/// use probscope_core::math::normal_cdf;
/// assert!((normal_cdf(0.0) - 0.5).abs() < 1e-8);
/// assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
/// ```
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal density `φ(x)`.
#[must_use]
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Inverse of [`normal_cdf`]: returns `z` with `Φ(z) = p`.
///
/// Starts from the Abramowitz & Stegun 26.2.23 rational approximation and
/// polishes it with Newton steps against [`normal_cdf`], so the result is
/// consistent with the CDF used everywhere else in this crate.
///
/// Returns `-inf`/`inf` for `p = 0`/`p = 1` and `NaN` outside `[0, 1]`.
///
/// # Examples
///
/// ```
/// use probscope_core::math::normal_quantile;
/// assert!((normal_quantile(0.975) - 1.96).abs() < 1e-3);
/// assert!(normal_quantile(0.5).abs() < 1e-6);
/// ```
#[allow(clippy::unreadable_literal)]
#[must_use]
pub fn normal_quantile(p: f64) -> f64 {
    const C0: f64 = 2.515517;
    const C1: f64 = 0.802853;
    const C2: f64 = 0.010328;
    const D1: f64 = 1.432788;
    const D2: f64 = 0.189269;
    const D3: f64 = 0.001308;
    const NEWTON_STEPS: usize = 4;

    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let (q, sign) = if p > 0.5 { (1.0 - p, 1.0) } else { (p, -1.0) };
    let t = (-2.0 * q.ln()).sqrt();
    let mut z = sign
        * (t - (C0 + C1 * t + C2 * t * t) / (1.0 + D1 * t + D2 * t * t + D3 * t * t * t));

    for _ in 0..NEWTON_STEPS {
        let density = normal_pdf(z);
        if density < f64::MIN_POSITIVE {
            break;
        }
        z -= (normal_cdf(z) - p) / density;
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial_small_values() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(1), 1.0);
        assert_eq!(factorial(5), 120.0);
        assert_eq!(factorial(10), 3_628_800.0);
    }

    #[test]
    fn test_factorial_overflows_to_infinity() {
        assert!(factorial(170).is_finite());
        assert!(factorial(171).is_infinite());
    }

    #[test]
    fn test_combination_edges() {
        for n in 0..=30 {
            assert_eq!(combination(n, 0), 1.0);
            assert_eq!(combination(n, n), 1.0);
            assert_eq!(combination(n, n + 1), 0.0);
        }
    }

    #[test]
    fn test_combination_symmetry() {
        for n in 0..=60 {
            for k in 0..=n {
                let a = combination(n, k);
                let b = combination(n, n - k);
                assert!((a - b).abs() <= a * 1e-12, "C({n},{k})={a} vs {b}");
            }
        }
    }

    #[test]
    fn test_combination_large_n_is_finite() {
        let c = combination(200, 100);
        assert!(c.is_finite());
        // C(200, 100) ≈ 9.054851465610328e58
        assert!((c / 9.054_851_465_610_328e58 - 1.0).abs() < 1e-10);
        assert_eq!(combination(200, 1), 200.0);
    }

    #[test]
    fn test_gamma_matches_factorial() {
        for n in 0..=20_u64 {
            #[expect(clippy::cast_precision_loss)]
            let g = gamma(n as f64 + 1.0);
            let f = factorial(n);
            assert!(((g - f) / f).abs() < 1e-9, "Γ({})={g} vs {n}!={f}", n + 1);
        }
    }

    #[test]
    fn test_gamma_reflection_and_half_integers() {
        assert!((gamma(0.5) - PI.sqrt()).abs() < 1e-10);
        assert!((gamma(0.25) - 3.625_609_908_221_908).abs() < 1e-9);
        // Γ(-0.5) = -2√π
        assert!((gamma(-0.5) + 2.0 * PI.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_gamma_stirling_branch() {
        assert!(gamma(171.5).is_infinite() || gamma(171.5) > 1e300);
        assert!(ln_gamma(171.5).is_finite());
    }

    #[test]
    fn test_gamma_finite_up_to_threshold() {
        let g = gamma(170.0);
        assert!(g.is_finite());
        assert!((g / factorial(169) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ln_gamma_consistent_with_gamma() {
        for x in [0.1, 0.7, 1.0, 2.5, 7.3, 30.0, 100.0] {
            assert!((ln_gamma(x) - gamma(x).ln()).abs() < 1e-9, "x={x}");
        }
    }

    #[test]
    fn test_beta_function() {
        assert!((beta_fn(1.0, 1.0) - 1.0).abs() < 1e-12);
        // B(2, 3) = 1/12
        assert!((beta_fn(2.0, 3.0) - 1.0 / 12.0).abs() < 1e-12);
        assert!((ln_beta(2.0, 3.0) + 12.0_f64.ln()).abs() < 1e-10);
    }

    #[test]
    fn test_erf_properties() {
        assert!(erf(0.0).abs() < 1e-8);
        for x in [0.1, 0.5, 1.0, 2.0, 3.5] {
            assert_eq!(erf(-x), -erf(x));
        }
        assert!(erf(6.0) > 0.999_999);
        assert!(erf(-6.0) < -0.999_999);
        // erf(1) = 0.8427007929...
        assert!((erf(1.0) - 0.842_700_792_9).abs() < 2e-7);
    }

    #[test]
    fn test_normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-8);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
        assert!((normal_cdf(-1.96) - 0.025).abs() < 1e-3);
        assert!((normal_cdf(1.0) + normal_cdf(-1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normal_quantile_inverts_cdf() {
        for p in [0.001, 0.025, 0.05, 0.3, 0.5, 0.8, 0.95, 0.975, 0.999] {
            let z = normal_quantile(p);
            assert!((normal_cdf(z) - p).abs() < 1e-9, "p={p}, z={z}");
        }
        assert!((normal_quantile(0.95) - 1.645).abs() < 1e-3);
    }

    #[test]
    fn test_normal_quantile_edges() {
        assert_eq!(normal_quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(normal_quantile(1.0), f64::INFINITY);
        assert!(normal_quantile(-0.1).is_nan());
        assert!(normal_quantile(f64::NAN).is_nan());
    }
}
