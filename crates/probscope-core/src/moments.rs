//! Analytic summary statistics.
//!
//! | family | mean | variance | mode | median |
//! |---|---|---|---|---|
//! | Bernoulli(p) | `p` | `p(1-p)` | `0`/`1` (none at `p = 0.5`) | `0`/`1`/`0.5` |
//! | Binomial(n, p) | `np` | `np(1-p)` | `min(⌊(n+1)p⌋, n)` | `round(np)` |
//! | Poisson(λ) | `λ` | `λ` | `⌊λ⌋` | `⌊λ + 1/3 - 0.02/λ⌋` |
//! | Normal(μ, σ) | `μ` | `σ²` | `μ` | `μ` |
//! | Exponential(λ) | `1/λ` | `1/λ²` | `0` | `ln 2 / λ` |
//! | Uniform(a, b) | `(a+b)/2` | `(b-a)²/12` | – | `(a+b)/2` |
//! | Geometric(p) | `1/p` | `(1-p)/p²` | `1` | `⌈-1/log₂(1-p)⌉` |
//! | Gamma(α, β) | `α/β` | `α/β²` | `(α-1)/β` for `α ≥ 1` | – |
//! | Beta(α, β) | `α/(α+β)` | `αβ/((α+β)²(α+β+1))` | `(α-1)/(α+β-2)` for `α, β > 1` | – |
//! | Laplace(μ, b) | `μ` | `2b²` | `μ` | `μ` |
//!
//! The Binomial and Poisson medians are the standard closed-form
//! approximations; every other entry is exact.

use serde::Serialize;

/// Closed-form moments of a univariate distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// `None` when the mode is not unique or the density is unbounded.
    pub mode: Option<f64>,
    /// `None` when no closed form exists.
    pub median: Option<f64>,
}

impl Moments {
    /// Moments with the given mean and variance; mode and median left unset.
    #[must_use]
    pub fn new(mean: f64, variance: f64) -> Self {
        Self {
            mean,
            variance,
            std_dev: variance.sqrt(),
            mode: None,
            median: None,
        }
    }

    #[must_use]
    pub fn with_mode(self, mode: impl Into<Option<f64>>) -> Self {
        Self {
            mode: mode.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_median(self, median: impl Into<Option<f64>>) -> Self {
        Self {
            median: median.into(),
            ..self
        }
    }
}

/// Per-category moments of a multinomial distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultinomialMoments {
    /// Expected count `n·pᵢ` of each category.
    pub means: Vec<f64>,
    /// Count variance `n·pᵢ(1 - pᵢ)` of each category.
    pub variances: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev_is_sqrt_of_variance() {
        let moments = Moments::new(1.0, 4.0);
        assert_eq!(moments.std_dev, 2.0);
        assert_eq!(moments.mode, None);
        assert_eq!(moments.median, None);
    }

    #[test]
    fn test_builders() {
        let moments = Moments::new(0.0, 1.0).with_mode(0.0).with_median(None);
        assert_eq!(moments.mode, Some(0.0));
        assert_eq!(moments.median, None);
    }
}
