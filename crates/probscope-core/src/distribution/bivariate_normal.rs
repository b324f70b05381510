use std::f64::consts::TAU;

use serde::Serialize;

use super::{Distribution, normal::standard_normal};
use crate::{
    error::{InvalidParameterError, Result, check_finite, check_positive},
    random::{RandomSource, SamplingPolicy},
};

/// Pair of jointly normal variables with correlation `correlation`.
///
/// # Examples
///
/// ```
/// use probscope_core::distribution::{BivariateNormal, Distribution as _};
/// use rand::SeedableRng as _;
///
/// let dist = BivariateNormal::new(0.0, 0.0, 1.0, 1.0, 0.8).unwrap();
/// let mut rng = rand_pcg::Pcg64::seed_from_u64(5);
/// let (x, y) = dist.sample(&mut rng).unwrap();
/// assert!(x.is_finite() && y.is_finite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BivariateNormal {
    mean_x: f64,
    mean_y: f64,
    std_x: f64,
    std_y: f64,
    correlation: f64,
}

impl BivariateNormal {
    pub fn new(
        mean_x: f64,
        mean_y: f64,
        std_x: f64,
        std_y: f64,
        correlation: f64,
    ) -> Result<Self, InvalidParameterError> {
        if !(-1.0..=1.0).contains(&correlation) {
            return Err(InvalidParameterError::OutOfRange {
                name: "correlation",
                range: "[-1, 1]",
                value: correlation,
            });
        }
        Ok(Self {
            mean_x: check_finite("mean_x", mean_x)?,
            mean_y: check_finite("mean_y", mean_y)?,
            std_x: check_positive("std_x", std_x)?,
            std_y: check_positive("std_y", std_y)?,
            correlation,
        })
    }

    #[must_use]
    pub fn mean_x(&self) -> f64 {
        self.mean_x
    }

    #[must_use]
    pub fn mean_y(&self) -> f64 {
        self.mean_y
    }

    #[must_use]
    pub fn std_x(&self) -> f64 {
        self.std_x
    }

    #[must_use]
    pub fn std_y(&self) -> f64 {
        self.std_y
    }

    #[must_use]
    pub fn correlation(&self) -> f64 {
        self.correlation
    }

    /// Joint density at `(x, y)`; `0` when `|correlation| = 1` (singular).
    #[must_use]
    pub fn pdf(&self, x: f64, y: f64) -> f64 {
        let rho = self.correlation;
        let one_minus_rho2 = 1.0 - rho * rho;
        if one_minus_rho2 <= 0.0 {
            return 0.0;
        }
        let zx = (x - self.mean_x) / self.std_x;
        let zy = (y - self.mean_y) / self.std_y;
        let quad = (zx * zx - 2.0 * rho * zx * zy + zy * zy) / one_minus_rho2;
        (-0.5 * quad).exp() / (TAU * self.std_x * self.std_y * one_minus_rho2.sqrt())
    }
}

impl Distribution for BivariateNormal {
    type Sample = (f64, f64);

    fn sample_with<R>(&self, rng: &mut R, policy: SamplingPolicy) -> Result<(f64, f64)>
    where
        R: RandomSource + ?Sized,
    {
        let mut attempts = policy.attempts("bivariate normal");
        let z1 = standard_normal(rng, &mut attempts)?;
        let z2 = standard_normal(rng, &mut attempts)?;
        let rho = self.correlation;
        let x = self.mean_x + self.std_x * z1;
        let y = self.mean_y + self.std_y * (rho * z1 + (1.0 - rho * rho).sqrt() * z2);
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Continuous as _, Normal, test_util};

    #[test]
    fn test_rejects_invalid_correlation() {
        assert!(BivariateNormal::new(0.0, 0.0, 1.0, 1.0, 1.2).is_err());
        assert!(BivariateNormal::new(0.0, 0.0, 1.0, 1.0, f64::NAN).is_err());
        assert!(BivariateNormal::new(0.0, 0.0, 0.0, 1.0, 0.5).is_err());
    }

    #[test]
    fn test_uncorrelated_pdf_factorizes() {
        let dist = BivariateNormal::new(1.0, -2.0, 2.0, 0.5, 0.0).unwrap();
        let x_marginal = Normal::new(1.0, 2.0).unwrap();
        let y_marginal = Normal::new(-2.0, 0.5).unwrap();
        for (x, y) in [(0.0, 0.0), (1.0, -2.0), (3.0, -1.5)] {
            let expected = x_marginal.pdf(x) * y_marginal.pdf(y);
            assert!((dist.pdf(x, y) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sample_correlation() {
        let dist = BivariateNormal::new(0.0, 0.0, 1.0, 1.0, 0.7).unwrap();
        let mut rng = test_util::rng(41);
        let pairs = dist.sample_n(&mut rng, 50_000).unwrap();
        let n = 50_000.0;
        let mean_xy = pairs.iter().map(|(x, y)| x * y).sum::<f64>() / n;
        let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
        let covariance = mean_xy - mean_x * mean_y;
        assert!((covariance - 0.7).abs() < 0.03, "covariance = {covariance}");
    }

    #[test]
    fn test_perfect_correlation() {
        let dist = BivariateNormal::new(0.0, 0.0, 1.0, 2.0, 1.0).unwrap();
        let mut rng = test_util::rng(43);
        let (x, y) = dist.sample(&mut rng).unwrap();
        assert!((y - 2.0 * x).abs() < 1e-12);
        assert_eq!(dist.pdf(0.0, 0.0), 0.0);
    }
}
