use std::f64::consts::{PI, TAU};

use serde::Serialize;

use super::{Continuous, Distribution};
use crate::{
    error::{InvalidParameterError, Result, check_finite, check_positive},
    math::{normal_cdf, normal_pdf},
    moments::Moments,
    random::{Attempts, RandomSource, SamplingPolicy},
};

/// Gaussian distribution with mean `mean` and standard deviation `std_dev`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normal {
    mean: f64,
    std_dev: f64,
}

impl Normal {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, InvalidParameterError> {
        Ok(Self {
            mean: check_finite("mean", mean)?,
            std_dev: check_positive("std_dev", std_dev)?,
        })
    }

    #[must_use]
    pub fn standard() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        normal_cdf((x - self.mean) / self.std_dev)
    }
}

/// One standard normal variate by Box–Muller, redrawing zero uniforms.
pub(crate) fn standard_normal<R>(rng: &mut R, attempts: &mut Attempts) -> Result<f64>
where
    R: RandomSource + ?Sized,
{
    let u = attempts.nonzero_uniform(rng)?;
    let v = attempts.nonzero_uniform(rng)?;
    Ok((-2.0 * u.ln()).sqrt() * (TAU * v).cos())
}

impl Distribution for Normal {
    type Sample = f64;

    fn sample_with<R>(&self, rng: &mut R, policy: SamplingPolicy) -> Result<f64>
    where
        R: RandomSource + ?Sized,
    {
        let mut attempts = policy.attempts("normal");
        let z = standard_normal(rng, &mut attempts)?;
        Ok(self.mean + self.std_dev * z)
    }
}

impl Continuous for Normal {
    fn pdf(&self, x: f64) -> f64 {
        normal_pdf((x - self.mean) / self.std_dev) / self.std_dev
    }

    fn ln_pdf(&self, x: f64) -> f64 {
        let variance = self.std_dev * self.std_dev;
        let diff = x - self.mean;
        -0.5 * (2.0 * PI * variance).ln() - diff * diff / (2.0 * variance)
    }

    fn moments(&self) -> Moments {
        Moments::new(self.mean, self.std_dev * self.std_dev)
            .with_mode(self.mean)
            .with_median(self.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{distribution::test_util, random::FnSource};

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(Normal::new(0.0, 0.0).is_err());
        assert!(Normal::new(0.0, -1.0).is_err());
        assert!(Normal::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_pdf_and_ln_pdf_agree() {
        let dist = Normal::new(2.0, 1.5).unwrap();
        for x in [-3.0, 0.0, 2.0, 4.5, 10.0] {
            assert!((dist.pdf(x).ln() - dist.ln_pdf(x)).abs() < 1e-9);
        }
        assert!((dist.pdf(2.0) - 1.0 / (1.5 * TAU.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_cdf() {
        let dist = Normal::new(10.0, 2.0).unwrap();
        assert!((dist.cdf(10.0) - 0.5).abs() < 1e-9);
        assert!((dist.cdf(10.0 + 1.96 * 2.0) - 0.975).abs() < 1e-3);
    }

    #[test]
    fn test_box_muller_redraws_zero() {
        let mut draws = [0.0, 0.5, 0.0, 0.25].into_iter();
        let mut source = FnSource::new(move || draws.next().unwrap_or(0.5));
        let z = Normal::standard().sample(&mut source).unwrap();
        // u = 0.5, v = 0.25: cos(π/2) = 0
        assert!(z.abs() < 1e-12);
    }

    #[test]
    fn test_sample_moments_converge() {
        let dist = Normal::new(2.0, 1.5).unwrap();
        let mut rng = test_util::rng(99);
        let draws = dist.sample_n(&mut rng, 50_000).unwrap();
        let stats = probscope_stats::descriptive::DescriptiveStats::new(draws).unwrap();
        assert!((stats.mean - 2.0).abs() < 0.05);
        assert!((stats.std_dev - 1.5).abs() < 0.05);
    }
}
