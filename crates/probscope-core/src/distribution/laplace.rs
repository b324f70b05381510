use serde::Serialize;

use super::{Continuous, Distribution};
use crate::{
    error::{InvalidParameterError, Result, check_finite, check_positive},
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

/// Double-exponential distribution with location `mu` and scale `b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Laplace {
    mu: f64,
    b: f64,
}

impl Laplace {
    pub fn new(mu: f64, b: f64) -> Result<Self, InvalidParameterError> {
        Ok(Self {
            mu: check_finite("mu", mu)?,
            b: check_positive("b", b)?,
        })
    }

    #[must_use]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    #[must_use]
    pub fn b(&self) -> f64 {
        self.b
    }

    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        let scaled = (x - self.mu) / self.b;
        if x < self.mu {
            0.5 * scaled.exp()
        } else {
            1.0 - 0.5 * (-scaled).exp()
        }
    }
}

impl Distribution for Laplace {
    type Sample = f64;

    /// Inverse-CDF draw; `U = 0` would give `ln 0`, so it is redrawn.
    fn sample_with<R>(&self, rng: &mut R, policy: SamplingPolicy) -> Result<f64>
    where
        R: RandomSource + ?Sized,
    {
        let mut attempts = policy.attempts("laplace");
        let u = attempts.nonzero_uniform(rng)? - 0.5;
        Ok(self.mu - self.b * u.signum() * (1.0 - 2.0 * u.abs()).ln())
    }
}

impl Continuous for Laplace {
    fn pdf(&self, x: f64) -> f64 {
        (-(x - self.mu).abs() / self.b).exp() / (2.0 * self.b)
    }

    fn ln_pdf(&self, x: f64) -> f64 {
        -(x - self.mu).abs() / self.b - (2.0 * self.b).ln()
    }

    fn moments(&self) -> Moments {
        Moments::new(self.mu, 2.0 * self.b * self.b)
            .with_mode(self.mu)
            .with_median(self.mu)
    }
}
