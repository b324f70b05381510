use std::f64::consts::LN_2;

use serde::Serialize;

use super::{Continuous, Distribution};
use crate::{
    error::{InvalidParameterError, Result, check_positive},
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

/// Waiting time between events of a Poisson process with rate `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    pub fn new(rate: f64) -> Result<Self, InvalidParameterError> {
        Ok(Self {
            rate: check_positive("rate", rate)?,
        })
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            1.0 - (-self.rate * x).exp()
        }
    }
}

impl Distribution for Exponential {
    type Sample = f64;

    fn sample_with<R>(&self, rng: &mut R, _policy: SamplingPolicy) -> Result<f64>
    where
        R: RandomSource + ?Sized,
    {
        // 1 - U lies in (0, 1], so the logarithm is finite
        Ok(-(1.0 - rng.next_uniform()).ln() / self.rate)
    }
}

impl Continuous for Exponential {
    fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }

    fn ln_pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            f64::NEG_INFINITY
        } else {
            self.rate.ln() - self.rate * x
        }
    }

    fn moments(&self) -> Moments {
        let rate = self.rate;
        Moments::new(1.0 / rate, 1.0 / (rate * rate))
            .with_mode(0.0)
            .with_median(LN_2 / rate)
    }
}
