use serde::Serialize;

use super::{Continuous, Distribution};
use crate::{
    error::{InvalidParameterError, Result, check_finite},
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

/// Continuous uniform distribution on `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Uniform {
    min: f64,
    max: f64,
}

impl Uniform {
    pub fn new(min: f64, max: f64) -> Result<Self, InvalidParameterError> {
        let min = check_finite("min", min)?;
        let max = check_finite("max", max)?;
        if min >= max {
            return Err(InvalidParameterError::EmptyRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        ((x - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

impl Distribution for Uniform {
    type Sample = f64;

    fn sample_with<R>(&self, rng: &mut R, _policy: SamplingPolicy) -> Result<f64>
    where
        R: RandomSource + ?Sized,
    {
        Ok(self.min + rng.next_uniform() * (self.max - self.min))
    }
}

impl Continuous for Uniform {
    fn pdf(&self, x: f64) -> f64 {
        if (self.min..=self.max).contains(&x) {
            1.0 / (self.max - self.min)
        } else {
            0.0
        }
    }

    fn moments(&self) -> Moments {
        let width = self.max - self.min;
        let mid = f64::midpoint(self.min, self.max);
        Moments::new(mid, width * width / 12.0).with_median(mid)
    }
}
