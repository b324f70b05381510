use serde::Serialize;

use super::{Discrete, Distribution};
use crate::{
    error::{InvalidParameterError, Result, check_probability},
    math::combination,
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

/// Number of successes in `n` independent trials with success probability `p`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Binomial {
    n: u64,
    p: f64,
}

impl Binomial {
    pub fn new(n: u64, p: f64) -> Result<Self, InvalidParameterError> {
        if n == 0 {
            return Err(InvalidParameterError::TooSmall {
                name: "n",
                min: 1,
                value: n,
            });
        }
        Ok(Self {
            n,
            p: check_probability("p", p)?,
        })
    }

    #[must_use]
    pub fn n(&self) -> u64 {
        self.n
    }

    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Distribution for Binomial {
    type Sample = u64;

    fn sample_with<R>(&self, rng: &mut R, _policy: SamplingPolicy) -> Result<u64>
    where
        R: RandomSource + ?Sized,
    {
        Ok((0..self.n).filter(|_| rng.next_uniform() < self.p).count() as u64)
    }
}

impl Discrete for Binomial {
    #[expect(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    fn pmf(&self, k: i64) -> f64 {
        if k < 0 || k as u64 > self.n {
            return 0.0;
        }
        let k = k as u64;
        let successes = self.p.powf(k as f64);
        let failures = (1.0 - self.p).powf((self.n - k) as f64);
        combination(self.n, k) * successes * failures
    }

    #[expect(clippy::cast_precision_loss)]
    fn moments(&self) -> Moments {
        let n = self.n as f64;
        let p = self.p;
        let mode = ((n + 1.0) * p).floor().min(n);
        Moments::new(n * p, n * p * (1.0 - p))
            .with_mode(mode)
            .with_median((n * p).round())
    }
}
