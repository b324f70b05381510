use serde::Serialize;

use super::{Continuous, Distribution, normal::standard_normal};
use crate::{
    error::{InvalidParameterError, Result, check_positive},
    math::ln_gamma,
    moments::Moments,
    random::{Attempts, RandomSource, SamplingPolicy},
};

/// Gamma distribution with shape `α` and rate `β` (mean `α/β`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gamma {
    shape: f64,
    rate: f64,
}

impl Gamma {
    pub fn new(shape: f64, rate: f64) -> Result<Self, InvalidParameterError> {
        Ok(Self {
            shape: check_positive("shape", shape)?,
            rate: check_positive("rate", rate)?,
        })
    }

    #[must_use]
    pub fn shape(&self) -> f64 {
        self.shape
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// A `Gamma(shape, 1)` variate.
pub(crate) fn standard_gamma<R>(shape: f64, rng: &mut R, attempts: &mut Attempts) -> Result<f64>
where
    R: RandomSource + ?Sized,
{
    Ok(ln_standard_gamma(shape, rng, attempts)?.exp())
}

/// The logarithm of a `Gamma(shape, 1)` variate.
///
/// Marsaglia–Tsang squeeze for `shape ≥ 1`. Smaller shapes draw from
/// `Gamma(shape + 1)` and add `ln(U) / shape`, which stays finite where
/// `U^{1/shape}` would underflow to zero.
pub(crate) fn ln_standard_gamma<R>(
    shape: f64,
    rng: &mut R,
    attempts: &mut Attempts,
) -> Result<f64>
where
    R: RandomSource + ?Sized,
{
    if shape < 1.0 {
        let boosted = ln_standard_gamma(shape + 1.0, rng, attempts)?;
        let u = attempts.nonzero_uniform(rng)?;
        return Ok(boosted + u.ln() / shape);
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        attempts.tick()?;
        let x = standard_normal(rng, attempts)?;
        let v = 1.0 + c * x;
        if v <= 0.0 {
            continue;
        }
        let v = v * v * v;
        let u = rng.next_uniform();
        let x2 = x * x;
        if u < 1.0 - 0.0331 * x2 * x2 {
            return Ok((d * v).ln());
        }
        if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
            return Ok((d * v).ln());
        }
    }
}

impl Distribution for Gamma {
    type Sample = f64;

    fn sample_with<R>(&self, rng: &mut R, policy: SamplingPolicy) -> Result<f64>
    where
        R: RandomSource + ?Sized,
    {
        let mut attempts = policy.attempts("gamma");
        Ok(standard_gamma(self.shape, rng, &mut attempts)? / self.rate)
    }
}

impl Continuous for Gamma {
    fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        self.ln_pdf(x).exp()
    }

    fn ln_pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let Self { shape, rate } = *self;
        shape * rate.ln() - ln_gamma(shape) + (shape - 1.0) * x.ln() - rate * x
    }

    fn moments(&self) -> Moments {
        let Self { shape, rate } = *self;
        let mode = (shape >= 1.0).then(|| (shape - 1.0) / rate);
        Moments::new(shape / rate, shape / (rate * rate)).with_mode(mode)
    }
}
