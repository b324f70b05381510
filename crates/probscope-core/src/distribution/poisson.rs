use serde::Serialize;

use super::{Discrete, Distribution};
use crate::{
    error::{InvalidParameterError, Result, check_positive},
    math::{factorial, ln_gamma},
    moments::Moments,
    random::{Attempts, RandomSource, SamplingPolicy},
};

/// Count of events in a fixed interval at average rate `lambda`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    pub fn new(lambda: f64) -> Result<Self, InvalidParameterError> {
        Ok(Self {
            lambda: check_positive("lambda", lambda)?,
        })
    }

    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

/// Rates from which sampling switches from Knuth's product to PTRS.
const PTRS_THRESHOLD: f64 = 10.0;

impl Distribution for Poisson {
    type Sample = u64;

    /// Knuth's method below [`PTRS_THRESHOLD`], Hörmann's transformed
    /// rejection (PTRS) above it. Every loop iteration counts against `policy`.
    fn sample_with<R>(&self, rng: &mut R, policy: SamplingPolicy) -> Result<u64>
    where
        R: RandomSource + ?Sized,
    {
        let mut attempts = policy.attempts("poisson");
        if self.lambda < PTRS_THRESHOLD {
            knuth(self.lambda, rng, &mut attempts)
        } else {
            ptrs(self.lambda, rng, &mut attempts)
        }
    }
}

/// Multiplies uniforms until the product drops to `e^{-λ}`.
fn knuth<R>(lambda: f64, rng: &mut R, attempts: &mut Attempts) -> Result<u64>
where
    R: RandomSource + ?Sized,
{
    let threshold = (-lambda).exp();
    let mut product = 1.0;
    let mut count = 0;
    loop {
        attempts.tick()?;
        count += 1;
        product *= rng.next_uniform();
        if product <= threshold {
            return Ok(count - 1);
        }
    }
}

/// Transformed rejection with squeeze; expected iterations stay near one
/// for any `λ ≥ 10`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ptrs<R>(lambda: f64, rng: &mut R, attempts: &mut Attempts) -> Result<u64>
where
    R: RandomSource + ?Sized,
{
    let ln_lambda = lambda.ln();
    let b = 0.931 + 2.53 * lambda.sqrt();
    let a = -0.059 + 0.02483 * b;
    let inv_alpha = 1.1239 + 1.1328 / (b - 3.4);
    let v_r = 0.9277 - 3.6224 / (b - 2.0);
    loop {
        attempts.tick()?;
        let u = rng.next_uniform() - 0.5;
        let v = rng.next_uniform();
        let us = 0.5 - u.abs();
        let k = ((2.0 * a / us + b) * u + lambda + 0.43).floor();
        if us >= 0.07 && v <= v_r {
            return Ok(k as u64);
        }
        if k < 0.0 || (us < 0.013 && v > us) || v <= 0.0 {
            continue;
        }
        let accept = v.ln() + inv_alpha.ln() - (a / (us * us) + b).ln();
        if accept <= -lambda + k * ln_lambda - ln_gamma(k + 1.0) {
            return Ok(k as u64);
        }
    }
}

impl Discrete for Poisson {
    #[expect(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    fn pmf(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        let kf = k as f64;
        let direct = self.lambda.powf(kf) * (-self.lambda).exp() / factorial(k as u64);
        if direct.is_finite() {
            return direct;
        }
        // λ^k or k! overflowed
        (kf * self.lambda.ln() - self.lambda - ln_gamma(kf + 1.0)).exp()
    }

    fn moments(&self) -> Moments {
        let lambda = self.lambda;
        Moments::new(lambda, lambda)
            .with_mode(lambda.floor())
            .with_median((lambda + 1.0 / 3.0 - 0.02 / lambda).floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{distribution::test_util, error::Error, random::FnSource};

    #[test]
    fn test_rejects_non_positive_rate() {
        assert!(Poisson::new(0.0).is_err());
        assert!(Poisson::new(-2.0).is_err());
    }

    #[test]
    fn test_pmf() {
        let dist = Poisson::new(3.0).unwrap();
        assert!((dist.pmf(0) - (-3.0_f64).exp()).abs() < 1e-15);
        assert!((dist.pmf(2) - 4.5 * (-3.0_f64).exp()).abs() < 1e-12);
        assert_eq!(dist.pmf(-1), 0.0);
        let total = (0..60).map(|k| dist.pmf(k)).sum::<f64>();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pmf_far_tail_is_finite() {
        let dist = Poisson::new(50.0).unwrap();
        let p = dist.pmf(200);
        assert!(p.is_finite());
        assert!((0.0..1e-40).contains(&p));
    }

    #[test]
    fn test_sample_mean_converges() {
        let dist = Poisson::new(4.0).unwrap();
        let mean = test_util::discrete_mean(&dist, 11, 50_000);
        assert!((mean - 4.0).abs() < 0.05, "mean = {mean}");
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_large_rate_mean_and_variance() {
        let dist = Poisson::new(1000.0).unwrap();
        let mut rng = test_util::rng(1);
        let draws = dist.sample_n(&mut rng, 5000).unwrap();
        let values = draws.iter().map(|&k| k as f64).collect::<Vec<_>>();
        let mean = values.iter().sum::<f64>() / 5000.0;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 4999.0;
        assert!((mean - 1000.0).abs() < 3.0, "mean = {mean}");
        assert!((variance - 1000.0).abs() < 100.0, "variance = {variance}");
    }

    #[test]
    fn test_rate_at_switch_point() {
        let dist = Poisson::new(PTRS_THRESHOLD).unwrap();
        let mean = test_util::discrete_mean(&dist, 5, 50_000);
        assert!((mean - PTRS_THRESHOLD).abs() < 0.1, "mean = {mean}");
    }

    #[test]
    fn test_extreme_rate_is_not_capped() {
        let dist = Poisson::new(1e6).unwrap();
        let mut rng = test_util::rng(2);
        let draws = dist.sample_n(&mut rng, 100).unwrap();
        assert!(draws.iter().all(|&k| (990_000..=1_010_000).contains(&k)));
    }

    #[test]
    fn test_rejection_loop_respects_retry_limit() {
        // u near 0.5 lands far in the tail and is always rejected
        let mut source = FnSource::new(|| 0.999);
        let dist = Poisson::new(1000.0).unwrap();
        assert_eq!(
            dist.sample_with(&mut source, SamplingPolicy::new(50)),
            Err(Error::RetryLimitExceeded {
                distribution: "poisson",
                attempts: 50
            })
        );
    }
}
