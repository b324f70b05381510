use serde::Serialize;

use super::{Discrete, Distribution};
use crate::{
    error::{InvalidParameterError, Result, check_probability},
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

/// Number of trials up to and including the first success (support `k ≥ 1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometric {
    p: f64,
}

impl Geometric {
    /// `p` must lie in `(0, 1]`; with `p = 0` a success never occurs.
    pub fn new(p: f64) -> Result<Self, InvalidParameterError> {
        let p = check_probability("p", p)?;
        if p == 0.0 {
            return Err(InvalidParameterError::NotPositive { name: "p", value: p });
        }
        Ok(Self { p })
    }

    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }

    /// `P(X ≤ k)`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn cdf(&self, k: i64) -> f64 {
        if k < 1 {
            0.0
        } else {
            1.0 - (1.0 - self.p).powf(k as f64)
        }
    }
}

impl Distribution for Geometric {
    type Sample = u64;

    /// Inversion: `⌈ln U / ln(1 - p)⌉`. Only a zero uniform is redrawn, so
    /// `policy` bounds nothing but a degenerate source.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn sample_with<R>(&self, rng: &mut R, policy: SamplingPolicy) -> Result<u64>
    where
        R: RandomSource + ?Sized,
    {
        if self.p == 1.0 {
            return Ok(1);
        }
        let mut attempts = policy.attempts("geometric");
        let u = attempts.nonzero_uniform(rng)?;
        let trials = (u.ln() / (-self.p).ln_1p()).ceil().max(1.0);
        Ok(trials as u64)
    }
}

impl Discrete for Geometric {
    #[expect(clippy::cast_precision_loss)]
    fn pmf(&self, k: i64) -> f64 {
        if k < 1 {
            return 0.0;
        }
        (1.0 - self.p).powf((k - 1) as f64) * self.p
    }

    fn moments(&self) -> Moments {
        let p = self.p;
        let median = if p == 1.0 {
            1.0
        } else {
            (-1.0 / (1.0 - p).log2()).ceil()
        };
        Moments::new(1.0 / p, (1.0 - p) / (p * p))
            .with_mode(1.0)
            .with_median(median)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{distribution::test_util, error::Error, random::FnSource};

    #[test]
    fn test_rejects_zero_p() {
        assert!(Geometric::new(0.0).is_err());
        assert!(Geometric::new(1.0).is_ok());
    }

    #[test]
    fn test_pmf_and_cdf() {
        let dist = Geometric::new(0.25).unwrap();
        assert_eq!(dist.pmf(0), 0.0);
        assert_eq!(dist.pmf(1), 0.25);
        assert!((dist.pmf(3) - 0.75 * 0.75 * 0.25).abs() < 1e-15);
        let partial = (1..=10).map(|k| dist.pmf(k)).sum::<f64>();
        assert!((partial - dist.cdf(10)).abs() < 1e-12);
    }

    #[test]
    fn test_certain_success() {
        let mut rng = test_util::rng(4);
        let dist = Geometric::new(1.0).unwrap();
        assert_eq!(dist.sample(&mut rng).unwrap(), 1);
        assert_eq!(dist.moments().median, Some(1.0));
    }

    #[test]
    fn test_sample_mean_converges() {
        let dist = Geometric::new(0.2).unwrap();
        let mean = test_util::discrete_mean(&dist, 8, 50_000);
        assert!((mean - 5.0).abs() < 0.1, "mean = {mean}");
    }

    #[test]
    fn test_small_p_mean_without_retry_failures() {
        let dist = Geometric::new(1e-4).unwrap();
        let mean = test_util::discrete_mean(&dist, 3, 5000);
        assert!((mean - 1e4).abs() < 600.0, "mean = {mean}");
    }

    #[test]
    fn test_inversion_boundaries() {
        let dist = Geometric::new(0.5).unwrap();
        // X > k exactly when U < 0.5^k
        let mut source = FnSource::new(|| 0.6);
        assert_eq!(dist.sample(&mut source).unwrap(), 1);
        let mut source = FnSource::new(|| 0.2);
        assert_eq!(dist.sample(&mut source).unwrap(), 3);
    }

    #[test]
    fn test_zero_uniforms_fail_instead_of_looping() {
        let mut source = FnSource::new(|| 0.0);
        let dist = Geometric::new(0.01).unwrap();
        assert_eq!(
            dist.sample_with(&mut source, SamplingPolicy::new(100)),
            Err(Error::RetryLimitExceeded {
                distribution: "geometric",
                attempts: 100
            })
        );
    }

    #[test]
    fn test_median() {
        // 1 - 0.5^k ≥ 0.5 first holds at k = 1
        assert_eq!(Geometric::new(0.5).unwrap().moments().median, Some(1.0));
        assert_eq!(Geometric::new(0.2).unwrap().moments().median, Some(4.0));
    }
}
