use serde::Serialize;

use super::{Discrete, Distribution};
use crate::{
    error::{InvalidParameterError, Result, check_probability},
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

/// A single trial that succeeds (`1`) with probability `p`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    pub fn new(p: f64) -> Result<Self, InvalidParameterError> {
        Ok(Self {
            p: check_probability("p", p)?,
        })
    }

    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Distribution for Bernoulli {
    type Sample = u64;

    fn sample_with<R>(&self, rng: &mut R, _policy: SamplingPolicy) -> Result<u64>
    where
        R: RandomSource + ?Sized,
    {
        Ok(u64::from(rng.next_uniform() < self.p))
    }
}

impl Discrete for Bernoulli {
    fn pmf(&self, k: i64) -> f64 {
        match k {
            0 => 1.0 - self.p,
            1 => self.p,
            _ => 0.0,
        }
    }

    fn moments(&self) -> Moments {
        let p = self.p;
        let (mode, median) = match p.partial_cmp(&0.5) {
            Some(std::cmp::Ordering::Less) => (Some(0.0), 0.0),
            Some(std::cmp::Ordering::Greater) => (Some(1.0), 1.0),
            _ => (None, 0.5),
        };
        Moments::new(p, p * (1.0 - p))
            .with_mode(mode)
            .with_median(median)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::test_util;

    #[test]
    fn test_rejects_invalid_p() {
        assert!(Bernoulli::new(-0.1).is_err());
        assert!(Bernoulli::new(1.5).is_err());
        assert!(Bernoulli::new(f64::NAN).is_err());
    }

    #[test]
    fn test_pmf() {
        let dist = Bernoulli::new(0.3).unwrap();
        assert_eq!(dist.pmf(1), 0.3);
        assert_eq!(dist.pmf(0), 0.7);
        assert_eq!(dist.pmf(2), 0.0);
        assert_eq!(dist.pmf(-1), 0.0);
    }

    #[test]
    fn test_sample_mean_converges() {
        let dist = Bernoulli::new(0.3).unwrap();
        let mean = test_util::discrete_mean(&dist, 42, 100_000);
        assert!((mean - 0.3).abs() < 0.01, "mean = {mean}");
    }

    #[test]
    fn test_degenerate_p() {
        let mut rng = test_util::rng(3);
        let never = Bernoulli::new(0.0).unwrap();
        let always = Bernoulli::new(1.0).unwrap();
        for _ in 0..1000 {
            assert_eq!(never.sample(&mut rng).unwrap(), 0);
            assert_eq!(always.sample(&mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn test_moments() {
        let moments = Bernoulli::new(0.3).unwrap().moments();
        assert_eq!(moments.mean, 0.3);
        assert!((moments.variance - 0.21).abs() < 1e-12);
        assert_eq!(moments.mode, Some(0.0));
        assert_eq!(Bernoulli::new(0.5).unwrap().moments().mode, None);
    }
}
