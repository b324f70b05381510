//! Sample-mean experiments illustrating the central limit theorem.
//!
//! # Examples
//!
//! ```
//! use probscope_core::{
//!     clt::{Bimodal, CltSummary, sample_means},
//!     random::SamplingPolicy,
//! };
//! use rand::SeedableRng as _;
//!
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(8);
//! let means = sample_means(&Bimodal, 30, 2000, &mut rng, SamplingPolicy::default())?;
//! let summary = CltSummary::new(&Bimodal, 30, &means)?;
//! assert!((summary.mean_of_means - 0.5).abs() < 0.01);
//! # Ok::<(), probscope_core::error::Error>(())
//! ```

use serde::Serialize;

use crate::{
    distribution::{Continuous, Distribution},
    error::{Error, InvalidParameterError, Result},
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

/// Means of `num_samples` independent samples of `sample_size` draws each.
#[expect(clippy::cast_precision_loss)]
pub fn sample_means<D, R>(
    dist: &D,
    sample_size: usize,
    num_samples: usize,
    rng: &mut R,
    policy: SamplingPolicy,
) -> Result<Vec<f64>>
where
    D: Distribution<Sample = f64>,
    R: RandomSource + ?Sized,
{
    check_count("sample_size", sample_size)?;
    check_count("num_samples", num_samples)?;
    (0..num_samples)
        .map(|_| -> Result<f64> {
            let sample = dist.sample_n_with(rng, sample_size, policy)?;
            Ok(sample.iter().sum::<f64>() / sample_size as f64)
        })
        .collect()
}

/// Observed spread of sample means next to the theoretical prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CltSummary {
    pub sample_size: usize,
    pub num_samples: usize,
    pub mean_of_means: f64,
    /// Population (`/ n`) standard deviation of the means.
    pub std_dev_of_means: f64,
    pub theoretical_mean: f64,
    /// `σ / √sample_size`.
    pub theoretical_standard_error: f64,
}

impl CltSummary {
    #[expect(clippy::cast_precision_loss)]
    pub fn new<D>(dist: &D, sample_size: usize, means: &[f64]) -> Result<Self>
    where
        D: Continuous,
    {
        check_count("sample_size", sample_size)?;
        let mean_of_means = probscope_stats::descriptive::mean(means).ok_or(Error::EmptyData)?;
        let variance =
            probscope_stats::descriptive::population_variance(means).ok_or(Error::EmptyData)?;
        let moments = dist.moments();
        Ok(Self {
            sample_size,
            num_samples: means.len(),
            mean_of_means,
            std_dev_of_means: variance.sqrt(),
            theoretical_mean: moments.mean,
            theoretical_standard_error: moments.std_dev / (sample_size as f64).sqrt(),
        })
    }
}

fn check_count(name: &'static str, value: usize) -> Result<(), InvalidParameterError> {
    if value == 0 {
        return Err(InvalidParameterError::TooSmall {
            name,
            min: 1,
            value: 0,
        });
    }
    Ok(())
}

/// Equal mixture of uniforms on `[0, 0.4)` and `[0.6, 1)`.
///
/// A non-normal source: its density has a gap in the middle,
/// yet means of a few dozen draws already look Gaussian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Bimodal;

impl Bimodal {
    const WIDTH: f64 = 0.4;
    const UPPER_START: f64 = 0.6;
}

impl Distribution for Bimodal {
    type Sample = f64;

    fn sample_with<R>(&self, rng: &mut R, _policy: SamplingPolicy) -> Result<f64>
    where
        R: RandomSource + ?Sized,
    {
        let lower = rng.next_uniform() < 0.5;
        let offset = rng.next_uniform() * Self::WIDTH;
        Ok(if lower {
            offset
        } else {
            Self::UPPER_START + offset
        })
    }
}

impl Continuous for Bimodal {
    fn pdf(&self, x: f64) -> f64 {
        let in_lower = (0.0..Self::WIDTH).contains(&x);
        let in_upper = (Self::UPPER_START..Self::UPPER_START + Self::WIDTH).contains(&x);
        if in_lower || in_upper {
            0.5 / Self::WIDTH
        } else {
            0.0
        }
    }

    fn moments(&self) -> Moments {
        // E[X²] = ½·E[(0.4U)²] + ½·E[(0.6 + 0.4U)²]
        let w = Self::WIDTH;
        let a = Self::UPPER_START;
        let second = 0.5 * (w * w / 3.0) + 0.5 * (a * a + a * w + w * w / 3.0);
        Moments::new(0.5, second - 0.25).with_median(0.5)
    }
}
