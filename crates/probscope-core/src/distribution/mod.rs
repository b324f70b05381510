//! Named probability distributions.
//!
//! Each family is a parameter record with a validating constructor. All
//! families implement [`Distribution`] (sampling); univariate ones also
//! implement [`Discrete`] or [`Continuous`] (density, moments).
//!
//! # Examples
//!
//! ```
//! use probscope_core::distribution::{Continuous as _, Distribution as _, Normal};
//! use rand::SeedableRng as _;
//!
//! let normal = Normal::new(0.0, 1.0).unwrap();
//! assert!((normal.pdf(0.0) - 0.398_942_280_4).abs() < 1e-9);
//!
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
//! let draws = normal.sample_n(&mut rng, 100).unwrap();
//! assert_eq!(draws.len(), 100);
//! ```

pub use self::{
    bernoulli::Bernoulli, beta::Beta, binomial::Binomial, bivariate_normal::BivariateNormal,
    exponential::Exponential, gamma::Gamma, geometric::Geometric, laplace::Laplace,
    multinomial::Multinomial, normal::Normal, poisson::Poisson, uniform::Uniform,
};
use crate::{
    error::Result,
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

mod bernoulli;
mod beta;
mod binomial;
mod bivariate_normal;
mod exponential;
mod gamma;
mod geometric;
mod laplace;
mod multinomial;
mod normal;
mod poisson;
mod uniform;

/// A distribution that can produce random draws.
pub trait Distribution {
    type Sample;

    /// Draws one sample, failing if a retry loop exceeds `policy`.
    fn sample_with<R>(&self, rng: &mut R, policy: SamplingPolicy) -> Result<Self::Sample>
    where
        R: RandomSource + ?Sized;

    /// Draws one sample under the default [`SamplingPolicy`].
    fn sample<R>(&self, rng: &mut R) -> Result<Self::Sample>
    where
        R: RandomSource + ?Sized,
    {
        self.sample_with(rng, SamplingPolicy::default())
    }

    /// Draws `count` samples in order under the default [`SamplingPolicy`].
    fn sample_n<R>(&self, rng: &mut R, count: usize) -> Result<Vec<Self::Sample>>
    where
        R: RandomSource + ?Sized,
    {
        self.sample_n_with(rng, count, SamplingPolicy::default())
    }

    /// Draws `count` samples in order.
    fn sample_n_with<R>(
        &self,
        rng: &mut R,
        count: usize,
        policy: SamplingPolicy,
    ) -> Result<Vec<Self::Sample>>
    where
        R: RandomSource + ?Sized,
    {
        (0..count).map(|_| self.sample_with(rng, policy)).collect()
    }
}

/// A distribution over non-negative integers.
pub trait Discrete: Distribution<Sample = u64> {
    /// Probability mass at `k`; `0` outside the support.
    fn pmf(&self, k: i64) -> f64;

    fn ln_pmf(&self, k: i64) -> f64 {
        self.pmf(k).ln()
    }

    fn moments(&self) -> Moments;
}

/// A distribution over the real line.
pub trait Continuous: Distribution<Sample = f64> {
    /// Probability density at `x`; `0` outside the support.
    fn pdf(&self, x: f64) -> f64;

    fn ln_pdf(&self, x: f64) -> f64 {
        self.pdf(x).ln()
    }

    fn moments(&self) -> Moments;
}

#[cfg(test)]
pub(crate) mod test_util {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    pub(crate) fn rng(seed: u64) -> Pcg64 {
        Pcg64::seed_from_u64(seed)
    }

    /// Mean of `count` draws as `f64`.
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn sample_mean<D>(dist: &D, seed: u64, count: usize) -> f64
    where
        D: Distribution,
        D::Sample: Into<f64>,
    {
        let mut rng = rng(seed);
        let draws = dist.sample_n(&mut rng, count).unwrap();
        draws.into_iter().map(Into::into).sum::<f64>() / count as f64
    }

    /// Mean of `count` discrete draws.
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn discrete_mean<D>(dist: &D, seed: u64, count: usize) -> f64
    where
        D: Discrete,
    {
        let mut rng = rng(seed);
        let draws = dist.sample_n(&mut rng, count).unwrap();
        draws.into_iter().map(|k| k as f64).sum::<f64>() / count as f64
    }

    /// Midpoint Riemann sum of a density over `[from, to]`.
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn riemann_sum<D>(dist: &D, from: f64, to: f64, steps: usize) -> f64
    where
        D: Continuous,
    {
        let width = (to - from) / steps as f64;
        (0..steps)
            .map(|i| dist.pdf(from + (i as f64 + 0.5) * width) * width)
            .sum()
    }
}
