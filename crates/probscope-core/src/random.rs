//! Uniform random sources and the shared retry policy used by every generator.

use rand::{Rng, rngs::ThreadRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A source of uniform variates on `[0, 1)`.
///
/// Every generator in this crate draws exclusively through this trait, so any
/// [`rand::Rng`] (including seeded ones such as `rand_pcg::Pcg64`) can be used
/// directly, and tests can script exact draws with [`FnSource`].
pub trait RandomSource {
    /// Returns the next uniform variate in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<R> RandomSource for R
where
    R: Rng + ?Sized,
{
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Adapts a closure returning values in `[0, 1)` into a [`RandomSource`].
///
/// # Examples
///
/// ```
/// use probscope_core::random::{FnSource, RandomSource as _};
///
/// let mut draws = [0.25, 0.75].into_iter().cycle();
/// let mut source = FnSource::new(move || draws.next().unwrap_or(0.5));
/// assert_eq!(source.next_uniform(), 0.25);
/// assert_eq!(source.next_uniform(), 0.75);
/// ```
#[derive(Debug, Clone)]
pub struct FnSource<F> {
    f: F,
}

impl<F> FnSource<F>
where
    F: FnMut() -> f64,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> RandomSource for FnSource<F>
where
    F: FnMut() -> f64,
{
    fn next_uniform(&mut self) -> f64 {
        (self.f)()
    }
}

/// The process-wide default source (the thread-local generator of `rand`).
#[must_use]
pub fn default_source() -> ThreadRng {
    rand::rng()
}

/// Bounded-retry policy shared by all generators.
///
/// Every loop that may repeat (redrawing a zero uniform, rejection sampling,
/// Knuth's product loop, counting geometric trials) counts its iterations
/// against `max_attempts` and fails with [`Error::RetryLimitExceeded`] instead
/// of spinning forever under degenerate parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingPolicy {
    pub max_attempts: u32,
}

impl SamplingPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

    #[must_use]
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Starts counting attempts for one draw of `distribution`.
    #[must_use]
    pub(crate) fn attempts(self, distribution: &'static str) -> Attempts {
        Attempts {
            distribution,
            limit: self.max_attempts,
            used: 0,
        }
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Attempt counter for a single draw.
#[derive(Debug)]
pub(crate) struct Attempts {
    distribution: &'static str,
    limit: u32,
    used: u32,
}

impl Attempts {
    /// Records one more iteration, failing once the limit is exhausted.
    pub(crate) fn tick(&mut self) -> Result<()> {
        if self.used >= self.limit {
            log::warn!(
                "{} sampler exceeded {} attempts; parameters are likely degenerate",
                self.distribution,
                self.limit
            );
            return Err(Error::RetryLimitExceeded {
                distribution: self.distribution,
                attempts: self.limit,
            });
        }
        self.used += 1;
        Ok(())
    }

    /// Draws a uniform in `(0, 1)`, redrawing exact zeros so that `ln` stays finite.
    pub(crate) fn nonzero_uniform<R>(&mut self, rng: &mut R) -> Result<f64>
    where
        R: RandomSource + ?Sized,
    {
        loop {
            self.tick()?;
            let u = rng.next_uniform();
            if u > 0.0 {
                return Ok(u);
            }
        }
    }
}
