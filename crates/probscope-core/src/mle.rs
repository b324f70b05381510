//! Maximum-likelihood parameter estimates and log-likelihood.
//!
//! # Examples
//!
//! ```
//! use probscope_core::mle::{fit_normal, log_likelihood};
//!
//! let data = [1.0, 2.0, 3.0, 4.0];
//! let fit = fit_normal(&data)?;
//! assert_eq!(fit.mean, 2.5);
//! assert_eq!(fit.variance, 1.25);
//!
//! let ll = log_likelihood(&fit.distribution()?, &data);
//! assert!(ll.is_finite());
//! # Ok::<(), probscope_core::error::Error>(())
//! ```

use probscope_stats::descriptive;
use serde::Serialize;

use crate::{
    distribution::{Bernoulli, Continuous, Discrete, Exponential, Normal, Poisson},
    error::{Error, InvalidParameterError, Result},
};

/// Normal fit: sample mean and biased (`/ n`) variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalFit {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl NormalFit {
    /// The fitted distribution; fails for constant data (zero variance).
    pub fn distribution(&self) -> Result<Normal, InvalidParameterError> {
        Normal::new(self.mean, self.std_dev)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExponentialFit {
    pub rate: f64,
    pub count: usize,
}

impl ExponentialFit {
    pub fn distribution(&self) -> Result<Exponential, InvalidParameterError> {
        Exponential::new(self.rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoissonFit {
    pub lambda: f64,
    pub count: usize,
}

impl PoissonFit {
    /// The fitted distribution; fails when every count is zero.
    pub fn distribution(&self) -> Result<Poisson, InvalidParameterError> {
        Poisson::new(self.lambda)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BernoulliFit {
    pub p: f64,
    pub count: usize,
}

impl BernoulliFit {
    pub fn distribution(&self) -> Result<Bernoulli, InvalidParameterError> {
        Bernoulli::new(self.p)
    }
}

/// Fits a normal distribution.
pub fn fit_normal(data: &[f64]) -> Result<NormalFit> {
    let mean = descriptive::mean(data).ok_or(Error::EmptyData)?;
    let variance = descriptive::population_variance(data).ok_or(Error::EmptyData)?;
    log::debug!("normal fit: mean={mean}, variance={variance}, n={}", data.len());
    Ok(NormalFit {
        mean,
        variance,
        std_dev: variance.sqrt(),
        count: data.len(),
    })
}

/// Fits an exponential distribution: `rate = n / Σx`.
#[expect(clippy::cast_precision_loss)]
pub fn fit_exponential(data: &[f64]) -> Result<ExponentialFit> {
    if data.is_empty() {
        return Err(Error::EmptyData);
    }
    let total = data.iter().sum::<f64>();
    if total <= 0.0 || !total.is_finite() {
        return Err(InvalidParameterError::NotPositive {
            name: "sum of observations",
            value: total,
        }
        .into());
    }
    let rate = data.len() as f64 / total;
    log::debug!("exponential fit: rate={rate}, n={}", data.len());
    Ok(ExponentialFit {
        rate,
        count: data.len(),
    })
}

/// Fits a Poisson distribution: `λ` is the sample mean of the counts.
#[expect(clippy::cast_precision_loss)]
pub fn fit_poisson(data: &[u64]) -> Result<PoissonFit> {
    if data.is_empty() {
        return Err(Error::EmptyData);
    }
    let lambda = data.iter().map(|&k| k as f64).sum::<f64>() / data.len() as f64;
    log::debug!("poisson fit: lambda={lambda}, n={}", data.len());
    Ok(PoissonFit {
        lambda,
        count: data.len(),
    })
}

/// Fits a Bernoulli distribution: `p` is the fraction of ones.
///
/// Every observation must be `0` or `1`.
#[expect(clippy::cast_precision_loss)]
pub fn fit_bernoulli(data: &[u64]) -> Result<BernoulliFit> {
    if data.is_empty() {
        return Err(Error::EmptyData);
    }
    if let Some(&value) = data.iter().find(|&&k| k > 1) {
        return Err(InvalidParameterError::OutOfRange {
            name: "observation",
            range: "{0, 1}",
            value: value as f64,
        }
        .into());
    }
    let successes = data.iter().sum::<u64>();
    let p = successes as f64 / data.len() as f64;
    log::debug!("bernoulli fit: p={p}, n={}", data.len());
    Ok(BernoulliFit {
        p,
        count: data.len(),
    })
}

/// Sum of `ln_pdf` over the observations.
///
/// Observations outside the support contribute `-inf`; the sum is returned
/// as is.
#[must_use]
pub fn log_likelihood<D>(dist: &D, data: &[f64]) -> f64
where
    D: Continuous,
{
    data.iter().map(|&x| dist.ln_pdf(x)).sum()
}

/// Sum of `ln_pmf` over integer observations.
#[must_use]
pub fn discrete_log_likelihood<D>(dist: &D, data: &[u64]) -> f64
where
    D: Discrete,
{
    data.iter()
        .map(|&k| i64::try_from(k).map_or(f64::NEG_INFINITY, |k| dist.ln_pmf(k)))
        .sum()
}
