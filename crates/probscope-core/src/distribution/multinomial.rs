use serde::Serialize;

use super::Distribution;
use crate::{
    error::{InvalidParameterError, Result, check_probability},
    math::ln_gamma,
    moments::MultinomialMoments,
    random::{RandomSource, SamplingPolicy},
};

/// Category counts over `trials` independent draws from a categorical
/// distribution.
///
/// Probabilities are stored normalised: they are divided by their total on
/// construction, and [`Multinomial::with_probability`] rescales the other
/// categories after an edit so the vector keeps summing to 1.
///
/// # Examples
///
/// ```
/// use probscope_core::distribution::Multinomial;
///
/// let dist = Multinomial::new(10, vec![1.0, 1.0, 2.0]).unwrap();
/// assert_eq!(dist.probabilities(), &[0.25, 0.25, 0.5]);
///
/// let dist = dist.with_probability(2, 0.8).unwrap();
/// let probs = dist.probabilities();
/// assert!((probs[0] - 0.1).abs() < 1e-12);
/// assert!((probs[1] - 0.1).abs() < 1e-12);
/// assert!((probs[2] - 0.8).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Multinomial {
    trials: u64,
    probabilities: Vec<f64>,
}

impl Multinomial {
    /// Creates a multinomial from non-negative category weights.
    pub fn new(trials: u64, weights: Vec<f64>) -> Result<Self, InvalidParameterError> {
        if trials == 0 {
            return Err(InvalidParameterError::TooSmall {
                name: "trials",
                min: 1,
                value: trials,
            });
        }
        Ok(Self {
            trials,
            probabilities: normalize("probabilities", weights)?,
        })
    }

    /// Equal probabilities over `categories` categories.
    pub fn uniform(trials: u64, categories: usize) -> Result<Self, InvalidParameterError> {
        Self::new(trials, vec![1.0; categories])
    }

    #[must_use]
    pub fn trials(&self) -> u64 {
        self.trials
    }

    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Sets category `index` to probability `p` and rescales the remaining
    /// categories proportionally to share `1 - p`.
    ///
    /// When every other category is zero, `1 - p` is split evenly among them.
    pub fn with_probability(mut self, index: usize, p: f64) -> Result<Self, InvalidParameterError> {
        let p = check_probability("p", p)?;
        let len = self.probabilities.len();
        if index >= len {
            return Err(InvalidParameterError::IndexOutOfRange {
                name: "probabilities",
                index,
                len,
            });
        }
        if len == 1 {
            // a single category always carries all the mass
            return Ok(self);
        }

        let rest = 1.0 - p;
        let others = self.probabilities.iter().enumerate().filter(|(i, _)| *i != index);
        let others_total = others.map(|(_, q)| q).sum::<f64>();
        #[expect(clippy::cast_precision_loss)]
        let even_share = rest / (len - 1) as f64;
        for (i, q) in self.probabilities.iter_mut().enumerate() {
            *q = if i == index {
                p
            } else if others_total > 0.0 {
                *q / others_total * rest
            } else {
                even_share
            };
        }
        Ok(self)
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn moments(&self) -> MultinomialMoments {
        let n = self.trials as f64;
        MultinomialMoments {
            means: self.probabilities.iter().map(|p| n * p).collect(),
            variances: self.probabilities.iter().map(|p| n * p * (1.0 - p)).collect(),
        }
    }

    /// Probability of observing exactly `counts`.
    ///
    /// Returns `0` when `counts` has the wrong length or does not sum to
    /// `trials`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn pmf(&self, counts: &[u64]) -> f64 {
        if counts.len() != self.probabilities.len() || counts.iter().sum::<u64>() != self.trials {
            return 0.0;
        }
        let mut ln_p = ln_gamma(self.trials as f64 + 1.0);
        for (&k, &p) in counts.iter().zip(&self.probabilities) {
            if k == 0 {
                continue;
            }
            if p == 0.0 {
                return 0.0;
            }
            let k = k as f64;
            ln_p += k * p.ln() - ln_gamma(k + 1.0);
        }
        ln_p.exp()
    }
}

fn normalize(name: &'static str, weights: Vec<f64>) -> Result<Vec<f64>, InvalidParameterError> {
    if weights.is_empty() {
        return Err(InvalidParameterError::Empty { name });
    }
    if let Some(&value) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(InvalidParameterError::Probability { name, value });
    }
    let total = weights.iter().sum::<f64>();
    if total <= 0.0 {
        return Err(InvalidParameterError::ZeroMass { name, total });
    }
    Ok(weights.into_iter().map(|w| w / total).collect())
}

impl Distribution for Multinomial {
    type Sample = Vec<u64>;

    /// Assigns each trial to the first category whose cumulative probability
    /// exceeds a uniform draw, or to the last category if rounding leaves
    /// the draw uncovered.
    fn sample_with<R>(&self, rng: &mut R, _policy: SamplingPolicy) -> Result<Vec<u64>>
    where
        R: RandomSource + ?Sized,
    {
        let last = self.probabilities.len() - 1;
        let mut counts = vec![0; self.probabilities.len()];
        for _ in 0..self.trials {
            let r = rng.next_uniform();
            let mut cumulative = 0.0;
            let category = self
                .probabilities
                .iter()
                .position(|p| {
                    cumulative += p;
                    r < cumulative
                })
                .unwrap_or(last);
            counts[category] += 1;
        }
        Ok(counts)
    }
}
