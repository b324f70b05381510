//! Bayes' rule for diagnostic tests, conditional probability of two events,
//! and the conjugate normal–normal update.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidParameterError, check_finite, check_positive, check_probability};

/// Population size used for the expected outcome counts.
pub const POPULATION: f64 = 10_000.0;

/// A binary diagnostic test applied to a population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticTest {
    /// Prior probability of having the condition.
    pub prevalence: f64,
    /// `P(+ | condition)`.
    pub sensitivity: f64,
    /// `P(- | no condition)`.
    pub specificity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagnosticOutcome {
    /// `P(condition | +)`; `0` when a positive result is impossible.
    pub posterior: f64,
    pub probability_positive: f64,
    pub false_positive_rate: f64,
    /// Expected counts per [`POPULATION`] people.
    pub true_positives: f64,
    pub false_positives: f64,
    pub true_negatives: f64,
    pub false_negatives: f64,
}

impl DiagnosticTest {
    /// # Examples
    ///
    /// ```
    /// use probscope_core::bayes::DiagnosticTest;
    ///
    /// let test = DiagnosticTest { prevalence: 0.01, sensitivity: 0.95, specificity: 0.95 };
    /// let outcome = test.evaluate()?;
    /// // most positives are false positives when the condition is rare
    /// assert!((outcome.posterior - 0.161).abs() < 1e-3);
    /// # Ok::<(), probscope_core::error::InvalidParameterError>(())
    /// ```
    pub fn evaluate(&self) -> Result<DiagnosticOutcome, InvalidParameterError> {
        let prevalence = check_probability("prevalence", self.prevalence)?;
        let sensitivity = check_probability("sensitivity", self.sensitivity)?;
        let specificity = check_probability("specificity", self.specificity)?;

        let false_positive_rate = 1.0 - specificity;
        let true_positive = sensitivity * prevalence;
        let false_positive = false_positive_rate * (1.0 - prevalence);
        let probability_positive = true_positive + false_positive;
        let posterior = if probability_positive > 0.0 {
            true_positive / probability_positive
        } else {
            0.0
        };

        Ok(DiagnosticOutcome {
            posterior,
            probability_positive,
            false_positive_rate,
            true_positives: true_positive * POPULATION,
            false_positives: false_positive * POPULATION,
            true_negatives: specificity * (1.0 - prevalence) * POPULATION,
            false_negatives: (1.0 - sensitivity) * prevalence * POPULATION,
        })
    }
}

/// Two events given by their marginal and joint probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventProbabilities {
    pub p_a: f64,
    pub p_b: f64,
    pub p_a_and_b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConditionalOutcome {
    /// `P(A | B)`; `0` when `P(B) = 0`.
    pub p_a_given_b: f64,
    /// `P(B | A)`; `0` when `P(A) = 0`.
    pub p_b_given_a: f64,
    pub p_a_or_b: f64,
    /// `P(A ∩ B)` is within [`EventProbabilities::INDEPENDENCE_TOLERANCE`]
    /// of `P(A)·P(B)`.
    pub independent: bool,
}

impl EventProbabilities {
    pub const INDEPENDENCE_TOLERANCE: f64 = 1e-3;

    pub fn evaluate(&self) -> Result<ConditionalOutcome, InvalidParameterError> {
        let p_a = check_probability("p_a", self.p_a)?;
        let p_b = check_probability("p_b", self.p_b)?;
        let joint = check_probability("p_a_and_b", self.p_a_and_b)?;
        let marginal = p_a.min(p_b);
        if joint > marginal {
            return Err(InvalidParameterError::JointExceedsMarginal { joint, marginal });
        }

        let conditional = |given: f64| if given > 0.0 { joint / given } else { 0.0 };
        Ok(ConditionalOutcome {
            p_a_given_b: conditional(p_b),
            p_b_given_a: conditional(p_a),
            p_a_or_b: p_a + p_b - joint,
            independent: (joint - p_a * p_b).abs() < Self::INDEPENDENCE_TOLERANCE,
        })
    }
}

/// Normal prior on an unknown mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalPrior {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalPrior {
    /// Conjugate update from observations with known noise `noise_std_dev`.
    ///
    /// Precisions add: the posterior precision is `1/σ₀² + n/σ²` and the
    /// posterior mean is the precision-weighted average of the prior mean and
    /// the sample mean. With no data the prior is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use probscope_core::bayes::NormalPrior;
    ///
    /// let prior = NormalPrior { mean: 0.0, std_dev: 1.0 };
    /// let posterior = prior.update(&[2.0, 2.0, 2.0], 1.0)?;
    /// assert_eq!(posterior.mean, 1.5);
    /// assert_eq!(posterior.std_dev, 0.5);
    /// # Ok::<(), probscope_core::error::InvalidParameterError>(())
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn update(&self, data: &[f64], noise_std_dev: f64) -> Result<Self, InvalidParameterError> {
        let prior_mean = check_finite("prior mean", self.mean)?;
        let prior_std = check_positive("prior std_dev", self.std_dev)?;
        let noise = check_positive("noise_std_dev", noise_std_dev)?;
        if data.is_empty() {
            return Ok(*self);
        }

        let n = data.len() as f64;
        let sample_mean = data.iter().sum::<f64>() / n;
        let prior_precision = 1.0 / (prior_std * prior_std);
        let data_precision = n / (noise * noise);
        let precision = prior_precision + data_precision;
        Ok(Self {
            mean: (prior_precision * prior_mean + data_precision * sample_mean) / precision,
            std_dev: (1.0 / precision).sqrt(),
        })
    }
}
