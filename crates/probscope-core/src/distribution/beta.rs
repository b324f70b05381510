use serde::Serialize;

use super::{Continuous, Distribution, gamma::ln_standard_gamma};
use crate::{
    error::{InvalidParameterError, Result, check_positive},
    math::ln_beta,
    moments::Moments,
    random::{RandomSource, SamplingPolicy},
};

/// Beta distribution on `(0, 1)` with shape parameters `alpha` and `beta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Beta {
    alpha: f64,
    beta: f64,
}

impl Beta {
    pub fn new(alpha: f64, beta: f64) -> Result<Self, InvalidParameterError> {
        Ok(Self {
            alpha: check_positive("alpha", alpha)?,
            beta: check_positive("beta", beta)?,
        })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl Distribution for Beta {
    type Sample = f64;

    /// `X / (X + Y)` with `X ~ Gamma(α, 1)` and `Y ~ Gamma(β, 1)`, formed from
    /// the logarithms of both draws so that tiny shapes never divide `0 / 0`.
    fn sample_with<R>(&self, rng: &mut R, policy: SamplingPolicy) -> Result<f64>
    where
        R: RandomSource + ?Sized,
    {
        let mut attempts = policy.attempts("beta");
        let ln_x = ln_standard_gamma(self.alpha, rng, &mut attempts)?;
        let ln_y = ln_standard_gamma(self.beta, rng, &mut attempts)?;
        Ok(1.0 / (1.0 + (ln_y - ln_x).exp()))
    }
}

impl Continuous for Beta {
    fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 || x >= 1.0 {
            return 0.0;
        }
        self.ln_pdf(x).exp()
    }

    fn ln_pdf(&self, x: f64) -> f64 {
        if x <= 0.0 || x >= 1.0 {
            return f64::NEG_INFINITY;
        }
        let Self { alpha, beta } = *self;
        (alpha - 1.0) * x.ln() + (beta - 1.0) * (1.0 - x).ln() - ln_beta(alpha, beta)
    }

    fn moments(&self) -> Moments {
        let Self { alpha, beta } = *self;
        let total = alpha + beta;
        let mode = (alpha > 1.0 && beta > 1.0).then(|| (alpha - 1.0) / (total - 2.0));
        Moments::new(alpha / total, alpha * beta / (total * total * (total + 1.0))).with_mode(mode)
    }
}
