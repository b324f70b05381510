//! One-sample z-test arithmetic: standard error, z-score, p-value, power and
//! error rates.
//!
//! By default the critical values are the conventional α = 0.05 cut-offs
//! (`±1.96` two-tailed, `±1.645` one-tailed) whatever `alpha` says, and
//! `alpha` is only reported back as the type I error rate. Use
//! [`CriticalValuePolicy::FromAlpha`] to derive them from `alpha` instead.
//!
//! # Examples
//!
//! ```
//! use probscope_core::hypothesis::{CriticalValuePolicy, TestType, ZTestInput};
//!
//! let input = ZTestInput {
//!     null_mean: 0.0,
//!     true_mean: 0.5,
//!     sample_size: 30,
//!     sigma: 1.0,
//!     alpha: 0.01,
//!     test_type: TestType::TwoTailed,
//! };
//!
//! let conventional = input.evaluate()?;
//! assert_eq!(conventional.critical_value, 1.96);
//!
//! let exact = input.evaluate_with(CriticalValuePolicy::FromAlpha)?;
//! assert!((exact.critical_value - 2.5758).abs() < 1e-3);
//! # Ok::<(), probscope_core::error::InvalidParameterError>(())
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{InvalidParameterError, check_finite, check_positive},
    math::{normal_cdf, normal_quantile},
};

/// Which tail(s) of the null distribution reject the null hypothesis.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum TestType {
    #[default]
    TwoTailed,
    RightTailed,
    LeftTailed,
}

impl TestType {
    pub const ALL: [Self; 3] = [Self::TwoTailed, Self::RightTailed, Self::LeftTailed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoTailed => "two-tailed",
            Self::RightTailed => "right-tailed",
            Self::LeftTailed => "left-tailed",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown test type `{input}`, expected two-tailed, right-tailed or left-tailed")]
pub struct ParseTestTypeError {
    input: String,
}

impl FromStr for TestType {
    type Err = ParseTestTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTestTypeError {
                input: s.to_owned(),
            })
    }
}

/// How the rejection threshold is chosen.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CriticalValuePolicy {
    /// Fixed α = 0.05 cut-offs regardless of the requested `alpha`.
    #[default]
    Conventional,
    /// `z_{1-α/2}` for two-tailed tests, `±z_{1-α}` for one-tailed tests.
    FromAlpha,
}

impl CriticalValuePolicy {
    const TWO_TAILED: f64 = 1.96;
    const ONE_TAILED: f64 = 1.645;

    /// Signed critical value; negative for left-tailed tests.
    #[must_use]
    pub fn critical_value(self, test_type: TestType, alpha: f64) -> f64 {
        let magnitude = match (self, test_type) {
            (Self::Conventional, TestType::TwoTailed) => Self::TWO_TAILED,
            (Self::Conventional, _) => Self::ONE_TAILED,
            (Self::FromAlpha, TestType::TwoTailed) => normal_quantile(1.0 - alpha / 2.0),
            (Self::FromAlpha, _) => normal_quantile(1.0 - alpha),
        };
        if test_type.is_left_tailed() {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Inputs of a one-sample z-test with known `sigma`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTestInput {
    /// Mean under the null hypothesis.
    pub null_mean: f64,
    /// Mean actually generating the data (used for power).
    pub true_mean: f64,
    pub sample_size: u64,
    /// Known population standard deviation.
    pub sigma: f64,
    /// Significance level in `(0, 1)`.
    pub alpha: f64,
    pub test_type: TestType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZTestResult {
    pub standard_error: f64,
    pub z_score: f64,
    pub critical_value: f64,
    pub p_value: f64,
    pub power: f64,
    pub type_i_error: f64,
    pub type_ii_error: f64,
    /// `|z| > |critical_value|`, irrespective of the tail direction.
    pub reject_null: bool,
}

/// Power at one effect size on a power curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerPoint {
    pub effect_size: f64,
    pub power: f64,
}

impl ZTestInput {
    /// Evaluates the test with the conventional critical values.
    pub fn evaluate(&self) -> Result<ZTestResult, InvalidParameterError> {
        self.evaluate_with(CriticalValuePolicy::default())
    }

    pub fn evaluate_with(
        &self,
        policy: CriticalValuePolicy,
    ) -> Result<ZTestResult, InvalidParameterError> {
        let standard_error = self.standard_error()?;
        check_finite("null_mean", self.null_mean)?;
        check_finite("true_mean", self.true_mean)?;

        let z_score = (self.true_mean - self.null_mean) / standard_error;
        let critical_value = policy.critical_value(self.test_type, self.alpha);
        let p_value = match self.test_type {
            TestType::TwoTailed => 2.0 * (1.0 - normal_cdf(z_score.abs())),
            TestType::RightTailed => 1.0 - normal_cdf(z_score),
            TestType::LeftTailed => normal_cdf(z_score),
        };
        let power = power_at(self.test_type, z_score, critical_value);

        Ok(ZTestResult {
            standard_error,
            z_score,
            critical_value,
            p_value,
            power,
            type_i_error: self.alpha,
            type_ii_error: 1.0 - power,
            reject_null: z_score.abs() > critical_value.abs(),
        })
    }

    /// Power for each effect size `δ`, taking `z = δ / se`.
    ///
    /// Only `sample_size`, `sigma`, `alpha` and `test_type` are used.
    pub fn power_curve<I>(
        &self,
        effect_sizes: I,
        policy: CriticalValuePolicy,
    ) -> Result<Vec<PowerPoint>, InvalidParameterError>
    where
        I: IntoIterator<Item = f64>,
    {
        let standard_error = self.standard_error()?;
        let critical_value = policy.critical_value(self.test_type, self.alpha);
        Ok(effect_sizes
            .into_iter()
            .map(|effect_size| PowerPoint {
                effect_size,
                power: power_at(self.test_type, effect_size / standard_error, critical_value),
            })
            .collect())
    }

    /// `sigma / √n`, validating `sigma`, `sample_size` and `alpha`.
    #[expect(clippy::cast_precision_loss)]
    fn standard_error(&self) -> Result<f64, InvalidParameterError> {
        let sigma = check_positive("sigma", self.sigma)?;
        if self.sample_size == 0 {
            return Err(InvalidParameterError::TooSmall {
                name: "sample_size",
                min: 1,
                value: 0,
            });
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(InvalidParameterError::OutOfRange {
                name: "alpha",
                range: "(0, 1)",
                value: self.alpha,
            });
        }
        Ok(sigma / (self.sample_size as f64).sqrt())
    }
}

fn power_at(test_type: TestType, z: f64, critical_value: f64) -> f64 {
    match test_type {
        TestType::TwoTailed => {
            normal_cdf(z - critical_value) + (1.0 - normal_cdf(z + critical_value))
        }
        TestType::RightTailed => 1.0 - normal_cdf(critical_value - z),
        TestType::LeftTailed => normal_cdf(critical_value - z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(test_type: TestType) -> ZTestInput {
        ZTestInput {
            null_mean: 0.0,
            true_mean: 0.5,
            sample_size: 30,
            sigma: 1.0,
            alpha: 0.05,
            test_type,
        }
    }

    #[test]
    fn test_two_tailed_scenario() {
        let result = input(TestType::TwoTailed).evaluate().unwrap();
        assert!((result.standard_error - 0.182_574).abs() < 1e-4);
        assert!((result.z_score - 2.738_613).abs() < 1e-3);
        assert_eq!(result.critical_value, 1.96);
        assert!(result.reject_null);
        assert!((result.p_value - 0.00617).abs() < 1e-3);
        assert!((result.power - 0.7819).abs() < 1e-3);
        assert_eq!(result.type_i_error, 0.05);
        assert!((result.power + result.type_ii_error - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_one_tailed_tests() {
        let right = input(TestType::RightTailed).evaluate().unwrap();
        assert_eq!(right.critical_value, 1.645);
        assert!((right.p_value - (1.0 - normal_cdf(right.z_score))).abs() < 1e-15);
        assert!(right.power > 0.85);

        let left = input(TestType::LeftTailed).evaluate().unwrap();
        assert_eq!(left.critical_value, -1.645);
        assert!(left.p_value > 0.99);
        assert!(left.power < 0.01);
        // the magnitude rule rejects in either direction
        assert!(left.reject_null);
    }

    #[test]
    fn test_alpha_ignored_by_conventional_policy() {
        let mut strict = input(TestType::TwoTailed);
        strict.alpha = 0.001;
        let result = strict.evaluate().unwrap();
        assert_eq!(result.critical_value, 1.96);
        assert_eq!(result.type_i_error, 0.001);
    }

    #[test]
    fn test_critical_values_from_alpha() {
        let policy = CriticalValuePolicy::FromAlpha;
        let two = policy.critical_value(TestType::TwoTailed, 0.05);
        let right = policy.critical_value(TestType::RightTailed, 0.05);
        let left = policy.critical_value(TestType::LeftTailed, 0.05);
        assert!((two - 1.959_964).abs() < 1e-4);
        assert!((right - 1.644_854).abs() < 1e-4);
        assert!((left + 1.644_854).abs() < 1e-4);
    }

    #[test]
    fn test_validation() {
        let mut bad = input(TestType::TwoTailed);
        bad.sigma = 0.0;
        assert!(bad.evaluate().is_err());

        let mut bad = input(TestType::TwoTailed);
        bad.sample_size = 0;
        assert!(bad.evaluate().is_err());

        for alpha in [0.0, 1.0, f64::NAN] {
            let mut bad = input(TestType::TwoTailed);
            bad.alpha = alpha;
            assert!(bad.evaluate().is_err());
        }
    }

    #[test]
    fn test_power_curve() {
        let curve = input(TestType::TwoTailed)
            .power_curve([-1.0, 0.0, 0.5, 1.0], CriticalValuePolicy::Conventional)
            .unwrap();
        assert_eq!(curve.len(), 4);
        // power at zero effect is the size of the test
        assert!((curve[1].power - 0.05).abs() < 1e-3);
        assert!((curve[0].power - curve[3].power).abs() < 1e-12);
        let at_true = input(TestType::TwoTailed).evaluate().unwrap().power;
        assert!((curve[2].power - at_true).abs() < 1e-12);
    }

    #[test]
    fn test_parse_test_type() {
        assert_eq!("two-tailed".parse::<TestType>(), Ok(TestType::TwoTailed));
        assert_eq!("Right-Tailed".parse::<TestType>(), Ok(TestType::RightTailed));
        assert_eq!("left-tailed".parse::<TestType>(), Ok(TestType::LeftTailed));
        assert!("both".parse::<TestType>().is_err());
        for test_type in TestType::ALL {
            assert_eq!(test_type.to_string().parse::<TestType>(), Ok(test_type));
        }
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TestType::RightTailed).unwrap();
        assert_eq!(json, "\"right-tailed\"");
        let result = input(TestType::TwoTailed).evaluate().unwrap();
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["reject_null"], true);
    }
}
