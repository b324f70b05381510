/// A distribution, test, or model parameter outside its valid domain.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidParameterError {
    #[display("{name} must be a probability in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[display("{name} must be finite and > 0, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[display("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[display("{name} must be in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[display("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: u64,
        value: u64,
    },
    #[display("min ({min}) must be less than max ({max})")]
    EmptyRange { min: f64, max: f64 },
    #[display("{name} must not be empty")]
    Empty { name: &'static str },
    #[display("{name} must have a positive total, got {total}")]
    ZeroMass { name: &'static str, total: f64 },
    #[display("{name} index {index} out of range for length {len}")]
    IndexOutOfRange {
        name: &'static str,
        index: usize,
        len: usize,
    },
    #[display("{name} must be square, row {row} has {len} entries but expected {expected}")]
    NotSquare {
        name: &'static str,
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("expected {expected} state labels, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },
    #[display("joint probability {joint} exceeds marginal probability {marginal}")]
    JointExceedsMarginal { joint: f64, marginal: f64 },
}

/// Error type for sampling, estimation, and testing operations.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum Error {
    #[display("invalid parameter: {_0}")]
    InvalidParameter(InvalidParameterError),
    #[display("{distribution} sampler gave up after {attempts} attempts")]
    #[from(ignore)]
    RetryLimitExceeded {
        distribution: &'static str,
        attempts: u32,
    },
    #[display("dataset is empty")]
    #[from(ignore)]
    EmptyData,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64, InvalidParameterError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(InvalidParameterError::Probability { name, value })
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64, InvalidParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(InvalidParameterError::NotPositive { name, value })
    }
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64, InvalidParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidParameterError::NotFinite { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks() {
        assert_eq!(check_probability("p", 0.0), Ok(0.0));
        assert_eq!(check_probability("p", 1.0), Ok(1.0));
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", f64::NAN).is_err());

        assert!(check_positive("rate", 0.0).is_err());
        assert!(check_positive("rate", -1.0).is_err());
        assert!(check_positive("rate", f64::INFINITY).is_err());
        assert_eq!(check_positive("rate", 2.5), Ok(2.5));

        assert!(check_finite("mean", f64::NEG_INFINITY).is_err());
        assert_eq!(check_finite("mean", -3.0), Ok(-3.0));
    }

    #[test]
    fn test_error_messages() {
        let err = Error::from(InvalidParameterError::EmptyRange { min: 2.0, max: 1.0 });
        assert_eq!(
            err.to_string(),
            "invalid parameter: min (2) must be less than max (1)"
        );

        let err = Error::RetryLimitExceeded {
            distribution: "gamma",
            attempts: 10,
        };
        assert_eq!(err.to_string(), "gamma sampler gave up after 10 attempts");
    }
}
