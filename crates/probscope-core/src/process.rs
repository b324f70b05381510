//! Discretised stochastic processes on a daily grid.
//!
//! Each step draws a Brownian increment `dW ~ N(0, √dt)` with
//! `dt = 1/252` (one trading day) and applies:
//!
//! | kind | update |
//! |---|---|
//! | `random-walk` | `x + σ·dW` |
//! | `random-walk-drift` | `x + μ·dt + σ·dW` |
//! | `mean-reverting` | `x + θ(m − x)·dt + σ·dW` |
//! | `geometric-brownian` | `x·exp((μ − σ²/2)·dt + σ·dW)` |
//!
//! # Examples
//!
//! ```
//! use probscope_core::{
//!     process::{ProcessKind, ProcessParams, SeriesStats, simulate},
//!     random::SamplingPolicy,
//! };
//! use rand::SeedableRng as _;
//!
//! let params = ProcessParams { drift: 0.1, ..ProcessParams::default() };
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(12);
//! let series = simulate(ProcessKind::GeometricBrownian, &params, &mut rng, SamplingPolicy::default())?;
//! assert_eq!(series.len(), 250);
//! assert_eq!(series[0], 1.0);
//! assert!(series.iter().all(|&x| x > 0.0));
//!
//! let stats = SeriesStats::new(&series).unwrap();
//! assert!(stats.min <= stats.mean && stats.mean <= stats.max);
//! # Ok::<(), probscope_core::error::Error>(())
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    distribution::{Distribution as _, Normal},
    error::{InvalidParameterError, Result, check_finite},
    random::{RandomSource, SamplingPolicy},
};

/// Time step: one trading day out of 252 per year.
pub const DT: f64 = 1.0 / 252.0;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessKind {
    #[default]
    RandomWalk,
    RandomWalkDrift,
    MeanReverting,
    GeometricBrownian,
}

impl ProcessKind {
    pub const ALL: [Self; 4] = [
        Self::RandomWalk,
        Self::RandomWalkDrift,
        Self::MeanReverting,
        Self::GeometricBrownian,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RandomWalk => "random-walk",
            Self::RandomWalkDrift => "random-walk-drift",
            Self::MeanReverting => "mean-reverting",
            Self::GeometricBrownian => "geometric-brownian",
        }
    }

    /// Starting value used when none is given: `1` for geometric Brownian
    /// motion (which stays at zero once there), `0` otherwise.
    #[must_use]
    pub const fn default_initial_value(self) -> f64 {
        match self {
            Self::GeometricBrownian => 1.0,
            _ => 0.0,
        }
    }

    fn step(self, params: &ProcessParams, value: f64, dw: f64) -> f64 {
        let ProcessParams {
            drift,
            volatility,
            mean_reversion,
            long_term_mean,
            ..
        } = *params;
        match self {
            Self::RandomWalk => value + volatility * dw,
            Self::RandomWalkDrift => value + drift * DT + volatility * dw,
            Self::MeanReverting => {
                value + mean_reversion * (long_term_mean - value) * DT + volatility * dw
            }
            Self::GeometricBrownian => {
                value * ((drift - 0.5 * volatility * volatility) * DT + volatility * dw).exp()
            }
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown process kind `{input}`")]
pub struct ParseProcessKindError {
    input: String,
}

impl FromStr for ProcessKind {
    type Err = ParseProcessKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseProcessKindError {
                input: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessParams {
    /// Annualised drift `μ`.
    pub drift: f64,
    /// Annualised volatility `σ`.
    pub volatility: f64,
    /// Reversion speed `θ` of the mean-reverting process.
    pub mean_reversion: f64,
    /// Level `m` the mean-reverting process is pulled towards.
    pub long_term_mean: f64,
    /// Length of the series, including the starting value.
    pub time_steps: usize,
    /// Starting value; see [`ProcessKind::default_initial_value`].
    pub initial_value: Option<f64>,
}

impl Default for ProcessParams {
    fn default() -> Self {
        Self {
            drift: 0.0,
            volatility: 1.0,
            mean_reversion: 0.1,
            long_term_mean: 0.0,
            time_steps: 250,
            initial_value: None,
        }
    }
}

impl ProcessParams {
    fn validate(&self, kind: ProcessKind) -> Result<f64, InvalidParameterError> {
        check_finite("drift", self.drift)?;
        check_finite("long_term_mean", self.long_term_mean)?;
        for (name, value) in [
            ("volatility", self.volatility),
            ("mean_reversion", self.mean_reversion),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(InvalidParameterError::OutOfRange {
                    name,
                    range: "[0, inf)",
                    value,
                });
            }
        }
        if self.time_steps == 0 {
            return Err(InvalidParameterError::TooSmall {
                name: "time_steps",
                min: 1,
                value: 0,
            });
        }
        check_finite(
            "initial_value",
            self.initial_value.unwrap_or(kind.default_initial_value()),
        )
    }
}

/// Simulates `params.time_steps` values of the process.
pub fn simulate<R>(
    kind: ProcessKind,
    params: &ProcessParams,
    rng: &mut R,
    policy: SamplingPolicy,
) -> Result<Vec<f64>>
where
    R: RandomSource + ?Sized,
{
    let initial = params.validate(kind)?;
    let increment = Normal::new(0.0, DT.sqrt())?;
    let mut series = Vec::with_capacity(params.time_steps);
    let mut value = initial;
    series.push(value);
    for _ in 1..params.time_steps {
        let dw = increment.sample_with(rng, policy)?;
        value = kind.step(params, value, dw);
        series.push(value);
    }
    Ok(series)
}

/// Level and first-difference statistics of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub mean: f64,
    /// Sample (`/ (n - 1)`) standard deviation of the levels.
    pub std_dev: f64,
    /// Mean of the first differences.
    pub mean_return: f64,
    /// Sample standard deviation of the first differences; `0` with a
    /// single difference.
    pub volatility: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    /// Returns `None` for series shorter than two values.
    #[must_use]
    pub fn new(series: &[f64]) -> Option<Self> {
        use probscope_stats::descriptive::{mean, sample_variance};

        let returns = series.windows(2).map(|w| w[1] - w[0]).collect::<Vec<_>>();
        Some(Self {
            mean: mean(series)?,
            std_dev: sample_variance(series)?.sqrt(),
            mean_return: mean(&returns)?,
            volatility: sample_variance(&returns).map_or(0.0, f64::sqrt),
            min: series.iter().copied().fold(f64::INFINITY, f64::min),
            max: series.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn run(kind: ProcessKind, params: &ProcessParams, seed: u64) -> Vec<f64> {
        let mut rng = Pcg64::seed_from_u64(seed);
        simulate(kind, params, &mut rng, SamplingPolicy::default()).unwrap()
    }

    #[test]
    fn test_series_length_and_start() {
        for kind in ProcessKind::ALL {
            let series = run(kind, &ProcessParams::default(), 1);
            assert_eq!(series.len(), 250);
            assert_eq!(series[0], kind.default_initial_value());
        }
        let params = ProcessParams {
            time_steps: 1,
            initial_value: Some(5.0),
            ..ProcessParams::default()
        };
        assert_eq!(run(ProcessKind::RandomWalk, &params, 1), vec![5.0]);
    }

    #[test]
    fn test_zero_volatility_is_deterministic() {
        let params = ProcessParams {
            drift: 2.52,
            volatility: 0.0,
            time_steps: 11,
            ..ProcessParams::default()
        };
        let series = run(ProcessKind::RandomWalkDrift, &params, 2);
        // 10 steps of drift·dt = 0.01
        assert!((series[10] - 0.1).abs() < 1e-12);

        let params = ProcessParams {
            volatility: 0.0,
            mean_reversion: 252.0,
            long_term_mean: 3.0,
            time_steps: 3,
            ..ProcessParams::default()
        };
        // θ·dt = 1 jumps straight to the long-term mean
        let series = run(ProcessKind::MeanReverting, &params, 3);
        assert_eq!(series[0], 0.0);
        assert!(series[1..].iter().all(|x| (x - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_random_walk_increments() {
        let params = ProcessParams {
            volatility: 2.0,
            time_steps: 20_001,
            ..ProcessParams::default()
        };
        let series = run(ProcessKind::RandomWalk, &params, 4);
        let stats = SeriesStats::new(&series).unwrap();
        let expected = 2.0 * DT.sqrt();
        assert!((stats.volatility - expected).abs() < 0.05 * expected);
        assert!(stats.mean_return.abs() < 0.01);
    }

    #[test]
    fn test_validation() {
        let mut rng = Pcg64::seed_from_u64(5);
        let policy = SamplingPolicy::default();
        let bad = ProcessParams {
            volatility: -1.0,
            ..ProcessParams::default()
        };
        assert!(simulate(ProcessKind::RandomWalk, &bad, &mut rng, policy).is_err());
        let bad = ProcessParams {
            time_steps: 0,
            ..ProcessParams::default()
        };
        assert!(simulate(ProcessKind::RandomWalk, &bad, &mut rng, policy).is_err());
    }

    #[test]
    fn test_series_stats() {
        let stats = SeriesStats::new(&[1.0, 3.0, 2.0, 6.0]).unwrap();
        assert_eq!(stats.mean, 3.0);
        assert!((stats.std_dev - (14.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((stats.mean_return - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 6.0);
        assert!(SeriesStats::new(&[1.0]).is_none());
        assert_eq!(SeriesStats::new(&[1.0, 2.0]).unwrap().volatility, 0.0);
    }

    #[test]
    fn test_parse_kind() {
        for kind in ProcessKind::ALL {
            assert_eq!(kind.to_string().parse::<ProcessKind>(), Ok(kind));
        }
        assert!("brownian".parse::<ProcessKind>().is_err());
    }
}
