//! Finite discrete-time Markov chains.
//!
//! # Examples
//!
//! ```
//! use probscope_core::markov::MarkovPreset;
//! use rand::SeedableRng as _;
//!
//! let chain = MarkovPreset::Weather.chain();
//! let steady = chain.steady_state(100);
//! assert!((steady.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//!
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(3);
//! let path = chain.simulate(&mut rng, 0, 49)?;
//! assert_eq!(path.len(), 50);
//! # Ok::<(), probscope_core::error::InvalidParameterError>(())
//! ```

use serde::Serialize;

use crate::{error::InvalidParameterError, random::RandomSource};

/// Power-iteration steps used when no count is given.
pub const DEFAULT_STEADY_STATE_ITERATIONS: usize = 100;

/// A row-stochastic transition matrix with state labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkovChain {
    states: Vec<String>,
    transitions: Vec<Vec<f64>>,
}

/// Built-in three-state chains.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum MarkovPreset {
    #[default]
    Weather,
    Stock,
    Customer,
}

impl MarkovPreset {
    #[must_use]
    pub fn chain(self) -> MarkovChain {
        let (states, transitions) = match self {
            Self::Weather => (
                ["Sunny", "Cloudy", "Rainy"],
                [[0.7, 0.2, 0.1], [0.3, 0.4, 0.3], [0.2, 0.3, 0.5]],
            ),
            Self::Stock => (
                ["Bull", "Stable", "Bear"],
                [[0.6, 0.3, 0.1], [0.2, 0.6, 0.2], [0.1, 0.4, 0.5]],
            ),
            Self::Customer => (
                ["Active", "Inactive", "Churned"],
                [[0.8, 0.15, 0.05], [0.3, 0.5, 0.2], [0.1, 0.1, 0.8]],
            ),
        };
        MarkovChain {
            states: states.map(String::from).to_vec(),
            transitions: transitions.map(|row| row.to_vec()).to_vec(),
        }
    }
}

impl MarkovChain {
    /// Builds a chain from non-negative transition weights, normalising each
    /// row to sum to 1.
    ///
    /// States are labelled `S0`, `S1`, ... .
    pub fn new(transitions: Vec<Vec<f64>>) -> Result<Self, InvalidParameterError> {
        let states = (0..transitions.len()).map(|i| format!("S{i}")).collect();
        Self::with_states(states, transitions)
    }

    pub fn with_states(
        states: Vec<String>,
        transitions: Vec<Vec<f64>>,
    ) -> Result<Self, InvalidParameterError> {
        let n = transitions.len();
        if n == 0 {
            return Err(InvalidParameterError::Empty {
                name: "transition matrix",
            });
        }
        if states.len() != n {
            return Err(InvalidParameterError::LabelCountMismatch {
                expected: n,
                actual: states.len(),
            });
        }
        let transitions = transitions
            .into_iter()
            .enumerate()
            .map(|(row, weights)| {
                if weights.len() != n {
                    return Err(InvalidParameterError::NotSquare {
                        name: "transition matrix",
                        row,
                        len: weights.len(),
                        expected: n,
                    });
                }
                normalize_row(weights)
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            states,
            transitions,
        })
    }

    #[must_use]
    pub fn states(&self) -> &[String] {
        &self.states
    }

    #[must_use]
    pub fn transitions(&self) -> &[Vec<f64>] {
        &self.transitions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Sets one transition weight and renormalises its row.
    pub fn with_transition(
        mut self,
        from: usize,
        to: usize,
        weight: f64,
    ) -> Result<Self, InvalidParameterError> {
        let len = self.len();
        for index in [from, to] {
            if index >= len {
                return Err(InvalidParameterError::IndexOutOfRange {
                    name: "state",
                    index,
                    len,
                });
            }
        }
        let mut row = self.transitions[from].clone();
        row[to] = weight;
        self.transitions[from] = normalize_row(row)?;
        Ok(self)
    }

    /// Stationary distribution by power iteration from the uniform vector.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn steady_state(&self, iterations: usize) -> Vec<f64> {
        let n = self.len();
        let mut state = vec![1.0 / n as f64; n];
        for _ in 0..iterations {
            state = (0..n)
                .map(|j| {
                    state
                        .iter()
                        .zip(&self.transitions)
                        .map(|(p, row)| p * row[j])
                        .sum::<f64>()
                })
                .collect();
        }
        state
    }

    /// Next state from `state`: the first whose cumulative probability reaches
    /// a uniform draw, or the last state if rounding leaves it uncovered.
    pub fn step<R>(&self, rng: &mut R, state: usize) -> Result<usize, InvalidParameterError>
    where
        R: RandomSource + ?Sized,
    {
        let row = self
            .transitions
            .get(state)
            .ok_or(InvalidParameterError::IndexOutOfRange {
                name: "state",
                index: state,
                len: self.len(),
            })?;
        let r = rng.next_uniform();
        let mut cumulative = 0.0;
        Ok(row
            .iter()
            .position(|p| {
                cumulative += p;
                r <= cumulative
            })
            .unwrap_or(row.len() - 1))
    }

    /// Runs `steps` transitions from `start`; the path includes `start`.
    pub fn simulate<R>(
        &self,
        rng: &mut R,
        start: usize,
        steps: usize,
    ) -> Result<Vec<usize>, InvalidParameterError>
    where
        R: RandomSource + ?Sized,
    {
        let mut path = Vec::with_capacity(steps + 1);
        let mut state = start;
        if state >= self.len() {
            return Err(InvalidParameterError::IndexOutOfRange {
                name: "state",
                index: state,
                len: self.len(),
            });
        }
        path.push(state);
        for _ in 0..steps {
            state = self.step(rng, state)?;
            path.push(state);
        }
        Ok(path)
    }

    /// Fraction of the path spent in each state.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn visit_frequencies(&self, path: &[usize]) -> Vec<f64> {
        let mut counts = vec![0_usize; self.len()];
        for &state in path {
            if let Some(count) = counts.get_mut(state) {
                *count += 1;
            }
        }
        let total = path.len().max(1) as f64;
        counts.into_iter().map(|c| c as f64 / total).collect()
    }
}

fn normalize_row(weights: Vec<f64>) -> Result<Vec<f64>, InvalidParameterError> {
    let name = "transition row";
    if let Some(&value) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(InvalidParameterError::Probability { name, value });
    }
    let total = weights.iter().sum::<f64>();
    if total <= 0.0 {
        return Err(InvalidParameterError::ZeroMass { name, total });
    }
    Ok(weights.into_iter().map(|w| w / total).collect())
}
