//! Numerical core of the probability explorer.
//!
//! This crate computes densities and moments of the named distributions,
//! draws random variates from them, fits parameters by maximum likelihood and
//! evaluates z-test arithmetic. Every routine is a pure function of its
//! inputs plus an explicit [`random::RandomSource`]; there is no global state.
//!
//! # Modules
//!
//! - [`math`]: factorial, binomial coefficient, gamma function, error function
//! - [`random`]: uniform sources and the bounded [`random::SamplingPolicy`]
//! - [`distribution`]: the distribution families (sampling, density, moments)
//! - [`mle`]: maximum-likelihood fits and log-likelihood
//! - [`hypothesis`]: one-sample z-test (p-value, power, error rates)
//! - [`bayes`]: diagnostic-test posteriors, conditional probability, conjugate
//!   normal updates
//! - [`markov`]: finite Markov chains (steady state, simulation)
//! - [`clt`]: sample-mean experiments for the central limit theorem
//! - [`process`]: discretised stochastic processes (random walks, GBM)
//!
//! # Example
//!
//! ```
//! use probscope_core::{
//!     distribution::{Discrete as _, Distribution as _, Binomial},
//!     hypothesis::{TestType, ZTestInput},
//! };
//! use rand::SeedableRng as _;
//!
//! let binomial = Binomial::new(10, 0.4)?;
//! assert!((binomial.pmf(4) - 0.250_822_656).abs() < 1e-9);
//!
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
//! let draws = binomial.sample_n(&mut rng, 1000)?;
//! assert!(draws.iter().all(|&k| k <= 10));
//!
//! let result = ZTestInput {
//!     null_mean: 0.0,
//!     true_mean: 0.5,
//!     sample_size: 30,
//!     sigma: 1.0,
//!     alpha: 0.05,
//!     test_type: TestType::TwoTailed,
//! }
//! .evaluate()?;
//! assert!(result.reject_null);
//! # Ok::<(), probscope_core::error::Error>(())
//! ```

pub mod bayes;
pub mod clt;
pub mod distribution;
pub mod error;
pub mod hypothesis;
pub mod markov;
pub mod math;
pub mod mle;
pub mod moments;
pub mod process;
pub mod random;
