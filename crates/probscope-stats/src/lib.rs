//! Empirical statistics over drawn datasets.
//!
//! This crate summarises the samples produced by the distribution generators in
//! `probscope-core`:
//!
//! - **Descriptive statistics**: mean, median, population and sample variance, etc.
//! - **Percentiles**: nearest-rank percentile lookup
//! - **Histogram generation**: equal-width bins for continuous draws, per-value
//!   counts for integer draws
//! - **Comprehensive statistics**: descriptive statistics, percentiles, and a
//!   histogram computed in one pass over sorted data
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and storage
//! - [`histogram`]: Histogram construction for plotting empirical distributions
//! - [`comprehensive`]: Combined summary used by the command-line front end
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use probscope_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, 2.0);
//! assert_eq!(stats.sample_variance, 2.5);
//! ```
//!
//! ## Creating a histogram
//!
//! ```
//! use probscope_stats::histogram::Histogram;
//!
//! let values = [0.1, 0.2, 0.25, 0.7, 0.9];
//! let histogram = Histogram::new(values, 2, Some(0.0), Some(1.0));
//! assert_eq!(histogram.bins[0].count, 3);
//! assert_eq!(histogram.bins[1].count, 2);
//! ```

pub mod comprehensive;
pub mod descriptive;
pub mod histogram;
pub mod percentiles;
