use std::{collections::BTreeMap, ops::Range};

use serde::Serialize;

/// A histogram of an empirical dataset.
///
/// Continuous draws are counted into equal-width bins spanning either the data
/// range or caller-supplied bounds; values outside explicit bounds are tallied
/// separately so no draw is silently lost. Integer draws use one bin per
/// observed value (see [`Histogram::from_integers`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
    /// Number of values below the first bin.
    pub underflow: u64,
    /// Number of values at or above the end of the last bin.
    pub overflow: u64,
    /// Total number of values counted (including underflow and overflow).
    pub total: u64,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl HistogramBin {
    /// Width of the bin.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.range.end - self.range.start
    }
}

impl Histogram {
    /// Creates an equal-width histogram from unsorted values.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to bin.
    /// * `num_bins` - The number of bins to create.
    /// * `explicit_min` - If provided, overrides the lower bound (defaults to the data minimum).
    /// * `explicit_max` - If provided, overrides the upper bound (defaults to the data maximum).
    ///
    /// The last bin includes the upper bound so that the maximum draw is counted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probscope_stats::histogram::Histogram;
    /// let values = [5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 6.0, 10.0];
    /// let histogram = Histogram::new(values, 5, None, None);
    /// assert_eq!(histogram.bins.len(), 5);
    /// assert!(histogram.bins.iter().all(|bin| bin.count == 2));
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(
        values: I,
        num_bins: usize,
        explicit_min: Option<f64>,
        explicit_max: Option<f64>,
    ) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        let total = values.len() as u64;
        if values.is_empty() || num_bins == 0 {
            return Self {
                bins: vec![],
                underflow: 0,
                overflow: 0,
                total,
            };
        }

        let lower = explicit_min
            .unwrap_or_else(|| values.iter().copied().fold(f64::INFINITY, f64::min));
        let mut upper = explicit_max
            .unwrap_or_else(|| values.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        if upper - lower < f64::EPSILON {
            // All mass on one value; give the single-point range unit width.
            upper = lower + 1.0;
        }

        let width = (upper - lower) / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|idx| {
                // Recompute each edge from the bounds to avoid accumulating rounding error.
                let start = lower + (upper - lower) * (idx as f64) / (num_bins as f64);
                let end = if idx + 1 == num_bins {
                    upper
                } else {
                    lower + (upper - lower) * ((idx + 1) as f64) / (num_bins as f64)
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect::<Vec<_>>();

        let mut underflow = 0;
        let mut overflow = 0;
        for val in values {
            if val < lower {
                underflow += 1;
            } else if val > upper {
                overflow += 1;
            } else {
                let idx = (((val - lower) / width).floor() as usize).min(num_bins - 1);
                bins[idx].count += 1;
            }
        }

        Self {
            bins,
            underflow,
            overflow,
            total,
        }
    }

    /// Creates a histogram with one unit-width bin per observed integer value.
    ///
    /// Bins are centred on the integer (`k - 0.5 .. k + 0.5`) and cover every value
    /// between the smallest and the largest observation, including values with a
    /// zero count, so the result lines up with a probability mass function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probscope_stats::histogram::Histogram;
    /// let histogram = Histogram::from_integers([0, 2, 2, 3]);
    /// let counts: Vec<_> = histogram.bins.iter().map(|bin| bin.count).collect();
    /// assert_eq!(counts, [1, 0, 2, 1]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_integers<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut counts = BTreeMap::<u64, u64>::new();
        let mut total = 0;
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
            total += 1;
        }
        let (Some(&first), Some(&last)) = (counts.keys().next(), counts.keys().next_back()) else {
            return Self {
                bins: vec![],
                underflow: 0,
                overflow: 0,
                total,
            };
        };

        let bins = (first..=last)
            .map(|k| HistogramBin {
                range: (k as f64 - 0.5)..(k as f64 + 0.5),
                count: counts.get(&k).copied().unwrap_or(0),
            })
            .collect();
        Self {
            bins,
            underflow: 0,
            overflow: 0,
            total,
        }
    }

    /// Returns the empirical density of each bin (`count / (total * width)`).
    ///
    /// The densities are directly comparable with a probability density (or, for
    /// unit-width integer bins, a probability mass) evaluated at the bin centres.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn densities(&self) -> Vec<f64> {
        if self.total == 0 {
            return vec![0.0; self.bins.len()];
        }
        let total = self.total as f64;
        self.bins
            .iter()
            .map(|bin| bin.count as f64 / (total * bin.width()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        let histogram = Histogram::new(Vec::new(), 10, None, None);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.total, 0);

        let histogram = Histogram::from_integers(Vec::new());
        assert!(histogram.bins.is_empty());
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let histogram = Histogram::new([0.0, 1.0], 4, None, None);
        assert_eq!(histogram.bins[0].count, 1);
        assert_eq!(histogram.bins[3].count, 1);
        assert_eq!(histogram.overflow, 0);
    }

    #[test]
    fn test_explicit_bounds_track_outliers() {
        let histogram = Histogram::new([-1.0, 0.5, 1.5, 3.0], 2, Some(0.0), Some(2.0));
        assert_eq!(histogram.underflow, 1);
        assert_eq!(histogram.overflow, 1);
        assert_eq!(histogram.bins[0].count, 1);
        assert_eq!(histogram.bins[1].count, 1);
        assert_eq!(histogram.total, 4);
    }

    #[test]
    fn test_constant_values() {
        let histogram = Histogram::new([2.0; 5], 3, None, None);
        let counted = histogram.bins.iter().map(|b| b.count).sum::<u64>();
        assert_eq!(counted, 5);
    }

    #[test]
    fn test_densities_integrate_to_one() {
        let values = (0..1000).map(|i| f64::from(i) / 1000.0);
        let histogram = Histogram::new(values, 20, Some(0.0), Some(1.0));
        let area = histogram
            .bins
            .iter()
            .zip(histogram.densities())
            .map(|(bin, density)| bin.width() * density)
            .sum::<f64>();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_integer_bins_are_unit_width() {
        let histogram = Histogram::from_integers([1, 1, 4]);
        assert_eq!(histogram.bins.len(), 4);
        assert!(histogram.bins.iter().all(|b| (b.width() - 1.0).abs() < 1e-12));
        let densities = histogram.densities();
        assert!((densities[0] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(densities[1], 0.0);
    }
}
