use serde::Serialize;

use crate::{descriptive::DescriptiveStats, histogram::Histogram, percentiles::Percentiles};

/// Percentile points reported by default.
pub const DEFAULT_PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Complete statistical overview of an empirical dataset.
///
/// Combines descriptive statistics, percentile values, and a histogram, which
/// is everything a plotting front end needs to draw a batch of draws next to
/// the theoretical curve.
///
/// # Examples
///
/// ```
/// use probscope_stats::comprehensive::ComprehensiveStats;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let stats = ComprehensiveStats::new(values, &[25.0, 50.0, 75.0], 5, None, None).unwrap();
///
/// assert_eq!(stats.stats.mean, 5.5);
/// assert_eq!(stats.percentiles.get(50.0), Some(6.0));
/// assert_eq!(stats.histogram.bins.len(), 5);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveStats {
    /// Basic descriptive statistics for the dataset.
    pub stats: DescriptiveStats,
    /// Precomputed percentile values.
    pub percentiles: Percentiles,
    /// Histogram of the values.
    pub histogram: Histogram,
}

impl ComprehensiveStats {
    /// Computes comprehensive statistics from unsorted values.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to analyze
    /// * `percentile_points` - The percentile points to compute (e.g., [25.0, 50.0, 75.0])
    /// * `hist_num_bins` - The number of histogram bins
    /// * `hist_min` - Optional explicit minimum value for histogram bounds
    /// * `hist_max` - Optional explicit maximum value for histogram bounds
    ///
    /// # Returns
    ///
    /// * `Some(ComprehensiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    #[must_use]
    pub fn new<I>(
        values: I,
        percentile_points: &[f64],
        hist_num_bins: usize,
        hist_min: Option<f64>,
        hist_max: Option<f64>,
    ) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        let stats = DescriptiveStats::from_sorted(&sorted)?;
        let percentiles = Percentiles::from_sorted(&sorted, percentile_points);
        let histogram = Histogram::new(sorted, hist_num_bins, hist_min, hist_max);
        Some(Self {
            stats,
            percentiles,
            histogram,
        })
    }

    /// Computes comprehensive statistics for integer-valued draws.
    ///
    /// The histogram has one bin per integer value (see [`Histogram::from_integers`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use probscope_stats::comprehensive::{ComprehensiveStats, DEFAULT_PERCENTILES};
    ///
    /// let stats = ComprehensiveStats::from_integers(&[0, 1, 1, 2], &DEFAULT_PERCENTILES).unwrap();
    /// assert_eq!(stats.stats.mean, 1.0);
    /// assert_eq!(stats.histogram.bins.len(), 3);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_integers(values: &[u64], percentile_points: &[f64]) -> Option<Self> {
        let mut sorted = values.iter().map(|&v| v as f64).collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        let stats = DescriptiveStats::from_sorted(&sorted)?;
        let percentiles = Percentiles::from_sorted(&sorted, percentile_points);
        let histogram = Histogram::from_integers(values.iter().copied());
        Some(Self {
            stats,
            percentiles,
            histogram,
        })
    }
}
