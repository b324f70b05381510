use serde::Serialize;

/// Descriptive statistics summarizing an empirical dataset.
///
/// Both the population variance (divide by `n`, the maximum-likelihood
/// estimate) and the unbiased sample variance (divide by `n - 1`) are reported,
/// since different consumers expect different conventions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// Number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median value of the dataset (upper median for even counts).
    pub median: f64,
    /// Population variance (`Σ(x - mean)² / n`).
    pub variance: f64,
    /// Unbiased sample variance (`Σ(x - mean)² / (n - 1)`), `0` for a single value.
    pub sample_variance: f64,
    /// Population standard deviation (`sqrt(variance)`).
    pub std_dev: f64,
    /// Sample standard deviation (`sqrt(sample_variance)`).
    pub sample_std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use probscope_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probscope_stats::descriptive::DescriptiveStats;
    /// let mut values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// values.sort_by(f64::total_cmp);
    /// let stats = DescriptiveStats::from_sorted(&values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = sorted_values[count / 2];
        let sum_sq = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>();
        let variance = sum_sq / n;
        let sample_variance = if count > 1 { sum_sq / (n - 1.0) } else { 0.0 };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            sample_variance,
            std_dev: variance.sqrt(),
            sample_std_dev: sample_variance.sqrt(),
        })
    }
}

/// Arithmetic mean of a dataset without sorting it.
///
/// Returns `None` for an empty dataset.
///
/// # Examples
///
/// ```
/// # use probscope_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (`/ n`) of a dataset without sorting it.
///
/// Returns `None` for an empty dataset.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some(sum_sq / values.len() as f64)
}

/// Unbiased sample variance (`/ (n - 1)`) of a dataset without sorting it.
///
/// Returns `None` when fewer than two values are given.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some(sum_sq / (values.len() - 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset() {
        assert!(DescriptiveStats::new(Vec::new()).is_none());
        assert!(mean(&[]).is_none());
        assert!(population_variance(&[]).is_none());
        assert!(sample_variance(&[1.0]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([4.2]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 4.2);
        assert_eq!(stats.max, 4.2);
        assert_eq!(stats.median, 4.2);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.sample_variance, 0.0);
    }

    #[test]
    fn test_variance_conventions() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = DescriptiveStats::new(values).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.variance, 4.0);
        assert_eq!(stats.std_dev, 2.0);
        assert!((stats.sample_variance - 32.0 / 7.0).abs() < 1e-12);

        assert_eq!(population_variance(&values), Some(4.0));
        assert!((sample_variance(&values).unwrap() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let stats = DescriptiveStats::new([3.0, -1.0, 2.0]).unwrap();
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn test_serializes_field_names() {
        let stats = DescriptiveStats::new([1.0, 3.0]).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["mean"], 2.0);
        assert_eq!(json["sample_variance"], 2.0);
        assert_eq!(json["count"], 2);
    }
}
