use std::path::PathBuf;

use probscope_core::{
    distribution::{BivariateNormal, Continuous, Discrete, Distribution as _, Multinomial},
    moments::{Moments, MultinomialMoments},
    random::SamplingPolicy,
};
use probscope_stats::{
    comprehensive::{ComprehensiveStats, DEFAULT_PERCENTILES},
    descriptive::DescriptiveStats,
};
use rand::RngCore;
use serde::Serialize;

use super::family::{DistributionArg, FamilyKind, FamilyVisitor};
use crate::util::{GlobalArg, Report};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SampleArg {
    #[command(flatten)]
    distribution: DistributionArg,
    /// Number of draws
    #[arg(long, default_value_t = 1000)]
    count: usize,
    /// Number of histogram bins for continuous families
    #[arg(long, default_value_t = 30)]
    bins: usize,
    /// Include the raw draws in the output
    #[arg(long)]
    include_draws: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SampleReport<P, T, E, S> {
    family: FamilyKind,
    parameters: P,
    count: usize,
    theoretical: T,
    empirical: E,
    #[serde(skip_serializing_if = "Option::is_none")]
    draws: Option<Vec<S>>,
}

/// Per-category count summary of multinomial draws.
#[derive(Debug, Serialize)]
struct CategoryCounts {
    means: Vec<f64>,
    variances: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct PairSummary {
    x: DescriptiveStats,
    y: DescriptiveStats,
    correlation: f64,
}

#[derive(Debug, Serialize)]
struct PairMoments {
    x: Moments,
    y: Moments,
    correlation: f64,
}

struct Sampler<'a> {
    rng: &'a mut dyn RngCore,
    policy: SamplingPolicy,
    family: FamilyKind,
    count: usize,
    bins: usize,
    include_draws: bool,
}

impl Sampler<'_> {
    fn report<P, T, E, S>(
        &self,
        parameters: P,
        theoretical: T,
        empirical: E,
        draws: Vec<S>,
    ) -> serde_json::Result<serde_json::Value>
    where
        P: Serialize,
        T: Serialize,
        E: Serialize,
        S: Serialize,
    {
        serde_json::to_value(SampleReport {
            family: self.family,
            parameters,
            count: self.count,
            theoretical,
            empirical,
            draws: self.include_draws.then_some(draws),
        })
    }
}

impl FamilyVisitor for Sampler<'_> {
    type Output = serde_json::Value;

    fn discrete<D>(self, dist: &D) -> anyhow::Result<Self::Output>
    where
        D: Discrete + Serialize,
    {
        let draws = dist.sample_n_with(&mut *self.rng, self.count, self.policy)?;
        let empirical = ComprehensiveStats::from_integers(&draws, &DEFAULT_PERCENTILES);
        Ok(self.report(dist, dist.moments(), empirical, draws)?)
    }

    fn continuous<D>(self, dist: &D) -> anyhow::Result<Self::Output>
    where
        D: Continuous + Serialize,
    {
        let draws = dist.sample_n_with(&mut *self.rng, self.count, self.policy)?;
        let empirical = ComprehensiveStats::new(
            draws.iter().copied(),
            &DEFAULT_PERCENTILES,
            self.bins,
            None,
            None,
        );
        Ok(self.report(dist, dist.moments(), empirical, draws)?)
    }

    fn multinomial(self, dist: &Multinomial) -> anyhow::Result<Self::Output> {
        let draws = dist.sample_n_with(&mut *self.rng, self.count, self.policy)?;
        let empirical = category_counts(&draws, dist.probabilities().len());
        let theoretical: MultinomialMoments = dist.moments();
        Ok(self.report(dist, theoretical, empirical, draws)?)
    }

    fn bivariate_normal(self, dist: &BivariateNormal) -> anyhow::Result<Self::Output> {
        let draws = dist.sample_n_with(&mut *self.rng, self.count, self.policy)?;
        let theoretical = PairMoments {
            x: Moments::new(dist.mean_x(), dist.std_x() * dist.std_x())
                .with_mode(dist.mean_x())
                .with_median(dist.mean_x()),
            y: Moments::new(dist.mean_y(), dist.std_y() * dist.std_y())
                .with_mode(dist.mean_y())
                .with_median(dist.mean_y()),
            correlation: dist.correlation(),
        };
        let empirical = pair_summary(&draws);
        Ok(self.report(dist, theoretical, empirical, draws)?)
    }
}

pub(crate) fn run(global: &GlobalArg, arg: &SampleArg) -> anyhow::Result<()> {
    let SampleArg {
        distribution,
        count,
        bins,
        include_draws,
        output,
    } = arg;
    anyhow::ensure!(*count > 0, "--count must be at least 1");
    anyhow::ensure!(*bins > 0, "--bins must be at least 1");

    let mut rng = global.rng();
    tracing::info!("Drawing {count} samples from {:?}", distribution.family);
    let result = distribution.visit(Sampler {
        rng: &mut *rng,
        policy: global.policy(),
        family: distribution.family,
        count: *count,
        bins: *bins,
        include_draws: *include_draws,
    })?;
    Report::new("sample", global, result).save(output.clone())
}

#[expect(clippy::cast_precision_loss)]
fn category_counts(draws: &[Vec<u64>], categories: usize) -> CategoryCounts {
    let n = draws.len().max(1) as f64;
    let mut means = vec![0.0; categories];
    let mut squares = vec![0.0; categories];
    for counts in draws {
        for (k, &c) in counts.iter().enumerate() {
            let c = c as f64;
            means[k] += c;
            squares[k] += c * c;
        }
    }
    let (means, variances) = means
        .iter()
        .zip(&squares)
        .map(|(sum, sq)| {
            let mean = sum / n;
            (mean, (sq / n - mean * mean).max(0.0))
        })
        .unzip();
    CategoryCounts { means, variances }
}

/// Marginal summaries and Pearson correlation of paired draws.
#[expect(clippy::cast_precision_loss)]
fn pair_summary(draws: &[(f64, f64)]) -> Option<PairSummary> {
    let x = DescriptiveStats::new(draws.iter().map(|(x, _)| *x))?;
    let y = DescriptiveStats::new(draws.iter().map(|(_, y)| *y))?;
    let covariance = draws
        .iter()
        .map(|(a, b)| (a - x.mean) * (b - y.mean))
        .sum::<f64>()
        / draws.len() as f64;
    let correlation = if x.std_dev > 0.0 && y.std_dev > 0.0 {
        covariance / (x.std_dev * y.std_dev)
    } else {
        0.0
    };
    Some(PairSummary { x, y, correlation })
}

#[cfg(test)]
mod tests {
    use probscope_core::distribution::{BivariateNormal, Distribution as _};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn test_category_counts() {
        let draws = vec![vec![2, 0, 1], vec![0, 2, 1]];
        let summary = category_counts(&draws, 3);
        assert_eq!(summary.means, vec![1.0, 1.0, 1.0]);
        assert_eq!(summary.variances, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_pair_summary_recovers_correlation() {
        let dist = BivariateNormal::new(0.0, 0.0, 1.0, 2.0, 0.8).unwrap();
        let mut rng = Pcg64::seed_from_u64(9);
        let draws = dist.sample_n(&mut rng, 20_000).unwrap();
        let summary = pair_summary(&draws).unwrap();
        assert!((summary.correlation - 0.8).abs() < 0.02);
        assert!((summary.y.std_dev - 2.0).abs() < 0.05);
        assert!(pair_summary(&[]).is_none());
    }

    #[test]
    fn test_sampler_report_shape() {
        let dist = probscope_core::distribution::Poisson::new(3.0).unwrap();
        let mut rng = Pcg64::seed_from_u64(1);
        let sampler = Sampler {
            rng: &mut rng,
            policy: SamplingPolicy::default(),
            family: FamilyKind::Poisson,
            count: 200,
            bins: 10,
            include_draws: false,
        };
        let report = sampler.discrete(&dist).unwrap();
        assert_eq!(report["family"], "poisson");
        assert_eq!(report["theoretical"]["mean"], 3.0);
        assert_eq!(report["empirical"]["stats"]["count"], 200);
        assert!(report.get("draws").is_none());
    }

    #[test]
    fn test_sampler_tiny_shape_beta_report() {
        let dist = probscope_core::distribution::Beta::new(0.001, 0.001).unwrap();
        let mut rng = Pcg64::seed_from_u64(1);
        let sampler = Sampler {
            rng: &mut rng,
            policy: SamplingPolicy::default(),
            family: FamilyKind::Beta,
            count: 1000,
            bins: 10,
            include_draws: true,
        };
        let report = sampler.continuous(&dist).unwrap();
        assert_eq!(report["empirical"]["stats"]["count"], 1000);
        let draws = report["draws"].as_array().unwrap();
        assert!(
            draws
                .iter()
                .all(|x| x.as_f64().is_some_and(|x| (0.0..=1.0).contains(&x)))
        );
    }
}
