use std::path::PathBuf;

use probscope_core::{
    clt::{Bimodal, CltSummary, sample_means},
    distribution::{Continuous, Exponential, Uniform},
};
use probscope_stats::histogram::Histogram;
use serde::Serialize;

use crate::util::{GlobalArg, Report};

/// Population the samples are drawn from.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::FromStr)]
#[serde(rename_all = "kebab-case")]
enum Source {
    #[default]
    Uniform,
    Exponential,
    Bimodal,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CltArg {
    /// uniform (on [0, 1)), exponential (rate 1) or bimodal
    #[arg(long, default_value = "uniform")]
    source: Source,
    /// Draws averaged into each sample mean
    #[arg(long, default_value_t = 30)]
    sample_size: usize,
    /// Number of sample means
    #[arg(long, default_value_t = 1000)]
    num_samples: usize,
    /// Number of histogram bins for the sample means
    #[arg(long, default_value_t = 30)]
    bins: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CltReport {
    source: Source,
    summary: CltSummary,
    histogram: Histogram,
}

pub(crate) fn run(global: &GlobalArg, arg: &CltArg) -> anyhow::Result<()> {
    let report = match arg.source {
        Source::Uniform => experiment(global, arg, &Uniform::new(0.0, 1.0)?)?,
        Source::Exponential => experiment(global, arg, &Exponential::new(1.0)?)?,
        Source::Bimodal => experiment(global, arg, &Bimodal)?,
    };
    Report::new("clt", global, report).save(arg.output.clone())
}

fn experiment<D>(global: &GlobalArg, arg: &CltArg, dist: &D) -> anyhow::Result<CltReport>
where
    D: Continuous,
{
    anyhow::ensure!(arg.bins > 0, "--bins must be at least 1");
    tracing::info!(
        "Computing {} means of {} draws from {:?}",
        arg.num_samples,
        arg.sample_size,
        arg.source
    );
    let mut rng = global.rng();
    let means = sample_means(
        dist,
        arg.sample_size,
        arg.num_samples,
        &mut *rng,
        global.policy(),
    )?;
    let summary = CltSummary::new(dist, arg.sample_size, &means)?;
    Ok(CltReport {
        source: arg.source,
        summary,
        histogram: Histogram::new(means, arg.bins, None, None),
    })
}
