use std::path::PathBuf;

use probscope_core::process::{self, ProcessKind, ProcessParams, SeriesStats};
use serde::Serialize;

use crate::util::{GlobalArg, Report};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ProcessArg {
    /// random-walk, random-walk-drift, mean-reverting or geometric-brownian
    #[arg(long, default_value_t = ProcessKind::default())]
    kind: ProcessKind,
    /// Annualized drift
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    drift: f64,
    /// Annualized volatility
    #[arg(long, default_value_t = 1.0)]
    volatility: f64,
    /// Reversion speed of the mean-reverting process
    #[arg(long, default_value_t = 0.1)]
    mean_reversion: f64,
    /// Level the mean-reverting process is pulled towards
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    long_term_mean: f64,
    /// Length of the series, including the starting value
    #[arg(long, default_value_t = 250)]
    time_steps: usize,
    /// Starting value (1 for geometric-brownian, 0 otherwise)
    #[arg(long, allow_negative_numbers = true)]
    initial_value: Option<f64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ProcessArg {
    fn params(&self) -> ProcessParams {
        ProcessParams {
            drift: self.drift,
            volatility: self.volatility,
            mean_reversion: self.mean_reversion,
            long_term_mean: self.long_term_mean,
            time_steps: self.time_steps,
            initial_value: self.initial_value,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProcessReport {
    kind: ProcessKind,
    params: ProcessParams,
    stats: Option<SeriesStats>,
    series: Vec<f64>,
}

pub(crate) fn run(global: &GlobalArg, arg: &ProcessArg) -> anyhow::Result<()> {
    let params = arg.params();
    let mut rng = global.rng();
    let series = process::simulate(arg.kind, &params, &mut *rng, global.policy())?;
    let stats = SeriesStats::new(&series);
    if let Some(stats) = &stats {
        tracing::info!(
            "{}: {} values, volatility {:.4}",
            arg.kind,
            series.len(),
            stats.volatility
        );
    }
    let report = ProcessReport {
        kind: arg.kind,
        params,
        stats,
        series,
    };
    Report::new("process", global, report).save(arg.output.clone())
}
