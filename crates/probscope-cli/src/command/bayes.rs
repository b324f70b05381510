use std::path::PathBuf;

use anyhow::Context as _;
use probscope_core::{
    bayes::{
        ConditionalOutcome, DiagnosticOutcome, DiagnosticTest, EventProbabilities, NormalPrior,
    },
    distribution::{Distribution as _, Normal},
};
use serde::Serialize;

use crate::util::{self, GlobalArg, Report};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BayesArg {
    /// Prior probability of having the condition
    #[arg(long, default_value_t = 0.01)]
    prevalence: f64,
    /// Probability of a positive result given the condition
    #[arg(long, default_value_t = 0.95)]
    sensitivity: f64,
    /// Probability of a negative result without the condition
    #[arg(long, default_value_t = 0.95)]
    specificity: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConditionalArg {
    /// P(A)
    #[arg(long, default_value_t = 0.3)]
    p_a: f64,
    /// P(B)
    #[arg(long, default_value_t = 0.5)]
    p_b: f64,
    /// P(A and B)
    #[arg(long, default_value_t = 0.15)]
    p_a_and_b: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PosteriorArg {
    /// Prior mean
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    prior_mean: f64,
    /// Prior standard deviation
    #[arg(long, default_value_t = 1.0)]
    prior_std_dev: f64,
    /// Known observation noise standard deviation
    #[arg(long, default_value_t = 1.0)]
    noise_std_dev: f64,
    /// Comma-separated observations
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "input")]
    data: Vec<f64>,
    /// JSON file holding an array of observations
    #[arg(long)]
    input: Option<PathBuf>,
    /// Number of observations to generate when no data is given
    #[arg(long, default_value_t = 20)]
    count: usize,
    /// Mean of the generated observations
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    true_mean: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BayesReport {
    test: DiagnosticTest,
    outcome: DiagnosticOutcome,
}

#[derive(Debug, Serialize)]
struct ConditionalReport {
    events: EventProbabilities,
    outcome: ConditionalOutcome,
}

#[derive(Debug, Serialize)]
struct PosteriorReport {
    prior: NormalPrior,
    noise_std_dev: f64,
    observations: usize,
    sample_mean: Option<f64>,
    posterior: NormalPrior,
}

pub(crate) fn run(global: &GlobalArg, arg: &BayesArg) -> anyhow::Result<()> {
    let test = DiagnosticTest {
        prevalence: arg.prevalence,
        sensitivity: arg.sensitivity,
        specificity: arg.specificity,
    };
    let outcome = test.evaluate().context("Invalid diagnostic test")?;
    tracing::info!("P(condition | +) = {:.4}", outcome.posterior);
    Report::new("bayes", global, BayesReport { test, outcome }).save(arg.output.clone())
}

pub(crate) fn run_conditional(global: &GlobalArg, arg: &ConditionalArg) -> anyhow::Result<()> {
    let events = EventProbabilities {
        p_a: arg.p_a,
        p_b: arg.p_b,
        p_a_and_b: arg.p_a_and_b,
    };
    let outcome = events.evaluate().context("Invalid event probabilities")?;
    Report::new("conditional", global, ConditionalReport { events, outcome })
        .save(arg.output.clone())
}

pub(crate) fn run_posterior(global: &GlobalArg, arg: &PosteriorArg) -> anyhow::Result<()> {
    let prior = NormalPrior {
        mean: arg.prior_mean,
        std_dev: arg.prior_std_dev,
    };
    let data = posterior_data(global, arg)?;
    let posterior = prior
        .update(&data, arg.noise_std_dev)
        .context("Invalid prior or noise")?;
    let report = PosteriorReport {
        prior,
        noise_std_dev: arg.noise_std_dev,
        observations: data.len(),
        sample_mean: probscope_stats::descriptive::mean(&data),
        posterior,
    };
    Report::new("posterior", global, report).save(arg.output.clone())
}

fn posterior_data(global: &GlobalArg, arg: &PosteriorArg) -> anyhow::Result<Vec<f64>> {
    if let Some(path) = &arg.input {
        return util::read_json_file("observations", path);
    }
    if !arg.data.is_empty() {
        return Ok(arg.data.clone());
    }
    let noise = Normal::new(arg.true_mean, arg.noise_std_dev).context("Invalid noise")?;
    tracing::info!(
        "Generating {} observations around {}",
        arg.count,
        arg.true_mean
    );
    let mut rng = global.rng();
    Ok(noise.sample_n_with(&mut *rng, arg.count, global.policy())?)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[command(flatten)]
        posterior: PosteriorArg,
    }

    fn parse(args: &[&str]) -> PosteriorArg {
        TestArgs::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .posterior
    }

    fn global() -> GlobalArg {
        GlobalArg {
            log_level: tracing::Level::INFO,
            max_attempts: 10_000,
            seed: Some(11),
        }
    }

    #[test]
    fn test_inline_data_takes_precedence_over_generation() {
        let arg = parse(&["--data", "-1,2.5,3"]);
        assert_eq!(posterior_data(&global(), &arg).unwrap(), vec![-1.0, 2.5, 3.0]);
    }

    #[test]
    fn test_generates_data_when_none_given() {
        let arg = parse(&["--count", "7"]);
        assert_eq!(posterior_data(&global(), &arg).unwrap().len(), 7);
    }

    #[test]
    fn test_data_and_input_conflict() {
        let result = TestArgs::try_parse_from(["test", "--data", "1", "--input", "x.json"]);
        assert!(result.is_err());
    }
}
