use clap::Parser;

use crate::util::GlobalArg;

use self::{
    bayes::{BayesArg, ConditionalArg, PosteriorArg},
    clt::CltArg,
    density::DensityArg,
    hypothesis::{HypothesisArg, PowerCurveArg},
    markov::MarkovArg,
    mle::MleArg,
    moments::MomentsArg,
    process::ProcessArg,
    sample::SampleArg,
};

mod bayes;
mod clt;
mod density;
mod family;
mod hypothesis;
mod markov;
mod mle;
mod moments;
mod process;
mod sample;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    global: GlobalArg,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Mode {
    /// Draw samples and summarize them
    Sample(#[clap(flatten)] SampleArg),
    /// Tabulate the PMF or PDF over a grid
    Density(#[clap(flatten)] DensityArg),
    /// Print closed-form mean, variance, mode and median
    Moments(#[clap(flatten)] MomentsArg),
    /// Evaluate a one-sample z-test
    Hypothesis(#[clap(flatten)] HypothesisArg),
    /// Compute power over a range of effect sizes
    PowerCurve(#[clap(flatten)] PowerCurveArg),
    /// Fit a model by maximum likelihood
    Mle(#[clap(flatten)] MleArg),
    /// Apply Bayes' rule to a diagnostic test
    Bayes(#[clap(flatten)] BayesArg),
    /// Conditional probabilities of two events
    Conditional(#[clap(flatten)] ConditionalArg),
    /// Update a normal prior on a mean with observations
    Posterior(#[clap(flatten)] PosteriorArg),
    /// Simulate a Markov chain and compute its steady state
    Markov(#[clap(flatten)] MarkovArg),
    /// Run a central limit theorem experiment
    Clt(#[clap(flatten)] CltArg),
    /// Simulate a stochastic process
    Process(#[clap(flatten)] ProcessArg),
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { global, mode } = CommandArgs::parse();

    tracing_subscriber::fmt()
        .with_max_level(global.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match mode {
        Mode::Sample(arg) => sample::run(&global, &arg)?,
        Mode::Density(arg) => density::run(&global, &arg)?,
        Mode::Moments(arg) => moments::run(&global, &arg)?,
        Mode::Hypothesis(arg) => hypothesis::run(&global, &arg)?,
        Mode::PowerCurve(arg) => hypothesis::run_power_curve(&global, &arg)?,
        Mode::Mle(arg) => mle::run(&global, &arg)?,
        Mode::Bayes(arg) => bayes::run(&global, &arg)?,
        Mode::Conditional(arg) => bayes::run_conditional(&global, &arg)?,
        Mode::Posterior(arg) => bayes::run_posterior(&global, &arg)?,
        Mode::Markov(arg) => markov::run(&global, &arg)?,
        Mode::Clt(arg) => clt::run(&global, &arg)?,
        Mode::Process(arg) => process::run(&global, &arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    fn parse(args: &[&str]) -> CommandArgs {
        CommandArgs::try_parse_from(std::iter::once("probscope").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let args = parse(&["sample", "normal", "--seed", "3", "--max-attempts", "50"]);
        assert_eq!(args.global.seed, Some(3));
        assert_eq!(args.global.max_attempts, 50);
        assert!(matches!(args.mode, Mode::Sample(_)));
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["hypothesis"]);
        assert_eq!(args.global.seed, None);
        assert_eq!(args.global.log_level, tracing::Level::INFO);
        assert_eq!(args.global.max_attempts, 10_000);
    }

    #[test]
    fn test_rejects_unknown_values() {
        let parse = |args: &[&str]| {
            CommandArgs::try_parse_from(std::iter::once("probscope").chain(args.iter().copied()))
        };
        assert!(parse(&["sample", "cauchy"]).is_err());
        assert!(parse(&["process", "--kind", "brownian"]).is_err());
        assert!(parse(&["hypothesis", "--test-type", "sideways"]).is_err());
        assert!(parse(&["markov", "--preset", "traffic"]).is_err());
    }
}
