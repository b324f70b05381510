use std::path::PathBuf;

use anyhow::Context as _;
use probscope_core::{
    distribution::{Bernoulli, Distribution, Exponential, Normal, Poisson},
    error::InvalidParameterError,
    mle,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::util::{self, GlobalArg, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::FromStr)]
#[serde(rename_all = "kebab-case")]
enum Model {
    Normal,
    Exponential,
    Poisson,
    Bernoulli,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MleArg {
    /// normal, exponential, poisson or bernoulli
    #[arg(default_value = "normal")]
    model: Model,
    /// JSON file holding an array of observations; data is generated when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Number of observations to generate
    #[arg(long, default_value_t = 1000)]
    count: usize,
    /// Generating mean (normal)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    mean: f64,
    /// Generating standard deviation (normal)
    #[arg(long, default_value_t = 1.0)]
    std_dev: f64,
    /// Generating rate (exponential)
    #[arg(long, default_value_t = 1.0)]
    rate: f64,
    /// Generating mean number of events (poisson)
    #[arg(long, default_value_t = 4.0)]
    lambda: f64,
    /// Generating success probability (bernoulli)
    #[arg(long, default_value_t = 0.5)]
    p: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct MleReport<F> {
    model: Model,
    data_source: String,
    fit: F,
    log_likelihood: f64,
}

pub(crate) fn run(global: &GlobalArg, arg: &MleArg) -> anyhow::Result<()> {
    let data_source = arg
        .input
        .as_ref()
        .map_or_else(|| "generated".to_owned(), |path| path.display().to_string());
    let result = match arg.model {
        Model::Normal => {
            let data = observations(global, arg, Normal::new(arg.mean, arg.std_dev))?;
            let fit = mle::fit_normal(&data)?;
            let log_likelihood = mle::log_likelihood(&fit.distribution()?, &data);
            serde_json::to_value(MleReport {
                model: arg.model,
                data_source,
                fit,
                log_likelihood,
            })?
        }
        Model::Exponential => {
            let data = observations(global, arg, Exponential::new(arg.rate))?;
            let fit = mle::fit_exponential(&data)?;
            let log_likelihood = mle::log_likelihood(&fit.distribution()?, &data);
            serde_json::to_value(MleReport {
                model: arg.model,
                data_source,
                fit,
                log_likelihood,
            })?
        }
        Model::Poisson => {
            let data = observations(global, arg, Poisson::new(arg.lambda))?;
            let fit = mle::fit_poisson(&data)?;
            let log_likelihood = mle::discrete_log_likelihood(&fit.distribution()?, &data);
            serde_json::to_value(MleReport {
                model: arg.model,
                data_source,
                fit,
                log_likelihood,
            })?
        }
        Model::Bernoulli => {
            let data = observations(global, arg, Bernoulli::new(arg.p))?;
            let fit = mle::fit_bernoulli(&data)?;
            let log_likelihood = mle::discrete_log_likelihood(&fit.distribution()?, &data);
            serde_json::to_value(MleReport {
                model: arg.model,
                data_source,
                fit,
                log_likelihood,
            })?
        }
    };
    Report::new("mle", global, result).save(arg.output.clone())
}

/// Observations read from `--input`, or drawn from `dist` otherwise.
fn observations<D>(
    global: &GlobalArg,
    arg: &MleArg,
    dist: Result<D, InvalidParameterError>,
) -> anyhow::Result<Vec<D::Sample>>
where
    D: Distribution,
    D::Sample: DeserializeOwned,
{
    if let Some(path) = &arg.input {
        return util::read_json_file("observations", path);
    }
    let dist = dist.context("Invalid generating parameters")?;
    tracing::info!("Generating {} observations", arg.count);
    let mut rng = global.rng();
    Ok(dist.sample_n_with(&mut *rng, arg.count, global.policy())?)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn arg(model: Model, input: Option<PathBuf>) -> MleArg {
        MleArg {
            model,
            input,
            count: 500,
            mean: 2.0,
            std_dev: 1.5,
            rate: 1.0,
            lambda: 4.0,
            p: 0.3,
            output: None,
        }
    }

    fn global(seed: u64) -> GlobalArg {
        GlobalArg {
            log_level: tracing::Level::INFO,
            max_attempts: 10_000,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_parse_model() {
        assert_eq!("poisson".parse::<Model>().unwrap(), Model::Poisson);
        assert!("cauchy".parse::<Model>().is_err());
    }

    #[test]
    fn test_generated_data_is_reproducible() {
        let arg = arg(Model::Normal, None);
        let a = observations(&global(5), &arg, Normal::new(arg.mean, arg.std_dev)).unwrap();
        let b = observations(&global(5), &arg, Normal::new(arg.mean, arg.std_dev)).unwrap();
        assert_eq!(a.len(), 500);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reads_observations_from_file() {
        let path = std::env::temp_dir().join(format!("probscope-mle-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[0, 1, 1, 0, 1]").unwrap();
        drop(file);

        let arg = arg(Model::Bernoulli, Some(path.clone()));
        let data = observations(&global(1), &arg, Bernoulli::new(arg.p)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(data, vec![0, 1, 1, 0, 1]);
        assert_eq!(mle::fit_bernoulli(&data).unwrap().p, 0.6);
    }
}
