use std::path::PathBuf;

use anyhow::Context as _;
use probscope_core::markov::{DEFAULT_STEADY_STATE_ITERATIONS, MarkovChain, MarkovPreset};
use serde::{Deserialize, Serialize};

use crate::util::{self, GlobalArg, Report};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MarkovArg {
    /// Built-in chain: weather, stock or customer
    #[arg(long, default_value = "weather", conflicts_with = "chain")]
    preset: MarkovPreset,
    /// JSON file with `states` labels and a `transitions` weight matrix
    #[arg(long)]
    chain: Option<PathBuf>,
    /// Number of transitions to simulate
    #[arg(long, default_value_t = 49)]
    steps: usize,
    /// Index of the starting state
    #[arg(long, default_value_t = 0)]
    start: usize,
    /// Power-iteration steps for the steady state
    #[arg(long, default_value_t = DEFAULT_STEADY_STATE_ITERATIONS)]
    iterations: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// On-disk chain definition; weights are normalized per row on load.
#[derive(Debug, Deserialize)]
struct ChainFile {
    states: Option<Vec<String>>,
    transitions: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
struct MarkovReport {
    chain: MarkovChain,
    steady_state: Vec<f64>,
    path: Vec<String>,
    visit_frequencies: Vec<f64>,
}

pub(crate) fn run(global: &GlobalArg, arg: &MarkovArg) -> anyhow::Result<()> {
    let chain = load_chain(arg)?;
    let steady_state = chain.steady_state(arg.iterations);

    let mut rng = global.rng();
    let path = chain
        .simulate(&mut *rng, arg.start, arg.steps)
        .context("Invalid starting state")?;
    let visit_frequencies = chain.visit_frequencies(&path);
    tracing::info!("Simulated {} steps over {} states", arg.steps, chain.len());

    let report = MarkovReport {
        path: path
            .into_iter()
            .map(|state| chain.states()[state].clone())
            .collect(),
        chain,
        steady_state,
        visit_frequencies,
    };
    Report::new("markov", global, report).save(arg.output.clone())
}

fn load_chain(arg: &MarkovArg) -> anyhow::Result<MarkovChain> {
    let Some(path) = &arg.chain else {
        return Ok(arg.preset.chain());
    };
    let ChainFile {
        states,
        transitions,
    } = util::read_json_file("chain", path)?;
    let chain = match states {
        Some(states) => MarkovChain::with_states(states, transitions),
        None => MarkovChain::new(transitions),
    };
    chain.with_context(|| format!("Invalid chain in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn arg(chain: Option<PathBuf>) -> MarkovArg {
        MarkovArg {
            preset: MarkovPreset::Stock,
            chain,
            steps: 10,
            start: 0,
            iterations: 100,
            output: None,
        }
    }

    #[test]
    fn test_preset_chain() {
        let chain = load_chain(&arg(None)).unwrap();
        assert_eq!(chain.states(), &["Bull", "Stable", "Bear"]);
    }

    #[test]
    fn test_chain_file() {
        let path =
            std::env::temp_dir().join(format!("probscope-chain-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"states": ["On", "Off"], "transitions": [[1, 1], [0, 2]]}}"#
        )
        .unwrap();
        drop(file);

        let chain = load_chain(&arg(Some(path.clone())));
        std::fs::remove_file(&path).unwrap();
        let chain = chain.unwrap();
        assert_eq!(chain.states(), &["On", "Off"]);
        assert_eq!(chain.transitions(), &[vec![0.5, 0.5], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_missing_chain_file() {
        let path = std::env::temp_dir().join("probscope-no-such-chain.json");
        assert!(load_chain(&arg(Some(path))).is_err());
    }
}
