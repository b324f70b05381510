use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use probscope_core::random::{self, SamplingPolicy};
use rand::{RngCore, SeedableRng as _};
use rand_pcg::Pcg64;
use serde::{Serialize, de::DeserializeOwned};

/// Options shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GlobalArg {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub(crate) log_level: tracing::Level,
    /// Attempts a sampler may spend on one draw before giving up
    #[arg(long, global = true, default_value_t = SamplingPolicy::DEFAULT_MAX_ATTEMPTS)]
    pub(crate) max_attempts: u32,
    /// Seed for reproducible runs (thread-local generator when omitted)
    #[arg(long, global = true)]
    pub(crate) seed: Option<u64>,
}

impl GlobalArg {
    pub(crate) fn policy(&self) -> SamplingPolicy {
        SamplingPolicy::new(self.max_attempts)
    }

    pub(crate) fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(seed) => Box::new(Pcg64::seed_from_u64(seed)),
            None => Box::new(random::default_source()),
        }
    }
}

/// Envelope written around every command result.
#[derive(Debug, Serialize)]
pub(crate) struct Report<T> {
    pub(crate) command: &'static str,
    pub(crate) generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) seed: Option<u64>,
    pub(crate) result: T,
}

impl<T> Report<T>
where
    T: Serialize,
{
    pub(crate) fn new(command: &'static str, global: &GlobalArg, result: T) -> Self {
        Self {
            command,
            generated_at: Utc::now(),
            seed: global.seed,
            result,
        }
    }

    /// Writes the report as pretty JSON to `output_path`, or stdout when unset.
    pub(crate) fn save(&self, output_path: Option<PathBuf>) -> anyhow::Result<()> {
        let mut sink = ReportSink::new(output_path)?;
        sink.write_report(self)?;
        if let ReportSink::File { path, .. } = &sink {
            tracing::info!("Wrote {} report to {}", self.command, path.display());
        }
        Ok(())
    }
}

/// Destination of a command report.
#[derive(Debug)]
enum ReportSink {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl ReportSink {
    fn new(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = output_path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(&path)
            .with_context(|| format!("Cannot create report file {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    fn destination(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_report<T>(&mut self, report: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let written = match self {
            Self::Stdout(writer) => write_pretty(writer, report),
            Self::File { writer, .. } => write_pretty(writer, report),
        };
        written.with_context(|| format!("Cannot write report to {}", self.destination()))
    }
}

fn write_pretty<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Loads a JSON input (observations for `mle`/`posterior`, a chain for
/// `markov`). `what` names the input in error messages.
pub(crate) fn read_json_file<T>(what: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Cannot read {what} from {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} does not hold valid {what} JSON", path.display()))
}

/// `points` evenly spaced values from `from` to `to` inclusive.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn linspace(from: f64, to: f64, points: usize) -> anyhow::Result<Vec<f64>> {
    anyhow::ensure!(points >= 2, "At least 2 grid points are required, got {points}");
    anyhow::ensure!(
        from.is_finite() && to.is_finite() && from < to,
        "Grid range must be finite with from < to, got [{from}, {to}]"
    );
    let step = (to - from) / (points - 1) as f64;
    Ok((0..points).map(|i| from + step * i as f64).collect())
}
