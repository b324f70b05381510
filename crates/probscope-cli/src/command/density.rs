use std::path::PathBuf;

use probscope_core::distribution::{BivariateNormal, Continuous, Discrete, Multinomial};
use serde::Serialize;

use super::family::{DistributionArg, FamilyKind, FamilyVisitor};
use crate::util::{self, GlobalArg, Report};

/// Standard deviations either side of the mean covered by the default grid.
const DEFAULT_SPAN: f64 = 4.0;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DensityArg {
    #[command(flatten)]
    distribution: DistributionArg,
    /// Start of the grid (defaults to mean - 4 sd, or 0 for discrete families)
    #[arg(long, allow_negative_numbers = true)]
    from: Option<f64>,
    /// End of the grid (defaults to mean + 4 sd)
    #[arg(long, allow_negative_numbers = true)]
    to: Option<f64>,
    /// Number of grid points for continuous families
    #[arg(long, default_value_t = 200)]
    points: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct DensityPoint {
    x: f64,
    density: f64,
}

#[derive(Debug, Serialize)]
struct DensityReport<P> {
    family: FamilyKind,
    parameters: P,
    points: Vec<DensityPoint>,
}

struct Tabulator {
    family: FamilyKind,
    from: Option<f64>,
    to: Option<f64>,
    points: usize,
}

impl FamilyVisitor for Tabulator {
    type Output = serde_json::Value;

    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn discrete<D>(self, dist: &D) -> anyhow::Result<Self::Output>
    where
        D: Discrete + Serialize,
    {
        let moments = dist.moments();
        let from = self.from.map_or(0, |x| x.floor() as i64);
        let to = self.to.map_or_else(
            || (moments.mean + DEFAULT_SPAN * moments.std_dev).ceil() as i64,
            |x| x.ceil() as i64,
        );
        anyhow::ensure!(from <= to, "Grid range must satisfy from <= to, got [{from}, {to}]");
        let points = (from..=to)
            .map(|k| DensityPoint {
                x: k as f64,
                density: dist.pmf(k),
            })
            .collect();
        Ok(serde_json::to_value(DensityReport {
            family: self.family,
            parameters: dist,
            points,
        })?)
    }

    fn continuous<D>(self, dist: &D) -> anyhow::Result<Self::Output>
    where
        D: Continuous + Serialize,
    {
        let moments = dist.moments();
        let from = self
            .from
            .unwrap_or(moments.mean - DEFAULT_SPAN * moments.std_dev);
        let to = self
            .to
            .unwrap_or(moments.mean + DEFAULT_SPAN * moments.std_dev);
        let points = util::linspace(from, to, self.points)?
            .into_iter()
            .map(|x| DensityPoint {
                x,
                density: dist.pdf(x),
            })
            .collect();
        Ok(serde_json::to_value(DensityReport {
            family: self.family,
            parameters: dist,
            points,
        })?)
    }

    fn multinomial(self, _dist: &Multinomial) -> anyhow::Result<Self::Output> {
        anyhow::bail!("Density grids need a univariate family, got {:?}", self.family)
    }

    fn bivariate_normal(self, _dist: &BivariateNormal) -> anyhow::Result<Self::Output> {
        anyhow::bail!("Density grids need a univariate family, got {:?}", self.family)
    }
}

pub(crate) fn run(global: &GlobalArg, arg: &DensityArg) -> anyhow::Result<()> {
    let DensityArg {
        distribution,
        from,
        to,
        points,
        output,
    } = arg;
    let result = distribution.visit(Tabulator {
        family: distribution.family,
        from: *from,
        to: *to,
        points: *points,
    })?;
    Report::new("density", global, result).save(output.clone())
}
