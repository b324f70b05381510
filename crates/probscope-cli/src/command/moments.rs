use std::path::PathBuf;

use probscope_core::{
    distribution::{BivariateNormal, Continuous, Discrete, Multinomial},
    moments::Moments,
};
use serde::Serialize;

use super::family::{DistributionArg, FamilyKind, FamilyVisitor};
use crate::util::{GlobalArg, Report};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MomentsArg {
    #[command(flatten)]
    distribution: DistributionArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct MomentsReport<P, M> {
    family: FamilyKind,
    parameters: P,
    moments: M,
}

#[derive(Debug, Serialize)]
struct MarginalMoments {
    x: Moments,
    y: Moments,
    correlation: f64,
}

struct MomentsVisitor {
    family: FamilyKind,
}

impl MomentsVisitor {
    fn report<P, M>(&self, parameters: P, moments: M) -> anyhow::Result<serde_json::Value>
    where
        P: Serialize,
        M: Serialize,
    {
        Ok(serde_json::to_value(MomentsReport {
            family: self.family,
            parameters,
            moments,
        })?)
    }
}

impl FamilyVisitor for MomentsVisitor {
    type Output = serde_json::Value;

    fn discrete<D>(self, dist: &D) -> anyhow::Result<Self::Output>
    where
        D: Discrete + Serialize,
    {
        self.report(dist, dist.moments())
    }

    fn continuous<D>(self, dist: &D) -> anyhow::Result<Self::Output>
    where
        D: Continuous + Serialize,
    {
        self.report(dist, dist.moments())
    }

    fn multinomial(self, dist: &Multinomial) -> anyhow::Result<Self::Output> {
        self.report(dist, dist.moments())
    }

    fn bivariate_normal(self, dist: &BivariateNormal) -> anyhow::Result<Self::Output> {
        let marginal = |mean: f64, std_dev: f64| {
            Moments::new(mean, std_dev * std_dev)
                .with_mode(mean)
                .with_median(mean)
        };
        self.report(
            dist,
            MarginalMoments {
                x: marginal(dist.mean_x(), dist.std_x()),
                y: marginal(dist.mean_y(), dist.std_y()),
                correlation: dist.correlation(),
            },
        )
    }
}

pub(crate) fn run(global: &GlobalArg, arg: &MomentsArg) -> anyhow::Result<()> {
    let MomentsArg {
        distribution,
        output,
    } = arg;
    let result = distribution.visit(MomentsVisitor {
        family: distribution.family,
    })?;
    Report::new("moments", global, result).save(output.clone())
}
