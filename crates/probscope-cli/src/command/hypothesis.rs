use std::path::PathBuf;

use anyhow::Context as _;
use probscope_core::hypothesis::{
    CriticalValuePolicy, PowerPoint, TestType, ZTestInput, ZTestResult,
};
use serde::Serialize;

use crate::util::{self, GlobalArg, Report};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ZTestArg {
    /// Mean under the null hypothesis
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    null_mean: f64,
    /// Mean actually generating the data
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    true_mean: f64,
    /// Sample size
    #[arg(long, default_value_t = 30)]
    sample_size: u64,
    /// Known population standard deviation
    #[arg(long, default_value_t = 1.0)]
    sigma: f64,
    /// Significance level
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,
    /// two-tailed, right-tailed or left-tailed
    #[arg(long, default_value_t = TestType::default())]
    test_type: TestType,
    /// Derive critical values from --alpha instead of the conventional 5% cut-offs
    #[arg(long)]
    critical_from_alpha: bool,
}

impl ZTestArg {
    fn input(&self) -> ZTestInput {
        ZTestInput {
            null_mean: self.null_mean,
            true_mean: self.true_mean,
            sample_size: self.sample_size,
            sigma: self.sigma,
            alpha: self.alpha,
            test_type: self.test_type,
        }
    }

    fn policy(&self) -> CriticalValuePolicy {
        if self.critical_from_alpha {
            CriticalValuePolicy::FromAlpha
        } else {
            CriticalValuePolicy::Conventional
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HypothesisArg {
    #[command(flatten)]
    test: ZTestArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PowerCurveArg {
    #[command(flatten)]
    test: ZTestArg,
    /// Smallest effect size
    #[arg(long, default_value_t = -2.0, allow_negative_numbers = true)]
    from: f64,
    /// Largest effect size
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    to: f64,
    /// Number of effect sizes
    #[arg(long, default_value_t = 101)]
    points: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct HypothesisReport {
    input: ZTestInput,
    critical_value_policy: CriticalValuePolicy,
    result: ZTestResult,
}

#[derive(Debug, Serialize)]
struct PowerCurveReport {
    input: ZTestInput,
    critical_value_policy: CriticalValuePolicy,
    curve: Vec<PowerPoint>,
}

pub(crate) fn run(global: &GlobalArg, arg: &HypothesisArg) -> anyhow::Result<()> {
    let HypothesisArg { test, output } = arg;
    let input = test.input();
    let policy = test.policy();
    let result = input
        .evaluate_with(policy)
        .context("Invalid z-test parameters")?;
    tracing::info!(
        "z = {:.4}, p = {:.4}, {}",
        result.z_score,
        result.p_value,
        if result.reject_null {
            "reject H0"
        } else {
            "fail to reject H0"
        }
    );
    let report = HypothesisReport {
        input,
        critical_value_policy: policy,
        result,
    };
    Report::new("hypothesis", global, report).save(output.clone())
}

pub(crate) fn run_power_curve(global: &GlobalArg, arg: &PowerCurveArg) -> anyhow::Result<()> {
    let PowerCurveArg {
        test,
        from,
        to,
        points,
        output,
    } = arg;
    let input = test.input();
    let policy = test.policy();
    let effect_sizes = util::linspace(*from, *to, *points)?;
    let curve = input
        .power_curve(effect_sizes, policy)
        .context("Invalid z-test parameters")?;
    let report = PowerCurveReport {
        input,
        critical_value_policy: policy,
        curve,
    };
    Report::new("power-curve", global, report).save(output.clone())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[command(flatten)]
        test: ZTestArg,
    }

    fn parse(args: &[&str]) -> ZTestArg {
        TestArgs::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .test
    }

    #[test]
    fn test_default_scenario_rejects() {
        let arg = parse(&[]);
        assert_eq!(arg.policy(), CriticalValuePolicy::Conventional);
        let result = arg.input().evaluate_with(arg.policy()).unwrap();
        assert!((result.standard_error - 0.1826).abs() < 1e-4);
        assert!((result.z_score - 2.7386).abs() < 1e-3);
        assert!(result.reject_null);
    }

    #[test]
    fn test_parses_test_type_and_policy() {
        let arg = parse(&[
            "--test-type",
            "left-tailed",
            "--true-mean",
            "-0.5",
            "--critical-from-alpha",
        ]);
        assert_eq!(arg.test_type, TestType::LeftTailed);
        assert_eq!(arg.true_mean, -0.5);
        assert_eq!(arg.policy(), CriticalValuePolicy::FromAlpha);
    }
}
