use anyhow::Context as _;
use probscope_core::distribution::{
    Bernoulli, Beta, Binomial, BivariateNormal, Continuous, Discrete, Exponential, Gamma,
    Geometric, Laplace, Multinomial, Normal, Poisson, Uniform,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum FamilyKind {
    Bernoulli,
    Binomial,
    Poisson,
    Geometric,
    Normal,
    Exponential,
    Uniform,
    Gamma,
    Beta,
    Laplace,
    Multinomial,
    BivariateNormal,
}

/// A distribution family and its parameters; each family reads only the
/// options it needs.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DistributionArg {
    /// Distribution family
    #[arg(value_enum)]
    pub(crate) family: FamilyKind,
    /// Success probability (bernoulli, binomial, geometric)
    #[arg(long, default_value_t = 0.5)]
    p: f64,
    /// Number of trials (binomial, multinomial)
    #[arg(long, default_value_t = 10)]
    trials: u64,
    /// Mean number of events (poisson)
    #[arg(long, default_value_t = 4.0)]
    lambda: f64,
    /// Rate (exponential, gamma)
    #[arg(long, default_value_t = 1.0)]
    rate: f64,
    /// Mean (normal) or location (laplace); x mean for bivariate-normal
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    mean: f64,
    /// Standard deviation (normal); x standard deviation for bivariate-normal
    #[arg(long, default_value_t = 1.0)]
    std_dev: f64,
    /// Lower bound (uniform)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    min: f64,
    /// Upper bound (uniform)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    max: f64,
    /// Shape (gamma)
    #[arg(long, default_value_t = 2.0)]
    shape: f64,
    /// First shape parameter (beta)
    #[arg(long, default_value_t = 2.0)]
    alpha: f64,
    /// Second shape parameter (beta)
    #[arg(long, default_value_t = 3.0)]
    beta: f64,
    /// Scale (laplace)
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
    /// Comma-separated category weights (multinomial)
    #[arg(long, value_delimiter = ',', default_values_t = [1.0, 1.0, 1.0])]
    weights: Vec<f64>,
    /// y mean (bivariate-normal)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    mean_y: f64,
    /// y standard deviation (bivariate-normal)
    #[arg(long, default_value_t = 1.0)]
    std_dev_y: f64,
    /// Correlation in [-1, 1] (bivariate-normal)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    correlation: f64,
}

/// Receives the distribution built from a [`DistributionArg`].
pub(crate) trait FamilyVisitor {
    type Output;

    fn discrete<D>(self, dist: &D) -> anyhow::Result<Self::Output>
    where
        D: Discrete + Serialize;

    fn continuous<D>(self, dist: &D) -> anyhow::Result<Self::Output>
    where
        D: Continuous + Serialize;

    fn multinomial(self, dist: &Multinomial) -> anyhow::Result<Self::Output>;

    fn bivariate_normal(self, dist: &BivariateNormal) -> anyhow::Result<Self::Output>;
}

impl DistributionArg {
    /// Validates the parameters of the selected family and hands the
    /// distribution to `visitor`.
    pub(crate) fn visit<V>(&self, visitor: V) -> anyhow::Result<V::Output>
    where
        V: FamilyVisitor,
    {
        let family = self.family;
        let context = || format!("Invalid parameters for {family:?}");
        match family {
            FamilyKind::Bernoulli => visitor.discrete(&Bernoulli::new(self.p).with_context(context)?),
            FamilyKind::Binomial => {
                visitor.discrete(&Binomial::new(self.trials, self.p).with_context(context)?)
            }
            FamilyKind::Poisson => visitor.discrete(&Poisson::new(self.lambda).with_context(context)?),
            FamilyKind::Geometric => {
                visitor.discrete(&Geometric::new(self.p).with_context(context)?)
            }
            FamilyKind::Normal => {
                visitor.continuous(&Normal::new(self.mean, self.std_dev).with_context(context)?)
            }
            FamilyKind::Exponential => {
                visitor.continuous(&Exponential::new(self.rate).with_context(context)?)
            }
            FamilyKind::Uniform => {
                visitor.continuous(&Uniform::new(self.min, self.max).with_context(context)?)
            }
            FamilyKind::Gamma => {
                visitor.continuous(&Gamma::new(self.shape, self.rate).with_context(context)?)
            }
            FamilyKind::Beta => {
                visitor.continuous(&Beta::new(self.alpha, self.beta).with_context(context)?)
            }
            FamilyKind::Laplace => {
                visitor.continuous(&Laplace::new(self.mean, self.scale).with_context(context)?)
            }
            FamilyKind::Multinomial => visitor.multinomial(
                &Multinomial::new(self.trials, self.weights.clone()).with_context(context)?,
            ),
            FamilyKind::BivariateNormal => visitor.bivariate_normal(
                &BivariateNormal::new(
                    self.mean,
                    self.mean_y,
                    self.std_dev,
                    self.std_dev_y,
                    self.correlation,
                )
                .with_context(context)?,
            ),
        }
    }
}
