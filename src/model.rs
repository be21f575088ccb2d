//! Monte-Carlo break-even (cost-volume-profit) model.
//!
//! Each scenario input is sampled into a vector of the common length `n`.
//! Same-index elements are then combined into derived samples:
//!
//! ```text
//! contribution margin  CMᵢ = (priceᵢ − variable_costᵢ) · volumeᵢ
//! operating profit     OPᵢ = CMᵢ − fixed_costᵢ + subsidyᵢ
//! break-even volume    BEᵢ = fixed_costᵢ / (priceᵢ − variable_costᵢ)
//! ```
//!
//! and summarised by point estimates with 95% intervals:
//!
//! | Metric | Estimate | Interval |
//! |---|---|---|
//! | contribution margin | mean CM | normal approximation |
//! | operating profit | mean OP (and its CV, %) | normal approximation |
//! | operating risk | share of OPᵢ < 0 | Wald interval |
//! | operating leverage | ΣCM / ΣOP | ratio estimate |
//! | profitability | 100 · ΣOP / Σinvestment | ratio estimate |
//! | payback period | Σinvestment / ΣOP | ratio estimate |
//! | break-even volume | mean BE | normal approximation |

use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{InputSpec, Scenario};
use crate::distributions::DistributionError;
use crate::stats::{self, ConfidenceInterval, StatsError};

/// Failure while running the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Sampling a named input failed.
    #[error("input `{name}`: {source}")]
    Input {
        name: &'static str,
        #[source]
        source: DistributionError,
    },

    /// A random input declares a different sample size than the volume.
    #[error("input `{name}` declares {actual} draws, expected {expected}")]
    SampleSizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A statistic could not be computed on a derived sample.
    #[error("{metric}: {source}")]
    Statistic {
        metric: &'static str,
        #[source]
        source: StatsError,
    },
}

/// A point estimate together with its 95% interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub interval: ConfidenceInterval,
}

impl Estimate {
    /// Sample mean with the normal-approximation interval.
    pub fn of_mean(sample: &[f64]) -> Result<Self, StatsError> {
        Ok(Self {
            value: stats::mean(sample)?,
            interval: stats::confidence_interval(sample)?,
        })
    }

    /// Ratio-of-sums estimate `Σnumerator / Σdenominator`.
    pub fn of_ratio(numerator: &[f64], denominator: &[f64]) -> Result<Self, StatsError> {
        let est = stats::ratio_estimate(numerator, denominator)?;
        Ok(Self {
            value: est.ratio,
            interval: est.interval,
        })
    }

    /// True if the point estimate lies inside its own interval.
    pub fn is_consistent(&self) -> bool {
        self.interval.contains(self.value)
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            interval: self.interval.scaled(factor),
        }
    }
}

fn statistic<T>(metric: &'static str, result: Result<T, StatsError>) -> Result<T, ModelError> {
    result.map_err(|source| ModelError::Statistic { metric, source })
}

// ============================================================================
// Inputs
// ============================================================================

/// Sampled scenario inputs, all of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub volume: Vec<f64>,
    pub price: Vec<f64>,
    pub variable_cost: Vec<f64>,
    pub fixed_cost: Vec<f64>,
    pub investment: Vec<f64>,
    pub subsidy: Vec<f64>,
}

impl Inputs {
    /// Samples every scenario input.
    ///
    /// The common length is the volume's `sample_size`. Non-random
    /// (`Zero`) inputs are drawn at that length whatever size they declare.
    ///
    /// # Errors
    /// [`ModelError::SampleSizeMismatch`] if a random input declares a
    /// different size, [`ModelError::Input`] if its law rejects the
    /// parameters or a draw fails.
    pub fn simulate<R: Rng>(scenario: &Scenario, rng: &mut R) -> Result<Self, ModelError> {
        let n = scenario.volume.sample_size;
        Ok(Self {
            volume: draw_input("volume", &scenario.volume, n, rng)?,
            price: draw_input("price", &scenario.price, n, rng)?,
            variable_cost: draw_input("variable_cost", &scenario.variable_cost, n, rng)?,
            fixed_cost: draw_input("fixed_cost", &scenario.fixed_cost, n, rng)?,
            investment: draw_input("investment", &scenario.investment, n, rng)?,
            subsidy: draw_input("subsidy", &scenario.subsidy, n, rng)?,
        })
    }

    pub fn len(&self) -> usize {
        self.volume.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volume.is_empty()
    }

    /// Per-unit margin `price − variable_cost` for every draw.
    fn unit_margin(&self, i: usize) -> f64 {
        self.price[i] - self.variable_cost[i]
    }

    pub fn contribution_margin(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.unit_margin(i) * self.volume[i])
            .collect()
    }

    pub fn operating_profit(&self, contribution_margin: &[f64]) -> Vec<f64> {
        contribution_margin
            .iter()
            .enumerate()
            .map(|(i, cm)| cm - self.fixed_cost[i] + self.subsidy[i])
            .collect()
    }

    pub fn break_even_volume(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.fixed_cost[i] / self.unit_margin(i))
            .collect()
    }
}

fn draw_input<R: Rng>(
    name: &'static str,
    spec: &InputSpec,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, ModelError> {
    if spec.is_random() && spec.sample_size != n {
        return Err(ModelError::SampleSizeMismatch {
            name,
            expected: n,
            actual: spec.sample_size,
        });
    }
    if spec.is_random() && spec.cv == 0.0 {
        warn!(input = name, "coefficient of variation is zero, input is constant");
    }
    let distribution = spec
        .distribution()
        .map_err(|source| ModelError::Input { name, source })?;
    let sample = distribution
        .sample(n, rng)
        .map_err(|source| ModelError::Input { name, source })?;
    debug!(input = name, kind = %spec.kind, mean = spec.mean, cv = spec.cv, n, "sampled input");
    Ok(sample)
}

// ============================================================================
// Analysis
// ============================================================================

/// Derived per-draw samples kept alongside the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSamples {
    pub contribution_margin: Vec<f64>,
    pub operating_profit: Vec<f64>,
    pub break_even_volume: Vec<f64>,
}

/// Summary of one Monte-Carlo run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub sample_size: usize,
    pub contribution_margin: Estimate,
    pub operating_profit: Estimate,
    /// Coefficient of variation of operating profit, percent.
    pub profit_dispersion: f64,
    /// Probability of an operating loss.
    pub operating_risk: Estimate,
    pub operating_leverage: Estimate,
    /// Operating profit per unit of investment, percent.
    pub profitability: Estimate,
    /// Investment divided by operating profit.
    pub payback_period: Estimate,
    pub break_even_volume: Estimate,
    pub samples: DerivedSamples,
}

impl Analysis {
    /// Computes every metric from already sampled inputs.
    pub fn from_inputs(inputs: &Inputs) -> Result<Self, ModelError> {
        let n = inputs.len();
        let cm = inputs.contribution_margin();
        let op = inputs.operating_profit(&cm);
        let be = inputs.break_even_volume();

        let contribution_margin = statistic("contribution margin", Estimate::of_mean(&cm))?;
        let operating_profit = statistic("operating profit", Estimate::of_mean(&op))?;
        let profit_dispersion = statistic(
            "operating profit dispersion",
            stats::coefficient_of_variation(&op),
        )?;

        let losses = op.iter().filter(|&&x| x < 0.0).count();
        let risk = losses as f64 / n as f64;
        let operating_risk = Estimate {
            value: risk,
            interval: statistic("operating risk", stats::proportion_interval(risk, n))?,
        };

        let operating_leverage = statistic("operating leverage", Estimate::of_ratio(&cm, &op))?;
        let profitability = statistic(
            "profitability",
            Estimate::of_ratio(&op, &inputs.investment),
        )?
        .scaled(100.0);
        let payback_period = statistic(
            "payback period",
            Estimate::of_ratio(&inputs.investment, &op),
        )?;
        let break_even_volume = statistic("break-even volume", Estimate::of_mean(&be))?;

        debug!(
            n,
            operating_profit = operating_profit.value,
            operating_risk = risk,
            "analysis complete"
        );

        Ok(Self {
            sample_size: n,
            contribution_margin,
            operating_profit,
            profit_dispersion,
            operating_risk,
            operating_leverage,
            profitability,
            payback_period,
            break_even_volume,
            samples: DerivedSamples {
                contribution_margin: cm,
                operating_profit: op,
                break_even_volume: be,
            },
        })
    }

    /// Labelled estimates in report order.
    pub fn estimates(&self) -> [(&'static str, &Estimate); 7] {
        [
            ("contribution margin", &self.contribution_margin),
            ("operating profit", &self.operating_profit),
            ("operating risk", &self.operating_risk),
            ("operating leverage", &self.operating_leverage),
            ("profitability, %", &self.profitability),
            ("payback period", &self.payback_period),
            ("break-even volume", &self.break_even_volume),
        ]
    }

    /// Metrics whose point estimate falls outside its own interval.
    pub fn inconsistent_metrics(&self) -> Vec<&'static str> {
        self.estimates()
            .into_iter()
            .filter(|(_, estimate)| !estimate.is_consistent())
            .map(|(name, _)| name)
            .collect()
    }

    /// Same as [`inconsistent_metrics`](Self::inconsistent_metrics), logging
    /// a warning per failing metric. An empty result means the run is
    /// self-consistent.
    pub fn self_check(&self) -> Vec<&'static str> {
        let failures = self.inconsistent_metrics();
        for (name, estimate) in self.estimates() {
            if failures.contains(&name) {
                warn!(
                    metric = name,
                    value = estimate.value,
                    lower = estimate.interval.lower,
                    upper = estimate.interval.upper,
                    "point estimate outside its confidence interval"
                );
            }
        }
        failures
    }
}

/// Samples the scenario and analyses the result.
///
/// # Examples
/// ```
/// use cvp_montecarlo::config::Scenario;
/// use cvp_montecarlo::model::analyze;
/// use cvp_montecarlo::random::create_rng;
///
/// let scenario = Scenario::default().with_sample_size(2_000);
/// let mut rng = create_rng(42);
/// let analysis = analyze(&scenario, &mut rng).unwrap();
/// assert_eq!(analysis.sample_size, 2_000);
/// assert!(analysis.self_check().is_empty());
/// ```
pub fn analyze<R: Rng>(scenario: &Scenario, rng: &mut R) -> Result<Analysis, ModelError> {
    let inputs = Inputs::simulate(scenario, rng)?;
    Analysis::from_inputs(&inputs)
}

// ============================================================================
// Tests
// ============================================================================
