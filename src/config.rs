//! Scenario configuration.
//!
//! A [`Scenario`] names the six economic inputs of the break-even model and
//! the law each one is sampled from. Scenarios are loaded from TOML:
//!
//! ```toml
//! seed = 42
//!
//! [volume]
//! mean = 152.93
//! cv = 0.1
//! kind = "LN"
//! sample_size = 20000
//! ```
//!
//! and so on for `price`, `variable_cost`, `fixed_cost`, `investment` and
//! `subsidy`. `kind` accepts the long names of
//! [`DistributionKind`](crate::distributions::DistributionKind) or the
//! short tags `N`, `LN`, `R`, `G`, `BS`, `P`, `NaN`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::distributions::{Distribution, DistributionError, DistributionKind};

/// Sample size of the reference scenario.
pub const DEFAULT_SAMPLE_SIZE: usize = 20_000;

/// Scenario loading or validation failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scenario file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// One economic input: a law given by its mean and coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSpec {
    pub mean: f64,
    /// Coefficient of variation as a ratio (0.1 = 10%).
    #[serde(alias = "coefficient_of_variation")]
    pub cv: f64,
    pub kind: DistributionKind,
    #[serde(default)]
    pub sample_size: usize,
}

impl InputSpec {
    pub fn new(mean: f64, cv: f64, kind: DistributionKind, sample_size: usize) -> Self {
        Self {
            mean,
            cv,
            kind,
            sample_size,
        }
    }

    /// The constant-zero input.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, DistributionKind::Zero, 0)
    }

    pub fn distribution(&self) -> Result<Distribution, DistributionError> {
        Distribution::from_moments(self.kind, self.mean, self.cv)
    }

    pub fn is_random(&self) -> bool {
        self.kind != DistributionKind::Zero
    }
}

/// The six inputs of the break-even model plus an optional seed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub seed: Option<u64>,
    /// Freight turnover (G).
    pub volume: InputSpec,
    /// Revenue per unit of turnover (Xp).
    pub price: InputSpec,
    /// Variable cost per unit of turnover (Cg).
    pub variable_cost: InputSpec,
    /// Fixed costs (Xc).
    pub fixed_cost: InputSpec,
    /// Investment size (Dg).
    pub investment: InputSpec,
    /// Subsidy (In).
    pub subsidy: InputSpec,
}

impl Scenario {
    /// The reference freight scenario with `n` draws per random input.
    pub fn reference(n: usize) -> Self {
        use DistributionKind::*;
        Self {
            seed: None,
            volume: InputSpec::new(152.93, 0.1, LogNormal, n),
            price: InputSpec::new(337.0, 0.07, Normal, n),
            variable_cost: InputSpec::new(191.3, 0.07, Uniform, n),
            fixed_cost: InputSpec::new(19_116.8, 0.1, Gamma, n),
            investment: InputSpec::new(10_000.0, 0.1, Gamma, n),
            subsidy: InputSpec::zero(),
        }
    }

    /// Loads and validates a scenario file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a scenario from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Sets the sample size of every random input.
    pub fn with_sample_size(mut self, n: usize) -> Self {
        for spec in self.inputs_mut() {
            if spec.is_random() {
                spec.sample_size = n;
            }
        }
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Inputs in model order, labelled with their scenario keys.
    pub fn inputs(&self) -> [(&'static str, &InputSpec); 6] {
        [
            ("volume", &self.volume),
            ("price", &self.price),
            ("variable_cost", &self.variable_cost),
            ("fixed_cost", &self.fixed_cost),
            ("investment", &self.investment),
            ("subsidy", &self.subsidy),
        ]
    }

    fn inputs_mut(&mut self) -> [&mut InputSpec; 6] {
        [
            &mut self.volume,
            &mut self.price,
            &mut self.variable_cost,
            &mut self.fixed_cost,
            &mut self.investment,
            &mut self.subsidy,
        ]
    }

    /// Checks that every input carries a finite mean and a finite,
    /// non-negative coefficient of variation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        for (name, spec) in self.inputs() {
            if !spec.mean.is_finite() {
                errors.push(format!("{name}.mean must be finite, got {}", spec.mean));
            }
            if !spec.cv.is_finite() || spec.cv < 0.0 {
                errors.push(format!("{name}.cv must be finite and >= 0, got {}", spec.cv));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors.join("; ")))
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::reference(DEFAULT_SAMPLE_SIZE)
    }
}
