//! # cvp-montecarlo
//!
//! Monte-Carlo break-even (cost-volume-profit) risk analysis for a freight
//! transport business.
//!
//! Six economic inputs are drawn from laws given by their mean and
//! coefficient of variation, combined into contribution margin, operating
//! profit and break-even volume, and summarised with 95% intervals.
//!
//! ## Modules
//!
//! - [`random`]: seeded RNG and the summed-uniform standard normal
//! - [`distributions`]: moment-parameterised samplers for six laws
//! - [`stats`]: mean, variance, CV and confidence intervals
//! - [`config`]: TOML scenarios
//! - [`model`]: the break-even model and its metrics
//! - [`report`]: text rendering
//!
//! ## Example
//!
//! ```
//! use cvp_montecarlo::{analyze, create_rng, Scenario};
//!
//! let scenario = Scenario::default().with_sample_size(1_000);
//! let analysis = analyze(&scenario, &mut create_rng(42)).unwrap();
//! println!("{analysis}");
//! ```

pub mod config;
pub mod distributions;
pub mod model;
pub mod random;
pub mod report;
pub mod stats;

pub use config::{ConfigError, InputSpec, Scenario};
pub use distributions::{Distribution, DistributionError, DistributionKind};
pub use model::{analyze, Analysis, Estimate, ModelError};
pub use random::create_rng;
pub use stats::{ConfidenceInterval, StatsError};
