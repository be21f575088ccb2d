//! Command-line front end: runs one break-even analysis and prints the report.
//!
//! ```text
//! cvp-montecarlo [--scenario demos/freight.toml] [--seed 42] [--samples 20000] [-v]
//! ```
//!
//! Exits with status 1 when the run fails or its self-check reports a
//! point estimate outside its own interval.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cvp_montecarlo::{analyze, create_rng, report, ConfigError, ModelError, Scenario};

const DEFAULT_SEED: u64 = 42;

/// Monte-Carlo break-even risk analysis
#[derive(Parser)]
#[command(name = "cvp-montecarlo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario file (TOML); the reference freight scenario when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// RNG seed; overrides the scenario's seed
    #[arg(long)]
    seed: Option<u64>,

    /// Draws per random input; overrides the scenario's sample sizes
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run passed its self-check.
fn run(cli: &Cli) -> Result<bool, CliError> {
    let mut scenario = match &cli.scenario {
        Some(path) => {
            info!("Loading scenario from {}", path.display());
            Scenario::load(path)?
        }
        None => Scenario::default(),
    };
    if let Some(n) = cli.samples {
        scenario = scenario.with_sample_size(n);
    }
    let seed = cli.seed.or(scenario.seed).unwrap_or(DEFAULT_SEED);
    info!(seed, draws = scenario.volume.sample_size, "Running analysis");

    let mut rng = create_rng(seed);
    let analysis = analyze(&scenario, &mut rng)?;
    println!("{}", report::render(&analysis));

    Ok(analysis.self_check().is_empty())
}
