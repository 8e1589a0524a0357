//! Command-line arguments of the two binaries.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use rebalance_core::{Algorithm, Scenario};
use rebalance_stats::Column;

use crate::config::{CountRange, SweepConfig};

/// Simulate decentralized queue consumer rebalancing.
#[derive(Debug, Parser)]
#[command(name = "rebalance-sim", version, about)]
pub struct SimArgs {
    /// JSON sweep configuration; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Queue counts, e.g. `10` or `10..=20`
    #[arg(long)]
    pub queues: Option<CountRange>,

    /// App counts, e.g. `2..=15`
    #[arg(long)]
    pub apps: Option<CountRange>,

    /// Runs per configuration
    #[arg(short = 'n', long)]
    pub samples: Option<u64>,

    /// Round limit before a run counts as failed
    #[arg(long)]
    pub max_rounds: Option<u32>,

    /// Algorithms to run (comma separated names)
    #[arg(long, value_delimiter = ',')]
    pub algorithms: Vec<Algorithm>,

    /// Scenarios to run (START_UP, LOSE_ONE_APP)
    #[arg(long, value_delimiter = ',')]
    pub scenarios: Vec<Scenario>,

    /// Seed for reproducible sweeps
    #[arg(long, env = "REBALANCE_SEED")]
    pub seed: Option<u64>,

    /// Result table path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Aggregate rounds per configuration after the sweep
    #[arg(long)]
    pub aggregate: bool,

    /// Run only the first configuration once and print its final state as JSON
    #[arg(long)]
    pub single: bool,

    /// More output (-v rounds, -vv per-queue state)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Warnings only
    #[arg(short, long)]
    pub quiet: bool,
}

impl SimArgs {
    /// Resolve the sweep configuration: defaults, then file, then flags.
    pub fn sweep_config(&self) -> anyhow::Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::from_file(path)?,
            None => SweepConfig::default(),
        };

        if let Some(queues) = self.queues {
            config.queue_counts = queues;
        }
        if let Some(apps) = self.apps {
            config.app_counts = apps;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(max_rounds) = self.max_rounds {
            config.max_rounds = max_rounds;
        }
        if !self.algorithms.is_empty() {
            config.algorithms = self.algorithms.clone();
        }
        if !self.scenarios.is_empty() {
            config.scenarios = self.scenarios.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        config.aggregate |= self.aggregate;

        config.validate()?;
        Ok(config)
    }
}

/// Compute percentile statistics over a result table.
#[derive(Debug, Parser)]
#[command(name = "rebalance-percentiles", version, about)]
pub struct PercentileArgs {
    /// Columns to group by, comma separated
    #[arg(short = 'g', long = "groupbycols")]
    pub group_by: String,

    /// Numeric column to summarise
    #[arg(short = 'v', long = "valuecol")]
    pub value: Column,

    /// Input result table
    #[arg(short = 'c', long = "csv")]
    pub csv: PathBuf,

    /// Output path (default: agg_<valuecol>__<input name>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the aggregate as JSON on stdout as well
    #[arg(long)]
    pub json: bool,
}
