use std::fs::File;
use std::io::BufWriter;

use anyhow::Context;
use clap::Parser;
use rebalance_cli::{run_single, run_sweep, sweep_rng, SimArgs};
use rebalance_stats::{aggregate, output_file_name, Column, ResultTable, ResultWriter};
use serde_json::json;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let args = SimArgs::parse();
    rebalance_logging::init(args.verbose, args.quiet);

    let config = args.sweep_config()?;
    let (mut rng, seed) = sweep_rng(config.seed);

    if args.single {
        let run_config = config
            .run_configs()
            .into_iter()
            .next()
            .context("no configuration to run")?;
        let single = run_single(&run_config, &mut rng)?;
        let (rounds, releases) = single.outcome.as_pair();
        let report = json!({
            "seed": seed,
            "algorithm": run_config.algorithm,
            "scenario": run_config.scenario,
            "balanced": single.outcome.is_balanced(),
            "rounds": rounds,
            "releases": releases,
            "initial": single.initial,
            "final": single.last,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let file = File::create(&config.output)
        .with_context(|| format!("creating {}", config.output.display()))?;
    let mut writer = ResultWriter::new(BufWriter::new(file))?;
    let report = run_sweep(&config, &mut writer, &mut rng)?;
    writer.finish()?;

    if report.failed > 0 {
        warn!(failed = report.failed, runs = report.runs, "some runs did not balance");
    }
    info!(
        recorded = report.recorded,
        output = %config.output.display(),
        "sweep finished"
    );
    println!("Written {} results to {}", report.recorded, config.output.display());

    if config.aggregate {
        let input = File::open(&config.output)?;
        let table = ResultTable::from_reader(std::io::BufReader::new(input))?;
        let summary = aggregate(&table, Column::Rounds, &Column::CONFIGURATION)?;
        let path = output_file_name(Column::Rounds, &config.output);
        summary.write_csv(BufWriter::new(
            File::create(&path).with_context(|| format!("creating {}", path.display()))?,
        ))?;
        println!("Written aggregated results to {}", path.display());
    }

    Ok(())
}
