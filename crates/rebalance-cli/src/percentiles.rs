//! Percentile report over an existing result table.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use rebalance_stats::{aggregate, output_file_name, Aggregate, Column, ResultTable};
use tracing::info;

/// What a percentile report produced.
#[derive(Debug)]
pub struct PercentileReport {
    pub output: PathBuf,
    /// Rows read from the input table.
    pub input_rows: usize,
    pub aggregate: Aggregate,
}

/// Read `input`, aggregate `value` grouped by `group_by`, and write the
/// result to `output` (or the default name next to the working directory).
pub fn write_percentiles(
    input: &Path,
    value: Column,
    group_by: &[Column],
    output: Option<&Path>,
) -> anyhow::Result<PercentileReport> {
    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let table = ResultTable::from_reader(BufReader::new(file))
        .with_context(|| format!("reading {}", input.display()))?;

    let aggregate = aggregate(&table, value, group_by)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_file_name(value, input));
    let out = File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    aggregate.write_csv(BufWriter::new(out))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = table.len(),
        groups = aggregate.rows.len(),
        "wrote aggregate"
    );

    Ok(PercentileReport {
        output,
        input_rows: table.len(),
        aggregate,
    })
}
