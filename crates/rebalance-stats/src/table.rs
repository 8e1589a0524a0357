//! The result table: one row per successful simulation run.
//!
//! ```text
//! Run,Rounds,QueueReleases,Algorithm,Scenario,QueueCount,AppCount
//! 1,2,5,SEQ_SUB__ACTIVE_REL,START_UP,10,2
//! ```

use std::io::{BufRead, Write};

use rebalance_core::{Algorithm, RunConfig, RunOutcome, Scenario};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column::Column;
use crate::error::{Error, Result};

/// A single cell value, ordered numbers first then text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(u64),
    Text(String),
}

/// One successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultRow {
    pub run: u64,
    pub rounds: u64,
    pub queue_releases: u64,
    pub algorithm: Algorithm,
    pub scenario: Scenario,
    pub queue_count: u64,
    pub app_count: u64,
}

impl ResultRow {
    /// Row for a run, or `None` if the run did not balance.
    pub fn from_outcome(run: u64, config: &RunConfig, outcome: &RunOutcome) -> Option<Self> {
        let RunOutcome::Balanced { rounds, releases } = *outcome else {
            return None;
        };
        Some(Self {
            run,
            rounds: u64::from(rounds),
            queue_releases: releases,
            algorithm: config.algorithm,
            scenario: config.scenario,
            queue_count: config.queue_count as u64,
            app_count: config.app_count as u64,
        })
    }

    pub fn cell(&self, column: Column) -> Cell {
        match column {
            Column::Run => Cell::Number(self.run),
            Column::Rounds => Cell::Number(self.rounds),
            Column::QueueReleases => Cell::Number(self.queue_releases),
            Column::Algorithm => Cell::Text(self.algorithm.name().to_string()),
            Column::Scenario => Cell::Text(self.scenario.name().to_string()),
            Column::QueueCount => Cell::Number(self.queue_count),
            Column::AppCount => Cell::Number(self.app_count),
        }
    }

    /// Numeric value of a column, `None` for text columns.
    pub fn number(&self, column: Column) -> Option<u64> {
        match self.cell(column) {
            Cell::Number(n) => Some(n),
            Cell::Text(_) => None,
        }
    }

    fn csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.run,
            self.rounds,
            self.queue_releases,
            self.algorithm,
            self.scenario,
            self.queue_count,
            self.app_count
        )
    }
}

/// Header line of a result table.
pub fn header() -> String {
    Column::ALL.map(|c| c.name()).join(",")
}

/// Streams result rows as CSV.
pub struct ResultWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl<W: Write> ResultWriter<W> {
    /// Create a writer and emit the header.
    pub fn new(mut inner: W) -> Result<Self> {
        writeln!(inner, "{}", header())?;
        Ok(Self { inner, rows: 0 })
    }

    pub fn write_row(&mut self, row: &ResultRow) -> Result<()> {
        writeln!(self.inner, "{}", row.csv_line())?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// An in-memory result table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse a CSV result table. Columns are matched by header name, so
    /// their order does not matter. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(Error::MissingHeader),
            }
        };

        let names: Vec<Column> = header
            .split(',')
            .map(|name| name.trim().parse())
            .collect::<Result<_>>()?;
        let index_of = |column: Column| {
            names
                .iter()
                .position(|&c| c == column)
                .ok_or(Error::MissingColumn(column))
        };
        let positions = Column::ALL.map(index_of);
        let mut indices = [0usize; 7];
        for (slot, position) in indices.iter_mut().zip(positions) {
            *slot = position?;
        }

        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(parse_row(idx + 1, &line, &indices, names.len())?);
        }

        debug!(rows = rows.len(), "read result table");
        Ok(Self { rows })
    }
}

fn parse_row(line_no: usize, line: &str, indices: &[usize; 7], width: usize) -> Result<ResultRow> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != width {
        return Err(Error::Parse {
            line: line_no,
            message: format!("expected {width} fields, found {}", fields.len()),
        });
    }

    let field = |column: Column| fields[indices[column as usize]];
    let number = |column: Column| {
        field(column).parse::<u64>().map_err(|e| Error::Parse {
            line: line_no,
            message: format!("{column}: {e}"),
        })
    };
    let parse_err = |e: rebalance_core::Error| Error::Parse {
        line: line_no,
        message: e.to_string(),
    };

    Ok(ResultRow {
        run: number(Column::Run)?,
        rounds: number(Column::Rounds)?,
        queue_releases: number(Column::QueueReleases)?,
        algorithm: field(Column::Algorithm).parse().map_err(parse_err)?,
        scenario: field(Column::Scenario).parse().map_err(parse_err)?,
        queue_count: number(Column::QueueCount)?,
        app_count: number(Column::AppCount)?,
    })
}
