//! Percentile aggregation over a result table.
//!
//! Rows are grouped by a set of columns and summarised over one numeric
//! column: run count, min, the 50/75/90/95/99th percentiles and max.
//! Percentiles interpolate linearly between the two closest ranks.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::column::Column;
use crate::error::{Error, Result};
use crate::table::{Cell, ResultTable};

/// Percentiles reported for every group.
pub const PERCENTILES: [f64; 5] = [0.5, 0.75, 0.9, 0.95, 0.99];

/// Statistics of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub runs: usize,
    pub min_val: u64,
    pub percentile_50: f64,
    pub percentile_75: f64,
    pub percentile_90: f64,
    pub percentile_95: f64,
    pub percentile_99: f64,
    pub max_val: u64,
}

impl Summary {
    /// Summarise a non-empty set of values. `None` if empty.
    pub fn of(values: &[u64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        let (&min_val, &max_val) = (sorted.first()?, sorted.last()?);

        let as_f64: Vec<f64> = sorted.iter().map(|&v| v as f64).collect();
        let [p50, p75, p90, p95, p99] = PERCENTILES.map(|q| quantile(&as_f64, q));

        Some(Self {
            runs: sorted.len(),
            min_val,
            percentile_50: p50,
            percentile_75: p75,
            percentile_90: p90,
            percentile_95: p95,
            percentile_99: p99,
            max_val,
        })
    }

    const HEADER: &'static str =
        "runs,min_val,percentile_50,percentile_75,percentile_90,percentile_95,percentile_99,max_val";

    fn csv_fields(&self) -> String {
        format!(
            "{},{},{:?},{:?},{:?},{:?},{:?},{}",
            self.runs,
            self.min_val,
            self.percentile_50,
            self.percentile_75,
            self.percentile_90,
            self.percentile_95,
            self.percentile_99,
            self.max_val
        )
    }
}

/// Quantile `q` in `[0, 1]` of ascending `sorted`, interpolating linearly
/// between ranks. NaN for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// One group and its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    /// Group-by values, in group-by column order.
    pub key: Vec<Cell>,
    pub summary: Summary,
}

/// The aggregated table.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub value: Column,
    pub group_by: Vec<Column>,
    /// Groups in ascending key order.
    pub rows: Vec<AggregateRow>,
}

/// Group `table` by `group_by` and summarise the `value` column.
pub fn aggregate(table: &ResultTable, value: Column, group_by: &[Column]) -> Result<Aggregate> {
    if !value.is_numeric() {
        return Err(Error::NotNumeric(value));
    }

    let mut groups: BTreeMap<Vec<Cell>, Vec<u64>> = BTreeMap::new();
    for row in table.rows() {
        let key = group_by.iter().map(|&c| row.cell(c)).collect();
        let number = row.number(value).ok_or(Error::NotNumeric(value))?;
        groups.entry(key).or_default().push(number);
    }

    let rows = groups
        .into_iter()
        .filter_map(|(key, values)| Summary::of(&values).map(|summary| AggregateRow { key, summary }))
        .collect();

    Ok(Aggregate {
        value,
        group_by: group_by.to_vec(),
        rows,
    })
}

impl Aggregate {
    /// Write as CSV: group-by columns, then the statistics.
    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<()> {
        let mut header: Vec<&str> = self.group_by.iter().map(Column::name).collect();
        header.push(Summary::HEADER);
        writeln!(out, "{}", header.join(","))?;

        for row in &self.rows {
            let mut fields: Vec<String> = row
                .key
                .iter()
                .map(|cell| match cell {
                    Cell::Number(n) => n.to_string(),
                    Cell::Text(s) => s.clone(),
                })
                .collect();
            fields.push(row.summary.csv_fields());
            writeln!(out, "{}", fields.join(","))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Render as a JSON array with one object per group.
    pub fn to_json(&self) -> Result<String> {
        let mut groups = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut object = Map::new();
            for (column, cell) in self.group_by.iter().zip(&row.key) {
                object.insert(column.name().to_string(), serde_json::to_value(cell)?);
            }
            if let Value::Object(stats) = serde_json::to_value(&row.summary)? {
                object.extend(stats);
            }
            groups.push(Value::Object(object));
        }
        Ok(serde_json::to_string_pretty(&groups)?)
    }
}

/// Default output path: `agg_<value>__<input file name>` in the current
/// directory.
pub fn output_file_name(value: Column, input: &Path) -> PathBuf {
    let base = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("agg_{}__{}", value.name(), base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ResultRow;
    use proptest::prelude::*;
    use rebalance_core::{Algorithm, Scenario};

    fn row(rounds: u64, algorithm: Algorithm, app_count: u64) -> ResultRow {
        ResultRow {
            run: 1,
            rounds,
            queue_releases: rounds * 2,
            algorithm,
            scenario: Scenario::StartUp,
            queue_count: 10,
            app_count,
        }
    }

    #[test]
    fn quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 1.0), 4.0);
        assert!((quantile(&values, 0.9) - 3.7).abs() < 1e-9);
        assert_eq!(quantile(&[7.0], 0.99), 7.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn summary_of_values() {
        let summary = Summary::of(&[5, 1, 3, 2, 4]).unwrap();
        assert_eq!(summary.runs, 5);
        assert_eq!(summary.min_val, 1);
        assert_eq!(summary.max_val, 5);
        assert_eq!(summary.percentile_50, 3.0);
        assert_eq!(summary.percentile_75, 4.0);
        assert!(Summary::of(&[]).is_none());
    }

    #[test]
    fn groups_are_sorted() {
        let table = ResultTable::new(vec![
            row(3, Algorithm::SEQ_SUB_ACTIVE_REL, 10),
            row(1, Algorithm::RAND_SUB_ACTIVE_REL, 2),
            row(5, Algorithm::SEQ_SUB_ACTIVE_REL, 2),
            row(2, Algorithm::SEQ_SUB_ACTIVE_REL, 2),
        ]);
        let agg = aggregate(&table, Column::Rounds, &[Column::Algorithm, Column::AppCount]).unwrap();

        let keys: Vec<_> = agg.rows.iter().map(|r| r.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                vec![Cell::Text("RAND_SUB__ACTIVE_REL".into()), Cell::Number(2)],
                vec![Cell::Text("SEQ_SUB__ACTIVE_REL".into()), Cell::Number(2)],
                vec![Cell::Text("SEQ_SUB__ACTIVE_REL".into()), Cell::Number(10)],
            ]
        );
        assert_eq!(agg.rows[1].summary.runs, 2);
        assert_eq!(agg.rows[1].summary.percentile_50, 3.5);
    }

    #[test]
    fn text_value_column_rejected() {
        let table = ResultTable::new(vec![row(1, Algorithm::SEQ_SUB_ACTIVE_REL, 2)]);
        assert!(matches!(
            aggregate(&table, Column::Scenario, &[Column::AppCount]),
            Err(Error::NotNumeric(Column::Scenario))
        ));
    }

    #[test]
    fn csv_output() {
        let table = ResultTable::new(vec![
            row(1, Algorithm::SEQ_SUB_ACTIVE_REL, 2),
            row(3, Algorithm::SEQ_SUB_ACTIVE_REL, 2),
        ]);
        let agg = aggregate(&table, Column::QueueReleases, &[Column::Algorithm]).unwrap();

        let mut out = Vec::new();
        agg.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Algorithm,runs,min_val,percentile_50,percentile_75,percentile_90,percentile_95,percentile_99,max_val"
        );
        assert_eq!(lines[1], "SEQ_SUB__ACTIVE_REL,2,2,4.0,5.0,5.6,5.8,5.96,6");
    }

    #[test]
    fn json_output() {
        let table = ResultTable::new(vec![row(2, Algorithm::SEQ_SUB_ACTIVE_REL, 4)]);
        let agg = aggregate(&table, Column::Rounds, &[Column::AppCount]).unwrap();
        let json: Value = serde_json::from_str(&agg.to_json().unwrap()).unwrap();

        assert_eq!(json[0]["AppCount"], 4);
        assert_eq!(json[0]["runs"], 1);
        assert_eq!(json[0]["percentile_99"], 2.0);
    }

    #[test]
    fn output_name_uses_input_basename() {
        let path = output_file_name(Column::Rounds, Path::new("/tmp/runs/py_results.csv"));
        assert_eq!(path, PathBuf::from("agg_Rounds__py_results.csv"));
    }

    proptest! {
        #[test]
        fn percentiles_are_ordered(values in prop::collection::vec(0u64..10_000, 1..200)) {
            let s = Summary::of(&values).unwrap();
            prop_assert!(s.min_val as f64 <= s.percentile_50);
            prop_assert!(s.percentile_50 <= s.percentile_75);
            prop_assert!(s.percentile_75 <= s.percentile_90);
            prop_assert!(s.percentile_90 <= s.percentile_95);
            prop_assert!(s.percentile_95 <= s.percentile_99);
            prop_assert!(s.percentile_99 <= s.max_val as f64);
            prop_assert_eq!(s.runs, values.len());
        }
    }
}
