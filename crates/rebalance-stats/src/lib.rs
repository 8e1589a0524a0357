//! Result tables and percentile statistics for rebalance simulations.
//!
//! A sweep writes one [`ResultRow`] per balanced run through a
//! [`ResultWriter`]. The table can be read back with
//! [`ResultTable::from_reader`] and summarised per configuration with
//! [`aggregate`].

mod aggregate;
mod column;
mod error;
mod table;

pub use aggregate::{aggregate, output_file_name, quantile, Aggregate, AggregateRow, Summary, PERCENTILES};
pub use column::Column;
pub use error::{Error, Result};
pub use table::{header, Cell, ResultRow, ResultTable, ResultWriter};
