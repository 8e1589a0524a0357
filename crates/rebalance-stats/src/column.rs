//! Columns of a result table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One column of the result table, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    Run,
    Rounds,
    QueueReleases,
    Algorithm,
    Scenario,
    QueueCount,
    AppCount,
}

impl Column {
    /// All columns in file order.
    pub const ALL: [Column; 7] = [
        Column::Run,
        Column::Rounds,
        Column::QueueReleases,
        Column::Algorithm,
        Column::Scenario,
        Column::QueueCount,
        Column::AppCount,
    ];

    /// Columns the sweep groups by when it aggregates on its own.
    pub const CONFIGURATION: [Column; 4] = [
        Column::Algorithm,
        Column::Scenario,
        Column::QueueCount,
        Column::AppCount,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Column::Run => "Run",
            Column::Rounds => "Rounds",
            Column::QueueReleases => "QueueReleases",
            Column::Algorithm => "Algorithm",
            Column::Scenario => "Scenario",
            Column::QueueCount => "QueueCount",
            Column::AppCount => "AppCount",
        }
    }

    pub const fn is_numeric(&self) -> bool {
        !matches!(self, Column::Algorithm | Column::Scenario)
    }

    /// Parse a comma separated list such as `Algorithm,Scenario`.
    pub fn parse_list(list: &str) -> Result<Vec<Column>, Error> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| Error::UnknownColumn(s.to_string()))
    }
}
