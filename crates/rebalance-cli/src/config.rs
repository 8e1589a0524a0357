//! Sweep configuration.
//!
//! Defaults reproduce the reference experiment: 10 queues, 2 to 15 apps,
//! every algorithm and scenario, 1000 samples each. A JSON file can
//! override any subset of fields; command-line flags override the file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context};
use rebalance_core::{Algorithm, RunConfig, Scenario, DEFAULT_MAX_ROUNDS};
use serde::{Deserialize, Serialize};

/// Inclusive range of counts, written `2..=15`, `2-15` or `10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub const fn single(value: usize) -> Self {
        Self { min: value, max: value }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.min..=self.max
    }
}

impl fmt::Display for CountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..={}", self.min, self.max)
        }
    }
}

impl FromStr for CountRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid count {part:?}: {e}"))
        };

        let (min, max) = if let Some((lo, hi)) = s.split_once("..=") {
            (parse(lo)?, parse(hi)?)
        } else if let Some((lo, hi)) = s.split_once('-') {
            (parse(lo)?, parse(hi)?)
        } else {
            let value = parse(s)?;
            (value, value)
        };

        if min > max {
            return Err(format!("empty range {s:?}"));
        }
        Ok(Self { min, max })
    }
}

impl TryFrom<String> for CountRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CountRange> for String {
    fn from(value: CountRange) -> Self {
        value.to_string()
    }
}

/// Everything a sweep needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub queue_counts: CountRange,
    pub app_counts: CountRange,
    /// Runs per configuration.
    pub samples: u64,
    pub max_rounds: u32,
    pub algorithms: Vec<Algorithm>,
    pub scenarios: Vec<Scenario>,
    /// Fixed seed; a random one is drawn and logged when absent.
    pub seed: Option<u64>,
    /// Result table path.
    pub output: PathBuf,
    /// Aggregate rounds per configuration once the sweep is done.
    pub aggregate: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            queue_counts: CountRange::single(10),
            app_counts: CountRange::new(2, 15),
            samples: 1000,
            max_rounds: DEFAULT_MAX_ROUNDS,
            algorithms: Algorithm::ALL.to_vec(),
            scenarios: Scenario::ALL.to_vec(),
            seed: None,
            output: PathBuf::from("results.csv"),
            aggregate: false,
        }
    }
}

impl SweepConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, range) in [("queue", self.queue_counts), ("app", self.app_counts)] {
            if range.min > range.max {
                bail!("{name} counts {}..={} are empty", range.min, range.max);
            }
        }
        if self.queue_counts.min == 0 {
            bail!("queue counts must start at 1 or more");
        }
        if self.app_counts.min == 0 {
            bail!("app counts must start at 1 or more");
        }
        if self.samples == 0 {
            bail!("samples must be at least 1");
        }
        if self.max_rounds == 0 {
            bail!("max rounds must be at least 1");
        }
        if self.algorithms.is_empty() {
            bail!("no algorithms selected");
        }
        if self.scenarios.is_empty() {
            bail!("no scenarios selected");
        }
        Ok(())
    }

    /// Every run configuration of the sweep, in sweep order: app count,
    /// queue count, algorithm, scenario. Combinations the scenario cannot
    /// run (too few apps) are left out.
    pub fn run_configs(&self) -> Vec<RunConfig> {
        let mut configs = Vec::new();
        for app_count in self.app_counts.iter() {
            for queue_count in self.queue_counts.iter() {
                for &algorithm in &self.algorithms {
                    for &scenario in &self.scenarios {
                        if app_count < scenario.min_apps() {
                            continue;
                        }
                        configs.push(
                            RunConfig::new(queue_count, app_count)
                                .with_algorithm(algorithm)
                                .with_scenario(scenario)
                                .with_max_rounds(self.max_rounds),
                        );
                    }
                }
            }
        }
        configs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_range_forms() {
        assert_eq!("2..=15".parse::<CountRange>(), Ok(CountRange::new(2, 15)));
        assert_eq!("3-4".parse::<CountRange>(), Ok(CountRange::new(3, 4)));
        assert_eq!(" 10 ".parse::<CountRange>(), Ok(CountRange::single(10)));
        assert!("5..=2".parse::<CountRange>().is_err());
        assert!("x".parse::<CountRange>().is_err());
    }

    #[test]
    fn count_range_display() {
        assert_eq!(CountRange::new(2, 15).to_string(), "2..=15");
        assert_eq!(CountRange::single(10).to_string(), "10");
    }

    #[test]
    fn defaults_match_reference_experiment() {
        let config = SweepConfig::default();
        assert!(config.validate().is_ok());
        // 14 app counts x 4 algorithms x 2 scenarios
        assert_eq!(config.run_configs().len(), 14 * 4 * 2);
    }

    #[test]
    fn lose_one_app_skipped_for_single_app() {
        let config = SweepConfig {
            app_counts: CountRange::new(1, 2),
            algorithms: vec![Algorithm::SEQ_SUB_ACTIVE_REL],
            ..SweepConfig::default()
        };
        let configs = config.run_configs();
        assert_eq!(configs.len(), 3);
        assert!(configs
            .iter()
            .all(|c| c.app_count >= c.scenario.min_apps()));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SweepConfig =
            serde_json::from_str(r#"{"samples": 5, "algorithms": ["RAND_SUB__ACTIVE_REL"], "seed": 9}"#).unwrap();
        assert_eq!(config.samples, 5);
        assert_eq!(config.algorithms, vec![Algorithm::RAND_SUB_ACTIVE_REL]);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.app_counts, CountRange::new(2, 15));
    }

    #[test]
    fn ranges_use_text_form_in_json() {
        let config: SweepConfig =
            serde_json::from_str(r#"{"queue_counts": "10", "app_counts": "3-6"}"#).unwrap();
        assert_eq!(config.queue_counts, CountRange::single(10));
        assert_eq!(config.app_counts, CountRange::new(3, 6));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["app_counts"], "3..=6");
    }

    #[test]
    fn inverted_json_range_rejected() {
        assert!(serde_json::from_str::<SweepConfig>(r#"{"app_counts": "5..=2"}"#).is_err());
        assert!(serde_json::from_str::<SweepConfig>(r#"{"app_counts": {"min": 5, "max": 2}}"#).is_err());
    }

    #[test]
    fn inverted_range_fails_validation() {
        let config = SweepConfig {
            app_counts: CountRange::new(5, 2),
            ..SweepConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("app counts"));

        let config = SweepConfig {
            queue_counts: CountRange::new(3, 1),
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_json_field_rejected() {
        assert!(serde_json::from_str::<SweepConfig>(r#"{"sample": 5}"#).is_err());
    }

    #[test]
    fn invalid_values_rejected() {
        let config = SweepConfig {
            samples: 0,
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SweepConfig {
            scenarios: vec![],
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
