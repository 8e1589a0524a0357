//! Configuration of a single simulation run.

use crate::error::{Error, Result};
use crate::variant::{Algorithm, Scenario};

/// Default cutoff for non-converging runs.
pub const DEFAULT_MAX_ROUNDS: u32 = 1000;

/// Parameters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of queues.
    pub queue_count: usize,
    /// Number of apps before any fault injection.
    pub app_count: usize,
    /// Rounds after which the run is reported as failed.
    pub max_rounds: u32,
    /// Subscription order and release policy.
    pub algorithm: Algorithm,
    /// Initial state and fault injection.
    pub scenario: Scenario,
}

impl RunConfig {
    /// A start-up run with the sequential, active-only algorithm.
    pub fn new(queue_count: usize, app_count: usize) -> Self {
        Self {
            queue_count,
            app_count,
            max_rounds: DEFAULT_MAX_ROUNDS,
            algorithm: Algorithm::SEQ_SUB_ACTIVE_REL,
            scenario: Scenario::StartUp,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.queue_count == 0 {
            return Err(Error::NoQueues);
        }
        if self.app_count == 0 {
            return Err(Error::NoApps);
        }
        if self.max_rounds == 0 {
            return Err(Error::NoRounds);
        }
        let needed = self.scenario.min_apps();
        if self.app_count < needed {
            return Err(Error::NotEnoughApps {
                scenario: self.scenario,
                needed,
                actual: self.app_count,
            });
        }
        Ok(())
    }
}
