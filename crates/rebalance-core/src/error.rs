//! Error types for rebalance-core.

use thiserror::Error;

use crate::variant::Scenario;

/// Result type for rebalance-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised before or around a simulation run.
///
/// Non-convergence is not an error: it is reported as
/// [`RunOutcome::Failed`](crate::RunOutcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A run needs at least one queue.
    #[error("queue count must be at least 1")]
    NoQueues,

    /// A run needs at least one app.
    #[error("app count must be at least 1")]
    NoApps,

    /// A run needs at least one round.
    #[error("max rounds must be at least 1")]
    NoRounds,

    /// The scenario removes an app, so it needs a survivor.
    #[error("scenario {scenario} needs at least {needed} apps, got {actual}")]
    NotEnoughApps {
        scenario: Scenario,
        needed: usize,
        actual: usize,
    },

    /// No queue has an active consumer, so there is nobody to kill.
    #[error("no app is active on any queue")]
    NoActiveApp,

    /// Algorithm name did not match any known variant.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Scenario name did not match any known scenario.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}
