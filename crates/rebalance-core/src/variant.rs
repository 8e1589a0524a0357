//! Algorithm variants and scenarios.
//!
//! An [`Algorithm`] is the cross product of two independent choices: how
//! apps interleave their initial subscriptions, and which subscriptions a
//! balanced app is willing to release.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Order in which apps make their initial subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionOrder {
    /// App order is shuffled once, then each app subscribes to every queue
    /// before the next app starts.
    Sequential,
    /// Every (app, queue) pair is shuffled together.
    Random,
}

/// Which subscriptions an app may release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Only queues where the app is active.
    ActiveOnly,
    /// Additionally, an app at its ideal share releases its passive
    /// subscriptions while some other app is below its ideal share.
    ActiveAndPassive,
}

/// One of the four rebalancing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Algorithm {
    pub order: SubscriptionOrder,
    pub release: ReleasePolicy,
}

impl Algorithm {
    pub const SEQ_SUB_ACTIVE_REL: Algorithm = Algorithm::new(SubscriptionOrder::Sequential, ReleasePolicy::ActiveOnly);
    pub const RAND_SUB_ACTIVE_REL: Algorithm = Algorithm::new(SubscriptionOrder::Random, ReleasePolicy::ActiveOnly);
    pub const SEQ_SUB_NONACTIVE_REL: Algorithm =
        Algorithm::new(SubscriptionOrder::Sequential, ReleasePolicy::ActiveAndPassive);
    pub const RAND_SUB_NONACTIVE_REL: Algorithm =
        Algorithm::new(SubscriptionOrder::Random, ReleasePolicy::ActiveAndPassive);

    /// Every variant.
    pub const ALL: [Algorithm; 4] = [
        Self::SEQ_SUB_ACTIVE_REL,
        Self::RAND_SUB_ACTIVE_REL,
        Self::SEQ_SUB_NONACTIVE_REL,
        Self::RAND_SUB_NONACTIVE_REL,
    ];

    pub const fn new(order: SubscriptionOrder, release: ReleasePolicy) -> Self {
        Self { order, release }
    }

    /// Canonical name, as written to result tables.
    pub const fn name(&self) -> &'static str {
        match (self.order, self.release) {
            (SubscriptionOrder::Sequential, ReleasePolicy::ActiveOnly) => "SEQ_SUB__ACTIVE_REL",
            (SubscriptionOrder::Random, ReleasePolicy::ActiveOnly) => "RAND_SUB__ACTIVE_REL",
            (SubscriptionOrder::Sequential, ReleasePolicy::ActiveAndPassive) => "SEQ_SUB__NONACTIVE_REL",
            (SubscriptionOrder::Random, ReleasePolicy::ActiveAndPassive) => "RAND_SUB__NONACTIVE_REL",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.name().to_string()
    }
}

/// Experimental setup of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    /// All apps start together and subscribe from scratch.
    StartUp,
    /// Apps start perfectly balanced, then one active app crashes.
    LoseOneApp,
}

impl Scenario {
    /// Every scenario.
    pub const ALL: [Scenario; 2] = [Scenario::StartUp, Scenario::LoseOneApp];

    /// Canonical name, as written to result tables.
    pub const fn name(&self) -> &'static str {
        match self {
            Scenario::StartUp => "START_UP",
            Scenario::LoseOneApp => "LOSE_ONE_APP",
        }
    }

    /// Fewest apps the scenario can run with.
    pub const fn min_apps(&self) -> usize {
        match self {
            Scenario::StartUp => 1,
            Scenario::LoseOneApp => 2,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownScenario(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>(), Ok(algorithm));
        }
        for scenario in Scenario::ALL {
            assert_eq!(scenario.to_string().parse::<Scenario>(), Ok(scenario));
        }
    }

    #[test]
    fn names_match_result_tables() {
        assert_eq!(Algorithm::SEQ_SUB_ACTIVE_REL.to_string(), "SEQ_SUB__ACTIVE_REL");
        assert_eq!(Algorithm::RAND_SUB_NONACTIVE_REL.to_string(), "RAND_SUB__NONACTIVE_REL");
        assert_eq!(Scenario::LoseOneApp.to_string(), "LOSE_ONE_APP");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("seq_sub__nonactive_rel".parse::<Algorithm>(), Ok(Algorithm::SEQ_SUB_NONACTIVE_REL));
        assert_eq!("start_up".parse::<Scenario>(), Ok(Scenario::StartUp));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "SEQ_SUB".parse::<Algorithm>(),
            Err(Error::UnknownAlgorithm("SEQ_SUB".to_string()))
        );
        assert!("SHUT_DOWN".parse::<Scenario>().is_err());
    }

    #[test]
    fn variants_are_distinct() {
        let mut names: Vec<_> = Algorithm::ALL.iter().map(|a| a.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&Algorithm::RAND_SUB_ACTIVE_REL).unwrap();
        assert_eq!(json, "\"RAND_SUB__ACTIVE_REL\"");
        let back: Algorithm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Algorithm::RAND_SUB_ACTIVE_REL);

        let json = serde_json::to_string(&Scenario::StartUp).unwrap();
        assert_eq!(json, "\"START_UP\"");
    }
}
