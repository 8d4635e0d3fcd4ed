//! Search policy types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// What happens when a strictly better path reaches an already-expanded
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedPolicy {
    /// Re-open it: update g/f/back-pointer and push it back on the frontier.
    #[default]
    Reopen,
    /// Closed states are never reconsidered.
    Permanent,
}

/// When the goal test runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCheck {
    /// On the start configuration and on each newly discovered successor.
    /// Terminates one expansion earlier than `OnExpansion`.
    #[default]
    OnGeneration,
    /// When a node is selected for expansion (textbook A*; optimal under
    /// an admissible estimator). This is the timing of a solver loop that
    /// pops the minimum-f state and then asks the environment whether it
    /// is solved.
    OnExpansion,
}

/// Search budgets and behavior switches.
///
/// Missing fields take their [`Default`] values when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPolicy {
    /// Hard cap on node expansions.
    pub max_expansions: u64,
    /// λ: weight on the heuristic term of `f = g + λ·h`.
    pub heuristic_weight: f64,
    pub closed_policy: ClosedPolicy,
    pub goal_check: GoalCheck,
    /// Optional wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Record a per-expansion trace in the result.
    pub record_trace: bool,
}

impl SearchPolicy {
    /// Reject policies the engine cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if `heuristic_weight` is not
    /// a finite non-negative number.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.heuristic_weight.is_finite() || self.heuristic_weight < 0.0 {
            return Err(SearchError::InvalidPolicy {
                detail: format!(
                    "heuristic_weight must be finite and >= 0, got {}",
                    self.heuristic_weight
                ),
            });
        }
        Ok(())
    }

    /// The wall-clock limit, if any.
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_expansions: 200,
            heuristic_weight: 1.0,
            closed_policy: ClosedPolicy::Reopen,
            goal_check: GoalCheck::OnGeneration,
            time_limit_ms: None,
            record_trace: false,
        }
    }
}
