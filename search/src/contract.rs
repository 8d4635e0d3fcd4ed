//! Goal test contract.

use cubist_kernel::carrier::configuration::Configuration;
use cubist_kernel::proof::goal::is_solved;

/// Predicate deciding whether a configuration ends the search.
///
/// Must be deterministic. The engine catches nothing here: a goal test is
/// local code, not an external collaborator.
pub trait GoalTest {
    fn is_goal(&self, configuration: &Configuration) -> bool;
}

/// The standard goal: every face a single color.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solved;

impl GoalTest for Solved {
    fn is_goal(&self, configuration: &Configuration) -> bool {
        is_solved(configuration)
    }
}

impl<F> GoalTest for F
where
    F: Fn(&Configuration) -> bool,
{
    fn is_goal(&self, configuration: &Configuration) -> bool {
        self(configuration)
    }
}
