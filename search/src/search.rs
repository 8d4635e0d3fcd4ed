//! Search entry point and expansion loop.
//!
//! # Algorithm
//!
//! A* over the move graph with `f = g + λ·h` and uniform move cost:
//!
//! 1. Test the start configuration; if it is a goal, return the empty path.
//! 2. Pop the frontier entry with the lowest `(f, seq)`; skip stale entries.
//! 3. Close the node and recover its configuration from its encoded state.
//! 4. For each move in `all_moves` order: apply it under an
//!    [`AppliedMove`] guard, key the successor, and either discover it,
//!    improve it (re-opening it if closed), or suppress it as a duplicate.
//!    Newly discovered successors are goal-tested immediately.
//! 5. Repeat until a goal is found, the expansion budget or time limit is
//!    hit, or the frontier empties.
//!
//! Budget exhaustion is a normal termination, never a claim that the start
//! is unsolvable.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use log::{debug, info, trace, warn};

use cubist_kernel::carrier::codec::{decode, encode, EncodedState};
use cubist_kernel::carrier::configuration::Configuration;
use cubist_kernel::operators::apply::AppliedMove;
use cubist_kernel::operators::moves::{all_moves, Move};

use crate::contract::{GoalTest, Solved};
use crate::error::{HeuristicError, SearchError};
use crate::frontier::BestFirstFrontier;
use crate::heuristic::Heuristic;
use crate::node::{NodeArena, NodeId, NodeStatus, SearchNode};
use crate::policy::{ClosedPolicy, GoalCheck, SearchPolicy};
use crate::trace::{ExpansionRecord, SearchStats, SearchTrace};

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A goal configuration was reached.
    GoalReached,
    /// `max_expansions` was hit with the frontier non-empty.
    BudgetExhausted,
    /// The frontier emptied without reaching a goal.
    FrontierExhausted,
    /// The wall-clock limit elapsed.
    TimeLimitExceeded,
}

/// Result of a search execution.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub termination: Termination,
    /// The move sequence from start to goal, when one was found.
    pub path: Option<Vec<Move>>,
    pub stats: SearchStats,
    /// Present when the policy asked for a trace.
    pub trace: Option<SearchTrace>,
}

impl SearchResult {
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        self.termination == Termination::GoalReached
    }

    /// The solution path, if the goal was reached.
    #[must_use]
    pub fn solution(&self) -> Option<&[Move]> {
        self.path.as_deref()
    }
}

/// Search from `start` to the solved configuration.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPolicy`] before any work if the policy is
/// invalid, and [`SearchError::HeuristicUnavailable`] if the heuristic
/// fails, panics, or returns NaN or a negative value.
pub fn search(
    start: &Configuration,
    heuristic: &dyn Heuristic,
    policy: &SearchPolicy,
) -> Result<SearchResult, SearchError> {
    search_with_goal(start, heuristic, &Solved, policy)
}

/// Search from `start` to any configuration accepted by `goal`.
///
/// # Errors
///
/// See [`search`].
pub fn search_with_goal(
    start: &Configuration,
    heuristic: &dyn Heuristic,
    goal: &dyn GoalTest,
    policy: &SearchPolicy,
) -> Result<SearchResult, SearchError> {
    policy.validate()?;
    AStar::new(heuristic, goal, policy).run(start)
}

/// Engine state for one search call. Nothing survives across calls.
struct AStar<'a> {
    heuristic: &'a dyn Heuristic,
    goal: &'a dyn GoalTest,
    policy: &'a SearchPolicy,
    nodes: NodeArena,
    frontier: BestFirstFrontier,
    stats: SearchStats,
    trace: Option<SearchTrace>,
}

/// Outcome of offering one successor to the node table.
enum Offer {
    Discovered(NodeId),
    Improved,
    Suppressed,
}

impl<'a> AStar<'a> {
    fn new(heuristic: &'a dyn Heuristic, goal: &'a dyn GoalTest, policy: &'a SearchPolicy) -> Self {
        Self {
            heuristic,
            goal,
            policy,
            nodes: NodeArena::new(),
            frontier: BestFirstFrontier::new(),
            stats: SearchStats::default(),
            trace: policy.record_trace.then(SearchTrace::default),
        }
    }

    fn run(mut self, start: &Configuration) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let deadline = self.policy.time_limit();
        let moves = all_moves(start.size());

        if self.goal.is_goal(start) {
            self.stats.nodes = 1;
            return Ok(self.finish(Termination::GoalReached, Some(Vec::new())));
        }

        let root_state = encode(start);
        let root_h = self.estimate(&root_state)?;
        let root = self.nodes.insert(SearchNode {
            state: root_state,
            parent: None,
            g: 0,
            h: root_h,
            f: self.f_score(0, root_h),
            status: NodeStatus::Closed,
        });
        self.stats.nodes = 1;
        self.push(root);

        loop {
            if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                return Ok(self.finish(Termination::TimeLimitExceeded, None));
            }
            if self.stats.expansions >= self.policy.max_expansions {
                return Ok(self.finish(Termination::BudgetExhausted, None));
            }
            let Some((current, key)) = self.frontier.pop() else {
                return Ok(self.finish(Termination::FrontierExhausted, None));
            };
            if self.nodes.get(current).status != (NodeStatus::Open { seq: key.seq }) {
                self.stats.stale_pops += 1;
                continue;
            }
            self.nodes.get_mut(current).status = NodeStatus::Closed;

            let mut working = decode(&self.nodes.get(current).state)?;
            if self.policy.goal_check == GoalCheck::OnExpansion && self.goal.is_goal(&working) {
                let path = self.nodes.path_to(current);
                return Ok(self.finish(Termination::GoalReached, Some(path)));
            }

            let order = self.stats.expansions;
            self.stats.expansions += 1;
            let mut enqueued = 0u32;
            for &mv in &moves {
                let successor = AppliedMove::new(&mut working, mv)?;
                self.stats.generated += 1;
                match self.offer(current, mv, encode(&successor))? {
                    Offer::Discovered(child) => {
                        enqueued += 1;
                        if self.policy.goal_check == GoalCheck::OnGeneration
                            && self.goal.is_goal(&successor)
                        {
                            self.record(order, current, enqueued);
                            let path = self.nodes.path_to(child);
                            return Ok(self.finish(Termination::GoalReached, Some(path)));
                        }
                    }
                    Offer::Improved => enqueued += 1,
                    Offer::Suppressed => {}
                }
            }
            self.record(order, current, enqueued);
        }
    }

    /// Discover, improve, or suppress the successor reached by `mv`.
    fn offer(
        &mut self,
        parent: NodeId,
        mv: Move,
        state: EncodedState,
    ) -> Result<Offer, SearchError> {
        let g = self.nodes.get(parent).g + 1;

        if let Some(existing) = self.nodes.lookup(&state) {
            let node = self.nodes.get(existing);
            if node.is_closed() && self.policy.closed_policy == ClosedPolicy::Permanent {
                self.stats.duplicates_suppressed += 1;
                return Ok(Offer::Suppressed);
            }
            let f = self.f_score(g, node.h);
            if f >= node.f {
                self.stats.duplicates_suppressed += 1;
                return Ok(Offer::Suppressed);
            }
            if node.is_closed() {
                self.stats.reopenings += 1;
                debug!("re-opening node {} (f {} -> {f})", existing.0, node.f);
            }
            let node = self.nodes.get_mut(existing);
            node.g = g;
            node.f = f;
            node.parent = Some((parent, mv));
            self.push(existing);
            return Ok(Offer::Improved);
        }

        let h = self.estimate(&state)?;
        let child = self.nodes.insert(SearchNode {
            state,
            parent: Some((parent, mv)),
            g,
            h,
            f: self.f_score(g, h),
            status: NodeStatus::Closed,
        });
        self.stats.nodes += 1;
        self.push(child);
        Ok(Offer::Discovered(child))
    }

    /// Put `id` on the frontier under its current f-score.
    fn push(&mut self, id: NodeId) {
        let seq = self.frontier.push(id, self.nodes.get(id).f);
        self.nodes.get_mut(id).status = NodeStatus::Open { seq };
    }

    fn f_score(&self, g: u32, h: f64) -> f64 {
        let weight = self.policy.heuristic_weight;
        // λ = 0 must ignore h entirely, including h = +∞.
        if weight > 0.0 {
            f64::from(g) + weight * h
        } else {
            f64::from(g)
        }
    }

    /// Call the heuristic with panic protection and validate the estimate.
    fn estimate(&mut self, state: &EncodedState) -> Result<f64, SearchError> {
        self.stats.heuristic_calls += 1;
        let outcome = catch_unwind(AssertUnwindSafe(|| self.heuristic.estimate(state)))
            .unwrap_or_else(|payload| {
                Err(HeuristicError::Panicked {
                    message: panic_message(payload.as_ref()),
                })
            })
            .and_then(|value| {
                if value.is_nan() || value < 0.0 {
                    Err(HeuristicError::InvalidEstimate { value })
                } else {
                    Ok(value)
                }
            });
        outcome.map_err(|err| {
            warn!("aborting search: {err}");
            SearchError::HeuristicUnavailable(err)
        })
    }

    fn record(&mut self, order: u64, node: NodeId, enqueued: u32) {
        let expanded = self.nodes.get(node);
        trace!(
            "expansion {order}: node {} g={} f={} enqueued={enqueued}",
            node.0,
            expanded.g,
            expanded.f
        );
        if let Some(trace) = self.trace.as_mut() {
            trace.expansions.push(ExpansionRecord {
                order,
                node,
                g: expanded.g,
                f: expanded.f,
                enqueued,
            });
        }
    }

    fn finish(mut self, termination: Termination, path: Option<Vec<Move>>) -> SearchResult {
        self.stats.frontier_high_water = self.frontier.high_water() as u64;
        info!(
            "search finished: {termination:?} after {} expansions ({} nodes), path length {}",
            self.stats.expansions,
            self.stats.nodes,
            path.as_ref().map_or_else(|| "-".to_string(), |p| p.len().to_string())
        );
        SearchResult {
            termination,
            path,
            stats: self.stats,
            trace: self.trace,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
