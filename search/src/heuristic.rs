//! The heuristic port: estimated moves-to-solve for an encoded state.
//!
//! The engine depends only on the [`Heuristic`] trait. A trained estimator
//! lives outside this crate and plugs in through it; the built-in
//! implementations cover the uniform case ([`ZeroHeuristic`]), closures
//! ([`FnHeuristic`]) and an exact breadth-first table
//! ([`TableHeuristic`]).

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;

use cubist_kernel::carrier::codec::{encode, EncodedState};
use cubist_kernel::carrier::configuration::Configuration;
use cubist_kernel::operators::apply::{apply, apply_in_place};
use cubist_kernel::operators::moves::{all_moves, Direction, Move, MoveError, Side};

use crate::error::HeuristicError;

/// Estimated remaining cost for a state.
///
/// # Contract
///
/// - Must not mutate shared state; calls go through `&self`.
/// - Must be deterministic per input.
/// - Must return a non-negative value (`+∞` is allowed and sorts last).
///   The engine rejects NaN and negative values as
///   [`HeuristicError::InvalidEstimate`].
pub trait Heuristic: Send + Sync {
    /// Estimate the remaining number of moves from `state` to a goal.
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicError`] when no estimate can be produced.
    fn estimate(&self, state: &EncodedState) -> Result<f64, HeuristicError>;
}

/// Estimates 0 everywhere. A* under this heuristic is uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _state: &EncodedState) -> Result<f64, HeuristicError> {
        Ok(0.0)
    }
}

/// Adapter for an infallible estimator closure.
pub struct FnHeuristic<F>(pub F);

impl<F> Heuristic for FnHeuristic<F>
where
    F: Fn(&EncodedState) -> f64 + Send + Sync,
{
    fn estimate(&self, state: &EncodedState) -> Result<f64, HeuristicError> {
        Ok((self.0)(state))
    }
}

impl<F> fmt::Debug for FnHeuristic<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHeuristic(..)")
    }
}

/// Exact distances to the nearest solved configuration, up to a depth bound.
///
/// Every whole-cube orientation of the solved cube passes the goal test, so
/// the breadth-first search starts from all of them at once. States within
/// the bound estimate their true distance; states beyond it estimate
/// `bound + 1`, which is still admissible.
#[derive(Debug, Clone)]
pub struct TableHeuristic {
    size: usize,
    bound: u32,
    distances: HashMap<EncodedState, u32>,
}

impl TableHeuristic {
    /// Enumerate every state within `bound` moves of solved.
    ///
    /// Table size grows as `(4N)^bound`; keep the bound small.
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicError::Unavailable`] if `size` is zero.
    pub fn build(size: usize, bound: u32) -> Result<Self, HeuristicError> {
        let unavailable = |reason: String| HeuristicError::Unavailable { reason };
        let solved = Configuration::solved(size).map_err(|e| unavailable(e.to_string()))?;
        let moves = all_moves(size);

        let mut distances = HashMap::new();
        let mut layer = solved_orientations(solved).map_err(|e| unavailable(e.to_string()))?;
        for configuration in &layer {
            distances.insert(encode(configuration), 0);
        }
        for depth in 1..=bound {
            let mut next = Vec::new();
            for configuration in &layer {
                for &mv in &moves {
                    let child = apply(configuration, mv).map_err(|e| unavailable(e.to_string()))?;
                    let key = encode(&child);
                    if !distances.contains_key(&key) {
                        distances.insert(key, depth);
                        next.push(child);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            layer = next;
        }
        debug!(
            "distance table for size {size}: {} states within {bound} moves",
            distances.len()
        );
        Ok(Self {
            size,
            bound,
            distances,
        })
    }

    /// Exact distance if the state lies within the bound.
    #[must_use]
    pub fn distance(&self, state: &EncodedState) -> Option<u32> {
        self.distances.get(state).copied()
    }

    #[must_use]
    pub fn bound(&self) -> u32 {
        self.bound
    }

    /// Number of tabulated states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Every orientation of `solved` reachable by turning all layers of one
/// side together.
fn solved_orientations(solved: Configuration) -> Result<Vec<Configuration>, MoveError> {
    let size = solved.size();
    let mut seen = HashSet::from([encode(&solved)]);
    let mut found = vec![solved];
    let mut cursor = 0;
    while cursor < found.len() {
        for side in Side::ALL {
            let mut turned = found[cursor].clone();
            for layer in 0..size {
                apply_in_place(&mut turned, Move::new(side, layer, Direction::Clockwise))?;
            }
            if seen.insert(encode(&turned)) {
                found.push(turned);
            }
        }
        cursor += 1;
    }
    Ok(found)
}

impl Heuristic for TableHeuristic {
    fn estimate(&self, state: &EncodedState) -> Result<f64, HeuristicError> {
        if state.cube_size() != self.size {
            return Err(HeuristicError::Unavailable {
                reason: format!(
                    "table built for cube size {}, got size {}",
                    self.size,
                    state.cube_size()
                ),
            });
        }
        let distance = self.distance(state).unwrap_or(self.bound + 1);
        Ok(f64::from(distance))
    }
}
