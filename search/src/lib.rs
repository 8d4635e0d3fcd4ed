//! Cubist Search: deterministic A* over the cube move graph.
//!
//! This crate depends only on `cubist_kernel`; it does NOT depend on
//! `cubist_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! cubist_kernel  ←  cubist_search  ←  cubist_harness
//! (moves, codec)    (A*, heuristics)   (environments, evaluation)
//! ```
//!
//! # Key types
//!
//! - [`search::search`] / [`search::search_with_goal`] -- run one search
//! - [`heuristic::Heuristic`] -- the injected cost-to-go estimator
//! - [`policy::SearchPolicy`] -- budget, λ, closed-set and goal-timing policy
//! - [`search::SearchResult`] -- termination, path, stats, optional trace
//! - [`contract::GoalTest`] -- goal predicate (default [`contract::Solved`])

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod contract;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod node;
pub mod policy;
pub mod search;
pub mod trace;
