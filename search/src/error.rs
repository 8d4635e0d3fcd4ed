//! Typed search errors.
//!
//! `SearchError` covers pre-flight failures and heuristic failures. Normal
//! terminations (goal reached, budget exhausted, frontier exhausted, time
//! limit) are expressed via [`crate::search::Termination`], not errors.

use thiserror::Error;

use cubist_kernel::carrier::codec::CodecError;
use cubist_kernel::operators::moves::MoveError;

/// Typed failure reported by a [`crate::heuristic::Heuristic`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeuristicError {
    /// The estimator could not produce a value (unreachable backend,
    /// mis-shaped input, wrong cube size).
    #[error("estimator unavailable: {reason}")]
    Unavailable { reason: String },
    /// The estimator returned NaN or a negative value.
    #[error("estimator returned invalid estimate {value}")]
    InvalidEstimate { value: f64 },
    /// The estimator panicked; the panic was caught by the engine.
    #[error("estimator panicked: {message}")]
    Panicked { message: String },
}

/// Typed failure for a search call.
///
/// A heuristic failure aborts the search: there is no fallback estimate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The policy failed pre-flight validation. No node was expanded.
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },
    /// The heuristic port failed on some state.
    #[error("heuristic unavailable: {0}")]
    HeuristicUnavailable(#[from] HeuristicError),
    /// A move could not be applied. Indicates a cube-size mismatch bug.
    #[error(transparent)]
    Move(#[from] MoveError),
    /// A stored state key failed to decode. Indicates a codec bug.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
