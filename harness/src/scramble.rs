//! Seeded random scrambles.

use thiserror::Error;

use cubist_kernel::carrier::configuration::{Configuration, ConfigurationError};
use cubist_kernel::operators::apply::apply_all;
use cubist_kernel::operators::moves::{all_moves, Move, MoveError};

/// Typed failure for building a scramble.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrambleError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// A scrambled cube and the moves that produced it from solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scramble {
    pub configuration: Configuration,
    pub moves: Vec<Move>,
}

/// Draw `depth` moves uniformly from the move set of a `size` cube.
///
/// Consecutive moves may cancel, so the true distance to solved can be less
/// than `depth`. Returns an empty list when `size` is zero.
pub fn random_moves(size: usize, depth: u32, rng: &mut fastrand::Rng) -> Vec<Move> {
    let moves = all_moves(size);
    if moves.is_empty() {
        return Vec::new();
    }
    (0..depth).map(|_| moves[rng.usize(..moves.len())]).collect()
}

/// Scramble a solved `size` cube with `depth` random moves.
///
/// # Errors
///
/// Returns [`ScrambleError::Configuration`] if `size` is zero.
pub fn scramble(
    size: usize,
    depth: u32,
    rng: &mut fastrand::Rng,
) -> Result<Scramble, ScrambleError> {
    let mut configuration = Configuration::solved(size)?;
    let moves = random_moves(size, depth, rng);
    apply_all(&mut configuration, &moves)?;
    Ok(Scramble {
        configuration,
        moves,
    })
}
