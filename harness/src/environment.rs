//! Environment port: the cube as a stateful collaborator.
//!
//! The search engine never talks to an environment. Harness code does, to
//! produce scrambled starts and to replay solutions against whatever owns
//! the "real" cube (the in-process [`LocalEnvironment`] or a remote
//! simulator behind [`crate::simulator::SimulatorClient`]).

use log::debug;
use thiserror::Error;

use cubist_kernel::carrier::configuration::{Configuration, ConfigurationError};
use cubist_kernel::operators::apply::apply_in_place;
use cubist_kernel::operators::moves::{all_moves, Move, MoveError};
use cubist_kernel::proof::goal::is_solved;

use crate::protocol::{ProtocolError, StepFeedback};
use crate::scramble::{scramble, ScrambleError};

/// Typed failure for talking to an environment.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("environment I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("malformed response {response:?}: {source}")]
    Malformed {
        response: String,
        source: serde_json::Error,
    },
    #[error("environment reported an error: {message}")]
    Remote { message: String },
    #[error("environment closed the connection")]
    Closed,
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Scramble(#[from] ScrambleError),
    /// Undoing a probing move failed; the environment is left one move
    /// (`applied`) away from where it started.
    #[error("could not undo {applied}: {source}")]
    UndoFailed {
        applied: Move,
        source: Box<EnvironmentError>,
    },
}

/// A cube that can be reset, stepped and queried.
pub trait CubeEnvironment {
    /// Edge length of the cube this environment simulates.
    fn cube_size(&self) -> usize;

    /// Return to solved, apply `scramble_moves` random moves and report the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] if the environment cannot be reached.
    fn reset(&mut self, scramble_moves: u32) -> Result<Configuration, EnvironmentError>;

    /// Apply one move.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::Move`] (locally) or
    /// [`EnvironmentError::Remote`] for a move the cube does not have.
    fn step(&mut self, mv: Move) -> Result<StepFeedback, EnvironmentError>;

    /// Current configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] if the environment cannot be reached.
    fn state(&mut self) -> Result<Configuration, EnvironmentError>;

    /// Ask the environment whether `configuration` is solved.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] if the environment cannot be reached.
    fn is_solved(&mut self, configuration: &Configuration) -> Result<bool, EnvironmentError>;

    /// Successor of the current configuration under every move, in
    /// `all_moves` order. Each move is undone before the next is tried, so
    /// on success the environment ends where it started.
    ///
    /// # Errors
    ///
    /// Returns the first [`EnvironmentError`] raised by a step. A failed
    /// forward step leaves the environment in place. A failed undo is
    /// reported as [`EnvironmentError::UndoFailed`] naming the move that is
    /// still applied.
    fn neighbours(&mut self) -> Result<Vec<(Move, Configuration)>, EnvironmentError> {
        let moves = all_moves(self.cube_size());
        let mut successors = Vec::with_capacity(moves.len());
        for mv in moves {
            let feedback = self.step(mv)?;
            self.step(mv.inverse()).map_err(|source| EnvironmentError::UndoFailed {
                applied: mv,
                source: Box::new(source),
            })?;
            successors.push((mv, feedback.configuration));
        }
        Ok(successors)
    }
}

/// In-process environment backed by the kernel's move model.
#[derive(Debug, Clone)]
pub struct LocalEnvironment {
    configuration: Configuration,
    rng: fastrand::Rng,
}

impl LocalEnvironment {
    /// A solved cube of edge length `size`; scrambles draw from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::Configuration`] if `size` is zero.
    pub fn new(size: usize, seed: u64) -> Result<Self, EnvironmentError> {
        Ok(Self {
            configuration: Configuration::solved(size)?,
            rng: fastrand::Rng::with_seed(seed),
        })
    }

    /// Borrow the current configuration.
    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
}

impl CubeEnvironment for LocalEnvironment {
    fn cube_size(&self) -> usize {
        self.configuration.size()
    }

    fn reset(&mut self, scramble_moves: u32) -> Result<Configuration, EnvironmentError> {
        let scrambled = scramble(self.cube_size(), scramble_moves, &mut self.rng)?;
        debug!(
            "reset size {} with {} scramble moves",
            self.cube_size(),
            scrambled.moves.len()
        );
        self.configuration = scrambled.configuration;
        Ok(self.configuration.clone())
    }

    fn step(&mut self, mv: Move) -> Result<StepFeedback, EnvironmentError> {
        apply_in_place(&mut self.configuration, mv)?;
        let done = is_solved(&self.configuration);
        Ok(StepFeedback {
            configuration: self.configuration.clone(),
            reward: if done { 1.0 } else { 0.0 },
            done,
        })
    }

    fn state(&mut self) -> Result<Configuration, EnvironmentError> {
        Ok(self.configuration.clone())
    }

    fn is_solved(&mut self, configuration: &Configuration) -> Result<bool, EnvironmentError> {
        Ok(is_solved(configuration))
    }
}
