//! Simulator wire protocol.
//!
//! Line-oriented: each request is one line of text, each response one line
//! of JSON.
//!
//! | request                        | response                               |
//! |--------------------------------|----------------------------------------|
//! | `initialize:<n>,<0\|1>`        | configuration                          |
//! | `reset:<moves>`                | configuration                          |
//! | `step:<side>,<layer>,<angle>`  | `[configuration, reward, done]`        |
//! | `get_state`                    | configuration                          |
//! | `is_solved:<configuration>`    | `true` / `false`                       |
//!
//! Configurations are nested JSON arrays (faces → rows → color codes). Side
//! codes are `0` (vertical) and `2` (horizontal); angle `0` is clockwise.
//! A failed request is answered with `{"error": "<message>"}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cubist_kernel::carrier::configuration::Configuration;
use cubist_kernel::operators::moves::{Move, MoveParseError};

/// A request to the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a cube of the given size; `animate` toggles rendering.
    Initialize { size: usize, animate: bool },
    /// Reset to solved, then apply `scramble_moves` random moves.
    Reset { scramble_moves: u32 },
    Step(Move),
    GetState,
    IsSolved(Configuration),
}

/// Typed failure for parsing a request line.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown command: {text:?}")]
    UnknownCommand { text: String },
    #[error("malformed argument for {command}: {detail}")]
    MalformedArgument {
        command: &'static str,
        detail: String,
    },
    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveParseError),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] serde_json::Error),
}

impl Command {
    /// Parse one request line (without its trailing newline).
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] for unknown commands or bad arguments.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        let (name, argument) = match line.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (line, None),
        };
        match (name, argument) {
            ("initialize", Some(argument)) => {
                let malformed = |detail: &str| ProtocolError::MalformedArgument {
                    command: "initialize",
                    detail: detail.to_string(),
                };
                let (size, animate) = argument
                    .split_once(',')
                    .ok_or_else(|| malformed("expected <size>,<animate>"))?;
                let size = size
                    .trim()
                    .parse()
                    .map_err(|_| malformed("size is not an integer"))?;
                let animate = match animate.trim() {
                    "0" => false,
                    "1" => true,
                    _ => return Err(malformed("animate must be 0 or 1")),
                };
                Ok(Self::Initialize { size, animate })
            }
            ("reset", Some(argument)) => {
                let scramble_moves =
                    argument
                        .trim()
                        .parse()
                        .map_err(|_| ProtocolError::MalformedArgument {
                            command: "reset",
                            detail: format!("{argument:?} is not a move count"),
                        })?;
                Ok(Self::Reset { scramble_moves })
            }
            ("step", Some(argument)) => Ok(Self::Step(Move::from_wire(argument)?)),
            ("get_state", None) => Ok(Self::GetState),
            ("is_solved", Some(argument)) => Ok(Self::IsSolved(serde_json::from_str(argument)?)),
            _ => Err(ProtocolError::UnknownCommand {
                text: line.to_string(),
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialize { size, animate } => {
                write!(f, "initialize:{size},{}", u8::from(*animate))
            }
            Self::Reset { scramble_moves } => write!(f, "reset:{scramble_moves}"),
            Self::Step(mv) => write!(f, "step:{}", mv.to_wire()),
            Self::GetState => f.write_str("get_state"),
            Self::IsSolved(configuration) => {
                let json = serde_json::to_string(configuration).map_err(|_| fmt::Error)?;
                write!(f, "is_solved:{json}")
            }
        }
    }
}

/// Response to a `step` command. Serialized as `[configuration, reward, done]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Configuration, f64, bool)", into = "(Configuration, f64, bool)")]
pub struct StepFeedback {
    pub configuration: Configuration,
    /// 1.0 when the step left the cube solved, else 0.0.
    pub reward: f64,
    /// Whether the cube is solved after the step.
    pub done: bool,
}

impl From<(Configuration, f64, bool)> for StepFeedback {
    fn from((configuration, reward, done): (Configuration, f64, bool)) -> Self {
        Self {
            configuration,
            reward,
            done,
        }
    }
}

impl From<StepFeedback> for (Configuration, f64, bool) {
    fn from(feedback: StepFeedback) -> Self {
        (feedback.configuration, feedback.reward, feedback.done)
    }
}

/// Error payload sent back for a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
