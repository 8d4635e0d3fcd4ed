//! The move set: `Side`, `Direction`, `Move`, and enumeration.
//!
//! A move turns one layer of the cube by a quarter turn. Moves are closed
//! under inversion: [`Move::inverse`] keeps side and layer and flips the
//! direction.
//!
//! # Enumeration order
//!
//! [`all_moves`] yields `2 · N · 2` moves: for each side (vertical, then
//! horizontal), for each layer `0..N`, clockwise then counter-clockwise.
//! The derived `Ord` on [`Move`] agrees with this order. Successor expansion
//! follows it, so it is part of the search's tie-break behavior.
//!
//! # Notation
//!
//! `V<l>` / `V<l>'` for vertical layer `l` clockwise / counter-clockwise,
//! `H<l>` / `H<l>'` for horizontal. Example: `V0 H2' V1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which family of slices a move turns.
///
/// Declaration order defines enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Column slices, turning around the Left–Right axis. Layer `l` is
    /// Front column `l`; clockwise is as seen from the Right face.
    Vertical,
    /// Row slices, turning around the Up–Down axis. Layer `l` is Front
    /// row `l`; clockwise is as seen from the Up face.
    Horizontal,
}

impl Side {
    /// Both sides in enumeration order.
    pub const ALL: [Side; 2] = [Side::Vertical, Side::Horizontal];

    /// Side code used by the simulator wire protocol (`0` or `2`).
    #[must_use]
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::Vertical => 0,
            Self::Horizontal => 2,
        }
    }

    /// Parse a simulator side code.
    #[must_use]
    pub const fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Vertical),
            2 => Some(Self::Horizontal),
            _ => None,
        }
    }

    const fn letter(self) -> char {
        match self {
            Self::Vertical => 'V',
            Self::Horizontal => 'H',
        }
    }
}

/// Quarter-turn direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Both directions in enumeration order.
    pub const ALL: [Direction; 2] = [Direction::Clockwise, Direction::CounterClockwise];

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    /// Angle code used by the simulator wire protocol (`0` = clockwise).
    #[must_use]
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::Clockwise => 0,
            Self::CounterClockwise => 1,
        }
    }

    /// Parse a simulator angle code.
    #[must_use]
    pub const fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Clockwise),
            1 => Some(Self::CounterClockwise),
            _ => None,
        }
    }
}

/// A quarter turn of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Move {
    pub side: Side,
    pub layer: usize,
    pub direction: Direction,
}

impl Move {
    #[must_use]
    pub const fn new(side: Side, layer: usize, direction: Direction) -> Self {
        Self {
            side,
            layer,
            direction,
        }
    }

    /// Same side and layer, opposite direction.
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self {
            side: self.side,
            layer: self.layer,
            direction: self.direction.reversed(),
        }
    }

    /// Check that the layer exists on a cube of edge length `size`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::UndefinedMove`] if `layer >= size`.
    pub fn validate(self, size: usize) -> Result<(), MoveError> {
        if self.layer < size {
            Ok(())
        } else {
            Err(MoveError::UndefinedMove {
                layer: self.layer,
                size,
            })
        }
    }

    /// Render as the simulator's `<side>,<layer>,<angle>` triple.
    #[must_use]
    pub fn to_wire(self) -> String {
        format!(
            "{},{},{}",
            self.side.wire_code(),
            self.layer,
            self.direction.wire_code()
        )
    }

    /// Parse the simulator's `<side>,<layer>,<angle>` triple.
    ///
    /// # Errors
    ///
    /// Returns [`MoveParseError`] if the triple is malformed or a code is
    /// unknown. The layer is not range-checked here.
    pub fn from_wire(text: &str) -> Result<Self, MoveParseError> {
        let invalid = || MoveParseError::Malformed {
            text: text.to_string(),
        };
        let mut parts = text.trim().split(',');
        let (Some(side), Some(layer), Some(angle), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let side = side
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Side::from_wire_code)
            .ok_or_else(invalid)?;
        let layer = layer.trim().parse::<usize>().map_err(|_| invalid())?;
        let direction = angle
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Direction::from_wire_code)
            .ok_or_else(invalid)?;
        Ok(Self::new(side, layer, direction))
    }
}

/// Invert a move. Free-function form of [`Move::inverse`].
#[must_use]
pub const fn invert(mv: Move) -> Move {
    mv.inverse()
}

/// Enumerate every move for a cube of edge length `size`, in fixed order.
#[must_use]
pub fn all_moves(size: usize) -> Vec<Move> {
    let mut moves = Vec::with_capacity(Side::ALL.len() * size * Direction::ALL.len());
    for side in Side::ALL {
        for layer in 0..size {
            for direction in Direction::ALL {
                moves.push(Move::new(side, layer, direction));
            }
        }
    }
    moves
}

/// Typed failure for applying a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The move's layer does not exist on this cube.
    #[error("layer {layer} is undefined on a cube of size {size}")]
    UndefinedMove { layer: usize, size: usize },
}

/// Typed failure for parsing move text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("malformed move: {text:?}")]
    Malformed { text: String },
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.letter(), self.layer)?;
        if self.direction == Direction::CounterClockwise {
            f.write_str("'")?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MoveParseError::Malformed {
            text: s.to_string(),
        };
        let text = s.trim();
        let (body, direction) = match text.strip_suffix('\'') {
            Some(body) => (body, Direction::CounterClockwise),
            None => (text, Direction::Clockwise),
        };
        let mut chars = body.chars();
        let side = match chars.next() {
            Some('V') => Side::Vertical,
            Some('H') => Side::Horizontal,
            _ => return Err(invalid()),
        };
        let layer = chars.as_str().parse::<usize>().map_err(|_| invalid())?;
        Ok(Self::new(side, layer, direction))
    }
}

/// Parse a whitespace-separated move sequence in notation form.
///
/// # Errors
///
/// Returns the first [`MoveParseError`] encountered.
pub fn parse_sequence(text: &str) -> Result<Vec<Move>, MoveParseError> {
    text.split_whitespace().map(str::parse).collect()
}

/// Render a move sequence in notation form, space-separated.
#[must_use]
pub fn format_sequence(moves: &[Move]) -> String {
    moves
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
