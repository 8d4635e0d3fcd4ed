//! `apply()`: perform a quarter turn, producing the next configuration.
//!
//! A turn has two parts:
//! 1. The four edge strips of the turned layer cycle around their belt.
//! 2. If the layer is an outer layer, the attached face rotates by 90°.
//!
//! Both parts are driven by static tables ([`VERTICAL_BELT`],
//! [`HORIZONTAL_BELT`], and the attachment tables) rather than per-face
//! branching, so the geometry lives in one place.
//!
//! # Belts
//!
//! Clockwise moves carry strip `k` onto strip `k + 1` (cyclically);
//! counter-clockwise moves carry strip `k + 1` onto strip `k`. Position `i`
//! of one strip lands on position `i` of the next, so any orientation
//! change between neighbouring faces is encoded in the strip itself
//! (mirrored index, reversed traversal).
//!
//! # Scoped application
//!
//! [`AppliedMove`] applies a move in place and undoes it on drop. The search
//! uses it to walk successors on one working configuration without leaking
//! a mutation into the next iteration.

use std::ops::Deref;

use crate::carrier::configuration::{Color, Configuration, Face};
use crate::operators::moves::{Direction, Move, MoveError, Side};

/// Whether a strip runs along a row or a column of its face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Row,
    Column,
}

/// Which row/column of the face a strip occupies for layer `l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slice {
    /// Index `l`.
    Layer,
    /// Index `N - 1 - l`.
    MirroredLayer,
}

/// One edge strip of a belt.
#[derive(Debug, Clone, Copy)]
struct Strip {
    face: Face,
    line: Line,
    slice: Slice,
    /// Traverse the strip from its far end.
    reversed: bool,
}

impl Strip {
    const fn new(face: Face, line: Line, slice: Slice, reversed: bool) -> Self {
        Self {
            face,
            line,
            slice,
            reversed,
        }
    }

    /// Flat facelet offset of position `i` along this strip.
    fn offset(self, size: usize, layer: usize, i: usize) -> usize {
        let fixed = match self.slice {
            Slice::Layer => layer,
            Slice::MirroredLayer => size - 1 - layer,
        };
        let along = if self.reversed { size - 1 - i } else { i };
        let (row, col) = match self.line {
            Line::Row => (fixed, along),
            Line::Column => (along, fixed),
        };
        (self.face.index() * size + row) * size + col
    }
}

/// Vertical belt: Front → Up → Back → Down.
///
/// Back's columns are mirrored and read bottom-up because Back is viewed
/// from behind the cube.
const VERTICAL_BELT: [Strip; 4] = [
    Strip::new(Face::Front, Line::Column, Slice::Layer, false),
    Strip::new(Face::Up, Line::Column, Slice::Layer, false),
    Strip::new(Face::Back, Line::Column, Slice::MirroredLayer, true),
    Strip::new(Face::Down, Line::Column, Slice::Layer, false),
];

/// Horizontal belt: Front → Left → Back → Right. All rows run the same way.
const HORIZONTAL_BELT: [Strip; 4] = [
    Strip::new(Face::Front, Line::Row, Slice::Layer, false),
    Strip::new(Face::Left, Line::Row, Slice::Layer, false),
    Strip::new(Face::Back, Line::Row, Slice::Layer, false),
    Strip::new(Face::Right, Line::Row, Slice::Layer, false),
];

/// A face carried along when an outer layer turns.
#[derive(Debug, Clone, Copy)]
struct Attachment {
    face: Face,
    /// The face turns opposite to the move's direction when viewed from
    /// outside that face.
    opposite: bool,
}

/// (layer 0, layer N-1) attachments per side.
const VERTICAL_ATTACHED: [Attachment; 2] = [
    Attachment {
        face: Face::Left,
        opposite: true,
    },
    Attachment {
        face: Face::Right,
        opposite: false,
    },
];

const HORIZONTAL_ATTACHED: [Attachment; 2] = [
    Attachment {
        face: Face::Up,
        opposite: false,
    },
    Attachment {
        face: Face::Down,
        opposite: true,
    },
];

/// Apply a move, returning the new configuration. The input is untouched.
///
/// # Errors
///
/// Returns [`MoveError::UndefinedMove`] if the move's layer is outside
/// `0..configuration.size()`.
pub fn apply(configuration: &Configuration, mv: Move) -> Result<Configuration, MoveError> {
    let mut next = configuration.clone();
    apply_in_place(&mut next, mv)?;
    Ok(next)
}

/// Apply a move to `configuration` in place.
///
/// # Errors
///
/// Returns [`MoveError::UndefinedMove`] if the move's layer is outside
/// `0..configuration.size()`. The configuration is unchanged on error.
pub fn apply_in_place(configuration: &mut Configuration, mv: Move) -> Result<(), MoveError> {
    mv.validate(configuration.size())?;
    turn(configuration, mv);
    Ok(())
}

/// Apply a sequence of moves in order.
///
/// # Errors
///
/// Returns the first [`MoveError`]; earlier moves stay applied.
pub fn apply_all(configuration: &mut Configuration, moves: &[Move]) -> Result<(), MoveError> {
    moves
        .iter()
        .try_for_each(|&mv| apply_in_place(configuration, mv))
}

/// Rotate one face 90° in place, as seen from outside that face.
///
/// Clockwise: `new[j][N-1-i] = old[i][j]`.
/// Counter-clockwise: `new[N-1-j][i] = old[i][j]`.
pub fn rotate_face(configuration: &mut Configuration, face: Face, direction: Direction) {
    let size = configuration.size();
    let old = configuration.face(face).to_vec();
    let base = face.index() * size * size;
    let facelets = configuration.facelets_mut();
    for i in 0..size {
        for j in 0..size {
            let (row, col) = match direction {
                Direction::Clockwise => (j, size - 1 - i),
                Direction::CounterClockwise => (size - 1 - j, i),
            };
            facelets[base + row * size + col] = old[i * size + j];
        }
    }
}

/// Perform a validated move. Precondition: `mv.layer < size`.
fn turn(configuration: &mut Configuration, mv: Move) {
    let size = configuration.size();
    let (belt, attached) = match mv.side {
        Side::Vertical => (&VERTICAL_BELT, &VERTICAL_ATTACHED),
        Side::Horizontal => (&HORIZONTAL_BELT, &HORIZONTAL_ATTACHED),
    };

    let strips: Vec<Vec<Color>> = belt
        .iter()
        .map(|strip| {
            (0..size)
                .map(|i| configuration.facelets()[strip.offset(size, mv.layer, i)])
                .collect()
        })
        .collect();

    let shift = match mv.direction {
        Direction::Clockwise => 1,
        Direction::CounterClockwise => belt.len() - 1,
    };
    let facelets = configuration.facelets_mut();
    for (k, contents) in strips.iter().enumerate() {
        let target = belt[(k + shift) % belt.len()];
        for (i, &color) in contents.iter().enumerate() {
            facelets[target.offset(size, mv.layer, i)] = color;
        }
    }

    // On a 1×1×1 cube layer 0 is both outer layers.
    for (edge_layer, attachment) in [(0, attached[0]), (size - 1, attached[1])] {
        if mv.layer == edge_layer {
            let direction = if attachment.opposite {
                mv.direction.reversed()
            } else {
                mv.direction
            };
            rotate_face(configuration, attachment.face, direction);
        }
    }
}

/// A move applied in place, undone when the guard drops.
///
/// Derefs to the moved configuration.
#[derive(Debug)]
pub struct AppliedMove<'a> {
    configuration: &'a mut Configuration,
    mv: Move,
}

impl<'a> AppliedMove<'a> {
    /// Apply `mv` to `configuration` and return the guard.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::UndefinedMove`] if the move's layer is outside
    /// `0..configuration.size()`; nothing is applied in that case.
    pub fn new(configuration: &'a mut Configuration, mv: Move) -> Result<Self, MoveError> {
        apply_in_place(configuration, mv)?;
        Ok(Self { configuration, mv })
    }

    /// The move being held.
    #[must_use]
    pub fn applied(&self) -> Move {
        self.mv
    }
}

impl Deref for AppliedMove<'_> {
    type Target = Configuration;

    fn deref(&self) -> &Configuration {
        &*self.configuration
    }
}

impl Drop for AppliedMove<'_> {
    fn drop(&mut self) {
        // Validated on construction, so the inverse is valid too.
        turn(self.configuration, self.mv.inverse());
    }
}
