//! `Configuration`: the full facelet-color state of an N×N×N cube.
//!
//! # Layout
//!
//! Six faces, each an N×N grid stored row-major, flattened face-major:
//! `facelets[face * N² + row * N + col]`. Face order matches the serialized
//! format used by simulators and datasets:
//!
//! | index | face  | row 0 borders | column 0 borders |
//! |-------|-------|---------------|------------------|
//! | 0     | Front | Up            | Left             |
//! | 1     | Back  | Up            | Right            |
//! | 2     | Left  | Up            | Back             |
//! | 3     | Right | Up            | Front            |
//! | 4     | Up    | Back          | Left             |
//! | 5     | Down  | Front         | Left             |
//!
//! Every face is viewed from outside the cube.
//!
//! # Serialized form
//!
//! A nested sequence faces → rows → color codes (integers in `0..6`).
//! Deserialization validates the shape and the palette through
//! [`Configuration::from_nested`]; no other structural validity is checked.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of colors in the facelet palette.
pub const PALETTE_SIZE: usize = 6;

/// Number of faces on a cube.
pub const FACE_COUNT: usize = 6;

/// Largest supported edge length.
pub const MAX_SIZE: usize = 256;

/// A facelet color code in `0..PALETTE_SIZE`.
///
/// The solved configuration paints face `i` with `Color(i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Color(u8);

impl Color {
    /// Construct from a raw color code. Returns `None` outside the palette.
    #[must_use]
    pub const fn new(code: u8) -> Option<Self> {
        if (code as usize) < PALETTE_SIZE {
            Some(Self(code))
        } else {
            None
        }
    }

    /// The raw color code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Palette index (same as the code, widened).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// A face of the cube, numbered as in the serialized format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Face {
    Front = 0,
    Back = 1,
    Left = 2,
    Right = 3,
    Up = 4,
    Down = 5,
}

impl Face {
    /// All faces in serialized order.
    pub const ALL: [Face; FACE_COUNT] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Up,
        Face::Down,
    ];

    /// Position of this face in the serialized order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The color this face carries in the solved configuration.
    #[must_use]
    pub const fn solved_color(self) -> Color {
        Color(self as u8)
    }
}

/// Typed failure for building a configuration from external data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Cube size must be at least 1.
    #[error("cube size must be at least 1")]
    ZeroSize,
    /// Cube size exceeds [`MAX_SIZE`].
    #[error("cube size {size} exceeds the maximum of {MAX_SIZE}")]
    TooLarge { size: usize },
    /// The outer sequence did not hold exactly six faces.
    #[error("expected {FACE_COUNT} faces, got {actual}")]
    FaceCount { actual: usize },
    /// A face did not have N rows.
    #[error("face {face} has {actual} rows, expected {expected}")]
    RowCount {
        face: usize,
        expected: usize,
        actual: usize,
    },
    /// A row did not have N columns.
    #[error("face {face} row {row} has {actual} columns, expected {expected}")]
    ColumnCount {
        face: usize,
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A color code fell outside the palette.
    #[error("face {face} row {row} column {col}: color code {code} is outside 0..{PALETTE_SIZE}")]
    InvalidColor {
        face: usize,
        row: usize,
        col: usize,
        code: u8,
    },
}

/// `N²`, for a size within `1..=MAX_SIZE`.
fn facelets_per_face(size: usize) -> Result<usize, ConfigurationError> {
    if size == 0 {
        return Err(ConfigurationError::ZeroSize);
    }
    if size > MAX_SIZE {
        return Err(ConfigurationError::TooLarge { size });
    }
    size.checked_mul(size).ok_or(ConfigurationError::TooLarge { size })
}

/// Full facelet state of an N×N×N cube.
///
/// Holds exactly `6 · N²` facelets. Equality is facelet-for-facelet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Vec<u8>>>", into = "Vec<Vec<Vec<u8>>>")]
pub struct Configuration {
    size: usize,
    facelets: Vec<Color>,
}

impl Configuration {
    /// The solved configuration: face `i` uniformly colored `Color(i)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ZeroSize`] if `size == 0` and
    /// [`ConfigurationError::TooLarge`] if `size > MAX_SIZE`.
    pub fn solved(size: usize) -> Result<Self, ConfigurationError> {
        let per_face = facelets_per_face(size)?;
        let facelets = Face::ALL
            .iter()
            .flat_map(|face| std::iter::repeat(face.solved_color()).take(per_face))
            .collect();
        Ok(Self { size, facelets })
    }

    /// Build from the nested serialized form (faces → rows → color codes).
    ///
    /// The cube size is inferred from the first face's row count.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] describing the first shape or palette
    /// violation found.
    pub fn from_nested(faces: &[Vec<Vec<u8>>]) -> Result<Self, ConfigurationError> {
        if faces.len() != FACE_COUNT {
            return Err(ConfigurationError::FaceCount {
                actual: faces.len(),
            });
        }
        let size = faces[0].len();
        let per_face = facelets_per_face(size)?;

        let mut facelets = Vec::with_capacity(FACE_COUNT * per_face);
        for (face, rows) in faces.iter().enumerate() {
            if rows.len() != size {
                return Err(ConfigurationError::RowCount {
                    face,
                    expected: size,
                    actual: rows.len(),
                });
            }
            for (row, cols) in rows.iter().enumerate() {
                if cols.len() != size {
                    return Err(ConfigurationError::ColumnCount {
                        face,
                        row,
                        expected: size,
                        actual: cols.len(),
                    });
                }
                for (col, &code) in cols.iter().enumerate() {
                    let color = Color::new(code).ok_or(ConfigurationError::InvalidColor {
                        face,
                        row,
                        col,
                        code,
                    })?;
                    facelets.push(color);
                }
            }
        }
        Ok(Self { size, facelets })
    }

    /// Render into the nested serialized form.
    #[must_use]
    pub fn to_nested(&self) -> Vec<Vec<Vec<u8>>> {
        self.facelets
            .chunks(self.size * self.size)
            .map(|face| {
                face.chunks(self.size)
                    .map(|row| row.iter().map(|c| c.code()).collect())
                    .collect()
            })
            .collect()
    }

    /// Edge length N.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// All facelets, face-major then row-major.
    #[must_use]
    pub fn facelets(&self) -> &[Color] {
        &self.facelets
    }

    /// The N² facelets of one face, row-major.
    #[must_use]
    pub fn face(&self, face: Face) -> &[Color] {
        let per_face = self.size * self.size;
        let start = face.index() * per_face;
        &self.facelets[start..start + per_face]
    }

    /// Color at (face, row, col). Panics if out of bounds.
    #[must_use]
    pub fn get(&self, face: Face, row: usize, col: usize) -> Color {
        self.facelets[self.offset(face, row, col)]
    }

    /// Set the color at (face, row, col). Panics if out of bounds.
    pub fn set(&mut self, face: Face, row: usize, col: usize, color: Color) {
        let offset = self.offset(face, row, col);
        self.facelets[offset] = color;
    }

    /// Count of facelets per color, indexed by color code.
    #[must_use]
    pub fn color_counts(&self) -> [usize; PALETTE_SIZE] {
        let mut counts = [0; PALETTE_SIZE];
        for color in &self.facelets {
            counts[color.index()] += 1;
        }
        counts
    }

    pub(crate) fn facelets_mut(&mut self) -> &mut [Color] {
        &mut self.facelets
    }

    pub(crate) fn from_parts(size: usize, facelets: Vec<Color>) -> Self {
        debug_assert_eq!(facelets.len(), FACE_COUNT * size * size);
        Self { size, facelets }
    }

    fn offset(&self, face: Face, row: usize, col: usize) -> usize {
        assert!(row < self.size && col < self.size, "facelet index out of range");
        (face.index() * self.size + row) * self.size + col
    }
}

impl TryFrom<Vec<Vec<Vec<u8>>>> for Configuration {
    type Error = ConfigurationError;

    fn try_from(faces: Vec<Vec<Vec<u8>>>) -> Result<Self, Self::Error> {
        Self::from_nested(&faces)
    }
}

impl From<Configuration> for Vec<Vec<Vec<u8>>> {
    fn from(configuration: Configuration) -> Self {
        configuration.to_nested()
    }
}
