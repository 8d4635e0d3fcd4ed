//! `EncodedState`: canonical one-hot key for a configuration.
//!
//! Every facelet expands to [`PALETTE_SIZE`] bits with exactly one set:
//! bit `facelet * 6 + color`. Bits are packed little-endian into `u64`
//! words, so equality and hashing are word comparisons.
//!
//! The encoded state owns no reference to the configuration it came from.
//! Two configurations are equal iff their encoded states are bit-identical.

use thiserror::Error;

use crate::carrier::configuration::{Color, Configuration, FACE_COUNT, MAX_SIZE, PALETTE_SIZE};

const WORD_BITS: usize = 64;

/// Typed failure for decoding an encoded state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The cube size is zero.
    #[error("encoded state has cube size 0")]
    ZeroSize,
    /// The cube size exceeds [`MAX_SIZE`].
    #[error("encoded state has cube size {size}, above the maximum of {MAX_SIZE}")]
    TooLarge { size: usize },
    /// A facelet group did not have exactly one bit set.
    #[error("facelet {facelet} has {set_bits} color bits set, expected exactly 1")]
    NotOneHot { facelet: usize, set_bits: u32 },
    /// The word buffer does not match the cube size.
    #[error("expected {expected} words for the cube size, got {actual}")]
    WordCount { expected: usize, actual: usize },
}

/// Packed one-hot encoding of a configuration, usable as a map/set key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncodedState {
    size: usize,
    words: Box<[u64]>,
}

impl EncodedState {
    /// Build from raw words, e.g. when a state key arrives from outside.
    ///
    /// The one-hot property is checked by [`decode`], not here.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ZeroSize`] or [`CodecError::TooLarge`] for a
    /// size outside `1..=MAX_SIZE`, and [`CodecError::WordCount`] if `words`
    /// is not exactly the length required for `size`.
    pub fn from_words(size: usize, words: Vec<u64>) -> Result<Self, CodecError> {
        if size == 0 {
            return Err(CodecError::ZeroSize);
        }
        if size > MAX_SIZE {
            return Err(CodecError::TooLarge { size });
        }
        let expected = word_count(size);
        if words.len() != expected {
            return Err(CodecError::WordCount {
                expected,
                actual: words.len(),
            });
        }
        Ok(Self {
            size,
            words: words.into_boxed_slice(),
        })
    }

    /// Edge length of the cube this state encodes.
    #[must_use]
    pub const fn cube_size(&self) -> usize {
        self.size
    }

    /// Number of meaningful bits: `6 · 6 · N²`.
    #[must_use]
    pub const fn bit_len(&self) -> usize {
        bit_len(self.size)
    }

    /// Whether bit `index` is set. Panics if `index >= bit_len()`.
    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        assert!(index < self.bit_len(), "bit index out of range");
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// The packed words.
    #[must_use]
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    /// Little-endian bytes of the packed words, prefixed by the cube size.
    ///
    /// Used for content hashing.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.words.len() * 8);
        buf.extend_from_slice(&(self.size as u64).to_le_bytes());
        for word in self.words.iter() {
            buf.extend_from_slice(&word.to_le_bytes());
        }
        buf
    }

    /// Expand to the dense one-hot vector consumed by numeric estimators.
    #[must_use]
    pub fn one_hot(&self) -> Vec<f32> {
        (0..self.bit_len())
            .map(|i| if self.is_set(i) { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Encode a configuration. Total and injective for a fixed palette.
#[must_use]
pub fn encode(configuration: &Configuration) -> EncodedState {
    let size = configuration.size();
    let mut words = vec![0u64; word_count(size)];
    for (facelet, color) in configuration.facelets().iter().enumerate() {
        let bit = facelet * PALETTE_SIZE + color.index();
        words[bit / WORD_BITS] |= 1 << (bit % WORD_BITS);
    }
    EncodedState {
        size,
        words: words.into_boxed_slice(),
    }
}

/// Recover the configuration an encoded state was produced from.
///
/// # Errors
///
/// Returns [`CodecError::NotOneHot`] if any facelet group does not have
/// exactly one bit set.
pub fn decode(state: &EncodedState) -> Result<Configuration, CodecError> {
    let facelet_count = FACE_COUNT * state.size * state.size;
    let mut facelets = Vec::with_capacity(facelet_count);
    for facelet in 0..facelet_count {
        let base = facelet * PALETTE_SIZE;
        let mut found = None;
        let mut set_bits = 0u32;
        for code in 0..PALETTE_SIZE {
            if state.is_set(base + code) {
                set_bits += 1;
                found = Some(code);
            }
        }
        let color = found
            .filter(|_| set_bits == 1)
            .and_then(|code| u8::try_from(code).ok())
            .and_then(Color::new)
            .ok_or(CodecError::NotOneHot { facelet, set_bits })?;
        facelets.push(color);
    }
    Ok(Configuration::from_parts(state.size, facelets))
}

const fn bit_len(size: usize) -> usize {
    FACE_COUNT * size * size * PALETTE_SIZE
}

const fn word_count(size: usize) -> usize {
    bit_len(size).div_ceil(WORD_BITS)
}
