//! Canonical hashing: SHA-256 with domain separation.
//!
//! Every digest in the workspace is computed here, over a [`HashDomain`]
//! prefix followed by the payload bytes. Digests render as
//! `"sha256:<hex>"` ([`ContentHash`]).

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::carrier::codec::EncodedState;

/// Algorithm tag carried by every [`ContentHash`] produced here.
pub const HASH_ALGORITHM: &str = "sha256";

/// Typed domain separator for [`canonical_hash`].
///
/// Each variant maps to a unique, null-terminated byte string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashDomain {
    /// Encoded state fingerprints (logs, fixtures).
    EncodedState,
    /// Search trace digests (determinism checks).
    SearchTrace,
    /// Evaluation report digests (report directories).
    EvaluationReport,
    /// Benchmark input guards.
    BenchInput,
}

impl HashDomain {
    /// All domains in declaration order.
    pub const ALL: [HashDomain; 4] = [
        HashDomain::EncodedState,
        HashDomain::SearchTrace,
        HashDomain::EvaluationReport,
        HashDomain::BenchInput,
    ];

    /// The raw separator bytes (null-terminated).
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::EncodedState => b"CUBIST::ENCODED_STATE::V1\0",
            Self::SearchTrace => b"CUBIST::SEARCH_TRACE::V1\0",
            Self::EvaluationReport => b"CUBIST::EVALUATION_REPORT::V1\0",
            Self::BenchInput => b"CUBIST::BENCH_INPUT::V1\0",
        }
    }
}

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`).
///
/// Invariant: exactly one `:` separator with non-empty text on both sides
/// (enforced by [`ContentHash::parse`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format.
    ///
    /// Returns `None` if the colon is missing, or either side is empty.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon == s.len() - 1 || s[colon + 1..].contains(':') {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm portion (e.g., "sha256").
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl TryFrom<String> for ContentHash {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("malformed content hash: {value:?}"))
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.full
    }
}

/// SHA-256 over `domain bytes || data`, rendered as `"sha256:<hex>"`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    let full = format!("{HASH_ALGORITHM}:{digest}");
    ContentHash {
        colon: HASH_ALGORITHM.len(),
        full,
    }
}

/// Fingerprint of an encoded state. Stable across processes and platforms.
#[must_use]
pub fn state_fingerprint(state: &EncodedState) -> ContentHash {
    canonical_hash(HashDomain::EncodedState, &state.to_bytes())
}
