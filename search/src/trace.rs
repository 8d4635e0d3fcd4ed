//! Per-expansion trace and search statistics.
//!
//! A trace is an ordered list of expansion records. Two runs with the same
//! start, policy and heuristic produce byte-identical traces; the digest
//! makes that cheap to compare across processes.

use serde::Serialize;

use cubist_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::node::NodeId;

/// Counters accumulated over one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes selected from the frontier and expanded.
    pub expansions: u64,
    /// Successor configurations generated.
    pub generated: u64,
    /// Successors discarded as already known with no better path.
    pub duplicates_suppressed: u64,
    /// Closed nodes returned to the frontier after a better path was found.
    pub reopenings: u64,
    /// Stale frontier entries skipped on pop.
    pub stale_pops: u64,
    pub heuristic_calls: u64,
    /// Distinct states discovered (start included).
    pub nodes: u64,
    pub frontier_high_water: u64,
}

/// One expansion step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpansionRecord {
    /// 0-based expansion counter.
    pub order: u64,
    pub node: NodeId,
    pub g: u32,
    pub f: f64,
    /// Successors newly pushed (discovered or improved) by this expansion.
    pub enqueued: u32,
}

/// Ordered expansion log for one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTrace {
    pub expansions: Vec<ExpansionRecord>,
}

impl SearchTrace {
    /// Serialize to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Content hash of the JSON form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, serde_json::Error> {
        Ok(canonical_hash(HashDomain::SearchTrace, &self.to_json_bytes()?))
    }
}
