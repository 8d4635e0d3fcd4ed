//! Shared helpers for cubist benchmark suites.

use cubist_kernel::carrier::codec::encode;
use cubist_kernel::carrier::configuration::Configuration;
use cubist_kernel::operators::apply::apply_all;
use cubist_kernel::operators::moves::parse_sequence;
use cubist_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use cubist_search::heuristic::Heuristic;
use cubist_search::policy::{ClosedPolicy, SearchPolicy};
use cubist_search::search::{search, SearchResult};

/// A fixed search workload.
pub struct Regime {
    pub name: &'static str,
    pub start: Configuration,
    pub policy: SearchPolicy,
    /// Depth bound for the exact table heuristic on this regime's cube.
    pub table_bound: u32,
}

/// Apply a notation sequence to a solved cube.
///
/// # Panics
///
/// Panics on an invalid size or sequence. Benchmark inputs are constants.
#[must_use]
pub fn scrambled(size: usize, moves: &str) -> Configuration {
    let mut cube = Configuration::solved(size).expect("valid cube size");
    let moves = parse_sequence(moves).expect("valid move sequence");
    apply_all(&mut cube, &moves).expect("moves fit the cube");
    cube
}

/// The benchmark regimes, cheapest first.
#[must_use]
pub fn regimes() -> Vec<Regime> {
    vec![
        Regime {
            name: "pocket_depth4",
            start: scrambled(2, "V0 H1' V1 H0"),
            policy: SearchPolicy::default(),
            table_bound: 4,
        },
        Regime {
            name: "cube3_depth3",
            start: scrambled(3, "V0 H2' V1"),
            policy: SearchPolicy {
                max_expansions: 2_000,
                ..SearchPolicy::default()
            },
            table_bound: 3,
        },
        Regime {
            name: "cube3_budget_limited",
            start: scrambled(3, "V0 H1 V2' H0 V1 H2"),
            policy: SearchPolicy::default(),
            table_bound: 2,
        },
        Regime {
            name: "cube3_permanent_closed",
            start: scrambled(3, "V0 H1 V2' H0"),
            policy: SearchPolicy {
                max_expansions: 1_000,
                closed_policy: ClosedPolicy::Permanent,
                ..SearchPolicy::default()
            },
            table_bound: 2,
        },
    ]
}

/// Digest of a regime's inputs (start state and policy).
///
/// Benchmark baselines are only comparable when this digest matches.
///
/// # Panics
///
/// Panics if the policy cannot be serialized.
#[must_use]
pub fn input_digest(regime: &Regime) -> ContentHash {
    let mut bytes = encode(&regime.start).to_bytes();
    bytes.extend(serde_json::to_vec(&regime.policy).expect("policy serializes"));
    canonical_hash(HashDomain::BenchInput, &bytes)
}

/// Run one search over a regime.
///
/// # Panics
///
/// Panics if `search()` returns an error. Benchmark runs are expected to succeed.
pub fn run_regime(regime: &Regime, heuristic: &dyn Heuristic) -> SearchResult {
    search(&regime.start, heuristic, &regime.policy).expect("search should succeed in benchmarks")
}
