//! Binary that solves a fixed 2×2×2 scramble with the exact table heuristic
//! and prints deterministic output lines for cross-process verification.
//!
//! Usage: `search_fixture`
//!
//! Output: key=value lines (see source for format). Logs go to stderr and
//! are controlled by `RUST_LOG`.

use cubist_kernel::carrier::codec::encode;
use cubist_kernel::carrier::configuration::Configuration;
use cubist_kernel::operators::apply::apply_all;
use cubist_kernel::operators::moves::{format_sequence, parse_sequence};
use cubist_kernel::proof::hash::state_fingerprint;
use cubist_search::heuristic::TableHeuristic;
use cubist_search::policy::SearchPolicy;
use cubist_search::search::search;

const SCRAMBLE: &str = "V0 H1' V1 H0";

fn main() {
    env_logger::init();

    let scramble = parse_sequence(SCRAMBLE).expect("fixture scramble parses");
    let mut start = Configuration::solved(2).expect("size 2 is valid");
    apply_all(&mut start, &scramble).expect("fixture moves fit a 2×2×2");

    let heuristic = TableHeuristic::build(2, 4).expect("table builds");
    log::info!("distance table ready: {} states", heuristic.len());
    let policy = SearchPolicy {
        record_trace: true,
        ..SearchPolicy::default()
    };
    let result = search(&start, &heuristic, &policy).expect("search runs");
    let trace = result.trace.as_ref().expect("trace was requested");

    println!("scramble={}", format_sequence(&scramble));
    println!("start_fingerprint={}", state_fingerprint(&encode(&start)));
    println!("termination={:?}", result.termination);
    println!(
        "path={}",
        result.solution().map_or_else(String::new, format_sequence)
    );
    println!("expansions={}", result.stats.expansions);
    println!("generated={}", result.stats.generated);
    println!("nodes={}", result.stats.nodes);
    println!(
        "trace_digest={}",
        trace.digest().expect("trace serializes")
    );
}
