//! Search engine lock tests.
//!
//! Proves:
//! 1. Under the exact distance table, A* returns a shortest path within a
//!    budget of `depth · |moves|`
//! 2. A solved start returns the empty path without expanding anything
//! 3. A budget of one expansion ends in `BudgetExhausted`
//! 4. Identical inputs give identical paths and traces
//! 5. Under an inconsistent estimator, `Reopen` re-opens closed states and
//!    `Permanent` never does; both return valid paths
//! 6. A failing or panicking estimator aborts the search

use std::sync::atomic::{AtomicU64, Ordering};

use cubist_harness::scramble::scramble;
use cubist_kernel::carrier::codec::{decode, encode, EncodedState};
use cubist_kernel::carrier::configuration::{Configuration, Face};
use cubist_kernel::operators::apply::apply_all;
use cubist_kernel::operators::moves::{all_moves, parse_sequence, Move};
use cubist_kernel::proof::goal::is_solved;
use cubist_search::error::{HeuristicError, SearchError};
use cubist_search::heuristic::{FnHeuristic, Heuristic, TableHeuristic, ZeroHeuristic};
use cubist_search::policy::{ClosedPolicy, SearchPolicy};
use cubist_search::search::{search, Termination};

fn scrambled(size: usize, moves: &str) -> Configuration {
    let mut cube = Configuration::solved(size).unwrap();
    apply_all(&mut cube, &parse_sequence(moves).unwrap()).unwrap();
    cube
}

fn assert_solves(start: &Configuration, path: &[Move]) {
    let mut cube = start.clone();
    apply_all(&mut cube, path).unwrap();
    assert!(is_solved(&cube), "path does not solve the start");
}

#[test_log::test]
fn exact_table_gives_shortest_paths() {
    for (size, bound, seed) in [(2, 4, 11), (3, 3, 12)] {
        let table = TableHeuristic::build(size, bound).unwrap();
        let mut rng = fastrand::Rng::with_seed(seed);
        for depth in 1..=bound {
            for _ in 0..5 {
                let start = scramble(size, depth, &mut rng).unwrap().configuration;
                let distance = table.distance(&encode(&start)).unwrap();
                let policy = SearchPolicy {
                    max_expansions: u64::from(depth) * all_moves(size).len() as u64,
                    ..SearchPolicy::default()
                };
                let result = search(&start, &table, &policy).unwrap();
                let path = result.solution().unwrap_or_else(|| {
                    panic!("size {size} depth {depth}: {:?}", result.termination)
                });
                assert_eq!(path.len(), distance as usize);
                assert!(path.len() <= depth as usize);
                assert_solves(&start, path);
            }
        }
    }
}

#[test]
fn solved_start_needs_no_expansion() {
    for size in 1..=4 {
        let start = Configuration::solved(size).unwrap();
        let result = search(&start, &ZeroHeuristic, &SearchPolicy::default()).unwrap();
        assert_eq!(result.termination, Termination::GoalReached);
        assert_eq!(result.solution(), Some(&[][..]));
        assert_eq!(result.stats.expansions, 0);
        assert_eq!(result.stats.heuristic_calls, 0);
    }
}

#[test]
fn one_expansion_budget_is_exhausted() {
    let start = scrambled(3, "V0 H1 V2");
    let policy = SearchPolicy {
        max_expansions: 1,
        ..SearchPolicy::default()
    };
    let result = search(&start, &ZeroHeuristic, &policy).unwrap();
    assert_eq!(result.termination, Termination::BudgetExhausted);
    assert!(result.path.is_none());
    assert_eq!(result.stats.expansions, 1);
    assert_eq!(result.stats.generated, 12);
}

#[test]
fn identical_inputs_give_identical_runs() {
    let start = scrambled(3, "V0 H2' V1");
    let policy = SearchPolicy {
        max_expansions: 500,
        record_trace: true,
        ..SearchPolicy::default()
    };
    let a = search(&start, &ZeroHeuristic, &policy).unwrap();
    let b = search(&start, &ZeroHeuristic, &policy).unwrap();
    assert_eq!(a.termination, b.termination);
    assert_eq!(a.path, b.path);
    assert_eq!(a.stats, b.stats);
    let (ta, tb) = (a.trace.unwrap(), b.trace.unwrap());
    assert_eq!(ta, tb);
    assert_eq!(ta.digest().unwrap(), tb.digest().unwrap());
}

/// Facelets whose color differs from their face's solved color.
/// Overestimates badly, so it is not consistent.
fn misplaced(state: &EncodedState) -> f64 {
    let Ok(cube) = decode(state) else {
        return f64::INFINITY;
    };
    let mut count = 0_u32;
    for face in Face::ALL {
        count += u32::try_from(
            cube.face(face)
                .iter()
                .filter(|&&color| color != face.solved_color())
                .count(),
        )
        .unwrap();
    }
    f64::from(count)
}

#[test_log::test]
fn reopen_policy_revisits_closed_states() {
    let start = scrambled(2, "H1' V0 H0' V1' V1'");
    let estimator = FnHeuristic(misplaced);

    let reopen = SearchPolicy {
        max_expansions: 1_000,
        ..SearchPolicy::default()
    };
    let result = search(&start, &estimator, &reopen).unwrap();
    assert_eq!(result.termination, Termination::GoalReached);
    assert!(result.stats.reopenings > 0);
    let path = result.solution().unwrap();
    assert_eq!(path.len(), 9);
    assert_solves(&start, path);

    let permanent = SearchPolicy {
        closed_policy: ClosedPolicy::Permanent,
        ..reopen
    };
    let result = search(&start, &estimator, &permanent).unwrap();
    assert_eq!(result.termination, Termination::GoalReached);
    assert_eq!(result.stats.reopenings, 0);
    let path = result.solution().unwrap();
    assert_eq!(path.len(), 9);
    assert_solves(&start, path);
}

/// Answers `limit` estimates, then reports itself unreachable.
struct FlakyEstimator {
    calls: AtomicU64,
    limit: u64,
}

impl Heuristic for FlakyEstimator {
    fn estimate(&self, _state: &EncodedState) -> Result<f64, HeuristicError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.limit {
            Ok(0.0)
        } else {
            Err(HeuristicError::Unavailable {
                reason: "estimator endpoint went away".into(),
            })
        }
    }
}

#[test]
fn estimator_failure_mid_search_aborts() {
    let start = scrambled(3, "V0 H1 V2");
    let flaky = FlakyEstimator {
        calls: AtomicU64::new(0),
        limit: 5,
    };
    let err = search(&start, &flaky, &SearchPolicy::default()).unwrap_err();
    assert!(matches!(
        err,
        SearchError::HeuristicUnavailable(HeuristicError::Unavailable { .. })
    ));
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 6);
}

#[test]
fn panicking_estimator_aborts() {
    let start = scrambled(2, "V0");
    let estimator = FnHeuristic(|_: &EncodedState| -> f64 { panic!("model weights missing") });
    let err = search(&start, &estimator, &SearchPolicy::default()).unwrap_err();
    match err {
        SearchError::HeuristicUnavailable(HeuristicError::Panicked { message }) => {
            assert_eq!(message, "model weights missing");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn nan_estimate_aborts() {
    let start = scrambled(2, "H1");
    let estimator = FnHeuristic(|_: &EncodedState| f64::NAN);
    assert!(matches!(
        search(&start, &estimator, &SearchPolicy::default()),
        Err(SearchError::HeuristicUnavailable(
            HeuristicError::InvalidEstimate { .. }
        ))
    ));
}
