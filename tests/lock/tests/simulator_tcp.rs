//! Simulator client lock tests over real TCP.
//!
//! Proves:
//! 1. The TCP client talking to the reference server reproduces the local
//!    environment's states move for move
//! 2. Remote rejections surface as typed errors and leave the session usable
//! 3. A full trial runs unchanged against the remote environment

use std::io::BufReader;
use std::net::TcpListener;
use std::thread;

use cubist_harness::environment::{CubeEnvironment, EnvironmentError, LocalEnvironment};
use cubist_harness::runner::run_trial;
use cubist_harness::scramble::random_moves;
use cubist_harness::simulator::{serve_connection, SimulatorClient};
use cubist_kernel::operators::moves::{parse_sequence, Direction, Move, Side};
use cubist_search::heuristic::TableHeuristic;
use cubist_search::policy::SearchPolicy;
use cubist_search::search::Termination;

/// Bind a loopback listener and serve exactly one connection on a thread.
fn spawn_server(seed: u64) -> (String, thread::JoinHandle<u64>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        serve_connection(reader, stream, seed).unwrap()
    });
    (address, handle)
}

#[test]
fn tcp_client_matches_local_environment() {
    let seed = 21;
    let (address, server) = spawn_server(seed);
    let mut remote = SimulatorClient::connect(address.as_str(), 3, false).unwrap();
    let mut local = LocalEnvironment::new(3, seed).unwrap();

    assert_eq!(remote.cube_size(), 3);
    assert_eq!(remote.state().unwrap(), local.state().unwrap());

    // Server and local environment share a seed, so scrambles agree too.
    assert_eq!(remote.reset(6).unwrap(), local.reset(6).unwrap());

    let mut rng = fastrand::Rng::with_seed(4);
    for mv in random_moves(3, 25, &mut rng) {
        let r = remote.step(mv).unwrap();
        let l = local.step(mv).unwrap();
        assert_eq!(r, l, "diverged at {mv}");
    }
    let current = local.state().unwrap();
    assert_eq!(remote.is_solved(&current).unwrap(), local.is_solved(&current).unwrap());
    assert_eq!(remote.neighbours().unwrap(), local.neighbours().unwrap());

    drop(remote);
    // initialize, get_state, reset, 25 steps, is_solved, 24 neighbour steps.
    assert_eq!(server.join().unwrap(), 1 + 1 + 1 + 25 + 1 + 24);
}

#[test]
fn remote_rejection_keeps_session_alive() {
    let (address, server) = spawn_server(0);
    let mut remote = SimulatorClient::connect(address.as_str(), 2, true).unwrap();

    let err = remote
        .step(Move::new(Side::Vertical, 7, Direction::Clockwise))
        .unwrap_err();
    match err {
        EnvironmentError::Remote { message } => {
            assert!(message.contains("layer 7"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(remote.step(Move::new(Side::Vertical, 1, Direction::Clockwise)).is_ok());

    drop(remote);
    assert_eq!(server.join().unwrap(), 3);
}

#[test_log::test]
fn trial_runs_against_remote_simulator() {
    let (address, server) = spawn_server(0);
    let mut remote = SimulatorClient::connect(address.as_str(), 2, false).unwrap();
    let table = TableHeuristic::build(2, 4).unwrap();
    let scramble = parse_sequence("V0 H1' V1 H0").unwrap();

    let outcome = run_trial(&mut remote, &scramble, &table, &SearchPolicy::default()).unwrap();
    assert_eq!(outcome.termination, Termination::GoalReached);
    assert_eq!(outcome.solution_length, Some(4));

    drop(remote);
    server.join().unwrap();
}
