//! Move model lock tests.
//!
//! Proves:
//! 1. Every move on sizes 1–5 agrees with an independent 3-D sticker
//!    rotation model (each sticker is a point on the cube surface; a move
//!    rotates the points in one slab by 90°)
//! 2. Move then inverse is the identity on sizes 2–4
//! 3. Four quarter turns of one layer are the identity on sizes 2–4
//! 4. Color counts are conserved by every move

use std::collections::HashMap;

use cubist_harness::scramble::scramble;
use cubist_kernel::carrier::configuration::{Configuration, Face};
use cubist_kernel::operators::apply::{apply, apply_in_place};
use cubist_kernel::operators::moves::{all_moves, Direction, Move, Side};

type Point = [i32; 3];

/// Cubie-center coordinate of row/column `k`: `-(n-1), -(n-3), …, n-1`.
fn coord(n: usize, k: usize) -> i32 {
    2 * i32::try_from(k).unwrap() - (i32::try_from(n).unwrap() - 1)
}

/// Sticker center on the surface `|axis| = n`; x right, y up, z toward the
/// viewer of the Front face.
fn sticker_point(n: usize, face: Face, row: usize, col: usize) -> Point {
    let (r, c, m) = (coord(n, row), coord(n, col), i32::try_from(n).unwrap());
    match face {
        Face::Front => [c, -r, m],
        Face::Back => [-c, -r, -m],
        Face::Left => [-m, -r, c],
        Face::Right => [m, -r, -c],
        Face::Up => [c, m, r],
        Face::Down => [c, -m, -r],
    }
}

fn in_slab(n: usize, mv: Move, [x, y, _]: Point) -> bool {
    let m = i32::try_from(n).unwrap();
    let first = mv.layer == 0;
    let last = mv.layer == n - 1;
    match mv.side {
        // Front column l sits at x = coord(l); the Left face belongs to
        // layer 0 and the Right face to layer N-1.
        Side::Vertical => x == coord(n, mv.layer) || (x == -m && first) || (x == m && last),
        // Front row l sits at y = -coord(l); Up belongs to layer 0.
        Side::Horizontal => y == -coord(n, mv.layer) || (y == m && first) || (y == -m && last),
    }
}

fn rotate(mv: Move, [x, y, z]: Point) -> Point {
    match (mv.side, mv.direction) {
        // Seen from Right: Front (+z) goes to Up (+y).
        (Side::Vertical, Direction::Clockwise) => [x, z, -y],
        (Side::Vertical, Direction::CounterClockwise) => [x, -z, y],
        // Seen from Up: Front (+z) goes to Left (-x).
        (Side::Horizontal, Direction::Clockwise) => [-z, y, x],
        (Side::Horizontal, Direction::CounterClockwise) => [z, y, -x],
    }
}

fn stickers(n: usize) -> Vec<(Face, usize, usize)> {
    let mut out = Vec::new();
    for face in Face::ALL {
        for row in 0..n {
            for col in 0..n {
                out.push((face, row, col));
            }
        }
    }
    out
}

/// A cube painted color 0 except one sticker painted color 1.
fn tracer(n: usize, (face, row, col): (Face, usize, usize)) -> Configuration {
    let mut nested = vec![vec![vec![0_u8; n]; n]; 6];
    nested[face.index()][row][col] = 1;
    Configuration::from_nested(&nested).unwrap()
}

fn traced_position(cfg: &Configuration) -> (Face, usize, usize) {
    let n = cfg.size();
    let hits: Vec<_> = stickers(n)
        .into_iter()
        .filter(|&(face, row, col)| cfg.get(face, row, col).code() == 1)
        .collect();
    assert_eq!(hits.len(), 1, "tracer sticker must survive exactly once");
    hits[0]
}

#[test]
fn moves_match_3d_rotation_model() {
    for n in 1..=5 {
        let by_point: HashMap<Point, (Face, usize, usize)> = stickers(n)
            .into_iter()
            .map(|s| (sticker_point(n, s.0, s.1, s.2), s))
            .collect();
        assert_eq!(by_point.len(), 6 * n * n, "sticker points must be distinct");

        for mv in all_moves(n) {
            for source in stickers(n) {
                let point = sticker_point(n, source.0, source.1, source.2);
                let expected = if in_slab(n, mv, point) {
                    by_point[&rotate(mv, point)]
                } else {
                    source
                };
                let moved = apply(&tracer(n, source), mv).unwrap();
                assert_eq!(
                    traced_position(&moved),
                    expected,
                    "size {n}, move {mv}, sticker {source:?}"
                );
            }
        }
    }
}

#[test]
fn move_then_inverse_is_identity() {
    let mut rng = fastrand::Rng::with_seed(2024);
    for n in 2..=4 {
        let start = scramble(n, 15, &mut rng).unwrap().configuration;
        for mv in all_moves(n) {
            let mut cube = start.clone();
            apply_in_place(&mut cube, mv).unwrap();
            apply_in_place(&mut cube, mv.inverse()).unwrap();
            assert_eq!(cube, start, "size {n}, move {mv}");
        }
    }
}

#[test]
fn four_quarter_turns_are_identity() {
    let mut rng = fastrand::Rng::with_seed(99);
    for n in 2..=4 {
        let start = scramble(n, 15, &mut rng).unwrap().configuration;
        for mv in all_moves(n) {
            let mut cube = start.clone();
            for _ in 0..4 {
                apply_in_place(&mut cube, mv).unwrap();
            }
            assert_eq!(cube, start, "size {n}, move {mv}");
        }
    }
}

#[test]
fn moves_conserve_color_counts() {
    let mut rng = fastrand::Rng::with_seed(3);
    for n in 1..=4 {
        let start = scramble(n, 10, &mut rng).unwrap().configuration;
        let counts = start.color_counts();
        assert_eq!(counts, [n * n; 6]);
        for mv in all_moves(n) {
            assert_eq!(apply(&start, mv).unwrap().color_counts(), counts);
        }
    }
}
