//! State codec lock tests.
//!
//! Proves:
//! 1. `encode` is injective over a corpus of scrambles and single-facelet
//!    edits
//! 2. `decode(encode(c)) == c` across sizes
//! 3. `decode` rejects facelet groups that are not one-hot
//! 4. Encoded-state fingerprints are stable for equal states

use std::collections::HashMap;

use cubist_harness::scramble::scramble;
use cubist_kernel::carrier::codec::{decode, encode, CodecError, EncodedState};
use cubist_kernel::carrier::configuration::{Color, Configuration, Face};
use cubist_kernel::proof::hash::state_fingerprint;

fn corpus(n: usize, seed: u64) -> Vec<Configuration> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut out = vec![Configuration::solved(n).unwrap()];
    for depth in 1..=40 {
        out.push(scramble(n, depth, &mut rng).unwrap().configuration);
    }
    // Unreachable but well-formed: recolor one facelet of solved.
    for face in Face::ALL {
        let mut edited = Configuration::solved(n).unwrap();
        let other = Color::new(u8::try_from((face.index() + 1) % 6).unwrap()).unwrap();
        edited.set(face, 0, 0, other);
        out.push(edited);
    }
    out
}

#[test]
fn encode_is_injective_on_corpus() {
    for n in 1..=4 {
        let mut seen: HashMap<EncodedState, Configuration> = HashMap::new();
        for cfg in corpus(n, 7 + n as u64) {
            let key = encode(&cfg);
            if let Some(previous) = seen.get(&key) {
                assert_eq!(previous, &cfg, "size {n}: distinct configurations share a key");
            }
            seen.insert(key, cfg);
        }
    }
}

#[test]
fn decode_inverts_encode() {
    for n in 1..=5 {
        for cfg in corpus(n, 100 + n as u64) {
            let state = encode(&cfg);
            assert_eq!(state.cube_size(), n);
            assert_eq!(state.bit_len(), 36 * n * n);
            assert_eq!(decode(&state).unwrap(), cfg);
        }
    }
}

#[test]
fn one_hot_vector_has_one_bit_per_facelet() {
    let cfg = corpus(3, 1).pop().unwrap();
    let dense = encode(&cfg).one_hot();
    assert_eq!(dense.len(), 36 * 9);
    for group in dense.chunks(6) {
        assert_eq!(group.iter().filter(|&&bit| bit == 1.0).count(), 1);
    }
}

#[test]
fn decode_rejects_groups_that_are_not_one_hot() {
    let solved = encode(&Configuration::solved(1).unwrap());
    let mut words = solved.as_words().to_vec();

    // Facelet 0 is color 0 (bit 0); also set color 1 (bit 1).
    words[0] |= 0b10;
    let doubled = EncodedState::from_words(1, words.clone()).unwrap();
    assert_eq!(
        decode(&doubled),
        Err(CodecError::NotOneHot {
            facelet: 0,
            set_bits: 2
        })
    );

    // Clear both: no color at all.
    words[0] &= !0b11;
    let empty = EncodedState::from_words(1, words).unwrap();
    assert_eq!(
        decode(&empty),
        Err(CodecError::NotOneHot {
            facelet: 0,
            set_bits: 0
        })
    );
}

#[test]
fn from_words_checks_length() {
    assert_eq!(
        EncodedState::from_words(2, vec![0; 1]),
        Err(CodecError::WordCount {
            expected: 3,
            actual: 1
        })
    );
    assert_eq!(EncodedState::from_words(0, vec![]), Err(CodecError::ZeroSize));
}

#[test]
fn fingerprints_follow_state_equality() {
    let a = encode(&Configuration::solved(3).unwrap());
    let b = encode(&Configuration::solved(3).unwrap());
    let c = encode(&Configuration::solved(2).unwrap());
    assert_eq!(state_fingerprint(&a), state_fingerprint(&b));
    assert_ne!(state_fingerprint(&a), state_fingerprint(&c));
    assert!(state_fingerprint(&a).as_str().starts_with("sha256:"));
}
