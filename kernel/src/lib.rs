//! Cubist Kernel: the pure transition model of an N×N×N cube.
//!
//! # API Surface
//!
//! - [`carrier::configuration::Configuration`] -- facelet state, serialized as faces → rows → colors
//! - [`carrier::codec::encode`] -- canonical hashable key for a configuration (and [`carrier::codec::decode`])
//! - [`operators::apply::apply`] -- apply a move, producing a new configuration
//! - [`operators::moves::all_moves`] -- the fixed, ordered move set for a cube size
//! - [`proof::goal::is_solved`] -- the goal test
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashes
//!
//! # Module Dependency Direction
//!
//! `carrier` ← `operators`, `carrier` ← `proof`
//!
//! One-way only. No cycles. `operators` and `proof` depend on `carrier`.
//! `carrier` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod carrier;
pub mod operators;
pub mod proof;
