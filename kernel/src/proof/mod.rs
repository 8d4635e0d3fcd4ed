//! Proof module: the goal test and canonical hashing.
//!
//! Depends on `carrier` (and `operators` in tests only). Nothing depends on
//! `proof` within the kernel.

pub mod goal;
pub mod hash;
