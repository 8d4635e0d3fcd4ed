//! Operators module: the move set and the `apply()` entry point.
//!
//! Depends on `carrier`. Does not import from `proof`.

pub mod apply;
pub mod moves;
