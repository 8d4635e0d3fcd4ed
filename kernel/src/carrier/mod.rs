//! Carrier module: `Configuration`, `Color`, `Face`, and the `EncodedState` codec.
//!
//! This is the foundational layer. No other kernel module is imported here.

pub mod codec;
pub mod configuration;
