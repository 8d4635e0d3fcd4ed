//! Cubist Harness: drives the search against a cube environment.
//!
//! The harness owns everything the search engine deliberately does not:
//! the environment port (in-process or a remote simulator over the line
//! protocol), seeded scrambles, solve-rate evaluation and report
//! persistence.
//!
//! The harness does NOT implement move semantics or search. It delegates to
//! the kernel and the search crate.
//!
//! # Key entry points
//!
//! - [`environment::CubeEnvironment`] with [`environment::LocalEnvironment`]
//!   and [`simulator::SimulatorClient`]
//! - [`simulator::serve_connection`] -- reference simulator server
//! - [`runner::evaluate`] / [`runner::run_trial`]
//! - [`report::write_report_dir`] / [`report::read_report_dir`]

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod environment;
pub mod protocol;
pub mod report;
pub mod runner;
pub mod scramble;
pub mod simulator;
