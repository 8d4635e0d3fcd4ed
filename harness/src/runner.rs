//! Solve-rate evaluation: scramble, search, replay, tally.
//!
//! Every trial resets the environment to solved, steps it through a seeded
//! random scramble, searches from the resulting state, then replays the
//! returned path through the environment. A trial counts as solved only if
//! the replay leaves the environment reporting `done`.

use log::{debug, info};
use thiserror::Error;

use cubist_kernel::carrier::configuration::Configuration;
use cubist_kernel::operators::moves::{format_sequence, Move};
use cubist_search::error::{HeuristicError, SearchError};
use cubist_search::heuristic::Heuristic;
use cubist_search::policy::SearchPolicy;
use cubist_search::search::{search, Termination};

use crate::config::{ConfigError, EvaluationConfig};
use crate::environment::{CubeEnvironment, EnvironmentError, LocalEnvironment};
use crate::report::{DepthBucket, EvaluationReport, SizeReport};
use crate::scramble::random_moves;

/// Typed failure for an evaluation run.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("environment failed: {0}")]
    Environment(#[from] EnvironmentError),
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
    #[error("no heuristic for cube size {size}: {source}")]
    Heuristic {
        size: usize,
        source: HeuristicError,
    },
    /// The search claimed a solution the environment did not accept.
    #[error("replaying {path} from the scrambled state did not solve the cube")]
    ReplayMismatch { path: String },
}

/// Result of one scramble-search-replay trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutcome {
    pub scramble: Vec<Move>,
    pub termination: Termination,
    /// Path length when the replay solved the cube.
    pub solution_length: Option<usize>,
    pub expansions: u64,
}

impl TrialOutcome {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solution_length.is_some()
    }
}

/// Run one trial against `environment`.
///
/// # Errors
///
/// Returns [`EvaluationError::Environment`] or [`EvaluationError::Search`]
/// if either collaborator fails, and [`EvaluationError::ReplayMismatch`]
/// if a returned path does not solve the environment's cube.
pub fn run_trial(
    environment: &mut dyn CubeEnvironment,
    scramble: &[Move],
    heuristic: &dyn Heuristic,
    policy: &SearchPolicy,
) -> Result<TrialOutcome, EvaluationError> {
    let start = scrambled_start(environment, scramble)?;
    let result = search(&start, heuristic, policy)?;

    let solution_length = match result.solution() {
        Some(path) => {
            replay(environment, &start, path)?;
            Some(path.len())
        }
        None => None,
    };
    debug!(
        "trial [{}]: {:?} after {} expansions",
        format_sequence(scramble),
        result.termination,
        result.stats.expansions
    );
    Ok(TrialOutcome {
        scramble: scramble.to_vec(),
        termination: result.termination,
        solution_length,
        expansions: result.stats.expansions,
    })
}

fn scrambled_start(
    environment: &mut dyn CubeEnvironment,
    scramble: &[Move],
) -> Result<Configuration, EvaluationError> {
    let mut current = environment.reset(0)?;
    for &mv in scramble {
        current = environment.step(mv)?.configuration;
    }
    Ok(current)
}

fn replay(
    environment: &mut dyn CubeEnvironment,
    start: &Configuration,
    path: &[Move],
) -> Result<(), EvaluationError> {
    let mut done = environment.is_solved(start)?;
    for &mv in path {
        done = environment.step(mv)?.done;
    }
    if done {
        Ok(())
    } else {
        Err(EvaluationError::ReplayMismatch {
            path: format_sequence(path),
        })
    }
}

/// Evaluate against in-process environments.
///
/// `heuristic_for` is called once per cube size.
///
/// # Errors
///
/// See [`evaluate_in`].
pub fn evaluate<H>(
    config: &EvaluationConfig,
    heuristic_for: H,
) -> Result<EvaluationReport, EvaluationError>
where
    H: FnMut(usize) -> Result<Box<dyn Heuristic>, HeuristicError>,
{
    evaluate_in(
        config,
        |size| -> Result<Box<dyn CubeEnvironment>, EnvironmentError> {
            Ok(Box::new(LocalEnvironment::new(size, config.seed)?))
        },
        heuristic_for,
    )
}

/// Evaluate every (cube size, scramble depth) bucket in `config`.
///
/// Scrambles are drawn from one RNG per cube size, seeded from
/// `config.seed` and the size, so a report is reproducible from its config
/// regardless of which environment runs it.
///
/// # Errors
///
/// Returns [`EvaluationError::Config`] for an invalid config, and the first
/// failure raised by an environment, a heuristic factory, the search, or a
/// replay.
pub fn evaluate_in<E, H>(
    config: &EvaluationConfig,
    mut environment_for: E,
    mut heuristic_for: H,
) -> Result<EvaluationReport, EvaluationError>
where
    E: FnMut(usize) -> Result<Box<dyn CubeEnvironment>, EnvironmentError>,
    H: FnMut(usize) -> Result<Box<dyn Heuristic>, HeuristicError>,
{
    config.validate()?;
    let mut sizes = Vec::with_capacity(config.cube_sizes.len());
    for &size in &config.cube_sizes {
        let mut environment = environment_for(size)?;
        let heuristic =
            heuristic_for(size).map_err(|source| EvaluationError::Heuristic { size, source })?;
        let mut rng = fastrand::Rng::with_seed(config.seed.wrapping_add(size as u64));

        let mut buckets = Vec::with_capacity(config.scramble_depths.len());
        for &depth in &config.scramble_depths {
            let mut outcomes = Vec::new();
            for _ in 0..config.trials_per_depth {
                let scramble = random_moves(size, depth, &mut rng);
                outcomes.push(run_trial(
                    environment.as_mut(),
                    &scramble,
                    heuristic.as_ref(),
                    &config.policy,
                )?);
            }
            let bucket = DepthBucket::from_outcomes(depth, &outcomes);
            info!(
                "size {size} depth {depth}: solved {}/{} (rate {:.2}, avg length {:.2}, avg expansions {:.1})",
                bucket.solved,
                bucket.trials,
                bucket.solve_rate,
                bucket.average_solution_length,
                bucket.average_expansions
            );
            buckets.push(bucket);
        }
        sizes.push(SizeReport {
            cube_size: size,
            buckets,
        });
    }
    Ok(EvaluationReport {
        seed: config.seed,
        trials_per_depth: config.trials_per_depth,
        policy: config.policy.clone(),
        sizes,
    })
}
