//! Evaluation configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cubist_search::error::SearchError;
use cubist_search::policy::SearchPolicy;

/// Typed failure for loading or validating an [`EvaluationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {detail}")]
    Invalid { detail: String },
    #[error(transparent)]
    Policy(#[from] SearchError),
}

/// What to evaluate: every (cube size, scramble depth) pair gets
/// `trials_per_depth` seeded trials under one search policy.
///
/// Missing fields take their [`Default`] values when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub cube_sizes: Vec<usize>,
    pub scramble_depths: Vec<u32>,
    pub trials_per_depth: u32,
    pub seed: u64,
    pub policy: SearchPolicy,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            cube_sizes: vec![2],
            scramble_depths: (1..=5).collect(),
            trials_per_depth: 10,
            seed: 0,
            policy: SearchPolicy::default(),
        }
    }
}

impl EvaluationConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for bad JSON and the
    /// [`validate`](Self::validate) errors otherwise.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// as [`from_json_str`](Self::from_json_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Reject configs that cannot produce a meaningful report.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for empty size or depth lists, a
    /// zero cube size or zero trials, and [`ConfigError::Policy`] for an
    /// invalid search policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |detail: &str| {
            Err(ConfigError::Invalid {
                detail: detail.to_string(),
            })
        };
        if self.cube_sizes.is_empty() {
            return invalid("cube_sizes is empty");
        }
        if self.cube_sizes.contains(&0) {
            return invalid("cube sizes must be at least 1");
        }
        if self.scramble_depths.is_empty() {
            return invalid("scramble_depths is empty");
        }
        if self.trials_per_depth == 0 {
            return invalid("trials_per_depth must be at least 1");
        }
        self.policy.validate()?;
        Ok(())
    }
}
