//! Evaluation reports and their on-disk form.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   evaluation_report.json   (serde_json, compact)
//!   report_digest.txt        ("sha256:<hex>" over the report bytes)
//! ```
//!
//! Reading is fail-closed: a missing file, an undeclared extra file, or a
//! digest that does not match the report bytes is an error.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cubist_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use cubist_search::policy::SearchPolicy;

use crate::runner::TrialOutcome;

const REPORT_FILENAME: &str = "evaluation_report.json";
const DIGEST_FILENAME: &str = "report_digest.txt";

/// Solve statistics for one scramble depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthBucket {
    pub scramble_depth: u32,
    pub trials: u32,
    pub solved: u32,
    /// `solved / trials`.
    pub solve_rate: f64,
    /// Mean path length over solved trials; 0 when none solved.
    pub average_solution_length: f64,
    /// Mean expansions over all trials.
    pub average_expansions: f64,
}

impl DepthBucket {
    /// Tally a bucket from its trial outcomes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_outcomes(scramble_depth: u32, outcomes: &[TrialOutcome]) -> Self {
        let trials = u32::try_from(outcomes.len()).unwrap_or(u32::MAX);
        let lengths: Vec<usize> = outcomes
            .iter()
            .filter_map(|outcome| outcome.solution_length)
            .collect();
        let solved = u32::try_from(lengths.len()).unwrap_or(u32::MAX);
        let total_expansions: u64 = outcomes.iter().map(|outcome| outcome.expansions).sum();

        let ratio = |numerator: f64, denominator: u32| {
            if denominator == 0 {
                0.0
            } else {
                numerator / f64::from(denominator)
            }
        };
        Self {
            scramble_depth,
            trials,
            solved,
            solve_rate: ratio(f64::from(solved), trials),
            average_solution_length: ratio(lengths.iter().sum::<usize>() as f64, solved),
            average_expansions: ratio(total_expansions as f64, trials),
        }
    }
}

/// All depth buckets for one cube size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeReport {
    pub cube_size: usize,
    pub buckets: Vec<DepthBucket>,
}

/// Output of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub seed: u64,
    pub trials_per_depth: u32,
    pub policy: SearchPolicy,
    pub sizes: Vec<SizeReport>,
}

impl EvaluationReport {
    /// Look up the bucket for one (cube size, depth) pair.
    #[must_use]
    pub fn bucket(&self, cube_size: usize, scramble_depth: u32) -> Option<&DepthBucket> {
        self.sizes
            .iter()
            .find(|size| size.cube_size == cube_size)?
            .buckets
            .iter()
            .find(|bucket| bucket.scramble_depth == scramble_depth)
    }

    /// Serialize to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Content hash of the JSON form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, serde_json::Error> {
        Ok(canonical_hash(
            HashDomain::EvaluationReport,
            &self.to_json_bytes()?,
        ))
    }
}

/// Typed failure for report persistence.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("missing report file {filename}")]
    Missing { filename: String },
    #[error("unexpected file in report directory: {name}")]
    ExtraFile { name: String },
    #[error("report JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("report digest mismatch: stored {stored}, recomputed {recomputed}")]
    DigestMismatch { stored: String, recomputed: String },
}

/// Write `report` and its digest into `dir`, creating it if needed.
/// Returns the digest.
///
/// # Errors
///
/// Returns [`ReportError::Io`] on write failure.
pub fn write_report_dir(report: &EvaluationReport, dir: &Path) -> Result<ContentHash, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
    let bytes = report.to_json_bytes()?;
    let digest = canonical_hash(HashDomain::EvaluationReport, &bytes);
    write_atomic(&dir.join(REPORT_FILENAME), &bytes)?;
    write_atomic(&dir.join(DIGEST_FILENAME), digest.as_str().as_bytes())?;
    Ok(digest)
}

/// Read a report directory, verifying the digest before parsing.
///
/// # Errors
///
/// Returns [`ReportError`] on any missing or extra file, digest mismatch,
/// or parse failure.
pub fn read_report_dir(dir: &Path) -> Result<EvaluationReport, ReportError> {
    let bytes = read_required(dir, REPORT_FILENAME)?;
    let stored = read_required(dir, DIGEST_FILENAME)?;

    for name in list_files(dir)? {
        if name != REPORT_FILENAME && name != DIGEST_FILENAME {
            return Err(ReportError::ExtraFile { name });
        }
    }

    let recomputed = canonical_hash(HashDomain::EvaluationReport, &bytes);
    let stored = String::from_utf8_lossy(&stored).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(ReportError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn io_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Temp file in the same directory, then rename.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".tmp_{file_name}"));
    std::fs::write(&temp_path, content).map_err(|source| io_error(&temp_path, source))?;
    std::fs::rename(&temp_path, path).map_err(|source| io_error(path, source))
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, ReportError> {
    std::fs::read(dir.join(filename)).map_err(|_| ReportError::Missing {
        filename: filename.to_string(),
    })
}

/// Regular files in `dir`, skipping leftover temp files.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, ReportError> {
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(|source| io_error(dir, source))? {
        let entry = entry.map_err(|source| io_error(dir, source))?;
        let is_file = entry
            .file_type()
            .map_err(|source| io_error(&entry.path(), source))?
            .is_file();
        if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
            if !name.starts_with(".tmp_") {
                files.insert(name.to_string());
            }
        }
    }
    Ok(files)
}
