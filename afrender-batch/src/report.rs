//! Run report: a JSON record of one batch, written next to its outputs.
//!
//! Persists a [`RunReport`] at `<output_dir>/afrender-report.json` using a
//! `.tmp` + rename write. Successful records carry the SHA-256 of their
//! downloaded structure so re-runs can be compared byte for byte.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::driver::{BatchSummary, RecordOutcome};
use crate::error::{io_err, BatchError};

pub const REPORT_FILE: &str = "afrender-report.json";

/// On-disk report payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub records: Vec<ReportEntry>,
}

/// One line of the report per input row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportEntry {
    pub index: usize,
    pub id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_sha256: Option<String>,
    pub log_retained: bool,
    pub elapsed_ms: u64,
}

impl ReportEntry {
    fn from_outcome(outcome: &RecordOutcome) -> Self {
        let structure_sha256 = if outcome.succeeded() {
            match sha256_file(&outcome.artifacts.structure) {
                Ok(digest) => Some(digest),
                Err(err) => {
                    tracing::warn!(id = %outcome.id, error = %err, "could not hash structure file");
                    None
                }
            }
        } else {
            None
        };
        let (status, failed_stage) = match outcome.error.as_ref() {
            Some(err) => ("failed".to_string(), Some(err.stage.to_string())),
            None => ("done".to_string(), None),
        };
        Self {
            index: outcome.index,
            id: outcome.id.to_string(),
            status,
            failed_stage,
            error: outcome.error.as_ref().map(|e| e.source.to_string()),
            structure_bytes: outcome.structure_bytes,
            structure_sha256,
            log_retained: outcome.log_retained,
            elapsed_ms: outcome.elapsed.as_millis() as u64,
        }
    }
}

impl RunReport {
    pub fn from_summary(summary: &BatchSummary) -> Self {
        Self {
            started_at: summary.started_at,
            finished_at: summary.finished_at,
            total: summary.total,
            succeeded: summary.succeeded,
            failed: summary.failed,
            records: summary.outcomes.iter().map(ReportEntry::from_outcome).collect(),
        }
    }
}

/// `<output_dir>/afrender-report.json`
pub fn report_path(output_dir: &Path) -> PathBuf {
    output_dir.join(REPORT_FILE)
}

/// Write `report` atomically, replacing any previous report.
pub fn save_at(output_dir: &Path, report: &RunReport) -> Result<PathBuf, BatchError> {
    let path = report_path(output_dir);
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    Ok(path)
}

pub fn load_at(output_dir: &Path) -> Result<RunReport, BatchError> {
    let path = report_path(output_dir);
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Hex SHA-256 of a file's bytes, streamed.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
