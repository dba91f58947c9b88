use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::ConfigError;

/// Main error type for tq-rerun
#[derive(Error, Debug)]
pub enum RerunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Job export error: {0}")]
    Source(#[from] SourceError),

    #[error("{failed} of {processed} job(s) in batch {batch_id} failed")]
    BatchIncomplete {
        batch_id: i64,
        processed: usize,
        failed: usize,
    },
}

/// Classification of a per-job failure, as shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MalformedPayload,
    InvalidFieldType,
    SubmissionFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::MalformedPayload => "MalformedPayload",
            FailureKind::InvalidFieldType => "InvalidFieldType",
            FailureKind::SubmissionFailed => "SubmissionFailed",
        };
        f.write_str(name)
    }
}

/// Errors from merging extra arguments into a request document
#[derive(Error, Debug)]
pub enum AugmentError {
    #[error("request is not a JSON object: {0}")]
    MalformedPayload(String),

    #[error("field '{field}' must be a string, found {found}")]
    InvalidFieldType { field: String, found: &'static str },
}

impl AugmentError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AugmentError::MalformedPayload(_) => FailureKind::MalformedPayload,
            AugmentError::InvalidFieldType { .. } => FailureKind::InvalidFieldType,
        }
    }
}

/// Errors from invoking the external submission program
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Failed to prepare request file: {0}")]
    TempFile(std::io::Error),

    #[error("Failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Submission timed out after {0} seconds")]
    Timeout(u64),

    #[error("Submission exited with {}:\n{output}", exit_label(.code))]
    Exited { code: Option<i32>, output: String },
}

impl SubmitError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::SubmissionFailed
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "no status (killed by signal)".to_string(),
    }
}

/// Errors from reading a batch/job export
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read job export {0}: {1}")]
    ReadError(PathBuf, std::io::Error),

    #[error("Failed to parse job export {0}: {1}")]
    ParseError(PathBuf, serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RerunError>;
