//! Reading failed jobs from a batch/job export.

use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::SourceError;
use crate::models::{JobRecord, JobRow, JobState};

/// Read an export and keep the rows of `batch_id` whose state is in `failed_states`.
///
/// A path of `-` reads from stdin. Rows keep their export order.
pub fn load_failed_jobs(
    path: &Path,
    batch_id: i64,
    failed_states: &[JobState],
) -> Result<Vec<JobRecord>, SourceError> {
    let contents = read_export(path)?;
    let rows: Vec<JobRow> = serde_json::from_str(&contents)
        .map_err(|e| SourceError::ParseError(path.to_path_buf(), e))?;
    debug!("Read {} row(s) from {}", rows.len(), path.display());

    let records = select_failed(rows, batch_id, failed_states);
    info!("Found {} failed job(s) in batch {}", records.len(), batch_id);
    Ok(records)
}

/// Filter rows down to the failed jobs of one batch
pub fn select_failed(rows: Vec<JobRow>, batch_id: i64, failed_states: &[JobState]) -> Vec<JobRecord> {
    rows.into_iter()
        .filter(|row| row.batch_id == batch_id && failed_states.contains(&row.state))
        .map(JobRecord::from)
        .collect()
}

fn read_export(path: &Path) -> Result<String, SourceError> {
    if path == Path::new("-") {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .map_err(|e| SourceError::ReadError(PathBuf::from("<stdin>"), e))?;
        Ok(contents)
    } else {
        std::fs::read_to_string(path).map_err(|e| SourceError::ReadError(path.to_path_buf(), e))
    }
}
