use serde::{Deserialize, Serialize};

/// Lifecycle state of a job in the task-queue store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Queued, waiting for a worker
    Pending,
    /// Picked up by a worker
    Running,
    /// Finished successfully
    Success,
    /// Finished with an error
    Error,
    /// Marked done by a follow-up step
    Done,
    /// Any state this tool does not know about
    #[serde(other)]
    Other,
}

/// One row of a batch/job export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRow {
    pub job_id: i64,
    pub batch_id: i64,
    pub state: JobState,
    /// Shell invocation recorded for the batch
    pub cmd_line: String,
    /// JSON request body recorded for the job
    pub request: String,
}

/// A failed job selected for resubmission. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    /// Store identifier, when the record came from the store
    pub job_id: Option<i64>,
    /// The shell invocation used for the original submission
    pub command_line: String,
    /// The JSON-encoded request document
    pub request_payload: String,
}

impl JobRecord {
    pub fn new(command_line: impl Into<String>, request_payload: impl Into<String>) -> Self {
        Self {
            job_id: None,
            command_line: command_line.into(),
            request_payload: request_payload.into(),
        }
    }

    pub fn with_job_id(mut self, job_id: i64) -> Self {
        self.job_id = Some(job_id);
        self
    }

    /// Human-readable identity used in logs and summaries.
    /// `position` is the zero-based position in the batch.
    pub fn label(&self, position: usize) -> String {
        match self.job_id {
            Some(id) => format!("job {}", id),
            None => format!("job #{}", position + 1),
        }
    }
}

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        Self {
            job_id: Some(row.job_id),
            command_line: row.cmd_line,
            request_payload: row.request,
        }
    }
}
