// Batch orchestration - resolve, augment and submit each failed job in turn

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::core::{augment_request, resolve_host_or, JobSubmitter, SubmissionResult};
use crate::error::FailureKind;
use crate::models::{Config, JobRecord};

/// Why a single job could not be resubmitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// What happened to a single job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Handed to the submission program, which exited successfully
    Submitted(SubmissionResult),
    /// Resolved and augmented but not submitted (dry run)
    DryRun,
    Failed(JobFailure),
}

/// Result of resubmitting one job
#[derive(Debug, Clone)]
pub struct JobResult {
    pub label: String,
    pub job_id: Option<i64>,
    pub host: String,
    /// Request as it was (or would have been) submitted
    pub request: Option<String>,
    pub outcome: JobOutcome,
}

impl JobResult {
    pub fn failure(&self) -> Option<&JobFailure> {
        match &self.outcome {
            JobOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Summary of a batch run
#[derive(Debug)]
pub struct RunSummary {
    pub batch_id: i64,
    pub processed: usize,
    pub submitted: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<JobResult>,
}

impl RunSummary {
    fn new(batch_id: i64) -> Self {
        let now = Utc::now();
        Self {
            batch_id,
            processed: 0,
            submitted: 0,
            failed: 0,
            started_at: now,
            finished_at: now,
            results: Vec::new(),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = (&JobResult, &JobFailure)> {
        self.results
            .iter()
            .filter_map(|result| result.failure().map(|failure| (result, failure)))
    }

    fn record(&mut self, result: JobResult) {
        self.processed += 1;
        match &result.outcome {
            JobOutcome::Submitted(_) => self.submitted += 1,
            JobOutcome::Failed(_) => self.failed += 1,
            JobOutcome::DryRun => {}
        }
        self.results.push(result);
    }
}

/// Resubmits the failed jobs of a batch, one at a time.
///
/// A failing job is recorded and the run moves on; nothing is retried.
pub struct ResubmissionDriver {
    submitter: JobSubmitter,
    default_host: String,
    dry_run: bool,
}

impl ResubmissionDriver {
    pub fn new(config: &Config) -> Self {
        Self {
            submitter: JobSubmitter::new(&config.submitter),
            default_host: config.broker.default_host.clone(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process `jobs` in the order given and return the run summary.
    /// `summary.processed` always equals the number of jobs.
    pub async fn run(&self, batch_id: i64, extra_args: &str, jobs: Vec<JobRecord>) -> RunSummary {
        let mut summary = RunSummary::new(batch_id);
        info!(
            "Resubmitting {} job(s) from batch {} via {}",
            jobs.len(),
            batch_id,
            self.submitter.program().display()
        );

        for (position, job) in jobs.iter().enumerate() {
            let result = self.run_job(position, job, extra_args).await;
            if let Some(failure) = result.failure() {
                error!("{} failed [{}]: {}", result.label, failure.kind, failure.message);
            }
            summary.record(result);
        }

        summary.finished_at = Utc::now();
        info!(
            "Batch {} complete: {} processed, {} submitted, {} failed",
            batch_id, summary.processed, summary.submitted, summary.failed
        );
        summary
    }

    async fn run_job(&self, position: usize, job: &JobRecord, extra_args: &str) -> JobResult {
        let label = job.label(position);
        let host = resolve_host_or(&job.command_line, &self.default_host);
        info!("{}: broker host {}", label, host);
        debug!("{}: original request:\n{}", label, job.request_payload);

        let mut result = JobResult {
            label,
            job_id: job.job_id,
            host,
            request: None,
            outcome: JobOutcome::DryRun,
        };

        let request = match augment_request(&job.request_payload, extra_args) {
            Ok(request) => request,
            Err(e) => {
                result.outcome = JobOutcome::Failed(JobFailure {
                    kind: e.kind(),
                    message: e.to_string(),
                });
                return result;
            }
        };
        info!("{}: augmented request:\n{}", result.label, request);

        if self.dry_run {
            info!("{}: dry run, not submitting", result.label);
            result.request = Some(request);
            return result;
        }

        result.outcome = match self.submitter.submit(&request, &result.host).await {
            Ok(submission) => {
                info!("{}: submitted to {}\n{}", result.label, result.host, submission.output.trim_end());
                JobOutcome::Submitted(submission)
            }
            Err(e) => JobOutcome::Failed(JobFailure {
                kind: e.kind(),
                message: e.to_string(),
            }),
        };
        result.request = Some(request);
        result
    }
}
