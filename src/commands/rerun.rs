use std::path::PathBuf;

use crate::core::{load_config, load_failed_jobs, JobOutcome, JobResult, ResubmissionDriver, RunSummary};
use crate::error::{RerunError, Result};
use crate::models::Environment;

/// Rerun options
pub struct RerunOptions {
    /// Batch whose failed jobs are resubmitted
    pub batch_id: i64,
    /// Batch/job export to read jobs from (`-` for stdin)
    pub jobs_file: PathBuf,
    /// Arguments appended to each job's extra_args
    pub extra_args: String,
    /// Resolve and augment only, do not submit
    pub dry_run: bool,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Environment selecting the default config file
    pub environment: Environment,
    /// Submission program override
    pub program: Option<PathBuf>,
    /// Submission timeout override
    pub timeout: Option<u64>,
    /// Fallback broker host override
    pub default_host: Option<String>,
}

/// Resubmit the failed jobs of a batch
pub async fn rerun_batch(options: RerunOptions) -> Result<()> {
    let config = load_config(
        options.config,
        options.environment,
        options.program,
        options.timeout,
        options.default_host,
    )?;

    let jobs = load_failed_jobs(&options.jobs_file, options.batch_id, &config.source.failed_states)?;
    if jobs.is_empty() {
        println!("No failed jobs in batch {}", options.batch_id);
        return Ok(());
    }

    let driver = ResubmissionDriver::new(&config).with_dry_run(options.dry_run);
    if options.dry_run {
        println!("=== DRY RUN ===\n");
    }

    let summary = driver.run(options.batch_id, &options.extra_args, jobs).await;
    print_summary(&summary);

    if summary.failed > 0 {
        return Err(RerunError::BatchIncomplete {
            batch_id: summary.batch_id,
            processed: summary.processed,
            failed: summary.failed,
        });
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let elapsed = summary.finished_at - summary.started_at;

    println!("\n=== Rerun Summary (batch {}) ===", summary.batch_id);
    println!("Processed: {}", summary.processed);
    println!("Submitted: {}", summary.submitted);
    println!("Failed:    {}", summary.failed);
    println!("Elapsed:   {}.{:03}s", elapsed.num_seconds(), elapsed.num_milliseconds() % 1000);

    if !summary.results.is_empty() {
        println!("\nResults:");
        for result in &summary.results {
            print_job_result(result);
        }
    }
}

fn print_job_result(result: &JobResult) {
    print!("{}", format_job_result(result));
}

/// One summary entry; submitted and dry-run entries carry the request body
fn format_job_result(result: &JobResult) -> String {
    let mut out = match &result.outcome {
        JobOutcome::Submitted(_) => format!("  {} [SUBMITTED] -> {}\n", result.label, result.host),
        JobOutcome::DryRun => format!("  {} [DRY RUN] -> {}\n", result.label, result.host),
        JobOutcome::Failed(failure) => format!(
            "  {} [FAIL] -> {}: {}: {}\n",
            result.label, result.host, failure.kind, failure.message
        ),
    };

    if let (JobOutcome::Submitted(_) | JobOutcome::DryRun, Some(request)) = (&result.outcome, &result.request) {
        for line in request.lines() {
            out.push_str(&format!("      {}\n", line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JobFailure, SubmissionResult};
    use crate::error::FailureKind;

    fn job_result(outcome: JobOutcome) -> JobResult {
        JobResult {
            label: "job 11".to_string(),
            job_id: Some(11),
            host: "mq3.lib".to_string(),
            request: Some("{\n    \"extra_args\": \"-q 5 --force\"\n}".to_string()),
            outcome,
        }
    }

    #[test]
    fn test_submitted_result_shows_request() {
        let result = job_result(JobOutcome::Submitted(SubmissionResult {
            code: Some(0),
            output: "queued".to_string(),
        }));

        let text = format_job_result(&result);
        assert!(text.starts_with("  job 11 [SUBMITTED] -> mq3.lib\n"));
        assert!(text.contains("      \"extra_args\": \"-q 5 --force\""));
    }

    #[test]
    fn test_dry_run_result_shows_request() {
        let text = format_job_result(&job_result(JobOutcome::DryRun));
        assert!(text.starts_with("  job 11 [DRY RUN] -> mq3.lib\n"));
        assert!(text.contains("-q 5 --force"));
    }

    #[test]
    fn test_failed_result_shows_kind_and_message() {
        let mut result = job_result(JobOutcome::Failed(JobFailure {
            kind: FailureKind::SubmissionFailed,
            message: "Submission timed out after 120 seconds".to_string(),
        }));
        result.request = None;

        let text = format_job_result(&result);
        assert_eq!(
            text,
            "  job 11 [FAIL] -> mq3.lib: SubmissionFailed: Submission timed out after 120 seconds\n"
        );
    }
}
