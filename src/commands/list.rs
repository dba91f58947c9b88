use std::path::PathBuf;

use crate::core::{current_extra_args, load_config, load_failed_jobs, resolve_host_or};
use crate::error::Result;
use crate::models::Environment;

/// Show the failed jobs of a batch and where they would be resubmitted
pub fn list_failed_jobs(
    batch_id: i64,
    jobs_file: &PathBuf,
    config_path: Option<PathBuf>,
    environment: Environment,
) -> Result<()> {
    let config = load_config(config_path, environment, None, None, None)?;
    let jobs = load_failed_jobs(jobs_file, batch_id, &config.source.failed_states)?;

    if jobs.is_empty() {
        println!("No failed jobs in batch {}", batch_id);
        return Ok(());
    }

    println!("=== Failed jobs in batch {} ===\n", batch_id);
    println!("  {:<12} {:<24} {}", "JOB", "HOST", "EXTRA ARGS");

    for (position, job) in jobs.iter().enumerate() {
        let host = resolve_host_or(&job.command_line, &config.broker.default_host);
        let extra_args = match current_extra_args(&job.request_payload) {
            Ok(Some(args)) => args,
            Ok(None) => "-".to_string(),
            Err(e) => format!("<{}: {}>", e.kind(), e),
        };
        println!("  {:<12} {:<24} {}", job.label(position), host, extra_args);
    }

    println!("\nTotal: {}", jobs.len());
    Ok(())
}
