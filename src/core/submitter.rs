//! Handoff of a request document to the external submission program.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::models::SubmitterConfig;

/// Output of one submission program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    /// Exit status, None when killed by a signal
    pub code: Option<i32>,
    /// Combined stdout and stderr
    pub output: String,
}

impl SubmissionResult {
    pub fn ok(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs the submission program once per job, passing the request through a
/// transient file that is removed before `submit` returns.
#[derive(Debug, Clone)]
pub struct JobSubmitter {
    program: PathBuf,
    service: String,
    /// None disables the timeout
    timeout: Option<Duration>,
    temp_dir: Option<PathBuf>,
}

impl JobSubmitter {
    pub fn new(config: &SubmitterConfig) -> Self {
        Self {
            program: config.program.clone(),
            service: config.service.clone(),
            timeout: (config.timeout_seconds > 0).then(|| Duration::from_secs(config.timeout_seconds)),
            temp_dir: config.temp_dir.clone(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Submit `request` to the broker on `host`.
    ///
    /// Non-zero exit, spawn failure and timeout are all errors.
    pub async fn submit(&self, request: &str, host: &str) -> Result<SubmissionResult, SubmitError> {
        let request_file = self.write_request_file(request)?;
        debug!("Wrote request to {}", request_file.display());

        let result = self.invoke(&request_file, host).await;

        if let Err(e) = request_file.close() {
            warn!("Failed to remove request file: {}", e);
        }

        let result = result?;
        if result.ok() {
            Ok(result)
        } else {
            Err(SubmitError::Exited {
                code: result.code,
                output: result.output,
            })
        }
    }

    fn write_request_file(&self, request: &str) -> Result<tempfile::TempPath, SubmitError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tq-rerun-").suffix(".json");

        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(SubmitError::TempFile)?;

        file.write_all(request.as_bytes()).map_err(SubmitError::TempFile)?;
        file.flush().map_err(SubmitError::TempFile)?;

        // Closes our handle; the path is still deleted on drop
        Ok(file.into_temp_path())
    }

    async fn invoke(&self, request_file: &Path, host: &str) -> Result<SubmissionResult, SubmitError> {
        let mut command = Command::new(&self.program);
        command
            .arg("--service")
            .arg(&self.service)
            .arg("--mqhost")
            .arg(host)
            .arg("--json-config")
            .arg(request_file)
            .kill_on_drop(true);

        debug!(
            "Running {} --service {} --mqhost {} --json-config {}",
            self.program.display(),
            self.service,
            host,
            request_file.display()
        );

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, command.output()).await {
                Ok(output) => output,
                Err(_) => return Err(SubmitError::Timeout(limit.as_secs())),
            },
            None => command.output().await,
        }
        .map_err(|source| SubmitError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        Ok(SubmissionResult {
            code: output.status.code(),
            output: combined,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Write an executable shell script standing in for the submission program
    fn fake_program(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-submit.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn submitter(program: PathBuf, work_dir: &Path, timeout_seconds: u64) -> JobSubmitter {
        JobSubmitter::new(&SubmitterConfig {
            program,
            service: "rerun".to_string(),
            timeout_seconds,
            temp_dir: Some(work_dir.to_path_buf()),
        })
    }

    #[tokio::test]
    async fn test_submit_passes_arguments_and_request() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("args.log");
        let program = fake_program(
            dir.path(),
            &format!(
                "echo \"$@\" > {log}\ncat \"$6\"\necho queued >&2",
                log = log.display()
            ),
        );
        let files = TempDir::new().unwrap();

        let result = submitter(program, files.path(), 10)
            .submit("{\"class\": \"video\"}", "broker7.internal")
            .await
            .unwrap();

        assert!(result.ok());
        assert!(result.output.contains("{\"class\": \"video\"}"));
        assert!(result.output.contains("queued"));

        let args = fs::read_to_string(&log).unwrap();
        assert!(args.starts_with("--service rerun --mqhost broker7.internal --json-config "));
    }

    #[tokio::test]
    async fn test_request_file_removed_after_success() {
        let dir = TempDir::new().unwrap();
        let program = fake_program(dir.path(), "exit 0");
        let files = TempDir::new().unwrap();

        submitter(program, files.path(), 10).submit("{}", "mq1").await.unwrap();

        assert_eq!(fs::read_dir(files.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error_and_file_removed() {
        let dir = TempDir::new().unwrap();
        let program = fake_program(dir.path(), "echo 'connection refused' >&2\nexit 3");
        let files = TempDir::new().unwrap();

        let err = submitter(program, files.path(), 10).submit("{}", "mq1").await.unwrap_err();

        match err {
            SubmitError::Exited { code, output } => {
                assert_eq!(code, Some(3));
                assert!(output.contains("connection refused"));
            }
            other => panic!("Expected Exited, got {:?}", other),
        }
        assert_eq!(fs::read_dir(files.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let files = TempDir::new().unwrap();
        let program = files.path().join("does-not-exist");

        let err = submitter(program, files.path(), 10).submit("{}", "mq1").await.unwrap_err();

        assert!(matches!(err, SubmitError::Spawn { .. }));
        assert_eq!(fs::read_dir(files.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_kills_submission() {
        let dir = TempDir::new().unwrap();
        let program = fake_program(dir.path(), "sleep 30");
        let files = TempDir::new().unwrap();

        let err = submitter(program, files.path(), 1).submit("{}", "mq1").await.unwrap_err();

        assert!(matches!(err, SubmitError::Timeout(1)));
        assert_eq!(fs::read_dir(files.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_zero_timeout_means_no_limit() {
        let dir = TempDir::new().unwrap();
        let program = fake_program(dir.path(), "sleep 1\necho queued");
        let files = TempDir::new().unwrap();

        let result = submitter(program, files.path(), 0).submit("{}", "mq1").await.unwrap();

        assert!(result.ok());
        assert!(result.output.contains("queued"));
        assert_eq!(fs::read_dir(files.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_submission_result_ok() {
        let ok = SubmissionResult { code: Some(0), output: String::new() };
        let failed = SubmissionResult { code: Some(1), output: String::new() };
        let killed = SubmissionResult { code: None, output: String::new() };
        assert!(ok.ok());
        assert!(!failed.ok());
        assert!(!killed.ok());
    }
}
