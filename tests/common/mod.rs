//! Common test utilities

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use tq_rerun::models::Config;

/// Scratch area with a fake submission program and a directory for request files
pub struct TestQueue {
    pub temp_dir: TempDir,
    pub program: PathBuf,
    pub requests_dir: PathBuf,
    pub submissions_dir: PathBuf,
}

/// Create a fake submission program.
///
/// Each invocation copies its request file into `submissions/<n>.json`, records
/// the host in `submissions/<n>.host` and the request path in
/// `submissions/<n>.path`. Requests containing `"fail"` exit with status 1.
pub fn create_test_queue() -> TestQueue {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().to_path_buf();

    let requests_dir = root.join("requests");
    let submissions_dir = root.join("submissions");
    fs::create_dir_all(&requests_dir).expect("Failed to create requests dir");
    fs::create_dir_all(&submissions_dir).expect("Failed to create submissions dir");

    let program = root.join("add-mb-job");
    let script = format!(
        r#"#!/bin/sh
out={out}
n=$(ls "$out" | grep -c '\.json$')
cp "$6" "$out/$n.json"
echo "$4" > "$out/$n.host"
echo "$6" > "$out/$n.path"
if grep -q '"fail"' "$6"; then
    echo "rejected by broker $4" >&2
    exit 1
fi
echo "queued on $4"
"#,
        out = submissions_dir.display()
    );
    fs::write(&program, script).expect("Failed to write fake program");
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake program executable");

    TestQueue {
        temp_dir,
        program,
        requests_dir,
        submissions_dir,
    }
}

impl TestQueue {
    /// Config pointing the submitter at the fake program
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.submitter.program = self.program.clone();
        config.submitter.timeout_seconds = 10;
        config.submitter.temp_dir = Some(self.requests_dir.clone());
        config
    }

    /// Requests received by the fake program, in submission order, as (host, body)
    pub fn submissions(&self) -> Vec<(String, String)> {
        let mut submissions = Vec::new();
        for n in 0.. {
            let body = self.submissions_dir.join(format!("{}.json", n));
            if !body.exists() {
                break;
            }
            let host = fs::read_to_string(self.submissions_dir.join(format!("{}.host", n)))
                .expect("Failed to read host");
            let body = fs::read_to_string(body).expect("Failed to read body");
            submissions.push((host.trim().to_string(), body));
        }
        submissions
    }

    /// Request file paths the fake program was given
    pub fn request_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for n in 0.. {
            let path = self.submissions_dir.join(format!("{}.path", n));
            if !path.exists() {
                break;
            }
            let contents = fs::read_to_string(path).expect("Failed to read path");
            paths.push(PathBuf::from(contents.trim()));
        }
        paths
    }

    /// Write a batch/job export and return its path
    pub fn write_export(&self, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join("export.json");
        fs::write(&path, contents).expect("Failed to write export");
        path
    }
}

/// True when `dir` contains no entries
pub fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).expect("Failed to read dir").next().is_none()
}
