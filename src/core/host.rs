//! Broker host extraction from a recorded submission command line.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Host used when a command line names no broker
pub const DEFAULT_HOST: &str = "localhost";

/// `-m <host>` as a standalone token, host made of dot-joined word segments
static MQHOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)-m\s+(\w+(?:\.\w+)*)(?:\s|$)").expect("broker host pattern is valid")
});

/// Resolve the broker host from a command line, falling back to `localhost`
pub fn resolve_host(command_line: &str) -> String {
    resolve_host_or(command_line, DEFAULT_HOST)
}

/// Resolve the broker host from a command line, falling back to `fallback`.
///
/// Only the first `-m <host>` occurrence is considered.
pub fn resolve_host_or(command_line: &str, fallback: &str) -> String {
    match MQHOST_RE.captures(command_line).and_then(|caps| caps.get(1)) {
        Some(host) => host.as_str().to_string(),
        None => {
            debug!("No -m host in command line, using {}", fallback);
            fallback.to_string()
        }
    }
}
