use std::path::PathBuf;
use tracing::info;

use crate::error::RerunError;
use crate::models::{Config, Environment};

/// Load configuration with CLI overrides.
///
/// Without an explicit path, the environment's default location is used and a
/// missing file means defaults.
pub fn load_config(
    config_path: Option<PathBuf>,
    environment: Environment,
    program: Option<PathBuf>,
    timeout: Option<u64>,
    default_host: Option<String>,
) -> Result<Config, RerunError> {
    let config = match config_path {
        Some(path) => Config::load_from_file(&path)?,
        None => Config::load_or_default(&environment.default_config_path())?,
    };
    let config = config.with_overrides(program, timeout, default_host);

    info!(
        "Configuration loaded ({}): program={}, default_host={}, timeout={}s",
        environment.as_str(),
        config.submitter.program.display(),
        config.broker.default_host,
        config.submitter.timeout_seconds
    );

    Ok(config)
}
