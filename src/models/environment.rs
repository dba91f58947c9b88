use std::path::PathBuf;

/// Deployment environment, selects which config tree is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    /// Dev hosts are named with a leading `d`
    pub fn from_hostname(hostname: &str) -> Self {
        if hostname.trim().starts_with('d') {
            Environment::Dev
        } else {
            Environment::Prod
        }
    }

    /// Detect the environment from the local host name
    pub fn detect() -> Self {
        let hostname = std::env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
            .unwrap_or_default();
        Self::from_hostname(&hostname)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    /// Default location of tq-rerun.toml for this environment
    pub fn default_config_path(&self) -> PathBuf {
        PathBuf::from(format!("/content/{}/rstar/etc/tq-rerun.toml", self.as_str()))
    }
}
