//! Fixed runtime configuration for the tracker.

use crate::matcher::TargetSpec;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Sessions shorter than this are discarded at the final flush.
pub const DEFAULT_MIN_SESSION_MS: u64 = 5 * 60 * 1000;

/// Tracker configuration. These are fixed constants rather than runtime
/// flags; `Default` is the only constructor the binaries use.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    pub log_dir: PathBuf,
    pub min_session_ms: u64,
    pub target: TargetSpec,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_dir: default_log_dir(),
            min_session_ms: DEFAULT_MIN_SESSION_MS,
            target: TargetSpec::vscode(),
        }
    }
}

/// Get the data directory for Codetime
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "codetime", "codetime")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            directories::BaseDirs::new()
                .map(|d| d.home_dir().join(".codetime"))
                .unwrap_or_else(|| PathBuf::from(".codetime"))
        })
}

/// Get the directory session logs are written to
pub fn default_log_dir() -> PathBuf {
    data_dir().join("logs")
}
