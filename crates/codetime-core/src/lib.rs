//! Codetime Core Library
//!
//! Provides the session accounting state machine, target matching, and
//! session-log recording for the Codetime focus tracker.

pub mod accumulator;
pub mod config;
pub mod matcher;
pub mod recorder;
pub mod session;

pub use accumulator::{ActivityAccumulator, FocusObservation};
pub use config::{data_dir, default_log_dir, TrackerConfig};
pub use matcher::TargetSpec;
pub use recorder::{RecorderError, SessionLog, WriteOutcome};
pub use session::{session_id, Session, SessionRecord, SessionSummary, WindowSection};

use serde::{Deserialize, Serialize};

/// A snapshot of the currently focused window, produced fresh each tick
/// by the sampler.
///
/// Every field is optional because platforms report wildly different
/// subsets: macOS gives process identity but no window handle, X11 gives
/// a window handle but the process may be untraceable. `process: None`
/// models a window whose owning process could not be determined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<WindowBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessInfo>,
}

/// Identity of the process owning a sampled window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
    /// Display name of the application
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Executable filename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_name: Option<String>,
    /// Filesystem path to the executable or application bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// On-screen geometry of a sampled window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Formats a millisecond duration as `Hh Mm Ss`.
///
/// Integer floor division at each unit boundary; sub-second remainders
/// are discarded.
pub fn format_hms(ms: u64) -> String {
    let s = ms / 1000;
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let sec = s % 60;
    format!("{}h {}m {}s", h, m, sec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "0h 0m 0s");
        assert_eq!(format_hms(999), "0h 0m 0s");
        assert_eq!(format_hms(61_000), "0h 1m 1s");
        assert_eq!(format_hms(3_661_500), "1h 1m 1s");
        assert_eq!(format_hms(7_200_000), "2h 0m 0s");
    }
}
