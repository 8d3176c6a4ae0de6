//! Session log recording
//!
//! Serializes session records to one TOML file per session, named
//! deterministically from the session id.

use crate::SessionRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RecorderError>;

/// Outcome of a final flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// The total fell below the minimum session duration; nothing was
    /// written.
    SkippedShort { total_ms: u64 },
}

/// Owns the destination file for one session's log.
pub struct SessionLog {
    path: PathBuf,
    min_session_ms: u64,
}

impl SessionLog {
    /// Creates the log directory and fixes this session's file path.
    pub fn create(dir: &Path, session_id: &str, min_session_ms: u64) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(format!("vscode-{}.toml", session_id)),
            min_session_ms,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the record unconditionally, replacing any earlier write for
    /// this session.
    pub fn write(&self, record: &SessionRecord) -> Result<()> {
        let payload = toml::to_string_pretty(record)?;
        fs::write(&self.path, payload)?;
        debug!("session log written to {:?}", self.path);
        Ok(())
    }

    /// Final flush. Sessions shorter than the minimum are treated as
    /// noise and discarded rather than written.
    pub fn finalize(&self, record: &SessionRecord) -> Result<WriteOutcome> {
        let total_ms = record.session.total_active_ms;
        if total_ms < self.min_session_ms {
            return Ok(WriteOutcome::SkippedShort { total_ms });
        }
        self.write(record)?;
        Ok(WriteOutcome::Written(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Session, TargetSpec};
    use crate::{ProcessInfo, WindowSnapshot};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn record_with_total(total_ms: i64) -> SessionRecord {
        let mut session = Session::begin(at(0), TargetSpec::vscode());
        session.record_sample(
            Some(WindowSnapshot {
                window_id: Some(1),
                title: Some("lib.rs".to_string()),
                position: None,
                process: Some(ProcessInfo {
                    process_id: Some(1234),
                    name: Some("Code".to_string()),
                    exec_name: None,
                    path: None,
                }),
            }),
            at(0),
        );
        session.finish(at(total_ms))
    }

    #[test]
    fn test_short_session_is_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_with_total(120_000);
        let log = SessionLog::create(dir.path(), &record.session.id, 300_000).unwrap();

        let outcome = log.finalize(&record).unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::SkippedShort { total_ms: 120_000 }
        );
        assert!(!log.path().exists());
    }

    #[test]
    fn test_long_session_is_written_with_exact_total() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_with_total(600_000);
        let log = SessionLog::create(dir.path(), &record.session.id, 300_000).unwrap();

        let outcome = log.finalize(&record).unwrap();
        assert_eq!(outcome, WriteOutcome::Written(log.path().to_path_buf()));

        let raw = fs::read_to_string(log.path()).unwrap();
        let parsed: SessionRecord = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.session.total_active_ms, 600_000);
        assert_eq!(parsed.session.id, record.session.id);
        assert_eq!(parsed.process.unwrap().name.as_deref(), Some("Code"));
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_with_total(300_000);
        let log = SessionLog::create(dir.path(), &record.session.id, 300_000).unwrap();

        assert_eq!(
            log.finalize(&record).unwrap(),
            WriteOutcome::Written(log.path().to_path_buf())
        );
    }

    #[test]
    fn test_write_ignores_the_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_with_total(1000);
        let log = SessionLog::create(dir.path(), &record.session.id, 300_000).unwrap();

        log.write(&record).unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_create_makes_nested_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let log = SessionLog::create(&nested, "2024-03-07_09-30-05", 0).unwrap();

        assert!(nested.is_dir());
        assert_eq!(
            log.path().file_name().unwrap(),
            "vscode-2024-03-07_09-30-05.toml"
        );
    }
}
