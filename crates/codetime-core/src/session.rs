//! Per-run session state and the record written at flush time.

use crate::accumulator::{ActivityAccumulator, FocusObservation};
use crate::matcher::TargetSpec;
use crate::{format_hms, ProcessInfo, WindowBounds, WindowSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// All mutable state for one tracker run: the accumulator, the last
/// window seen matching the target, and the session's identity.
///
/// Owned by the driver and fed one sample per tick; there are no ambient
/// globals.
pub struct Session {
    id: String,
    started_at: DateTime<Utc>,
    target: TargetSpec,
    accumulator: ActivityAccumulator,
    last_window: Option<WindowSnapshot>,
}

impl Session {
    pub fn begin(started_at: DateTime<Utc>, target: TargetSpec) -> Self {
        Self {
            id: session_id(started_at),
            started_at,
            target,
            accumulator: ActivityAccumulator::new(),
            last_window: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn target(&self) -> &TargetSpec {
        &self.target
    }

    /// Feeds one tick's sample into the accumulator.
    ///
    /// A matching sample is retained as the session's last-seen window;
    /// `None` (no focused window) counts as the target not being focused.
    pub fn record_sample(&mut self, sample: Option<WindowSnapshot>, now: DateTime<Utc>) {
        let observation = match sample {
            Some(window) if self.target.matches(&window) => {
                self.last_window = Some(window);
                FocusObservation::TargetFocused
            }
            _ => FocusObservation::OtherFocused,
        };
        self.accumulator.observe(observation, now);
    }

    /// Feeds a failed tick: no focus information, state unchanged.
    pub fn record_sample_failure(&mut self, now: DateTime<Utc>) {
        self.accumulator.observe(FocusObservation::Unknown, now);
    }

    pub fn running_total_ms(&self, now: DateTime<Utc>) -> u64 {
        self.accumulator.running_total_ms(now)
    }

    /// Settles the accumulator and builds a record for a mid-session
    /// write (`ended_at` left unset). Tracking continues afterwards.
    pub fn snapshot_record(&mut self, now: DateTime<Utc>) -> SessionRecord {
        self.accumulator.settle(now);
        self.build_record(None)
    }

    /// Final flush: settles and produces the session's closing record.
    ///
    /// Consumes the session, so a second final flush is unrepresentable.
    pub fn finish(mut self, ended_at: DateTime<Utc>) -> SessionRecord {
        self.accumulator.settle(ended_at);
        self.build_record(Some(ended_at))
    }

    fn build_record(&self, ended_at: Option<DateTime<Utc>>) -> SessionRecord {
        let total_active_ms = self.accumulator.total_ms();
        SessionRecord {
            session: SessionSummary {
                id: self.id.clone(),
                started_at: self.started_at,
                ended_at,
                total_active_ms,
                total_active_human: format_hms(total_active_ms),
            },
            process: self.last_window.as_ref().and_then(|w| w.process.clone()),
            window: self.last_window.as_ref().map(|w| WindowSection {
                id: w.window_id,
                title: w.title.clone(),
                position: w.position,
            }),
        }
    }
}

/// Derives the session id from the start time: `YYYY-MM-DD_HH-MM-SS`,
/// filesystem-safe and lexicographically sorted by start time.
pub fn session_id(started_at: DateTime<Utc>) -> String {
    started_at.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// The value object handed to the recorder at flush time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session: SessionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub started_at: DateTime<Utc>,
    /// Set only on the final flush.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub total_active_ms: u64,
    pub total_active_human: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<WindowBounds>,
}
