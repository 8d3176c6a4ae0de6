//! Active-window accounting state machine

use chrono::{DateTime, Utc};

/// What one poll tick learned about window focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusObservation {
    /// The target application holds focus.
    TargetFocused,
    /// Another window holds focus, or no window holds focus at all.
    OtherFocused,
    /// The sampler failed this tick; no focus information is available.
    Unknown,
}

/// Accumulates the time the target application has held focus.
///
/// Two states: inactive (`active_since` unset) and active. Confirmed time
/// lives in `total_active_ms`; an active span stays open until focus is
/// lost or the accumulator is settled.
#[derive(Debug, Clone)]
pub struct ActivityAccumulator {
    active_since: Option<DateTime<Utc>>,
    total_active_ms: u64,
}

impl ActivityAccumulator {
    pub fn new() -> Self {
        Self {
            active_since: None,
            total_active_ms: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }

    /// Advances the state machine by one tick.
    ///
    /// `Unknown` leaves the state untouched: a failed sample must not be
    /// mistaken for the target losing focus.
    pub fn observe(&mut self, observation: FocusObservation, now: DateTime<Utc>) {
        match observation {
            FocusObservation::TargetFocused => {
                if self.active_since.is_none() {
                    self.active_since = Some(now);
                }
            }
            FocusObservation::OtherFocused => {
                if let Some(since) = self.active_since.take() {
                    self.total_active_ms = self.total_active_ms.saturating_add(elapsed_ms(since, now));
                }
            }
            FocusObservation::Unknown => {}
        }
    }

    /// Confirmed active time plus the open span, if any. Non-mutating;
    /// used for live reporting.
    pub fn running_total_ms(&self, now: DateTime<Utc>) -> u64 {
        self.total_active_ms
            + self
                .active_since
                .map(|since| elapsed_ms(since, now))
                .unwrap_or(0)
    }

    /// Confirmed active time only.
    pub fn total_ms(&self) -> u64 {
        self.total_active_ms
    }

    /// Folds the open span into the total, then re-opens it at `now`.
    ///
    /// Tracking continues uninterrupted while the persisted total covers
    /// everything up to this instant; `running_total_ms(now)` is unchanged
    /// across the call.
    pub fn settle(&mut self, now: DateTime<Utc>) {
        if let Some(since) = self.active_since {
            self.total_active_ms = self.total_active_ms.saturating_add(elapsed_ms(since, now));
            self.active_since = Some(now);
        }
    }
}

impl Default for ActivityAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Span length in whole milliseconds, clamped to zero if the clock ran
/// backwards.
fn elapsed_ms(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - since).num_milliseconds().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_starts_inactive_with_zero_total() {
        let acc = ActivityAccumulator::new();
        assert!(!acc.is_active());
        assert_eq!(acc.total_ms(), 0);
        assert_eq!(acc.running_total_ms(at(1000)), 0);
    }

    #[test]
    fn test_open_span_counts_toward_running_total_only() {
        let mut acc = ActivityAccumulator::new();
        acc.observe(FocusObservation::TargetFocused, at(1000));

        assert!(acc.is_active());
        assert_eq!(acc.total_ms(), 0);
        assert_eq!(acc.running_total_ms(at(4000)), 3000);
    }

    #[test]
    fn test_losing_focus_folds_the_span() {
        let mut acc = ActivityAccumulator::new();
        acc.observe(FocusObservation::TargetFocused, at(1000));
        acc.observe(FocusObservation::OtherFocused, at(5000));

        assert!(!acc.is_active());
        assert_eq!(acc.total_ms(), 4000);
    }

    #[test]
    fn test_running_total_is_monotonic() {
        let mut acc = ActivityAccumulator::new();
        let ticks = [
            (FocusObservation::OtherFocused, 1000),
            (FocusObservation::TargetFocused, 2000),
            (FocusObservation::TargetFocused, 3000),
            (FocusObservation::Unknown, 4000),
            (FocusObservation::OtherFocused, 5000),
            (FocusObservation::TargetFocused, 6000),
            (FocusObservation::OtherFocused, 9000),
        ];

        let mut previous = 0;
        for (observation, t) in ticks {
            acc.observe(observation, at(t));
            let running = acc.running_total_ms(at(t));
            assert!(running >= previous, "total went backwards at t={}", t);
            previous = running;
        }
        assert_eq!(acc.total_ms(), 6000);
    }

    #[test]
    fn test_settle_conserves_running_total_and_stays_active() {
        let mut acc = ActivityAccumulator::new();
        acc.observe(FocusObservation::TargetFocused, at(1000));

        let before = acc.running_total_ms(at(8000));
        acc.settle(at(8000));
        let after = acc.running_total_ms(at(8000));

        assert_eq!(before, after);
        assert!(acc.is_active());
        assert_eq!(acc.total_ms(), 7000);

        // A second settle at the same instant folds nothing new.
        acc.settle(at(8000));
        assert_eq!(acc.total_ms(), 7000);
        assert_eq!(acc.running_total_ms(at(8000)), 7000);
    }

    #[test]
    fn test_settle_while_inactive_is_a_no_op() {
        let mut acc = ActivityAccumulator::new();
        acc.settle(at(5000));
        assert!(!acc.is_active());
        assert_eq!(acc.total_ms(), 0);
    }

    #[test]
    fn test_unknown_tick_does_not_close_an_open_span() {
        let mut acc = ActivityAccumulator::new();
        acc.observe(FocusObservation::TargetFocused, at(5000));
        acc.observe(FocusObservation::Unknown, at(6000));
        acc.observe(FocusObservation::TargetFocused, at(7000));
        acc.settle(at(8000));

        // One unbroken span of 3000ms, not two fragments and not zero.
        assert_eq!(acc.total_ms(), 3000);
    }

    #[test]
    fn test_full_session_scenario() {
        let mut acc = ActivityAccumulator::new();

        acc.observe(FocusObservation::TargetFocused, at(1000));
        assert!(acc.is_active());

        acc.observe(FocusObservation::TargetFocused, at(61_000));
        assert_eq!(acc.total_ms(), 0);

        acc.observe(FocusObservation::OtherFocused, at(121_000));
        assert!(!acc.is_active());
        assert_eq!(acc.total_ms(), 120_000);

        acc.settle(at(121_500));
        assert_eq!(acc.total_ms(), 120_000);
    }

    #[test]
    fn test_clock_regression_is_clamped() {
        let mut acc = ActivityAccumulator::new();
        acc.observe(FocusObservation::TargetFocused, at(5000));
        acc.observe(FocusObservation::OtherFocused, at(4000));

        assert_eq!(acc.total_ms(), 0);
        assert_eq!(acc.running_total_ms(at(4000)), 0);
    }
}
