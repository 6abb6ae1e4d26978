use serde::{Deserialize, Serialize};

const HOUR_MILLIS: i64 = 1000 * 60 * 60;

/// Events starting this long after a reminder pass are the earliest to be reminded
pub const REMINDER_LOOKAHEAD_FROM_MILLIS: i64 = 23 * HOUR_MILLIS;
/// Events starting this long after a reminder pass or later are left for the next pass
pub const REMINDER_LOOKAHEAD_TO_MILLIS: i64 = 24 * HOUR_MILLIS;

/// The half open interval `[start, end)` of `Event` start instants selected
/// by a reminder pass triggered at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderWindow {
    start: i64,
    end: i64,
}

impl ReminderWindow {
    pub fn for_pass_at(now: i64) -> Self {
        Self {
            start: now + REMINDER_LOOKAHEAD_FROM_MILLIS,
            end: now + REMINDER_LOOKAHEAD_TO_MILLIS,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, ts: i64) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// Aggregated result of sending a batch of notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub sent: usize,
    pub failed: usize,
}

impl DispatchOutcome {
    pub fn record(&mut self, success: bool) {
        if success {
            self.sent += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn merge(&mut self, other: DispatchOutcome) {
        self.sent += other.sent;
        self.failed += other.failed;
    }

    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn window_selects_next_day_events() {
        let now = 1_700_000_000_000;
        let window = ReminderWindow::for_pass_at(now);

        assert!(window.contains(now + 23 * HOUR_MILLIS + HOUR_MILLIS / 2));
        assert!(window.contains(now + 23 * HOUR_MILLIS));
        assert!(!window.contains(now + 24 * HOUR_MILLIS));
        assert!(!window.contains(now + 22 * HOUR_MILLIS));
        assert!(!window.contains(now + 25 * HOUR_MILLIS));
    }

    #[test]
    fn outcome_counts_results() {
        let mut outcome = DispatchOutcome::default();
        outcome.record(true);
        outcome.record(false);
        outcome.record(true);
        assert_eq!(outcome, DispatchOutcome { sent: 2, failed: 1 });

        outcome.merge(DispatchOutcome { sent: 1, failed: 1 });
        assert_eq!(outcome.attempted(), 5);
    }
}
