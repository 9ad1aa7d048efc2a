//! Sync due policy

use crate::time::{Timestamp, SECS_PER_HOUR};

use super::state::SyncState;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Time-of-day window (UTC) in which syncs may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncWindow {
    pub hour: u8,
    pub minute: u8,
    /// Length of the window; may run past midnight
    pub span_minutes: u16,
}

impl SyncWindow {
    pub const fn new(hour: u8, minute: u8, span_minutes: u16) -> Self {
        Self {
            hour,
            minute,
            span_minutes,
        }
    }

    /// Whether `now` falls inside the window
    pub fn contains(&self, now: Timestamp) -> bool {
        let minute_of_day = (now.secs_of_day() / 60) as u16;
        let start = (u16::from(self.hour) * 60 + u16::from(self.minute)) % MINUTES_PER_DAY;
        let into_window = (minute_of_day + MINUTES_PER_DAY - start) % MINUTES_PER_DAY;
        into_window < self.span_minutes
    }
}

/// When to attempt a network sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncPolicy {
    /// Minimum seconds between successful syncs
    pub interval_secs: u64,
    /// Optional time-of-day restriction once the interval has elapsed
    pub window: Option<SyncWindow>,
}

impl SyncPolicy {
    /// A day, minus two seconds so a daily wake cannot miss by a hair
    pub const DAILY_INTERVAL_SECS: u64 = 24 * SECS_PER_HOUR - 2;

    /// Whether a sync attempt should run at `now`
    ///
    /// Always due when never synced or when the clock reads earlier than
    /// the last sync (the RTC lost its time).
    pub fn is_sync_due(&self, now: Timestamp, state: &SyncState) -> bool {
        let Some(last) = state.last_sync else {
            return true;
        };
        match now.secs_since(last) {
            None => true,
            Some(elapsed) if elapsed < self.interval_secs => false,
            Some(_) => self.window.map_or(true, |window| window.contains(now)),
        }
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            interval_secs: Self::DAILY_INTERVAL_SECS,
            window: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01 00:00:00 UTC
    const T0: u64 = 1_704_067_200;

    fn synced_at(secs: u64) -> SyncState {
        SyncState {
            last_sync: Some(Timestamp::from_secs(secs)),
            ..SyncState::default()
        }
    }

    #[test]
    fn test_never_synced_is_always_due() {
        let policy = SyncPolicy {
            window: Some(SyncWindow::new(3, 0, 10)),
            ..SyncPolicy::default()
        };
        let state = SyncState::default();
        assert!(policy.is_sync_due(Timestamp::from_secs(0), &state));
        assert!(policy.is_sync_due(Timestamp::from_secs(T0 + 12 * 3600), &state));
    }

    #[test]
    fn test_not_due_right_after_sync() {
        let policy = SyncPolicy::default();
        let now = Timestamp::from_secs(T0);
        assert!(!policy.is_sync_due(now, &synced_at(T0)));
    }

    #[test]
    fn test_due_once_interval_elapsed() {
        let policy = SyncPolicy::default();
        let state = synced_at(T0);
        let interval = SyncPolicy::DAILY_INTERVAL_SECS;
        assert_eq!(interval, 86_398);
        assert!(!policy.is_sync_due(Timestamp::from_secs(T0 + interval - 1), &state));
        assert!(policy.is_sync_due(Timestamp::from_secs(T0 + interval), &state));
        assert!(policy.is_sync_due(Timestamp::from_secs(T0 + 3 * interval), &state));
    }

    #[test]
    fn test_clock_regression_is_due() {
        let policy = SyncPolicy::default();
        assert!(policy.is_sync_due(Timestamp::from_secs(T0 - 1), &synced_at(T0)));
    }

    #[test]
    fn test_window_restricts_after_interval() {
        let policy = SyncPolicy {
            interval_secs: 3600,
            window: Some(SyncWindow::new(3, 30, 15)),
        };
        let state = synced_at(T0);
        // 02:00, interval elapsed but outside the window
        assert!(!policy.is_sync_due(Timestamp::from_secs(T0 + 2 * 3600), &state));
        // 03:30 and 03:44 inside, 03:45 outside
        assert!(policy.is_sync_due(Timestamp::from_secs(T0 + 3 * 3600 + 30 * 60), &state));
        assert!(policy.is_sync_due(Timestamp::from_secs(T0 + 3 * 3600 + 44 * 60), &state));
        assert!(!policy.is_sync_due(Timestamp::from_secs(T0 + 3 * 3600 + 45 * 60), &state));
    }

    #[test]
    fn test_window_wraps_past_midnight() {
        let window = SyncWindow::new(23, 50, 20);
        assert!(window.contains(Timestamp::from_secs(T0 - 5 * 60)));
        assert!(window.contains(Timestamp::from_secs(T0 + 9 * 60)));
        assert!(!window.contains(Timestamp::from_secs(T0 + 10 * 60)));
        assert!(!window.contains(Timestamp::from_secs(T0 - 11 * 60)));
    }
}
