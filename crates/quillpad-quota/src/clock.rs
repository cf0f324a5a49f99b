//! Calendar-day resolution
//!
//! Usage windows are UTC calendar days. A [`DayWindow`] is resolved once per
//! request and then passed through, so the check and the balance shown for
//! the same request never straddle midnight.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Mutex;

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current time in UTC
    fn now(&self) -> DateTime<Utc>;

    /// Resolve the usage window containing `now()`
    fn window(&self) -> DayWindow {
        DayWindow::containing(self.now())
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `now`
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Create a clock frozen at midday UTC of `day`
    #[must_use]
    pub fn at_day(day: NaiveDate) -> Self {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::new(day.and_time(noon).and_utc())
    }

    /// Move the clock to `now`
    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    /// Move the clock forward by `delta`
    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One UTC calendar day of usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// The calendar day counted against
    pub day: NaiveDate,
    /// First instant of the following day
    pub resets_at: DateTime<Utc>,
}

impl DayWindow {
    /// Window for the UTC day containing `instant`
    #[must_use]
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self::for_day(instant.date_naive())
    }

    /// Window for an explicit day
    #[must_use]
    pub fn for_day(day: NaiveDate) -> Self {
        let next = day.succ_opt().unwrap_or(NaiveDate::MAX);
        Self {
            day,
            resets_at: next.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Seconds from `now` until the window resets (never negative)
    #[must_use]
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> u64 {
        (self.resets_at - now).num_seconds().max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_resets_at_next_utc_midnight() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 23, 59, 30).unwrap();
        let window = DayWindow::containing(instant);

        assert_eq!(window.day, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(
            window.resets_at,
            Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(window.seconds_until_reset(instant), 30);
    }

    #[test]
    fn test_window_handles_month_and_leap_boundaries() {
        let feb = DayWindow::for_day(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(
            feb.resets_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );

        let dec = DayWindow::for_day(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(
            dec.resets_at,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_fixed_clock_advance_crosses_day() {
        let clock = FixedClock::at_day(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(clock.window().day, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

        clock.advance(chrono::Duration::hours(12));
        assert_eq!(clock.window().day, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn test_seconds_until_reset_never_negative() {
        let window = DayWindow::for_day(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let later = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(window.seconds_until_reset(later), 0);
    }
}
