// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time sources.
//!
//! Anything time-dependent (debounce windows, cache expiry, the
//! "current month" fallback) reads time through [`Clock`] so it can be
//! driven deterministically in tests.

use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use time::{Date, OffsetDateTime};

/// A source of monotonic instants and calendar dates.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current monotonic instant.
    fn now(&self) -> Instant;

    /// Returns today's calendar date.
    fn today(&self) -> Date;
}

/// The real clock. Dates are taken in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed_ms: AtomicU64,
    julian_day: AtomicI32,
}

impl ManualClock {
    /// Creates a manual clock whose calendar date is `today`.
    #[must_use]
    pub fn new(today: Date) -> Self {
        Self {
            origin: Instant::now(),
            elapsed_ms: AtomicU64::new(0),
            julian_day: AtomicI32::new(today.to_julian_day()),
        }
    }

    /// Advances the monotonic time by `by` (millisecond resolution).
    pub fn advance(&self, by: Duration) {
        let ms: u64 = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Sets the calendar date.
    pub fn set_today(&self, today: Date) {
        self.julian_day
            .store(today.to_julian_day(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }

    fn today(&self) -> Date {
        Date::from_julian_day(self.julian_day.load(Ordering::SeqCst)).unwrap_or(Date::MIN)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn test_manual_clock_advances_only_when_told() {
        let today: Date = Date::from_calendar_date(2026, Month::March, 15).unwrap();
        let clock: ManualClock = ManualClock::new(today);
        let start: Instant = clock.now();

        assert_eq!(clock.now(), start);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now().duration_since(start), Duration::from_millis(250));
    }

    #[test]
    fn test_manual_clock_date_can_be_changed() {
        let today: Date = Date::from_calendar_date(2026, Month::March, 15).unwrap();
        let later: Date = Date::from_calendar_date(2026, Month::April, 2).unwrap();
        let clock: ManualClock = ManualClock::new(today);

        assert_eq!(clock.today(), today);
        clock.set_today(later);
        assert_eq!(clock.today(), later);
    }
}
