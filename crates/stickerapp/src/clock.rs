//! Wall-clock access.
//!
//! Everything that cares about "today" (daily packs, the generation limit)
//! reads the date through [`Clock`], so tests can pin the calendar day.
//! Days are always *local* calendar days: the limit resets at the user's
//! midnight, not at UTC midnight or 24 hours after the last reset.

use chrono::{DateTime, Local, NaiveDate, Offset, TimeZone, Utc};

pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Local calendar day of the current instant.
    fn today(&self) -> NaiveDate;

    /// Local calendar day a stored instant falls on.
    fn local_date(&self, instant: &DateTime<Utc>) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn local_date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&Local).date_naive()
    }
}

/// A clock frozen at a given instant, in a fixed offset timezone.
///
/// Used by tests to simulate day rollovers without sleeping.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: std::cell::Cell<DateTime<Utc>>,
    offset: chrono::FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, Utc.fix())
    }

    pub fn with_offset(now: DateTime<Utc>, offset: chrono::FixedOffset) -> Self {
        Self {
            now: std::cell::Cell::new(now),
            offset,
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.local_date(&self.now.get())
    }

    fn local_date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        self.offset.from_utc_datetime(&instant.naive_utc()).date_naive()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn local_date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        (**self).local_date(instant)
    }
}
