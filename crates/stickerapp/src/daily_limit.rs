//! # Daily Generation Limit
//!
//! A per-day counter of sticker generations, persisted under the
//! `daily_limit` record.
//!
//! ## States
//!
//! ```text
//! Fresh   -- no record stored yet
//! Current -- record's reset date is today
//! Stale   -- record's reset date is an earlier (or later) day
//! ```
//!
//! Fresh and Stale both collapse into `Current { count: 0, date: today }` on
//! the next mutating access ([`DailyLimiter::load`], [`DailyLimiter::consume`],
//! [`DailyLimiter::add_credits`]). Read-only checks ([`DailyLimiter::can_use`],
//! [`DailyLimiter::status`]) evaluate a Fresh or Stale record as an unused
//! day without writing anything.
//!
//! "Today" is the local calendar day from the [`Clock`], so the counter
//! resets at local midnight.
//!
//! ## Credits
//!
//! Watching a rewarded ad grants credits. A credit does not raise the limit;
//! it lowers the consumed count, floored at zero. Since the count never goes
//! negative, `remaining` can never exceed `limit`.

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::model::{DailyLimitRecord, StoredDailyLimit};
use crate::store::backend::MetadataBackend;
use crate::store::records::{load_record, save_record, DAILY_LIMIT_KEY};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

pub const DEFAULT_DAILY_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitState {
    Fresh,
    Current,
    Stale,
}

/// Snapshot of the counter for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyLimitStatus {
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
    pub reset_date: NaiveDate,
}

pub struct DailyLimiter<M: MetadataBackend, C: Clock = SystemClock> {
    meta: M,
    clock: C,
    limit: u32,
}

impl<M: MetadataBackend> DailyLimiter<M, SystemClock> {
    pub fn new(meta: M) -> Self {
        Self::with_clock(meta, SystemClock)
    }
}

impl<M: MetadataBackend, C: Clock> DailyLimiter<M, C> {
    pub fn with_clock(meta: M, clock: C) -> Self {
        Self {
            meta,
            clock,
            limit: DEFAULT_DAILY_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn stored(&self) -> Result<Option<DailyLimitRecord>> {
        let stored: Option<StoredDailyLimit> = load_record(&self.meta, DAILY_LIMIT_KEY)?;
        Ok(stored.map(|record| record.on_calendar(&self.clock)))
    }

    fn save(&self, record: &DailyLimitRecord) -> Result<()> {
        save_record(&self.meta, DAILY_LIMIT_KEY, record)
    }

    pub fn state(&self) -> Result<LimitState> {
        let today = self.clock.today();
        Ok(match self.stored()? {
            None => LimitState::Fresh,
            Some(record) if record.is_current(today) => LimitState::Current,
            Some(_) => LimitState::Stale,
        })
    }

    /// Today's record as it would be after a reset, without persisting it.
    fn effective(&self) -> Result<DailyLimitRecord> {
        let today = self.clock.today();
        Ok(match self.stored()? {
            Some(record) if record.is_current(today) => record,
            _ => DailyLimitRecord::fresh(today),
        })
    }

    /// Today's record, persisting the reset if the stored one was missing or stale.
    fn current(&self) -> Result<DailyLimitRecord> {
        let today = self.clock.today();
        match self.stored()? {
            Some(record) if record.is_current(today) => Ok(record),
            previous => {
                let record = DailyLimitRecord::fresh(today);
                self.save(&record)?;
                match previous {
                    Some(old) => info!(
                        previous_date = %old.last_reset_date,
                        previous_count = old.generations_count,
                        "daily limit reset"
                    ),
                    None => debug!("daily limit initialized"),
                }
                Ok(record)
            }
        }
    }

    fn status_of(&self, record: &DailyLimitRecord) -> DailyLimitStatus {
        DailyLimitStatus {
            limit: self.limit,
            used: record.generations_count,
            remaining: self.limit.saturating_sub(record.generations_count),
            reset_date: record.last_reset_date,
        }
    }

    /// Bring the stored record up to date and report it.
    pub fn load(&self) -> Result<DailyLimitStatus> {
        let record = self.current()?;
        Ok(self.status_of(&record))
    }

    /// Report the counter without writing.
    pub fn status(&self) -> Result<DailyLimitStatus> {
        let record = self.effective()?;
        Ok(self.status_of(&record))
    }

    pub fn remaining(&self) -> Result<u32> {
        Ok(self.status()?.remaining)
    }

    pub fn can_use(&self) -> Result<bool> {
        Ok(self.remaining()? > 0)
    }

    /// Spend one generation. Returns false, changing nothing, when none remain.
    pub fn consume(&mut self) -> Result<bool> {
        let mut record = self.current()?;
        if self.limit.saturating_sub(record.generations_count) == 0 {
            debug!(limit = self.limit, "daily limit reached");
            return Ok(false);
        }
        record.generations_count += 1;
        self.save(&record)?;
        debug!(used = record.generations_count, limit = self.limit, "generation consumed");
        Ok(true)
    }

    /// Give back `amount` generations, never taking the count below zero.
    pub fn add_credits(&mut self, amount: u32) -> Result<bool> {
        let mut record = self.current()?;
        record.generations_count = record.generations_count.saturating_sub(amount);
        self.save(&record)?;
        info!(amount, used = record.generations_count, "credits added");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::mem_backend::MemBackend;
    use chrono::{Duration, TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap())
    }

    fn stored(backend: &MemBackend) -> DailyLimitRecord {
        load_record(backend, DAILY_LIMIT_KEY).unwrap().unwrap()
    }

    #[test]
    fn test_fresh_counter_allows_full_limit() {
        let backend = MemBackend::new();
        let limiter = DailyLimiter::with_clock(&backend, clock());

        assert_eq!(limiter.state().unwrap(), LimitState::Fresh);
        assert!(limiter.can_use().unwrap());
        assert_eq!(limiter.remaining().unwrap(), 5);
        // Pure reads do not create the record
        assert_eq!(limiter.state().unwrap(), LimitState::Fresh);
    }

    #[test]
    fn test_load_initializes_record() {
        let backend = MemBackend::new();
        let clock = clock();
        let limiter = DailyLimiter::with_clock(&backend, &clock);

        let status = limiter.load().unwrap();
        assert_eq!(status.remaining, 5);
        assert_eq!(limiter.state().unwrap(), LimitState::Current);
        assert_eq!(stored(&backend), DailyLimitRecord::fresh(clock.today()));
    }

    #[test]
    fn test_consume_until_exhausted() {
        let backend = MemBackend::new();
        let mut limiter = DailyLimiter::with_clock(&backend, clock());

        for _ in 0..5 {
            assert!(limiter.consume().unwrap());
        }
        assert!(!limiter.can_use().unwrap());

        assert!(!limiter.consume().unwrap());
        assert_eq!(stored(&backend).generations_count, 5);
    }

    #[test]
    fn test_credits_restore_quota() {
        let backend = MemBackend::new();
        let mut limiter = DailyLimiter::with_clock(&backend, clock());

        for _ in 0..5 {
            limiter.consume().unwrap();
        }
        assert!(limiter.add_credits(2).unwrap());

        assert!(limiter.can_use().unwrap());
        assert_eq!(limiter.remaining().unwrap(), 2);
    }

    #[test]
    fn test_credits_never_exceed_limit() {
        let backend = MemBackend::new();
        let mut limiter = DailyLimiter::with_clock(&backend, clock());

        limiter.consume().unwrap();
        limiter.add_credits(10).unwrap();

        assert_eq!(stored(&backend).generations_count, 0);
        assert_eq!(limiter.remaining().unwrap(), 5);
    }

    #[test]
    fn test_stale_record_behaves_as_unused_day() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);

        for _ in 0..5 {
            limiter.consume().unwrap();
        }
        clock.advance(Duration::days(1));

        assert_eq!(limiter.state().unwrap(), LimitState::Stale);
        assert!(limiter.can_use().unwrap());
        assert_eq!(limiter.remaining().unwrap(), 5);

        assert!(limiter.consume().unwrap());
        let record = stored(&backend);
        assert_eq!(record.generations_count, 1);
        assert_eq!(record.last_reset_date, clock.today());
    }

    #[test]
    fn test_reset_follows_calendar_day_not_24_hours() {
        let backend = MemBackend::new();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 23, 50, 0).unwrap());
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);

        for _ in 0..5 {
            limiter.consume().unwrap();
        }
        // Twenty minutes later it is a new day
        clock.advance(Duration::minutes(20));
        assert!(limiter.can_use().unwrap());
    }

    #[test]
    fn test_credits_on_stale_record_reset_first() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);

        for _ in 0..4 {
            limiter.consume().unwrap();
        }
        clock.advance(Duration::days(2));
        limiter.add_credits(2).unwrap();

        let record = stored(&backend);
        assert_eq!(record.generations_count, 0);
        assert_eq!(record.last_reset_date, clock.today());
    }

    #[test]
    fn test_legacy_timestamp_record_is_read() {
        let backend = MemBackend::new();
        backend
            .set(
                DAILY_LIMIT_KEY,
                r#"{"generationsCount":3,"lastResetDate":"2024-03-09T12:00:00.000Z"}"#,
            )
            .unwrap();
        let limiter = DailyLimiter::with_clock(&backend, clock());
        assert_eq!(limiter.remaining().unwrap(), 2);
    }

    #[test]
    fn test_legacy_timestamp_is_read_on_the_local_day() {
        let backend = MemBackend::new();
        backend
            .set(
                DAILY_LIMIT_KEY,
                r#"{"generationsCount":4,"lastResetDate":"2024-03-09T23:30:00.000Z"}"#,
            )
            .unwrap();

        // Already the 10th at UTC+2, so the stored count still applies
        let east = FixedClock::with_offset(
            Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap(),
            chrono::FixedOffset::east_opt(2 * 3600).unwrap(),
        );
        let limiter = DailyLimiter::with_clock(&backend, &east);
        assert_eq!(limiter.state().unwrap(), LimitState::Current);
        assert_eq!(limiter.remaining().unwrap(), 1);

        // Still the 9th in UTC, which is a stale day on the 10th
        let utc = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap());
        let limiter = DailyLimiter::with_clock(&backend, &utc);
        assert_eq!(limiter.state().unwrap(), LimitState::Stale);
        assert_eq!(limiter.remaining().unwrap(), 5);
    }

    #[test]
    fn test_custom_limit() {
        let backend = MemBackend::new();
        let mut limiter = DailyLimiter::with_clock(&backend, clock()).with_limit(1);

        assert!(limiter.consume().unwrap());
        assert!(!limiter.consume().unwrap());
        assert_eq!(limiter.status().unwrap().used, 1);
    }

    #[test]
    fn test_lowered_limit_does_not_underflow() {
        let backend = MemBackend::new();
        let mut limiter = DailyLimiter::with_clock(&backend, clock());
        for _ in 0..4 {
            limiter.consume().unwrap();
        }

        let limiter = DailyLimiter::with_clock(&backend, clock()).with_limit(2);
        assert_eq!(limiter.remaining().unwrap(), 0);
        assert!(!limiter.can_use().unwrap());
    }

    #[test]
    fn test_write_failure_propagates() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let mut limiter = DailyLimiter::with_clock(&backend, clock());
        assert!(limiter.consume().is_err());
        assert!(limiter.add_credits(1).is_err());
    }
}
