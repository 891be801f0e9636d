//! # Domain Model
//!
//! The three persisted shapes: [`Sticker`], [`StickerPack`] and
//! [`DailyLimitRecord`].
//!
//! ## Stickers and Packs
//!
//! A sticker is one generated image. Its bytes live in the file store; the
//! metadata record only carries the `uri` of that file. A pack is a named,
//! ordered list of sticker ids. The two sides reference each other:
//!
//! ```text
//! Sticker { id: "a", pack_id: Some("p") }  <-->  StickerPack { id: "p", sticker_ids: ["a", ..] }
//! ```
//!
//! Nothing enforces this at the storage level. The sticker store keeps both
//! sides in step on every mutation, and `doctor` repairs drift.
//!
//! ## Daily Packs
//!
//! The first generation of a local calendar day lands in a pack named
//! `Pack YYYY-MM-DD` (see [`daily_pack_name`]).
//!
//! ## Wire Names
//!
//! All records serialize in camelCase (`packId`, `stickerIds`,
//! `generationsCount`, ...) so existing data files stay readable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::id::generate_id;

pub const DAILY_PACK_PREFIX: &str = "Pack ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    pub id: String,
    /// Location of the image bytes in the file store
    pub uri: String,
    #[serde(default)]
    pub pack_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerPack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sticker_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl StickerPack {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            sticker_ids: Vec::new(),
            created_at,
            publisher: None,
            website: None,
        }
    }

    pub fn with_export_metadata(mut self, publisher: Option<String>, website: Option<String>) -> Self {
        self.publisher = publisher;
        self.website = website;
        self
    }

    pub fn contains(&self, sticker_id: &str) -> bool {
        self.sticker_ids.iter().any(|id| id == sticker_id)
    }

    /// Append a sticker id, keeping the list free of duplicates.
    /// Returns true if the list changed.
    pub fn push_sticker(&mut self, sticker_id: &str) -> bool {
        if self.contains(sticker_id) {
            return false;
        }
        self.sticker_ids.push(sticker_id.to_string());
        true
    }

    /// Returns true if the id was present.
    pub fn remove_sticker(&mut self, sticker_id: &str) -> bool {
        let before = self.sticker_ids.len();
        self.sticker_ids.retain(|id| id != sticker_id);
        before != self.sticker_ids.len()
    }
}

/// Name of the auto-created pack for a given local day.
pub fn daily_pack_name(day: NaiveDate) -> String {
    format!("{}{}", DAILY_PACK_PREFIX, day.format("%Y-%m-%d"))
}

/// Generation counter for a single local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLimitRecord {
    pub generations_count: u32,
    pub last_reset_date: NaiveDate,
}

impl DailyLimitRecord {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            generations_count: 0,
            last_reset_date: today,
        }
    }

    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.last_reset_date == today
    }
}

/// The `daily_limit` record as read back from storage.
///
/// Older versions stored a full instant (`2024-03-09T18:22:01.512Z`) as the
/// reset date. Which calendar day that is depends on the reading clock's
/// timezone, so it is only resolved in [`StoredDailyLimit::on_calendar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDailyLimit {
    pub generations_count: u32,
    pub last_reset_date: ResetDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResetDate {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl StoredDailyLimit {
    pub fn on_calendar<C: Clock + ?Sized>(self, clock: &C) -> DailyLimitRecord {
        let last_reset_date = match self.last_reset_date {
            ResetDate::Day(day) => day,
            ResetDate::Instant(instant) => clock.local_date(&instant),
        };
        DailyLimitRecord {
            generations_count: self.generations_count,
            last_reset_date,
        }
    }
}
