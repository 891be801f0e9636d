//! # Command Layer
//!
//! One submodule per user-facing operation. Commands take the pieces they
//! need (store, limiter, client, ad session) as arguments and return a
//! [`CmdResult`]; they never print and never exit.
//!
//! ## Structured Returns
//!
//! [`CmdResult`] carries whatever the operation produced:
//! - `stickers` / `packs`: records to display (affected or listed)
//! - `limit`: the daily counter after the operation
//! - `text`: generated text (for `suggest`)
//! - `report`: doctor findings
//! - `ad`: what happened when an ad was shown
//! - `paths`: files written (for `export`)
//! - `messages`: leveled messages for the UI to render
//!
//! ## Testing Strategy
//!
//! Command tests use `MemBackend`, `FixedClock`, a canned
//! [`GenerationApi`](crate::client::GenerationApi) and a scripted ad
//! provider, so no test here touches the network or the disk.
//!
//! ## Command Modules
//!
//! - [`generate`]: The full create flow: quota, backend, today's pack, save, interstitial
//! - [`reward`]: Rewarded ad for extra generations
//! - [`suggest`]: Text suggestion passthrough
//! - [`stickers`]: List, show, move and delete stickers
//! - [`packs`]: List, show, create and delete packs, today's pack
//! - [`import`]: Save local image files as stickers
//! - [`export`]: Copy a sticker image out of the store
//! - [`limit`]: Daily counter status
//! - [`doctor`]: Verify and fix sticker/pack references

use crate::ads::AdOutcome;
use crate::daily_limit::DailyLimitStatus;
use crate::model::{Sticker, StickerPack};
use crate::store::DoctorReport;
use serde::Serialize;
use std::path::PathBuf;

pub mod doctor;
pub mod export;
pub mod generate;
pub mod import;
pub mod limit;
pub mod packs;
pub mod reward;
pub mod stickers;
pub mod suggest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stickers: Vec<Sticker>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packs: Vec<StickerPack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<DailyLimitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DoctorReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad: Option<AdOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_stickers(mut self, stickers: Vec<Sticker>) -> Self {
        self.stickers = stickers;
        self
    }

    pub fn with_packs(mut self, packs: Vec<StickerPack>) -> Self {
        self.packs = packs;
        self
    }

    pub fn with_limit(mut self, limit: DailyLimitStatus) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }
}
