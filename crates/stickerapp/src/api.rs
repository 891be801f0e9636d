//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every UI (the CLI today).
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the store, the daily limiter, the generation client and both ad sessions
//! - **Dispatches** each call to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It holds no business logic and does no I/O of its own.
//!
//! ## Generic Over Backends
//!
//! `StickerApi<B, G, P, C>` is generic over the storage backend `B` (used for
//! both metadata and files), the generation client `G`, the ad provider `P`
//! and the clock `C`:
//! - Production: `StickerApi<FsBackend, ApiClient, NoAds>`
//! - Testing: `StickerApi<&MemBackend, FakeApi, ScriptedAds, &FixedClock>`

use crate::ads::{AdProvider, AdSession};
use crate::client::GenerationApi;
use crate::clock::{Clock, SystemClock};
use crate::commands;
use crate::daily_limit::DailyLimiter;
use crate::error::Result;
use crate::store::backend::{FileBackend, MetadataBackend};
use crate::store::sticker_store::StickerStore;
use std::path::{Path, PathBuf};

/// Generations given back for a watched rewarded ad unless configured otherwise.
pub const DEFAULT_REWARD_CREDITS: u32 = 2;

pub struct StickerApi<B, G, P, C = SystemClock>
where
    B: MetadataBackend + FileBackend,
    G: GenerationApi,
    P: AdProvider,
    C: Clock,
{
    store: StickerStore<B, B, C>,
    limiter: DailyLimiter<B, C>,
    generator: G,
    interstitial: AdSession<P>,
    rewarded: AdSession<P>,
    reward_credits: u32,
}

impl<B, G, P, C> StickerApi<B, G, P, C>
where
    B: MetadataBackend + FileBackend,
    G: GenerationApi,
    P: AdProvider,
    C: Clock,
{
    pub fn new(
        store: StickerStore<B, B, C>,
        limiter: DailyLimiter<B, C>,
        generator: G,
        interstitial: AdSession<P>,
        rewarded: AdSession<P>,
    ) -> Self {
        Self {
            store,
            limiter,
            generator,
            interstitial,
            rewarded,
            reward_credits: DEFAULT_REWARD_CREDITS,
        }
    }

    pub fn with_reward_credits(mut self, credits: u32) -> Self {
        self.reward_credits = credits;
        self
    }

    pub fn store(&self) -> &StickerStore<B, B, C> {
        &self.store
    }

    pub fn limiter(&self) -> &DailyLimiter<B, C> {
        &self.limiter
    }

    pub fn reward_credits(&self) -> u32 {
        self.reward_credits
    }

    // --- Generation ---

    pub fn generate(&mut self, prompt: &str, image_path: &Path) -> Result<CmdResult> {
        commands::generate::run(
            &mut self.store,
            &mut self.limiter,
            &self.generator,
            &mut self.interstitial,
            prompt,
            image_path,
        )
    }

    pub fn suggest(&self, context: Option<&str>) -> Result<CmdResult> {
        commands::suggest::run(&self.generator, context)
    }

    pub fn reward(&mut self) -> Result<CmdResult> {
        commands::reward::run(&mut self.limiter, &mut self.rewarded, self.reward_credits)
    }

    pub fn limit(&self) -> Result<CmdResult> {
        commands::limit::run(&self.limiter)
    }

    // --- Stickers ---

    pub fn list_stickers(&self) -> Result<CmdResult> {
        commands::stickers::list(&self.store)
    }

    pub fn show_sticker(&self, sticker_id: &str) -> Result<CmdResult> {
        commands::stickers::show(&self.store, sticker_id)
    }

    pub fn add_to_pack(&mut self, sticker_id: &str, pack_id: &str) -> Result<CmdResult> {
        commands::stickers::add_to_pack(&mut self.store, sticker_id, pack_id)
    }

    pub fn delete_sticker(&mut self, sticker_id: &str) -> Result<CmdResult> {
        commands::stickers::delete(&mut self.store, sticker_id)
    }

    pub fn import(&mut self, paths: Vec<PathBuf>, pack_id: Option<&str>) -> Result<CmdResult> {
        commands::import::run(&mut self.store, paths, pack_id)
    }

    pub fn export(&self, sticker_id: &str, dest: &Path) -> Result<CmdResult> {
        commands::export::run(&self.store, sticker_id, dest)
    }

    // --- Packs ---

    pub fn list_packs(&self) -> Result<CmdResult> {
        commands::packs::list(&self.store)
    }

    pub fn show_pack(&self, pack_id: &str) -> Result<CmdResult> {
        commands::packs::show(&self.store, pack_id)
    }

    pub fn create_pack(&mut self, name: &str) -> Result<CmdResult> {
        commands::packs::create(&mut self.store, name)
    }

    pub fn delete_pack(&mut self, pack_id: &str) -> Result<CmdResult> {
        commands::packs::delete(&mut self.store, pack_id)
    }

    pub fn today_pack(&mut self) -> Result<CmdResult> {
        commands::packs::today(&mut self.store)
    }

    pub fn doctor(&mut self) -> Result<CmdResult> {
        commands::doctor::run(&mut self.store)
    }
}

pub use commands::{CmdMessage, CmdResult, MessageLevel};
