//! # Configuration
//!
//! Configuration is managed by [`confique`], layering environment variables
//! over a TOML file over compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `STICKER_API_URL`, `STICKER_DAILY_LIMIT`, etc.
//! 2. **Config file**: `sticker.toml` in the OS config directory (via `directories`),
//!    or an explicit path.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `api_url` | `http://localhost:8000` | Base URL of the generation backend |
//! | `request_timeout_secs` | `60` | Timeout for one backend request |
//! | `daily_limit` | `5` | Generations allowed per local day |
//! | `reward_credits` | `2` | Generations given back per rewarded ad |
//! | `image_ext` | `webp` | Extension for stored sticker images |
//! | `publisher` | `Mi Sticker AI` | Publisher written into new packs |
//! | `website` | (none) | Website written into new packs |
//! | `ad_load_timeout_secs` | `5` | How long to wait for an ad to load |
//! | `ad_show_timeout_secs` | `300` | How long to wait for a shown ad to close |

use crate::error::{Result, StickerError};
use crate::store::sticker_store::StoreOptions;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "sticker.toml";

/// Configuration for the sticker app, stored in `sticker.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StickerConfig {
    /// Base URL of the generation backend
    #[config(default = "http://localhost:8000", env = "STICKER_API_URL")]
    pub api_url: String,

    /// Timeout for one backend request, in seconds
    #[config(default = 60, env = "STICKER_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,

    /// Generations allowed per local calendar day
    #[config(default = 5, env = "STICKER_DAILY_LIMIT")]
    pub daily_limit: u32,

    /// Generations given back for watching a rewarded ad
    #[config(default = 2, env = "STICKER_REWARD_CREDITS")]
    pub reward_credits: u32,

    /// Extension of stored sticker images
    #[config(default = "webp", env = "STICKER_IMAGE_EXT")]
    pub image_ext: String,

    /// Publisher written into new packs
    #[config(default = "Mi Sticker AI", env = "STICKER_PUBLISHER")]
    pub publisher: String,

    /// Website written into new packs
    #[config(env = "STICKER_WEBSITE")]
    pub website: Option<String>,

    #[config(default = 5, env = "STICKER_AD_LOAD_TIMEOUT_SECS")]
    pub ad_load_timeout_secs: u64,

    #[config(default = 300, env = "STICKER_AD_SHOW_TIMEOUT_SECS")]
    pub ad_show_timeout_secs: u64,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 60,
            daily_limit: 5,
            reward_credits: 2,
            image_ext: "webp".to_string(),
            publisher: "Mi Sticker AI".to_string(),
            website: None,
            ad_load_timeout_secs: 5,
            ad_show_timeout_secs: 300,
        }
    }
}

impl StickerConfig {
    /// Load from the environment and, when it exists, the given TOML file.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| StickerError::Config(e.to_string()))
    }

    /// Base URL without a trailing slash.
    pub fn api_url(&self) -> String {
        self.api_url.trim_end_matches('/').to_string()
    }

    /// Image extension without a leading dot.
    pub fn image_ext(&self) -> String {
        self.image_ext.trim_start_matches('.').to_string()
    }

    pub fn website(&self) -> Option<String> {
        self.website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn ad_load_timeout(&self) -> Duration {
        Duration::from_secs(self.ad_load_timeout_secs)
    }

    pub fn ad_show_timeout(&self) -> Duration {
        Duration::from_secs(self.ad_show_timeout_secs)
    }

    pub fn store_options(&self) -> StoreOptions {
        let publisher = self.publisher.trim();
        StoreOptions {
            image_ext: self.image_ext(),
            publisher: (!publisher.is_empty()).then(|| publisher.to_string()),
            website: self.website(),
        }
    }
}
