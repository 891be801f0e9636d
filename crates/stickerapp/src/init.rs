//! # Context Setup
//!
//! [`initialize`] wires everything a UI needs into one [`AppContext`]:
//! configuration, the filesystem store, the daily limiter, the generation
//! client and the two ad sessions. Nothing is global; the context is built
//! once per run and dropped (or passed to [`AppContext::teardown`]) at the end.
//!
//! ## Path Resolution
//!
//! Data directory:
//! 1. `InitOptions::data_dir` if given (the CLI fills it from `--data-dir` or
//!    `STICKER_DATA_DIR`).
//! 2. Otherwise the OS data directory from `directories::ProjectDirs`.
//!
//! Config file:
//! 1. `InitOptions::config_file` if given.
//! 2. `sticker.toml` inside an explicitly given data directory.
//! 3. Otherwise `sticker.toml` in the OS config directory.
//!
//! A missing config file is not an error; compiled defaults and `STICKER_*`
//! environment variables still apply.

use crate::ads::{AdKind, AdSession, AdTimeouts, NoAds};
use crate::api::StickerApi;
use crate::client::ApiClient;
use crate::config::{StickerConfig, CONFIG_FILE_NAME};
use crate::daily_limit::DailyLimiter;
use crate::error::{Result, StickerError};
use crate::store::fs_backend::FsBackend;
use crate::store::sticker_store::StickerStore;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub data_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
}

pub type AppApi = StickerApi<FsBackend, ApiClient, NoAds>;

pub struct AppContext {
    pub api: AppApi,
    pub config: StickerConfig,
    pub paths: AppPaths,
}

impl AppContext {
    /// End the session. Everything is persisted as it happens, so this only
    /// releases resources.
    pub fn teardown(self) {
        debug!(data_dir = %self.paths.data_dir.display(), "context torn down");
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "misticker", "sticker")
        .ok_or_else(|| StickerError::Config("could not determine the home directory".to_string()))
}

pub fn resolve_paths(options: &InitOptions) -> Result<AppPaths> {
    let (data_dir, config_file) = match &options.data_dir {
        Some(dir) => (dir.clone(), dir.join(CONFIG_FILE_NAME)),
        None => {
            let dirs = project_dirs()?;
            (
                dirs.data_dir().to_path_buf(),
                dirs.config_dir().join(CONFIG_FILE_NAME),
            )
        }
    };
    Ok(AppPaths {
        data_dir,
        config_file: options.config_file.clone().unwrap_or(config_file),
    })
}

pub fn initialize(options: InitOptions) -> Result<AppContext> {
    let paths = resolve_paths(&options)?;
    let config = StickerConfig::load(Some(&paths.config_file))?;
    fs::create_dir_all(&paths.data_dir)?;

    let backend = FsBackend::new(paths.data_dir.clone());
    let store = StickerStore::new(backend.clone(), backend.clone())
        .with_options(config.store_options());
    let limiter = DailyLimiter::new(backend).with_limit(config.daily_limit);
    let client = ApiClient::from_config(&config)?;

    let timeouts = AdTimeouts {
        load: config.ad_load_timeout(),
        show: config.ad_show_timeout(),
    };
    let interstitial = AdSession::new(NoAds, AdKind::Interstitial).with_timeouts(timeouts);
    let rewarded = AdSession::new(NoAds, AdKind::Rewarded).with_timeouts(timeouts);

    let api = StickerApi::new(store, limiter, client, interstitial, rewarded)
        .with_reward_credits(config.reward_credits);

    debug!(
        data_dir = %paths.data_dir.display(),
        config_file = %paths.config_file.display(),
        api_url = %config.api_url(),
        "context initialized"
    );
    Ok(AppContext { api, config, paths })
}
