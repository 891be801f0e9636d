//! # Sticker App Architecture
//!
//! `stickerapp` is the **UI-agnostic core** of the sticker maker: it stores
//! AI-generated stickers and their packs, enforces the daily generation
//! limit, talks to the generation backend and drives ad sessions. The
//! `sticker` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/sticker)                                       │
//! │  - Parses arguments, renders CmdResult, owns exit codes     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs, init.rs)                                │
//! │  - StickerApi facade, AppContext wiring                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Generate flow, rewards, pack and sticker operations      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼────────────────────┐
//!          ▼                   ▼                    ▼
//! ┌────────────────┐  ┌─────────────────┐  ┌─────────────────┐
//! │ store/         │  │ daily_limit.rs  │  │ client.rs       │
//! │ StickerStore   │  │ DailyLimiter    │  │ ads.rs          │
//! └────────────────┘  └─────────────────┘  └─────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing
//! exits the process. Diagnostics go through `tracing`; the binary decides
//! where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade every UI calls
//! - [`init`]: Builds an [`init::AppContext`] from options and config
//! - [`commands`]: One module per user-facing operation
//! - [`store`]: Metadata and file backends, the sticker/pack repository
//! - [`daily_limit`]: Per-day generation counter with ad credits
//! - [`client`]: HTTP client for the generation backend
//! - [`ads`]: Ad session state machine and the provider seam
//! - [`model`]: `Sticker`, `StickerPack`, `DailyLimitRecord`
//! - [`config`]: Configuration via `confique`
//! - [`clock`]: Injectable time source
//! - [`id`]: Sticker and pack identifiers
//! - [`error`]: Error types

pub mod ads;
pub mod api;
pub mod client;
pub mod clock;
pub mod commands;
pub mod config;
pub mod daily_limit;
pub mod error;
pub mod id;
pub mod init;
pub mod model;
pub mod store;
