//! # Storage Layer
//!
//! Stickers are stored in two places that are written independently:
//!
//! 1. **Metadata**: serialized records in a key/value store
//!    ([`backend::MetadataBackend`]).
//! 2. **Images**: one binary file per sticker ([`backend::FileBackend`]).
//!
//! [`sticker_store::StickerStore`] composes the two and owns the
//! sticker/pack relationship.
//!
//! ## Records
//!
//! | Key | Payload |
//! |-----|---------|
//! | `packs` | JSON array of packs, newest first |
//! | `stickers` | JSON object, sticker id → sticker |
//! | `daily_limit` | `{generationsCount, lastResetDate}` |
//!
//! Each payload is wrapped in a versioned envelope, see [`records`].
//!
//! ## Failure Model
//!
//! Every operation is a single attempt. Errors from either backend are
//! returned as-is; nothing is retried and partial writes are not rolled back.
//! When a sticker is saved the image is written before the metadata, so a
//! failed metadata write leaves an unreferenced file rather than a record
//! pointing at nothing.
//!
//! ## Concurrency
//!
//! None. Each operation reads a whole record, modifies it and writes it
//! back. Two overlapping callers can lose an update or both create a daily
//! pack. The store is meant for a single local user.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: Production backend, files under one data directory.
//! - [`mem_backend::MemBackend`]: For testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── packs.json
//! ├── stickers.json
//! ├── daily_limit.json
//! └── stickers/
//!     └── sticker_{id}.webp
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod records;
pub mod sticker_store;

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DoctorReport {
    /// Sticker records dropped because their image file was gone
    pub missing_files: usize,
    /// Pack entries dropped because they named no sticker, or repeated one
    pub dangling_ids: usize,
    /// Stickers whose pack no longer existed
    pub cleared_pack_refs: usize,
    /// Stickers appended to the pack they claimed to belong to
    pub relinked: usize,
}
