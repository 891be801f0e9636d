use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::{FileBackend, MetadataBackend};
use crate::store::sticker_store::StickerStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Extensions picked up when importing a directory.
pub const IMAGE_EXTS: &[&str] = &["webp", "png", "jpg", "jpeg", "gif"];

/// Save local image files as stickers, optionally into a pack.
///
/// Directories are scanned one level deep for files with an image
/// extension. Files named directly are imported whatever their extension.
pub fn run<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
    paths: Vec<PathBuf>,
    pack_id: Option<&str>,
) -> Result<CmdResult> {
    if let Some(pack_id) = pack_id {
        store.get_pack(pack_id)?;
    }

    let mut result = CmdResult::default();
    let mut imported = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(&path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_image_ext(p))
                .collect();
            entries.sort();
            for file in entries {
                import_one(store, &file, pack_id, &mut result, &mut imported);
            }
        } else if path.is_file() {
            import_one(store, &path, pack_id, &mut result, &mut imported);
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Path not found: {}",
                path.display()
            )));
        }
    }

    result.add_message(CmdMessage::success(format!(
        "Total imported: {}",
        imported.len()
    )));
    Ok(result.with_stickers(imported))
}

fn import_one<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
    path: &Path,
    pack_id: Option<&str>,
    result: &mut CmdResult,
    imported: &mut Vec<crate::model::Sticker>,
) {
    match import_file(store, path, pack_id) {
        Ok(sticker) => {
            result.add_message(CmdMessage::info(format!("Imported: {}", path.display())));
            imported.push(sticker);
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "import failed");
            result.add_message(CmdMessage::warning(format!(
                "Failed to import {}: {}",
                path.display(),
                e
            )));
        }
    }
}

fn import_file<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
    path: &Path,
    pack_id: Option<&str>,
) -> Result<crate::model::Sticker> {
    let bytes = fs::read(path)?;
    store.save_sticker_bytes(&bytes, pack_id)
}

fn has_image_ext(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTS.contains(&ext.as_str()))
}
