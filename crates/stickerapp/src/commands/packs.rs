use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::{FileBackend, MetadataBackend};
use crate::store::sticker_store::StickerStore;

pub fn list<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &StickerStore<M, F, C>,
) -> Result<CmdResult> {
    let packs = store.get_packs()?;
    let mut result = CmdResult::default();
    if packs.is_empty() {
        result.add_message(CmdMessage::info("No packs yet."));
    }
    Ok(result.with_packs(packs))
}

/// A pack together with its resolved stickers.
pub fn show<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &StickerStore<M, F, C>,
    pack_id: &str,
) -> Result<CmdResult> {
    let pack = store.get_pack(pack_id)?;
    let stickers = store.get_pack_stickers(pack_id)?;
    Ok(CmdResult::default()
        .with_packs(vec![pack])
        .with_stickers(stickers))
}

pub fn create<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
    name: &str,
) -> Result<CmdResult> {
    let pack = store.create_manual_pack(name)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Created pack \"{}\"", pack.name)));
    Ok(result.with_packs(vec![pack]))
}

/// Delete a pack. Its stickers stay, unassigned.
pub fn delete<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
    pack_id: &str,
) -> Result<CmdResult> {
    let pack = store.get_pack(pack_id)?;
    let kept = pack.sticker_ids.len();
    store.delete_pack(pack_id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted pack \"{}\"", pack.name)));
    if kept > 0 {
        result.add_message(CmdMessage::info(format!(
            "{} sticker(s) kept without a pack.",
            kept
        )));
    }
    Ok(result.with_packs(vec![pack]))
}

pub fn today<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
) -> Result<CmdResult> {
    let pack = store.get_or_create_today_pack()?;
    let stickers = store.get_pack_stickers(&pack.id)?;
    Ok(CmdResult::default()
        .with_packs(vec![pack])
        .with_stickers(stickers))
}
