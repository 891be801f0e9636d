use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::{FileBackend, MetadataBackend};
use crate::store::sticker_store::StickerStore;

/// All stickers, newest first.
pub fn list<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &StickerStore<M, F, C>,
) -> Result<CmdResult> {
    let stickers = store.get_stickers()?;
    let mut result = CmdResult::default();
    if stickers.is_empty() {
        result.add_message(CmdMessage::info("No stickers yet."));
    }
    Ok(result.with_stickers(stickers))
}

pub fn show<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &StickerStore<M, F, C>,
    sticker_id: &str,
) -> Result<CmdResult> {
    let sticker = store.get_sticker(sticker_id)?;
    let packs = match &sticker.pack_id {
        Some(pack_id) => store.get_pack(pack_id).map(|p| vec![p]).unwrap_or_default(),
        None => Vec::new(),
    };
    Ok(CmdResult::default()
        .with_stickers(vec![sticker])
        .with_packs(packs))
}

/// Put a sticker into a pack, taking it out of any pack it was in.
pub fn add_to_pack<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
    sticker_id: &str,
    pack_id: &str,
) -> Result<CmdResult> {
    store.add_sticker_to_pack(sticker_id, pack_id)?;
    let sticker = store.get_sticker(sticker_id)?;
    let pack = store.get_pack(pack_id)?;

    let mut result = CmdResult::default()
        .with_stickers(vec![sticker])
        .with_packs(vec![pack.clone()]);
    result.add_message(CmdMessage::success(format!(
        "Sticker {} is in \"{}\"",
        sticker_id, pack.name
    )));
    Ok(result)
}

pub fn delete<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
    sticker_id: &str,
) -> Result<CmdResult> {
    let sticker = store.get_sticker(sticker_id)?;
    store.delete_sticker(sticker_id)?;

    let mut result = CmdResult::default().with_stickers(vec![sticker]);
    result.add_message(CmdMessage::success(format!("Deleted sticker {}", sticker_id)));
    Ok(result)
}
