use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::{FileBackend, MetadataBackend};
use crate::store::sticker_store::StickerStore;
use std::fs;
use std::path::Path;

/// Copy a sticker's image out of the store.
///
/// When `dest` is an existing directory the file keeps its stored name
/// inside it; otherwise `dest` is the target file path.
pub fn run<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &StickerStore<M, F, C>,
    sticker_id: &str,
    dest: &Path,
) -> Result<CmdResult> {
    let sticker = store.get_sticker(sticker_id)?;
    let bytes = store.read_sticker_image(sticker_id)?;

    let target = if dest.is_dir() {
        let name = sticker
            .uri
            .rsplit(['/', '\\'])
            .next()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| store.image_file_name(sticker_id));
        dest.join(name)
    } else {
        dest.to_path_buf()
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &bytes)?;

    let mut result = CmdResult::default()
        .with_stickers(vec![sticker])
        .with_paths(vec![target.clone()]);
    result.add_message(CmdMessage::success(format!(
        "Exported to {}",
        target.display()
    )));
    Ok(result)
}
