use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::{FileBackend, MetadataBackend};
use crate::store::sticker_store::StickerStore;
use crate::store::DoctorReport;

pub fn run<M: MetadataBackend, F: FileBackend, C: Clock>(
    store: &mut StickerStore<M, F, C>,
) -> Result<CmdResult> {
    let report = store.doctor()?;
    let mut result = CmdResult::default();

    if report == DoctorReport::default() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        if report.missing_files > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} sticker(s) whose image was missing.",
                report.missing_files
            )));
        }
        if report.dangling_ids > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Dropped {} stale pack entries.",
                report.dangling_ids
            )));
        }
        if report.cleared_pack_refs > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Unassigned {} sticker(s) from deleted packs.",
                report.cleared_pack_refs
            )));
        }
        if report.relinked > 0 {
            result.add_message(CmdMessage::success(format!(
                "  - Relinked {} sticker(s) to their pack.",
                report.relinked
            )));
        }
    }

    result.report = Some(report);
    Ok(result)
}
