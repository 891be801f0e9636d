use super::backend::{validate_name, FileBackend, MetadataBackend};
use super::records::{load_record_or_default, save_record, PACKS_KEY, STICKERS_KEY};
use super::DoctorReport;
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StickerError};
use crate::id::generate_id;
use crate::model::{daily_pack_name, Sticker, StickerPack};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub type StickerMap = HashMap<String, Sticker>;

/// Per-store settings that end up in written records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Extension of sticker image files, without the dot
    pub image_ext: String,
    pub publisher: Option<String>,
    pub website: Option<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            image_ext: "webp".to_string(),
            publisher: None,
            website: None,
        }
    }
}

/// Sticker and pack repository.
///
/// Composes a [`MetadataBackend`] (the `packs` and `stickers` records) with a
/// [`FileBackend`] (one image file per sticker) and keeps the two sides of
/// the sticker/pack relationship consistent on every mutation.
///
/// Each operation is a single attempt: a failing backend call is returned to
/// the caller and nothing already written is rolled back. Calls are not
/// serialized either, so two overlapping `get_or_create_today_pack` calls can
/// both create a pack.
pub struct StickerStore<M: MetadataBackend, F: FileBackend, C: Clock = SystemClock> {
    pub(crate) meta: M,
    pub(crate) files: F,
    clock: C,
    options: StoreOptions,
}

impl<M: MetadataBackend, F: FileBackend> StickerStore<M, F, SystemClock> {
    pub fn new(meta: M, files: F) -> Self {
        Self::with_clock(meta, files, SystemClock)
    }
}

impl<M: MetadataBackend, F: FileBackend, C: Clock> StickerStore<M, F, C> {
    pub fn with_clock(meta: M, files: F, clock: C) -> Self {
        Self {
            meta,
            files,
            clock,
            options: StoreOptions::default(),
        }
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn file_backend(&self) -> &F {
        &self.files
    }

    pub fn metadata_backend(&self) -> &M {
        &self.meta
    }

    fn load_packs(&self) -> Result<Vec<StickerPack>> {
        load_record_or_default(&self.meta, PACKS_KEY)
    }

    fn save_packs(&self, packs: &[StickerPack]) -> Result<()> {
        save_record(&self.meta, PACKS_KEY, &packs)
    }

    fn load_stickers(&self) -> Result<StickerMap> {
        load_record_or_default(&self.meta, STICKERS_KEY)
    }

    fn save_stickers(&self, stickers: &StickerMap) -> Result<()> {
        save_record(&self.meta, STICKERS_KEY, stickers)
    }

    /// File name a new sticker's image is written under.
    pub fn image_file_name(&self, sticker_id: &str) -> String {
        format!("sticker_{}.{}", sticker_id, self.options.image_ext)
    }

    /// File name backing an existing sticker, recovered from its uri so that
    /// changing `image_ext` later does not orphan older files.
    fn stored_file_name(&self, sticker: &Sticker) -> String {
        let candidate = sticker.uri.rsplit(['/', '\\']).next().unwrap_or_default();
        if validate_name(candidate).is_ok() {
            candidate.to_string()
        } else {
            self.image_file_name(&sticker.id)
        }
    }

    fn new_pack(&self, name: String) -> StickerPack {
        StickerPack::new(name, self.clock.now())
            .with_export_metadata(self.options.publisher.clone(), self.options.website.clone())
    }

    // --- Stickers ---

    /// Decode a base64 image, write it to the file store and record its metadata.
    ///
    /// Accepts an optional `data:image/<type>;base64,` prefix. The image is
    /// written first; if the metadata write then fails the file stays behind
    /// (a later `doctor` run does not touch files without records).
    pub fn save_sticker(&mut self, image_base64: &str, pack_id: Option<&str>) -> Result<Sticker> {
        let bytes = decode_image(image_base64)?;
        self.save_sticker_bytes(&bytes, pack_id)
    }

    /// Store already decoded image bytes as a new sticker.
    ///
    /// With a `pack_id` the pack must exist; the new id is appended to its
    /// list so both sides of the link agree.
    pub fn save_sticker_bytes(&mut self, bytes: &[u8], pack_id: Option<&str>) -> Result<Sticker> {
        if bytes.is_empty() {
            return Err(StickerError::InvalidImage("image is empty".to_string()));
        }
        let mut packs = match pack_id {
            Some(pack_id) => {
                let packs = self.load_packs()?;
                if !packs.iter().any(|p| p.id == pack_id) {
                    return Err(StickerError::PackNotFound(pack_id.to_string()));
                }
                Some(packs)
            }
            None => None,
        };
        let id = generate_id();
        let file_name = self.image_file_name(&id);

        let uri = self.files.write(&file_name, bytes)?;

        let sticker = Sticker {
            id: id.clone(),
            uri,
            pack_id: pack_id.map(str::to_string),
            created_at: self.clock.now(),
        };

        let mut stickers = self.load_stickers()?;
        stickers.insert(id.clone(), sticker.clone());
        self.save_stickers(&stickers)?;

        if let (Some(packs), Some(pack_id)) = (packs.as_mut(), pack_id) {
            if let Some(pack) = packs.iter_mut().find(|p| p.id == pack_id) {
                pack.push_sticker(&id);
            }
            self.save_packs(packs)?;
        }

        info!(sticker_id = %sticker.id, bytes = bytes.len(), "saved sticker");
        Ok(sticker)
    }

    pub fn get_sticker(&self, sticker_id: &str) -> Result<Sticker> {
        self.load_stickers()?
            .remove(sticker_id)
            .ok_or_else(|| StickerError::StickerNotFound(sticker_id.to_string()))
    }

    /// All stickers, newest first.
    pub fn get_stickers(&self) -> Result<Vec<Sticker>> {
        let mut stickers: Vec<Sticker> = self.load_stickers()?.into_values().collect();
        stickers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(stickers)
    }

    /// Raw image bytes of a sticker.
    pub fn read_sticker_image(&self, sticker_id: &str) -> Result<Vec<u8>> {
        let sticker = self.get_sticker(sticker_id)?;
        self.files
            .read(&self.stored_file_name(&sticker))?
            .ok_or_else(|| StickerError::StickerNotFound(sticker_id.to_string()))
    }

    /// Delete a sticker's file and record, and unlink it from its pack.
    pub fn delete_sticker(&mut self, sticker_id: &str) -> Result<()> {
        let mut stickers = self.load_stickers()?;
        let sticker = stickers
            .remove(sticker_id)
            .ok_or_else(|| StickerError::StickerNotFound(sticker_id.to_string()))?;

        self.files.delete(&self.stored_file_name(&sticker))?;
        self.save_stickers(&stickers)?;

        if let Some(pack_id) = &sticker.pack_id {
            let mut packs = self.load_packs()?;
            if let Some(pack) = packs.iter_mut().find(|p| &p.id == pack_id) {
                if pack.remove_sticker(sticker_id) {
                    self.save_packs(&packs)?;
                }
            }
        }

        info!(sticker_id, "deleted sticker");
        Ok(())
    }

    // --- Packs ---

    /// The pack the current local day's generations go into, created on first use.
    ///
    /// A pack counts as today's if it carries today's daily name, or if it was
    /// created today and is named after the UTC date it was created on (older
    /// data named daily packs after the UTC date rather than the local one).
    pub fn get_or_create_today_pack(&mut self) -> Result<StickerPack> {
        let today = self.clock.today();
        let todays_name = daily_pack_name(today);
        let mut packs = self.load_packs()?;

        let existing = packs.iter().find(|pack| {
            pack.name == todays_name
                || (self.clock.local_date(&pack.created_at) == today
                    && pack.name == daily_pack_name(pack.created_at.date_naive()))
        });
        if let Some(pack) = existing {
            debug!(pack_id = %pack.id, "found today's pack");
            return Ok(pack.clone());
        }

        let pack = self.new_pack(todays_name);
        packs.insert(0, pack.clone());
        self.save_packs(&packs)?;

        info!(pack_id = %pack.id, name = %pack.name, "created today's pack");
        Ok(pack)
    }

    pub fn create_manual_pack(&mut self, name: &str) -> Result<StickerPack> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StickerError::InvalidName(
                "pack name cannot be empty".to_string(),
            ));
        }

        let mut packs = self.load_packs()?;
        let pack = self.new_pack(name.to_string());
        packs.insert(0, pack.clone());
        self.save_packs(&packs)?;

        info!(pack_id = %pack.id, name = %pack.name, "created pack");
        Ok(pack)
    }

    /// All packs in stored order (newest first, as new packs are prepended).
    pub fn get_packs(&self) -> Result<Vec<StickerPack>> {
        self.load_packs()
    }

    pub fn get_pack(&self, pack_id: &str) -> Result<StickerPack> {
        self.load_packs()?
            .into_iter()
            .find(|p| p.id == pack_id)
            .ok_or_else(|| StickerError::PackNotFound(pack_id.to_string()))
    }

    /// Stickers of a pack in pack order. Ids without a sticker record are skipped.
    pub fn get_pack_stickers(&self, pack_id: &str) -> Result<Vec<Sticker>> {
        let pack = self.get_pack(pack_id)?;
        let mut stickers = self.load_stickers()?;

        let resolved: Vec<Sticker> = pack
            .sticker_ids
            .iter()
            .filter_map(|id| stickers.remove(id))
            .collect();

        if resolved.len() != pack.sticker_ids.len() {
            debug!(
                pack_id,
                dangling = pack.sticker_ids.len() - resolved.len(),
                "skipped dangling sticker ids"
            );
        }
        Ok(resolved)
    }

    /// Put a sticker into a pack. Repeating the call is a no-op.
    ///
    /// A sticker belongs to at most one pack: if it was listed in another
    /// pack it is removed from that list first.
    pub fn add_sticker_to_pack(&mut self, sticker_id: &str, pack_id: &str) -> Result<()> {
        let mut packs = self.load_packs()?;
        if !packs.iter().any(|p| p.id == pack_id) {
            return Err(StickerError::PackNotFound(pack_id.to_string()));
        }

        let mut stickers = self.load_stickers()?;
        let sticker = stickers
            .get_mut(sticker_id)
            .ok_or_else(|| StickerError::StickerNotFound(sticker_id.to_string()))?;

        let mut packs_changed = false;
        for pack in packs.iter_mut() {
            if pack.id == pack_id {
                packs_changed |= pack.push_sticker(sticker_id);
            } else if sticker.pack_id.as_deref() == Some(pack.id.as_str()) {
                packs_changed |= pack.remove_sticker(sticker_id);
            }
        }
        if packs_changed {
            self.save_packs(&packs)?;
        }

        if sticker.pack_id.as_deref() != Some(pack_id) {
            sticker.pack_id = Some(pack_id.to_string());
            self.save_stickers(&stickers)?;
        }

        debug!(sticker_id, pack_id, "sticker added to pack");
        Ok(())
    }

    /// Remove a pack. Member stickers are kept and become unassigned.
    pub fn delete_pack(&mut self, pack_id: &str) -> Result<()> {
        let mut packs = self.load_packs()?;
        let index = packs
            .iter()
            .position(|p| p.id == pack_id)
            .ok_or_else(|| StickerError::PackNotFound(pack_id.to_string()))?;
        let pack = packs.remove(index);
        self.save_packs(&packs)?;

        let mut stickers = self.load_stickers()?;
        let mut detached = 0usize;
        for sticker in stickers.values_mut() {
            if sticker.pack_id.as_deref() == Some(pack_id) {
                sticker.pack_id = None;
                detached += 1;
            }
        }
        if detached > 0 {
            self.save_stickers(&stickers)?;
        }

        info!(pack_id, name = %pack.name, detached, "deleted pack");
        Ok(())
    }

    // --- Maintenance ---

    /// Verify and repair the sticker/pack cross references.
    ///
    /// 1. Records whose image file is gone are dropped.
    /// 2. Pack entries pointing at missing stickers, and duplicate entries, are dropped.
    /// 3. `pack_id`s pointing at missing packs are cleared.
    /// 4. Stickers whose pack does not list them are appended to it.
    pub fn doctor(&mut self) -> Result<DoctorReport> {
        let mut report = DoctorReport::default();
        let mut packs = self.load_packs()?;
        let mut stickers = self.load_stickers()?;

        let mut missing = Vec::new();
        for sticker in stickers.values() {
            if !self.files.exists(&self.stored_file_name(sticker))? {
                missing.push(sticker.id.clone());
            }
        }
        for id in &missing {
            warn!(sticker_id = %id, "sticker image missing, dropping record");
            stickers.remove(id);
        }
        report.missing_files = missing.len();

        for pack in packs.iter_mut() {
            let before = pack.sticker_ids.len();
            let mut seen = std::collections::HashSet::new();
            pack.sticker_ids
                .retain(|id| stickers.contains_key(id) && seen.insert(id.clone()));
            report.dangling_ids += before - pack.sticker_ids.len();
        }

        let mut ordered: Vec<&mut Sticker> = stickers.values_mut().collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        for sticker in ordered {
            let Some(pack_id) = sticker.pack_id.clone() else {
                continue;
            };
            match packs.iter_mut().find(|p| p.id == pack_id) {
                Some(pack) => {
                    if pack.push_sticker(&sticker.id) {
                        report.relinked += 1;
                    }
                }
                None => {
                    sticker.pack_id = None;
                    report.cleared_pack_refs += 1;
                }
            }
        }

        if report.missing_files > 0 || report.cleared_pack_refs > 0 {
            self.save_stickers(&stickers)?;
        }
        if report.dangling_ids > 0 || report.relinked > 0 {
            self.save_packs(&packs)?;
        }

        info!(?report, "doctor finished");
        Ok(report)
    }
}

/// Decode a base64 image payload, tolerating a `data:` url prefix.
pub fn decode_image(image_base64: &str) -> Result<Vec<u8>> {
    let trimmed = image_base64.trim();
    let payload = match trimmed.strip_prefix("data:image/") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| StickerError::InvalidImage("malformed data url".to_string()))?,
        None => trimmed,
    };

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| StickerError::InvalidImage(e.to_string()))?;
    if bytes.is_empty() {
        return Err(StickerError::InvalidImage("image is empty".to_string()));
    }
    Ok(bytes)
}
