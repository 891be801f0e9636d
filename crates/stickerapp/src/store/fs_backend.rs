use super::backend::{validate_name, FileBackend, MetadataBackend};
use crate::error::{Result, StickerError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const STICKERS_DIR: &str = "stickers";

/// Filesystem backend.
///
/// Metadata key `k` is stored as `<root>/k.json`; sticker images live in
/// `<root>/stickers/`. All writes go through a tmp file and a rename.
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stickers_dir(&self) -> PathBuf {
        self.root.join(STICKERS_DIR)
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.stickers_dir().join(name)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(StickerError::Io)?;
        }
        Ok(())
    }

    fn atomic_write(&self, dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(dir)?;
        let tmp_path = dir.join(format!(".write-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, bytes).map_err(StickerError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StickerError::Io(e));
        }
        Ok(())
    }
}

impl MetadataBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_name(key)?;
        match fs::read_to_string(self.record_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StickerError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_name(key)?;
        self.atomic_write(&self.root, &self.record_path(key), value.as_bytes())
    }
}

impl FileBackend for FsBackend {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<String> {
        validate_name(name)?;
        let target = self.file_path(name);
        self.atomic_write(&self.stickers_dir(), &target, bytes)?;
        Ok(target.to_string_lossy().into_owned())
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        validate_name(name)?;
        match fs::read(self.file_path(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StickerError::Io(e)),
        }
    }

    fn exists(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        Ok(self.file_path(name).is_file())
    }

    fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        match fs::remove_file(self.file_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StickerError::Io(e)),
        }
    }

    fn uri(&self, name: &str) -> String {
        self.file_path(name).to_string_lossy().into_owned()
    }
}
