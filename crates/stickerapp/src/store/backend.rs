use crate::error::Result;

/// Key/value persistence for serialized records.
///
/// Values are opaque strings; callers serialize to and from JSON themselves.
/// Any call may fail (I/O, quota) and callers must propagate the error.
pub trait MetadataBackend {
    /// Read the value stored under `key`, `Ok(None)` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Binary payload persistence, addressed by file name within one directory.
pub trait FileBackend {
    /// Write `bytes` to `name` and return the uri of the written file.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial files.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<String>;

    /// Read the bytes stored at `name`. Returns Ok(None) if the file does not exist.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;

    fn exists(&self, name: &str) -> Result<bool>;

    /// Delete `name`. Deleting a missing file is not an error.
    fn delete(&self, name: &str) -> Result<()>;

    /// The uri a file with this name has (or would have) in this backend.
    fn uri(&self, name: &str) -> String;
}

impl<T: MetadataBackend + ?Sized> MetadataBackend for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<T: FileBackend + ?Sized> FileBackend for &T {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<String> {
        (**self).write(name, bytes)
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(name)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        (**self).exists(name)
    }

    fn delete(&self, name: &str) -> Result<()> {
        (**self).delete(name)
    }

    fn uri(&self, name: &str) -> String {
        (**self).uri(name)
    }
}

/// Reject names that could escape the storage directory.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(crate::error::StickerError::InvalidName(name.to_string()));
    }
    Ok(())
}
