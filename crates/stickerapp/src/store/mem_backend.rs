use super::backend::{validate_name, FileBackend, MetadataBackend};
use crate::error::{Result, StickerError};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded.
/// Both backend traits take `&self`, like the filesystem implementation.
#[derive(Default)]
pub struct MemBackend {
    records: RefCell<HashMap<String, String>>,
    files: RefCell<HashMap<String, Vec<u8>>>,
    simulate_write_error: RefCell<bool>,
    simulate_file_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write (records and files) fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Make only file writes fail, leaving metadata writable.
    pub fn set_simulate_file_write_error(&self, simulate: bool) {
        *self.simulate_file_write_error.borrow_mut() = simulate;
    }

    /// Test helper: drop a file behind the store's back.
    pub fn remove_file_silently(&self, name: &str) -> bool {
        self.files.borrow_mut().remove(name).is_some()
    }

    pub fn file_count(&self) -> usize {
        self.files.borrow().len()
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(StickerError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl MetadataBackend for MemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl FileBackend for MemBackend {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<String> {
        validate_name(name)?;
        self.check_writable()?;
        if *self.simulate_file_write_error.borrow() {
            return Err(StickerError::Store("Simulated file write error".to_string()));
        }
        self.files
            .borrow_mut()
            .insert(name.to_string(), bytes.to_vec());
        Ok(self.uri(name))
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files.borrow().get(name).cloned())
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.files.borrow().contains_key(name))
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.files.borrow_mut().remove(name);
        Ok(())
    }

    fn uri(&self, name: &str) -> String {
        format!("memory://{}", name)
    }
}
