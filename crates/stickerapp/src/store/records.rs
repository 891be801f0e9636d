//! Persisted record keys and their on-disk schema.
//!
//! Every record is written as a versioned envelope:
//!
//! ```text
//! {"version": 1, "data": <payload>}
//! ```
//!
//! Readers also accept a bare payload (records written before versioning
//! existed) and treat it as version 1. A record with a newer version than
//! [`SCHEMA_VERSION`] is refused rather than misread.

use super::backend::MetadataBackend;
use crate::error::{Result, StickerError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const PACKS_KEY: &str = "packs";
pub const STICKERS_KEY: &str = "stickers";
pub const DAILY_LIMIT_KEY: &str = "daily_limit";

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    version: u32,
    data: &'a T,
}

/// Load a record, `Ok(None)` if the key has never been written.
pub fn load_record<T, M>(backend: &M, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    M: MetadataBackend + ?Sized,
{
    let Some(raw) = backend.get(key)? else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(&raw)?;
    let payload = match envelope_version(&value) {
        Some(version) if version > SCHEMA_VERSION as u64 => {
            return Err(StickerError::UnsupportedVersion {
                key: key.to_string(),
                version: version as u32,
            });
        }
        Some(_) => match value {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            other => other,
        },
        None => value,
    };
    Ok(Some(serde_json::from_value(payload)?))
}

/// Load a record, falling back to its empty value when absent.
pub fn load_record_or_default<T, M>(backend: &M, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    M: MetadataBackend + ?Sized,
{
    Ok(load_record(backend, key)?.unwrap_or_default())
}

pub fn save_record<T, M>(backend: &M, key: &str, data: &T) -> Result<()>
where
    T: Serialize,
    M: MetadataBackend + ?Sized,
{
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        data,
    };
    let content = serde_json::to_string_pretty(&envelope)?;
    backend.set(key, &content)
}

fn envelope_version(value: &Value) -> Option<u64> {
    let map = value.as_object()?;
    if map.len() != 2 || !map.contains_key("data") {
        return None;
    }
    map.get("version")?.as_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use std::collections::HashMap;

    #[test]
    fn test_missing_record_is_none() {
        let backend = MemBackend::new();
        let loaded: Option<Vec<String>> = load_record(&backend, PACKS_KEY).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_saved_record_is_enveloped() {
        let backend = MemBackend::new();
        save_record(&backend, PACKS_KEY, &vec!["a".to_string()]).unwrap();

        let raw = backend.get(PACKS_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["data"][0], "a");

        let loaded: Vec<String> = load_record_or_default(&backend, PACKS_KEY).unwrap();
        assert_eq!(loaded, vec!["a"]);
    }

    #[test]
    fn test_bare_legacy_payload_is_accepted() {
        let backend = MemBackend::new();
        backend
            .set(STICKERS_KEY, r#"{"1-abc": {"n": 1}}"#)
            .unwrap();
        let loaded: HashMap<String, HashMap<String, u32>> =
            load_record_or_default(&backend, STICKERS_KEY).unwrap();
        assert_eq!(loaded["1-abc"]["n"], 1);
    }

    #[test]
    fn test_newer_version_is_refused() {
        let backend = MemBackend::new();
        backend
            .set(PACKS_KEY, r#"{"version": 7, "data": []}"#)
            .unwrap();
        let result: Result<Option<Vec<String>>> = load_record(&backend, PACKS_KEY);
        assert!(matches!(
            result,
            Err(StickerError::UnsupportedVersion { version: 7, .. })
        ));
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let backend = MemBackend::new();
        backend.set(PACKS_KEY, "{not json").unwrap();
        let result: Result<Option<Vec<String>>> = load_record(&backend, PACKS_KEY);
        assert!(matches!(result, Err(StickerError::Serialization(_))));
    }
}
