use stickerapp::error::StickerError;
use stickerapp::store::backend::{FileBackend, MetadataBackend};
use stickerapp::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

#[test]
fn test_fs_backend_record_io() {
    let (dir, backend) = setup();

    assert_eq!(backend.get("packs").unwrap(), None);

    backend.set("packs", "[]").unwrap();
    assert_eq!(backend.get("packs").unwrap().as_deref(), Some("[]"));
    assert_eq!(
        fs::read_to_string(dir.path().join("packs.json")).unwrap(),
        "[]"
    );

    backend.set("packs", "[1]").unwrap();
    assert_eq!(backend.get("packs").unwrap().as_deref(), Some("[1]"));
}

#[test]
fn test_fs_backend_file_io() {
    let (dir, backend) = setup();
    let bytes = b"RIFF....WEBP";

    let uri = backend.write("sticker_a.webp", bytes).unwrap();
    let expected = dir.path().join("stickers").join("sticker_a.webp");
    assert_eq!(uri, expected.to_string_lossy());
    assert_eq!(backend.uri("sticker_a.webp"), uri);

    assert!(backend.exists("sticker_a.webp").unwrap());
    assert_eq!(backend.read("sticker_a.webp").unwrap().unwrap(), bytes);

    backend.delete("sticker_a.webp").unwrap();
    assert!(!backend.exists("sticker_a.webp").unwrap());
    assert_eq!(backend.read("sticker_a.webp").unwrap(), None);
}

#[test]
fn test_fs_backend_delete_is_idempotent() {
    let (_dir, backend) = setup();
    backend.delete("never_written.webp").unwrap();
    backend.write("x.webp", b"x").unwrap();
    backend.delete("x.webp").unwrap();
    backend.delete("x.webp").unwrap();
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();

    backend.set("stickers", "{}").unwrap();
    backend.write("sticker_b.webp", b"bytes").unwrap();

    for path in [dir.path().to_path_buf(), dir.path().join("stickers")] {
        for entry in fs::read_dir(&path).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }
}

#[test]
fn test_fs_backend_rejects_path_traversal() {
    let (_dir, backend) = setup();

    for name in ["../escape.webp", "nested/file.webp", "..", ""] {
        assert!(
            matches!(backend.write(name, b"x"), Err(StickerError::InvalidName(_))),
            "accepted {:?}",
            name
        );
    }
    assert!(matches!(
        backend.set("../packs", "[]"),
        Err(StickerError::InvalidName(_))
    ));
}
