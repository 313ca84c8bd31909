use freg_storage::{Compression, Storage, StorageError};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sample {
    id: u64,
    name: String,
    active: bool,
}

async fn open(temp: &TempDir, compression: Compression) -> Storage {
    Storage::builder().root(temp.path()).compression(compression).connect().await.unwrap()
}

#[tokio::test]
async fn traversal_keys_are_blocked() {
    let temp = TempDir::new().unwrap();
    let storage = open(&temp, Compression::None).await;

    assert!(storage.resolve("../etc/passwd").is_err());
    assert!(storage.resolve("records/../../outside").is_err());
    assert!(storage.write("/tmp/absolute.bin", b"x").await.is_err());
}

#[tokio::test]
async fn compressed_bytes_read_back_unchanged() {
    let temp = TempDir::new().unwrap();
    let storage = open(&temp, Compression::Lz4).await;

    let payload = vec![7u8; 8192];
    storage.write("bin/blob.dat", &payload).await.unwrap();

    assert_eq!(storage.read("bin/blob.dat").await.unwrap(), payload);
    let on_disk = std::fs::read(storage.resolve("bin/blob.dat").unwrap()).unwrap();
    assert!(on_disk.len() < payload.len());
}

#[tokio::test]
async fn overwrite_replaces_previous_content() {
    let temp = TempDir::new().unwrap();
    let storage = open(&temp, Compression::None).await;

    storage.write("meta/last_id", b"1").await.unwrap();
    storage.write("meta/last_id", b"2").await.unwrap();

    assert_eq!(storage.read("meta/last_id").await.unwrap(), b"2");
    let leftovers: Vec<_> = std::fs::read_dir(temp.path().join("meta"))
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().contains(".fregtmp."))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn records_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let record = Sample { id: 3, name: "Harbor Clinic".into(), active: true };

    {
        let storage = open(&temp, Compression::Lz4).await;
        let ns = storage.namespace("facilities").unwrap();
        ns.put_record("records/3.bin", &record).await.unwrap();
    }

    let storage = open(&temp, Compression::Lz4).await;
    let ns = storage.namespace("facilities").unwrap();
    let loaded: Option<Sample> = ns.get_record("records/3.bin").await.unwrap();
    assert_eq!(loaded, Some(record));
}

#[tokio::test]
async fn missing_record_is_none() {
    let temp = TempDir::new().unwrap();
    let storage = open(&temp, Compression::None).await;

    let loaded: Option<Sample> = storage.get_record("records/404.bin").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn corrupted_record_reports_codec_error() {
    let temp = TempDir::new().unwrap();
    let storage = open(&temp, Compression::None).await;

    storage.write("records/1.bin", &[0xff, 0xff, 0xff]).await.unwrap();
    let err = storage.get_record::<Sample>("records/1.bin").await.unwrap_err();
    assert_eq!(err.kind(), "codec");
}

#[tokio::test]
async fn namespaces_are_isolated() {
    let temp = TempDir::new().unwrap();
    let storage = open(&temp, Compression::None).await;

    let a = storage.namespace("site_a").unwrap();
    let b = storage.namespace("site_b").unwrap();
    a.write("data.bin", b"a").await.unwrap();
    b.write("data.bin", b"b").await.unwrap();

    assert_ne!(a.resolve("data.bin").unwrap(), b.resolve("data.bin").unwrap());
    assert_eq!(a.read("data.bin").await.unwrap(), b"a");
    assert_eq!(b.read("data.bin").await.unwrap(), b"b");
    assert!(a.resolve("../site_b/data.bin").is_err());
}

#[tokio::test]
async fn missing_keys_are_reported_not_raised() {
    let temp = TempDir::new().unwrap();
    let storage = open(&temp, Compression::None).await;

    assert!(matches!(storage.read("tmp/file.txt").await, Err(StorageError::FileNotFound { .. })));
    assert_eq!(storage.get_record::<u64>("meta/absent").await.unwrap(), None);

    storage.write("tmp/file.txt", b"x").await.unwrap();
    assert_eq!(storage.read("tmp/file.txt").await.unwrap(), b"x");
}

#[tokio::test]
async fn connect_without_create_requires_existing_root() {
    let temp = TempDir::new().unwrap();
    let result = Storage::builder().root(temp.path().join("absent")).create(false).connect().await;
    assert!(matches!(result, Err(StorageError::Io { .. })));
}

proptest! {
    #[test]
    fn keys_with_leading_parent_never_resolve(depth in 1usize..5, tail in "[a-z]{1,8}") {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let storage = rt.block_on(Storage::builder().root(&root).connect()).unwrap();

        let key = format!("{}{tail}", "../".repeat(depth));
        prop_assert!(storage.resolve(&key).is_err());
    }

    #[test]
    fn resolved_keys_stay_under_root(segments in prop::collection::vec("[a-z0-9_]{1,6}", 1..4)) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let storage = rt.block_on(Storage::builder().root(&root).connect()).unwrap();

        let key = segments.join("/");
        let resolved = storage.resolve(&key).unwrap();
        prop_assert!(resolved.starts_with(&root));
    }
}
