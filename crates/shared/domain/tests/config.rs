use freg_domain::config::{AppConfig, StorageBackend, StorageCompression};
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

#[test]
fn defaults_are_sane() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.server.address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert_eq!(cfg.server.port, 4590);
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.storage.compression, StorageCompression::None);
    assert_eq!(cfg.logging.level, "info");
    assert!(cfg.logging.path.is_none());
}

#[test]
fn partial_document_keeps_defaults() {
    let raw = json!({
        "server": { "port": 8080 },
        "storage": { "backend": "ledger", "data_dir": "/var/lib/freg", "compression": "lz4" }
    });

    let cfg: AppConfig = serde_json::from_value(raw).unwrap();
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert_eq!(cfg.storage.backend, StorageBackend::Ledger);
    assert_eq!(cfg.storage.data_dir, PathBuf::from("/var/lib/freg"));
    assert_eq!(cfg.storage.compression, StorageCompression::Lz4);
    assert!(!cfg.logging.json);
}

#[test]
fn unknown_backend_is_rejected() {
    let raw = json!({ "storage": { "backend": "postgres" } });
    assert!(serde_json::from_value::<AppConfig>(raw).is_err());
}

#[test]
fn clones_share_until_mutated() {
    let base = AppConfig::default();
    let mut tuned = base.clone();
    tuned.server.port = 9000;

    assert_eq!(base.server.port, 4590);
    assert_eq!(tuned.server.port, 9000);
}
