use freg_kernel::config::{ConfigError, load_with_env};
use freg_kernel::domain::config::{AppConfig, StorageBackend, StorageCompression};
use std::collections::HashMap;
use std::io::Write;

fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
    Some(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
}

fn toml_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn file_values_are_loaded() {
    let file = toml_file(
        r#"
        [server]
        port = 8081

        [storage]
        backend = "ledger"
        data_dir = "/srv/freg"
        compression = "lz4"
        "#,
    );

    let cfg: AppConfig = load_with_env(Some(file.path()), env(&[])).unwrap();
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.storage.backend, StorageBackend::Ledger);
    assert_eq!(cfg.storage.compression, StorageCompression::Lz4);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn environment_overrides_file() {
    let file = toml_file("[server]\nport = 8081\n");

    let cfg: AppConfig = load_with_env(
        Some(file.path()),
        env(&[("FREG__SERVER__PORT", "9999"), ("FREG__LOGGING__LEVEL", "debug")]),
    )
    .unwrap();

    assert_eq!(cfg.server.port, 9999);
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
fn environment_alone_is_enough() {
    let cfg: AppConfig =
        load_with_env(None::<&str>, env(&[("FREG__STORAGE__BACKEND", "ledger")])).unwrap();
    assert_eq!(cfg.storage.backend, StorageBackend::Ledger);
    assert_eq!(cfg.server.port, 4590);
}

#[test]
fn missing_file_is_an_error() {
    let err = load_with_env::<AppConfig>(Some("/definitely/not/here.toml"), env(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::Config { .. }));
}

#[test]
fn bad_values_are_reported_with_context() {
    let file = toml_file("[server]\nport = \"not a number\"\n");
    let err = load_with_env::<AppConfig>(Some(file.path()), env(&[])).unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"));
}
