//! Sandboxed file storage backing the facility ledger.
//!
//! * **Sandbox**: keys are relative paths; absolute keys, `..` escapes and
//!   symlinked parents pointing outside the root are rejected.
//! * **Atomic writes**: unique temp file, `fsync`, `rename`, then a directory sync.
//! * **Compression**: optional LZ4 block compression, transparent to callers.
//! * **Records**: `put_record` / `get_record` store any serde type with postcard.
//! * **Self-healing**: stale temp files from interrupted writes are purged on connect.
//!
//! ```rust
//! use freg_storage::{Storage, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let storage = Storage::builder().root(tmp.path().join("data")).connect().await?;
//!
//!     storage.write("notes/hello.txt", b"hi").await?;
//!     assert_eq!(storage.read("notes/hello.txt").await?, b"hi");
//!     assert!(storage.write("../escape.txt", b"no").await.is_err());
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod namespace;
mod security;

pub use builder::StorageBuilder;
pub use engine::{Compression, Storage};
pub use error::{StorageError, StorageErrorExt};
pub use namespace::{NamespaceName, NamespacedStorage};
