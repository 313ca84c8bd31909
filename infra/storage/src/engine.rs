//! The [`Storage`] handle: sandboxed, atomic, optionally compressed file I/O plus
//! typed record helpers.

use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use crate::namespace::{NamespaceName, NamespacedStorage};
use crate::security;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Marker embedded in temporary file names; also used by the purge routine.
pub(crate) const TMP_MARKER: &str = ".fregtmp.";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

/// Shared state behind a [`Storage`] handle.
#[derive(Debug)]
pub struct StorageInner {
    /// Canonical root directory; every resolved path must stay below it.
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    /// Source of unique temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A cloneable handle to a sandboxed storage root.
///
/// Keys are relative paths (`records/7.bin`); absolute keys and keys that
/// climb above the root are rejected. Writes are atomic: data goes to a
/// unique temp file, is `fsync`ed, then renamed over the target.
///
/// ```rust
/// use freg_storage::{Compression, Storage, StorageError};
///
/// #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
/// struct Counter(u64);
///
/// #[tokio::main]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let storage = Storage::builder()
///         .root(tmp.path().join("ledger"))
///         .compression(Compression::Lz4)
///         .connect()
///         .await?;
///
///     let meta = storage.namespace("facilities")?;
///     meta.put_record("meta/last_id", &Counter(3)).await?;
///     assert_eq!(meta.get_record::<Counter>("meta/last_id").await?, Some(Counter(3)));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// Canonical root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns a view whose keys are scoped below `name`.
    ///
    /// Names are lowercased and must match `[a-z0-9_]+`.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] for empty or illegal names.
    pub fn namespace<N>(&self, name: N) -> Result<NamespacedStorage, StorageError>
    where
        N: TryInto<NamespaceName, Error = StorageError>,
    {
        let ns = name.try_into()?;
        Ok(NamespacedStorage::new(self.clone(), ns))
    }

    /// Resolves `key` to its physical path inside the sandbox.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] if the key escapes the root.
    pub fn resolve(&self, key: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        self.resolve_in(None, key)
    }

    pub(crate) fn resolve_in(
        &self,
        namespace: Option<&NamespaceName>,
        key: impl AsRef<Path>,
    ) -> Result<PathBuf, StorageError> {
        let key = key.as_ref();
        match namespace {
            Some(ns) => security::resolve_path(&self.root, Path::new(ns.as_ref()).join(key)),
            None => security::resolve_path(&self.root, key),
        }
    }

    /// Reads and (if enabled) decompresses the file at `key`.
    ///
    /// # Errors
    /// [`StorageError::FileNotFound`] if the key does not exist,
    /// [`StorageError::Decompress`] on corrupted compressed data.
    pub async fn read(&self, key: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        self.read_in(None, key).await
    }

    pub(crate) async fn read_in(
        &self,
        namespace: Option<&NamespaceName>,
        key: impl AsRef<Path>,
    ) -> Result<Vec<u8>, StorageError> {
        let resolved = self.resolve_in(namespace, key)?;

        let data = match fs::read(&resolved).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StorageError::FileNotFound {
                    message: resolved.display().to_string().into(),
                    context: None,
                });
            },
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", resolved.display()).into()),
                });
            },
        };

        self.compression.decompress(data)
    }

    /// Atomically replaces the file at `key` with `data`.
    ///
    /// Parent directories are created as needed. The target is never observed
    /// half-written: either the previous content or the new content is visible.
    ///
    /// # Errors
    /// [`StorageError::PathTraversalAttempt`] for keys outside the sandbox,
    /// [`StorageError::Io`] for disk failures.
    pub async fn write(&self, key: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        self.write_in(None, key, data).await
    }

    pub(crate) async fn write_in(
        &self,
        namespace: Option<&NamespaceName>,
        key: impl AsRef<Path>,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let resolved = self.resolve_in(namespace, key)?;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create directories for {}", resolved.display()))?;
        }

        let temp = self.unique_tmp_path(&resolved);
        let payload = self.compression.compress(data);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&payload).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &resolved).await {
            // Some platforms refuse to rename over an existing file.
            if err.kind() != ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&temp).await;
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Atomic swap failed: {}", resolved.display()).into()),
                });
            }
            fs::remove_file(&resolved)
                .await
                .context(format!("Failed to replace existing file: {}", resolved.display()))?;
            fs::rename(&temp, &resolved)
                .await
                .context(format!("Atomic swap failed: {}", resolved.display()))?;
        }

        if let Some(parent) = resolved.parent() {
            sync_dir(parent).await;
        }

        debug!(path = %resolved.display(), bytes = data.len(), "File saved atomically");
        Ok(())
    }

    /// Serializes `record` with postcard and writes it atomically.
    ///
    /// # Errors
    /// [`StorageError::Codec`] if encoding fails, otherwise as [`Storage::write`].
    pub async fn put_record<T: Serialize>(
        &self,
        key: impl AsRef<Path>,
        record: &T,
    ) -> Result<(), StorageError> {
        self.put_record_in(None, key, record).await
    }

    pub(crate) async fn put_record_in<T: Serialize>(
        &self,
        namespace: Option<&NamespaceName>,
        key: impl AsRef<Path>,
        record: &T,
    ) -> Result<(), StorageError> {
        let bytes = postcard::to_stdvec(record).context("Record encoding failed")?;
        self.write_in(namespace, key, &bytes).await
    }

    /// Reads and decodes a record; a missing key yields `Ok(None)`.
    ///
    /// # Errors
    /// [`StorageError::Codec`] if the stored bytes do not decode as `T`,
    /// otherwise as [`Storage::read`].
    pub async fn get_record<T: DeserializeOwned>(
        &self,
        key: impl AsRef<Path>,
    ) -> Result<Option<T>, StorageError> {
        self.get_record_in(None, key).await
    }

    pub(crate) async fn get_record_in<T: DeserializeOwned>(
        &self,
        namespace: Option<&NamespaceName>,
        key: impl AsRef<Path>,
    ) -> Result<Option<T>, StorageError> {
        let bytes = match self.read_in(namespace, key).await {
            Ok(bytes) => bytes,
            Err(StorageError::FileNotFound { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        postcard::from_bytes(&bytes).map(Some).context("Record decoding failed")
    }

    /// Removes temporary files older than five minutes below the root.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    fn unique_tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("record");
        target.with_file_name(format!("{file_name}{TMP_MARKER}{}.{counter}", std::process::id()))
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => warn!(path = %path.display(), error = %err, "Directory open failed"),
    }
}
