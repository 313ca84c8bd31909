use crate::engine::{Compression, Storage, StorageInner};
use crate::error::{StorageError, StorageErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone, Copy)]
struct StorageOptions {
    compression: Compression,
    create: bool,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self { compression: Compression::None, create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Typestate builder for [`Storage`]; `connect` is only available once a root is set.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct StorageBuilder<S: Sealed = NoRoot> {
    state: S,
    options: StorageOptions,
}

#[allow(private_bounds)]
impl<S: Sealed> StorageBuilder<S> {
    #[must_use = "Sets compression for the storage engine"]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.options.compression = compression;
        self
    }

    #[must_use = "Sets whether a missing root directory is created on connect"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.options.create = enable;
        self
    }
}

impl StorageBuilder<NoRoot> {
    #[must_use = "Creates a new storage builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory path for the storage engine"]
    pub fn root(self, path: impl Into<PathBuf>) -> StorageBuilder<WithRoot> {
        StorageBuilder { state: WithRoot(path.into()), options: self.options }
    }
}

impl StorageBuilder<WithRoot> {
    /// Opens the storage root.
    ///
    /// Creates the root when `create(true)` (the default), canonicalizes it so
    /// symlinked roots cannot be escaped, then removes stale temporary files
    /// left behind by interrupted writes.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the root is missing and `create` is false,
    /// or if it cannot be created or resolved.
    pub async fn connect(self) -> Result<Storage, StorageError> {
        let root = self.state.0;

        if self.options.create {
            fs::create_dir_all(&root)
                .await
                .context(format!("Failed to bootstrap storage root: {}", root.display()))?;
        }

        let canonical = fs::canonicalize(&root)
            .await
            .context(format!("Failed to resolve storage root: {}", root.display()))?;

        info!(
            path = %canonical.display(),
            compression = ?self.options.compression,
            "Storage root opened"
        );

        let storage = Storage {
            inner: Arc::new(StorageInner {
                root: canonical,
                compression: self.options.compression,
                tmp_counter: AtomicU64::new(1),
            }),
        };

        storage.purge_tmp().await;

        Ok(storage)
    }
}
