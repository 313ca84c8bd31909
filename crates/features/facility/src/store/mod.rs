//! Durable home of facility records and the id allocator.

mod ledger;
mod memory;

pub use ledger::LedgerStore;
pub use memory::MemoryStore;

use crate::error::FacilityError;
use crate::model::{Facility, FacilityId};
use freg_domain::config::{StorageBackend, StorageCompression, StorageConfig};
use freg_storage::Compression;
use std::fmt::Debug;
use std::future::Future;

/// Record storage plus the monotonically increasing id counter.
///
/// Implementations only store; ordering and authorization are the registry's job.
pub trait FacilityStore: Debug + Send + Sync + 'static {
    /// Highest id ever committed, `0` when nothing was registered.
    fn last_id(&self) -> impl Future<Output = Result<FacilityId, FacilityError>> + Send;

    fn load(
        &self,
        id: FacilityId,
    ) -> impl Future<Output = Result<Option<Facility>, FacilityError>> + Send;

    /// Inserts or overwrites the record under `facility.id`.
    fn save(&self, facility: &Facility) -> impl Future<Output = Result<(), FacilityError>> + Send;

    /// Records `id` as the new allocator high-water mark.
    fn commit_id(&self, id: FacilityId) -> impl Future<Output = Result<(), FacilityError>> + Send;
}

/// The store selected by configuration.
#[derive(Debug)]
pub enum StoreBackend {
    Memory(MemoryStore),
    Ledger(LedgerStore),
}

impl StoreBackend {
    /// Opens the backend named in `config`.
    ///
    /// # Errors
    /// [`FacilityError::Storage`] if the ledger directory cannot be opened.
    pub async fn open(config: &StorageConfig) -> Result<Self, FacilityError> {
        match config.backend {
            StorageBackend::Memory => Ok(Self::Memory(MemoryStore::new())),
            StorageBackend::Ledger => {
                let compression = match config.compression {
                    StorageCompression::None => Compression::None,
                    StorageCompression::Lz4 => Compression::Lz4,
                };
                LedgerStore::open(&config.data_dir, compression).await.map(Self::Ledger)
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Ledger(_) => "ledger",
        }
    }
}

impl FacilityStore for StoreBackend {
    async fn last_id(&self) -> Result<FacilityId, FacilityError> {
        match self {
            Self::Memory(store) => store.last_id().await,
            Self::Ledger(store) => store.last_id().await,
        }
    }

    async fn load(&self, id: FacilityId) -> Result<Option<Facility>, FacilityError> {
        match self {
            Self::Memory(store) => store.load(id).await,
            Self::Ledger(store) => store.load(id).await,
        }
    }

    async fn save(&self, facility: &Facility) -> Result<(), FacilityError> {
        match self {
            Self::Memory(store) => store.save(facility).await,
            Self::Ledger(store) => store.save(facility).await,
        }
    }

    async fn commit_id(&self, id: FacilityId) -> Result<(), FacilityError> {
        match self {
            Self::Memory(store) => store.commit_id(id).await,
            Self::Ledger(store) => store.commit_id(id).await,
        }
    }
}
