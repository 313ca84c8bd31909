use super::FacilityStore;
use crate::error::{FacilityError, FacilityErrorExt};
use crate::model::{Facility, FacilityId};
use freg_storage::{Compression, NamespacedStorage, Storage};
use std::path::Path;
use tracing::info;

const NAMESPACE: &str = "facilities";
const LAST_ID_KEY: &str = "meta/last_id";

fn record_key(id: FacilityId) -> String {
    format!("records/{id}.bin")
}

/// File-backed store: one postcard record per facility under `<root>/facilities/`.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    storage: NamespacedStorage,
}

impl LedgerStore {
    /// Opens (creating if needed) the ledger rooted at `root`.
    ///
    /// # Errors
    /// [`FacilityError::Storage`] if the directory cannot be created or resolved.
    pub async fn open(root: &Path, compression: Compression) -> Result<Self, FacilityError> {
        let storage = Storage::builder()
            .root(root)
            .compression(compression)
            .connect()
            .await
            .context("Opening facility ledger")?;
        let storage = storage.namespace(NAMESPACE)?;

        info!(root = %root.display(), ?compression, "Facility ledger opened");
        Ok(Self { storage })
    }
}

impl FacilityStore for LedgerStore {
    async fn last_id(&self) -> Result<FacilityId, FacilityError> {
        let last = self
            .storage
            .get_record::<FacilityId>(LAST_ID_KEY)
            .await
            .context("Reading allocator mark")?;
        Ok(last.unwrap_or(0))
    }

    async fn load(&self, id: FacilityId) -> Result<Option<Facility>, FacilityError> {
        self.storage
            .get_record(record_key(id))
            .await
            .context(format!("Reading facility {id}"))
    }

    async fn save(&self, facility: &Facility) -> Result<(), FacilityError> {
        self.storage
            .put_record(record_key(facility.id), facility)
            .await
            .context(format!("Writing facility {}", facility.id))
    }

    async fn commit_id(&self, id: FacilityId) -> Result<(), FacilityError> {
        self.storage.put_record(LAST_ID_KEY, &id).await.context("Writing allocator mark")
    }
}
