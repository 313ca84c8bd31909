use super::FacilityStore;
use crate::error::FacilityError;
use crate::model::{Facility, FacilityId};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<FacilityId, Facility>,
    last_id: FacilityId,
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }
}

impl FacilityStore for MemoryStore {
    async fn last_id(&self) -> Result<FacilityId, FacilityError> {
        Ok(self.state.read().last_id)
    }

    async fn load(&self, id: FacilityId) -> Result<Option<Facility>, FacilityError> {
        Ok(self.state.read().records.get(&id).cloned())
    }

    async fn save(&self, facility: &Facility) -> Result<(), FacilityError> {
        self.state.write().records.insert(facility.id, facility.clone());
        Ok(())
    }

    async fn commit_id(&self, id: FacilityId) -> Result<(), FacilityError> {
        let mut state = self.state.write();
        state.last_id = state.last_id.max(id);
        Ok(())
    }
}
