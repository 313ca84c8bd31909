//! # Facility Registry
//!
//! Registers facilities and guards them: whoever registers a facility is its
//! owner, and only the owner may update, deactivate or reactivate it.
//!
//! * [`FacilityRegistry`]: the seven operations.
//! * [`store`]: the [`FacilityStore`] seam with memory and ledger backends.
//! * [`FacilityEvent`]: published on the shared event bus after each change.
//! * `server` (feature): Axum handlers under `/facilities`.
//!
//! ```rust
//! use freg_event_bus::EventBus;
//! use freg_facility::{FacilityDetails, FacilityRegistry, store::MemoryStore};
//! use freg_kernel::context::CallContext;
//! use freg_kernel::domain::Principal;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), freg_facility::FacilityError> {
//! let registry = FacilityRegistry::new(MemoryStore::new(), EventBus::new());
//! let owner = Principal::parse("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM").unwrap();
//! let ctx = CallContext::new(owner.clone(), 1_234_567_890);
//!
//! let id = registry
//!     .register_facility(&ctx, FacilityDetails::new("Test Facility", "123 Test St", "John Doe", "555-1234"))
//!     .await?;
//! assert_eq!(id, 1);
//! assert!(registry.is_facility_owner(id, &owner).await?);
//! # Ok(())
//! # }
//! ```

mod error;
mod events;
mod model;
mod registry;
#[cfg(feature = "server")]
pub mod server;
pub mod store;

pub use crate::error::{FacilityError, FacilityErrorExt};
pub use crate::events::FacilityEvent;
pub use crate::model::{
    Facility, FacilityDetails, FacilityId, MAX_ADDRESS_LEN, MAX_CONTACT_NAME_LEN,
    MAX_CONTACT_PHONE_LEN, MAX_NAME_LEN,
};
pub use crate::registry::FacilityRegistry;
pub use crate::store::{FacilityStore, StoreBackend};

use freg_domain::config::StorageConfig;
use freg_domain::registry::InitializedSlice;
use freg_event_bus::EventBus;
use freg_kernel::clock::{Clock, SystemClock};
use std::sync::Arc;
use tracing::info;

/// Facility slice state shared with HTTP handlers.
#[freg_derive::freg_slice]
pub struct Facilities {
    pub registry: FacilityRegistry,
    /// Stamps incoming calls.
    pub clock: Arc<dyn Clock>,
}

impl Facilities {
    /// Opens the configured store and wires it to `events`, timed by the wall clock.
    ///
    /// # Errors
    /// [`FacilityError::Storage`] if the configured backend cannot be opened.
    pub async fn open(config: &StorageConfig, events: &EventBus) -> Result<Self, FacilityError> {
        let store = StoreBackend::open(config).await?;
        info!(backend = store.kind(), "Facility slice initialized");

        Ok(Self::new(FacilitiesInner {
            registry: FacilityRegistry::new(store, events.clone()),
            clock: Arc::new(SystemClock),
        }))
    }
}

/// Initializes the facility slice for registration in the application state.
///
/// # Errors
/// See [`Facilities::open`].
pub async fn init(
    config: &StorageConfig,
    events: &EventBus,
) -> Result<InitializedSlice, FacilityError> {
    Facilities::open(config, events).await.map(InitializedSlice::new)
}
