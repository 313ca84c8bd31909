use crate::error::FacilityError;
use crate::events::FacilityEvent;
use crate::model::{Facility, FacilityDetails, FacilityId};
use crate::store::{FacilityStore, StoreBackend};
use freg_domain::Principal;
use freg_event_bus::EventBus;
use freg_kernel::context::CallContext;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
struct RegistryInner<S> {
    store: S,
    events: EventBus,
    /// Serializes every read-modify-write against the store.
    write_lock: Mutex<()>,
}

/// The facility registry: the seven operations over a [`FacilityStore`].
///
/// Only the principal that registered a facility may update, deactivate or
/// reactivate it. Existence is checked before ownership, so an unknown id is
/// always [`FacilityError::NotFound`]. Cloning shares the same store.
#[derive(Debug)]
pub struct FacilityRegistry<S = StoreBackend> {
    inner: Arc<RegistryInner<S>>,
}

impl<S> Clone for FacilityRegistry<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: FacilityStore> FacilityRegistry<S> {
    pub fn new(store: S, events: EventBus) -> Self {
        Self { inner: Arc::new(RegistryInner { store, events, write_lock: Mutex::new(()) }) }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Stores a new active facility owned by `ctx.caller` and returns its id.
    ///
    /// # Errors
    /// [`FacilityError::Validation`] for invalid details, [`FacilityError::Storage`]
    /// if the record or the allocator mark cannot be written.
    #[instrument(level = "info", skip_all, fields(caller = %ctx.caller))]
    pub async fn register_facility(
        &self,
        ctx: &CallContext,
        details: FacilityDetails,
    ) -> Result<FacilityId, FacilityError> {
        details.validate()?;

        let _guard = self.inner.write_lock.lock().await;
        let id = self.inner.store.last_id().await?.checked_add(1).ok_or_else(|| {
            FacilityError::Internal { message: "facility id space exhausted".into(), context: None }
        })?;

        let facility = Facility::register(id, details, ctx);
        self.inner.store.save(&facility).await?;
        self.inner.store.commit_id(id).await?;

        info!(facility_id = id, "Facility registered");
        self.publish(FacilityEvent::Registered { id, owner: ctx.caller.clone() });
        Ok(id)
    }

    /// Only ids at or below the committed allocator mark exist. A record saved by
    /// a registration that never committed its id stays invisible and is
    /// overwritten when that id is handed out again.
    ///
    /// # Errors
    /// [`FacilityError::NotFound`] for an unknown id.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_facility(&self, id: FacilityId) -> Result<Facility, FacilityError> {
        if id > self.inner.store.last_id().await? {
            debug!(facility_id = id, "Id beyond the allocator mark");
            return Err(FacilityError::not_found(id));
        }
        self.inner.store.load(id).await?.ok_or_else(|| FacilityError::not_found(id))
    }

    /// Replaces name, address and contact fields. Owner only.
    ///
    /// # Errors
    /// [`FacilityError::NotFound`], then [`FacilityError::Unauthorized`], then
    /// [`FacilityError::Validation`]; a rejected update leaves the record as it was.
    #[instrument(level = "info", skip(self, ctx, details), fields(caller = %ctx.caller))]
    pub async fn update_facility(
        &self,
        ctx: &CallContext,
        id: FacilityId,
        details: FacilityDetails,
    ) -> Result<(), FacilityError> {
        let _guard = self.inner.write_lock.lock().await;
        let mut facility = self.owned(ctx, id).await?;
        details.validate()?;

        facility.apply(details);
        self.inner.store.save(&facility).await?;

        info!(facility_id = id, "Facility updated");
        self.publish(FacilityEvent::Updated { id });
        Ok(())
    }

    /// Marks the facility inactive. Owner only; a no-op when already inactive.
    ///
    /// # Errors
    /// [`FacilityError::NotFound`] or [`FacilityError::Unauthorized`].
    pub async fn deactivate_facility(
        &self,
        ctx: &CallContext,
        id: FacilityId,
    ) -> Result<(), FacilityError> {
        self.set_active(ctx, id, false).await
    }

    /// Marks the facility active. Owner only; a no-op when already active.
    ///
    /// # Errors
    /// [`FacilityError::NotFound`] or [`FacilityError::Unauthorized`].
    pub async fn reactivate_facility(
        &self,
        ctx: &CallContext,
        id: FacilityId,
    ) -> Result<(), FacilityError> {
        self.set_active(ctx, id, true).await
    }

    /// # Errors
    /// [`FacilityError::NotFound`] for an unknown id.
    #[instrument(level = "debug", skip(self))]
    pub async fn is_facility_owner(
        &self,
        id: FacilityId,
        identity: &Principal,
    ) -> Result<bool, FacilityError> {
        Ok(self.get_facility(id).await?.is_owned_by(identity))
    }

    /// Facilities ever registered, inactive ones included.
    ///
    /// # Errors
    /// [`FacilityError::Storage`] if the allocator mark cannot be read.
    pub async fn facility_count(&self) -> Result<u64, FacilityError> {
        let count = self.inner.store.last_id().await?;
        debug!(count, "Facility count read");
        Ok(count)
    }

    #[instrument(level = "info", skip(self, ctx), fields(caller = %ctx.caller))]
    async fn set_active(
        &self,
        ctx: &CallContext,
        id: FacilityId,
        active: bool,
    ) -> Result<(), FacilityError> {
        let _guard = self.inner.write_lock.lock().await;
        let mut facility = self.owned(ctx, id).await?;

        if facility.active == active {
            debug!(facility_id = id, active, "Activity flag already set");
            return Ok(());
        }

        facility.active = active;
        self.inner.store.save(&facility).await?;

        info!(facility_id = id, active, "Facility activity changed");
        self.publish(if active {
            FacilityEvent::Reactivated { id }
        } else {
            FacilityEvent::Deactivated { id }
        });
        Ok(())
    }

    /// Loads `id` and checks the caller owns it.
    async fn owned(&self, ctx: &CallContext, id: FacilityId) -> Result<Facility, FacilityError> {
        let facility = self.get_facility(id).await?;
        if !facility.is_owned_by(&ctx.caller) {
            warn!(facility_id = id, caller = %ctx.caller, "Rejected mutation by non-owner");
            return Err(FacilityError::Unauthorized {
                message: format!("{} does not own facility {id}", ctx.caller).into(),
                context: None,
            });
        }
        Ok(facility)
    }

    fn publish(&self, event: FacilityEvent) {
        if let Err(e) = self.inner.events.publish(event) {
            warn!(error = %e, "Failed to publish facility event");
        }
    }
}
