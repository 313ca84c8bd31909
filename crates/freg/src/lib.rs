//! Facade for the facility registry: re-exports the shared crates and
//! initializes every feature slice the binaries mount.
//!
//! Keep this crate thin. It composes other crates and holds no business logic.

pub use freg_domain as domain;
pub use freg_event_bus as events;
pub use freg_facility as facility;
pub use freg_kernel as kernel;

use freg_domain::config::AppConfig;
use freg_domain::registry::InitializedSlice;
use freg_event_bus::EventBus;
use freg_facility::FacilityError;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use freg_facility::server::router as facility_router;
        pub use freg_kernel::server::system_router;
    }
}

/// Build-time feature introspection.
pub mod features {
    pub const ENABLED: &[&str] = &[
        "facility",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initializes every enabled slice against the configured storage.
///
/// # Errors
/// Fails when a slice cannot open its store.
pub async fn init(
    config: &AppConfig,
    events: &EventBus,
) -> Result<Vec<InitializedSlice>, FacilityError> {
    let mut slices = Vec::new();

    slices.push(freg_facility::init(&config.storage, events).await?);

    Ok(slices)
}
