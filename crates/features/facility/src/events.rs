use crate::model::FacilityId;
use freg_domain::Principal;

/// Published on the event bus after each mutation that changed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilityEvent {
    Registered { id: FacilityId, owner: Principal },
    Updated { id: FacilityId },
    Deactivated { id: FacilityId },
    Reactivated { id: FacilityId },
}

impl FacilityEvent {
    #[must_use]
    pub const fn id(&self) -> FacilityId {
        match self {
            Self::Registered { id, .. }
            | Self::Updated { id }
            | Self::Deactivated { id }
            | Self::Reactivated { id } => *id,
        }
    }
}
