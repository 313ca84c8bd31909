use freg_storage::StorageError;
use std::borrow::Cow;

/// Errors returned by facility registry operations.
#[freg_derive::freg_error]
pub enum FacilityError {
    /// A supplied field is empty or too long.
    #[error("Validation failed{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No facility exists under the requested id.
    #[error("Facility not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The caller is not the facility owner.
    #[error("Not authorized{}: {message}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Facility storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Internal facility error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl FacilityError {
    pub(crate) fn not_found(id: u64) -> Self {
        Self::NotFound { message: format!("facility {id} does not exist").into(), context: None }
    }
}
