use crate::error::FacilityError;
use freg_derive::api_model;
use freg_domain::Principal;
use freg_kernel::clock::Timestamp;
use freg_kernel::context::CallContext;

/// Registry-assigned identifier; the first facility gets `1`.
pub type FacilityId = u64;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_CONTACT_NAME_LEN: usize = 100;
pub const MAX_CONTACT_PHONE_LEN: usize = 20;

/// The mutable part of a facility, as supplied on registration and update.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct FacilityDetails {
    /// Display name; required.
    pub name: String,
    pub address: String,
    /// Person to contact about the facility.
    pub contact_name: String,
    pub contact_phone: String,
}

impl FacilityDetails {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        contact_name: impl Into<String>,
        contact_phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            contact_name: contact_name.into(),
            contact_phone: contact_phone.into(),
        }
    }

    /// Checks the name is present and every field fits its limit.
    ///
    /// # Errors
    /// [`FacilityError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), FacilityError> {
        if self.name.trim().is_empty() {
            return Err(FacilityError::Validation {
                message: "name must not be empty".into(),
                context: None,
            });
        }

        check_len("name", &self.name, MAX_NAME_LEN)?;
        check_len("address", &self.address, MAX_ADDRESS_LEN)?;
        check_len("contactName", &self.contact_name, MAX_CONTACT_NAME_LEN)?;
        check_len("contactPhone", &self.contact_phone, MAX_CONTACT_PHONE_LEN)
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), FacilityError> {
    let len = value.chars().count();
    if len > max {
        return Err(FacilityError::Validation {
            message: format!("{field} is {len} characters long, the limit is {max}").into(),
            context: None,
        });
    }
    Ok(())
}

/// A registered facility.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Facility {
    #[cfg_attr(feature = "server", schema(value_type = u64))]
    pub id: FacilityId,
    pub name: String,
    pub address: String,
    pub contact_name: String,
    pub contact_phone: String,
    /// UNIX seconds at registration; never changes.
    #[cfg_attr(feature = "server", schema(value_type = u64))]
    pub registration_date: Timestamp,
    pub active: bool,
    /// Identity that registered the facility; the only one allowed to change it.
    #[cfg_attr(feature = "server", schema(value_type = String))]
    pub owner: Principal,
}

impl Facility {
    pub(crate) fn register(id: FacilityId, details: FacilityDetails, ctx: &CallContext) -> Self {
        Self {
            id,
            name: details.name,
            address: details.address,
            contact_name: details.contact_name,
            contact_phone: details.contact_phone,
            registration_date: ctx.now,
            active: true,
            owner: ctx.caller.clone(),
        }
    }

    pub(crate) fn apply(&mut self, details: FacilityDetails) {
        self.name = details.name;
        self.address = details.address;
        self.contact_name = details.contact_name;
        self.contact_phone = details.contact_phone;
    }

    #[must_use]
    pub fn is_owned_by(&self, identity: &Principal) -> bool {
        &self.owner == identity
    }

    #[must_use]
    pub fn details(&self) -> FacilityDetails {
        FacilityDetails::new(&self.name, &self.address, &self.contact_name, &self.contact_phone)
    }
}
