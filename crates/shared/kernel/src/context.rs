use crate::clock::{Clock, Timestamp};
use freg_domain::Principal;

/// What the execution environment supplies with every mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub now: Timestamp,
}

impl CallContext {
    #[must_use]
    pub const fn new(caller: Principal, now: Timestamp) -> Self {
        Self { caller, now }
    }

    /// Stamps `caller` with the current reading of `clock`.
    #[must_use]
    pub fn at(caller: Principal, clock: &dyn Clock) -> Self {
        Self { caller, now: clock.now() }
    }
}
