//! Shared Axum plumbing for slice routers.

mod caller;
mod error;
mod extract;
mod health;
mod router;
mod state;

pub use caller::Caller;
pub use error::{ApiError, ErrorBody};
pub use extract::{ApiJson, ApiPath};
pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner, Slice};
