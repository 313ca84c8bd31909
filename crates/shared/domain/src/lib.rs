//! # Domain Types
//!
//! Plain data shared by every registry crate: caller identities, configuration
//! and the slice registry contract. No I/O lives here.

pub mod config;
pub mod constants;
pub mod principal;
pub mod registry;

pub use principal::{Principal, PrincipalError};
