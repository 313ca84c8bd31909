//! Kernel utilities shared across slices.
//!
//! * [`config::load_config`]: TOML file plus `FREG__` environment overrides.
//! * [`clock`]: the environment's notion of "now".
//! * [`context::CallContext`]: caller identity and timestamp handed to mutations.
//! * `server` (feature): shared Axum state, caller extraction, JSON errors and system routes.

pub mod clock;
pub mod config;
pub mod context;
#[cfg(feature = "server")]
pub mod server;

pub use freg_domain as domain;
