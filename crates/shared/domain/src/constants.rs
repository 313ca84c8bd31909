/// OpenAPI tag for liveness and diagnostics routes.
pub const SYSTEM_TAG: &str = "system";
/// OpenAPI tag for facility routes.
pub const FACILITY_TAG: &str = "facility";

/// Request header carrying the caller identity.
pub const PRINCIPAL_HEADER: &str = "x-principal";
/// Environment variable the shell reads the caller identity from.
pub const CALLER_ENV: &str = "FREG_CALLER";

/// Prefix for environment configuration overrides (`FREG__SERVER__PORT`).
pub const CONFIG_ENV_PREFIX: &str = "FREG";
