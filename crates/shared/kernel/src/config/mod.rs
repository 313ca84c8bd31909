use config::{Case, Config, Environment, File};
use freg_domain::constants::CONFIG_ENV_PREFIX;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

#[freg_derive::freg_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from an optional file, then overlays `FREG__`-prefixed environment variables.
///
/// Nested keys use a double underscore: `FREG__STORAGE__DATA_DIR` sets
/// `storage.data_dir`. When `path` is given the file must exist; its format is
/// inferred from the extension, or `.toml` is tried when there is none. Without a
/// path only the environment and `T`'s serde defaults apply.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or malformed, or if the
/// merged values do not deserialize into `T`.
///
/// ```rust
/// use freg_kernel::config::load_config;
/// use freg_kernel::domain::config::AppConfig;
///
/// let cfg: AppConfig = load_config(None::<&str>).unwrap();
/// assert_eq!(cfg.server.port, 4590);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_with_env(path, None)
}

/// [`load_config`] with an explicit environment map instead of the process environment.
///
/// # Errors
/// Same as [`load_config`].
pub fn load_with_env<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<HashMap<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");
        builder = builder.add_source(File::from(path).required(true));
    }

    let environment = Environment::with_prefix(CONFIG_ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .convert_case(Case::Snake)
        .source(env);

    builder
        .add_source(environment)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
