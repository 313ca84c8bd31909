use anyhow::Context;
use freg::domain::config::AppConfig;
use freg::kernel::config::load_config;
use freg_server::{Server, init_logging};
use std::path::Path;

/// Optional; the environment and built-in defaults apply without it.
const CONFIG_FILE: &str = "config/server.toml";

#[freg_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let path = Path::new(CONFIG_FILE);
    let cfg: AppConfig = load_config(path.exists().then_some(path))
        .context("Critical: Configuration is malformed")?;

    let _log = init_logging(&cfg.logging)?;

    Server::builder().config(cfg).build().await?.run().await
}
