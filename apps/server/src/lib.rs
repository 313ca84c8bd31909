//! # Facility Registry Server
//!
//! Serves the facility registry over HTTP with `Axum`, an OpenAPI reference
//! at `/api`, and a typed event bus shared by every slice.
//!
//! ## Example
//! ```no_run
//! use freg_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(4590)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use freg::domain::config::{AppConfig, LoggingConfig};
use freg::kernel::server::ApiState;
use freg_event_bus::EventBus;
use freg_logger::{Logger, parse_level};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

/// How long in-flight requests may run once shutdown starts.
const GRACE_PERIOD: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: AppConfig,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn address(mut self, address: IpAddr) -> Self {
        self.cfg.server.address = address;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Opens the configured store, initializes the slices and assembles the state.
    ///
    /// # Errors
    /// Returns an error if a slice cannot open its storage (unwritable data
    /// directory, corrupted ledger) or the state cannot be finalized.
    pub async fn build(self) -> Result<Server> {
        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(
            address = %address,
            backend = ?self.cfg.storage.backend,
            "Initializing server"
        );

        let events = EventBus::new();
        let slices = freg::init(&self.cfg, &events).await.context("Platform bootstrap failed")?;

        let state = ApiState::builder()
            .config(self.cfg)
            .events(events)
            .register_slices(slices)
            .build()
            .context("Failed to finalize API state registry")?;

        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete application router, documentation included.
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Serves until Ctrl+C or SIGTERM, then drains connections.
    ///
    /// # Errors
    /// Returns an error if the server cannot bind the configured address.
    pub async fn run(self) -> Result<()> {
        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(GRACE_PERIOD));
        });

        self.serve(handle).await
    }

    /// Serves until `handle` is told to shut down, then closes the event bus so
    /// subscribers see the end of their streams.
    ///
    /// # Errors
    /// Returns an error if the server cannot bind the configured address.
    pub async fn serve(self, handle: Handle<SocketAddr>) -> Result<()> {
        let cfg = &self.state.config;
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let app = self.router();

        info!("Starting HTTP server on http://{address}");
        let served = axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed");

        let closed = self.state.events.shutdown();
        info!(channels = closed, "Event bus closed");
        served?;

        info!("Server shutdown complete");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

/// Installs the global logger described by `cfg`.
///
/// # Errors
/// Fails on an unknown level name or when a subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> Result<Logger> {
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(parse_level(&cfg.level)?);
    let logger = match &cfg.path {
        Some(path) => builder.path(path).json(cfg.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
