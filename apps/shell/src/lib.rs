//! # Facility Registry Shell
//!
//! `freg` runs the registry operations against a local ledger directory and
//! prints each result as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use freg::domain::Principal;
use freg::domain::constants::CALLER_ENV;
use freg::facility::store::LedgerStore;
use freg::facility::{FacilityDetails, FacilityId, FacilityRegistry, FacilityStore};
use freg::kernel::clock::{Clock, SystemClock};
use freg::kernel::context::CallContext;
use freg_event_bus::EventBus;
use freg_storage::Compression;
use serde_json::{Value, json};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "freg", version, about = "Facility registry on a local ledger")]
pub struct Cli {
    /// Ledger directory; created on first use.
    #[arg(long, env = "FREG_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Identity performing mutating commands.
    #[arg(long, env = CALLER_ENV)]
    pub caller: Option<Principal>,

    /// Must match the compression the ledger was written with.
    #[arg(long, value_enum, default_value_t = CompressionArg::None)]
    pub compression: CompressionArg,

    /// Log debug output to the console.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    None,
    Lz4,
}

impl From<CompressionArg> for Compression {
    fn from(value: CompressionArg) -> Self {
        match value {
            CompressionArg::None => Self::None,
            CompressionArg::Lz4 => Self::Lz4,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct DetailsArgs {
    pub name: String,
    pub address: String,
    pub contact_name: String,
    pub contact_phone: String,
}

impl From<DetailsArgs> for FacilityDetails {
    fn from(args: DetailsArgs) -> Self {
        Self::new(args.name, args.address, args.contact_name, args.contact_phone)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register a facility owned by the caller.
    Register(DetailsArgs),
    /// Print a facility record.
    Get { id: FacilityId },
    /// Replace a facility's details (owner only).
    Update {
        id: FacilityId,
        #[command(flatten)]
        details: DetailsArgs,
    },
    /// Mark a facility inactive (owner only).
    Deactivate { id: FacilityId },
    /// Mark a facility active again (owner only).
    Reactivate { id: FacilityId },
    /// Check whether `principal` owns a facility.
    IsOwner { id: FacilityId, principal: Principal },
    /// Number of facilities ever registered.
    Count,
}

/// Opens the ledger named by `cli` and runs its command.
///
/// # Errors
/// Fails if the ledger cannot be opened or the command is rejected.
pub async fn run(cli: Cli) -> Result<Value> {
    let store = LedgerStore::open(&cli.data_dir, cli.compression.into())
        .await
        .with_context(|| format!("Cannot open ledger at {}", cli.data_dir.display()))?;
    let registry = FacilityRegistry::new(store, EventBus::new());

    execute(&registry, cli.caller, cli.command, &SystemClock).await
}

/// Runs `command` against `registry` on behalf of `caller`.
///
/// # Errors
/// Mutating commands fail without a caller; registry errors are passed through.
pub async fn execute<S: FacilityStore>(
    registry: &FacilityRegistry<S>,
    caller: Option<Principal>,
    command: Command,
    clock: &dyn Clock,
) -> Result<Value> {
    let context = || {
        caller
            .clone()
            .map(|caller| CallContext::at(caller, clock))
            .with_context(|| format!("This command needs --caller or {CALLER_ENV}"))
    };

    let output = match command {
        Command::Register(details) => {
            let id = registry.register_facility(&context()?, details.into()).await?;
            json!({ "id": id })
        },
        Command::Get { id } => serde_json::to_value(registry.get_facility(id).await?)?,
        Command::Update { id, details } => {
            registry.update_facility(&context()?, id, details.into()).await?;
            json!({ "success": true })
        },
        Command::Deactivate { id } => {
            registry.deactivate_facility(&context()?, id).await?;
            json!({ "success": true })
        },
        Command::Reactivate { id } => {
            registry.reactivate_facility(&context()?, id).await?;
            json!({ "success": true })
        },
        Command::IsOwner { id, principal } => {
            json!({ "isOwner": registry.is_facility_owner(id, &principal).await? })
        },
        Command::Count => json!({ "count": registry.facility_count().await? }),
    };

    Ok(output)
}
