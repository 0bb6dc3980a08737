//! vrp-cfgctl - VRP interface reconciliation front end
//!
//! Loads desired records and device facts, computes the commands that move
//! the device to the requested state and hands them to a sink.
//!
//! # Usage
//!
//! ```bash
//! # Show what replacing the declared ports would do
//! vrp-cfgctl --resource l2-interfaces --state replaced \
//!     --config ports.yaml --facts facts.json --check
//!
//! # Clear every Eth-Trunk and append the commands to a batch file
//! vrp-cfgctl --resource lag-interfaces --state deleted \
//!     --facts facts.json --commit batch.txt
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vrp_cfgmgr_common::config::DEFAULT_CONFIG_PATH;
use vrp_cfgmgr_common::{
    execute, load_records, ExecutionResult, FactsProvider, FileFacts, FileSink, MemorySink,
    ReconcileConfig, Reconciler, State,
};
use vrp_l2intfmgr::L2IntfMgr;
use vrp_lagmgr::LagMgr;

/// Reconcile VRP switch interfaces towards a declared state
#[derive(Parser, Debug)]
#[command(name = "vrp-cfgctl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Resource to reconcile
    #[arg(short = 'r', long, value_enum)]
    resource: ResourceArg,

    /// Desired end state
    #[arg(short = 's', long, value_enum, default_value = "merged")]
    state: StateArg,

    /// Desired records (JSON or YAML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Current device facts (JSON or YAML)
    #[arg(short = 'f', long)]
    facts: PathBuf,

    /// Reconciler settings (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    settings: PathBuf,

    /// Append the generated commands to this file (required unless --check)
    #[arg(long, required_unless_present = "check")]
    commit: Option<PathBuf>,

    /// Report the commands without applying them
    #[arg(long)]
    check: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResourceArg {
    /// Switchport mode and VLANs
    L2Interfaces,
    /// Eth-Trunk membership
    LagInterfaces,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StateArg {
    Merged,
    Replaced,
    Overridden,
    Deleted,
}

impl From<StateArg> for State {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Merged => State::Merged,
            StateArg::Replaced => State::Replaced,
            StateArg::Overridden => State::Overridden,
            StateArg::Deleted => State::Deleted,
        }
    }
}

/// Installs a stderr fmt subscriber; `RUST_LOG` wins over `level`
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level '{}'", level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn reconcile_with<M>(
    mgr: &M,
    state: State,
    want: Option<&Path>,
    facts: &FileFacts,
) -> Result<Vec<String>>
where
    M: Reconciler,
    M::Record: DeserializeOwned,
{
    let want: Vec<M::Record> = match want {
        Some(path) => load_records(path)
            .with_context(|| format!("failed to load desired records from {}", path.display()))?,
        None => Vec::new(),
    };
    let have: Vec<M::Record> = facts
        .get_facts(mgr.resource())
        .with_context(|| format!("failed to read {} facts", mgr.resource()))?;

    info!(
        "Reconciling {} declared against {} observed {}",
        want.len(),
        have.len(),
        mgr.resource()
    );
    mgr.reconcile(state, &want, &have)
        .with_context(|| format!("failed to reconcile {} ({})", mgr.resource(), state))
}

async fn run(args: &Args) -> Result<ExecutionResult> {
    let settings = ReconcileConfig::load_or_default(&args.settings)
        .with_context(|| format!("failed to load settings from {}", args.settings.display()))?;
    let facts = FileFacts::load(&args.facts)
        .with_context(|| format!("failed to load facts from {}", args.facts.display()))?;

    let state = State::from(args.state);
    let want = args.config.as_deref();
    let commands = match args.resource {
        ResourceArg::L2Interfaces => {
            reconcile_with(&L2IntfMgr::with_config(settings), state, want, &facts)?
        }
        ResourceArg::LagInterfaces => reconcile_with(&LagMgr::new(), state, want, &facts)?,
    };

    let result = match &args.commit {
        Some(path) => execute(&mut FileSink::new(path), commands, args.check).await?,
        None => execute(&mut MemorySink::default(), commands, true).await?,
    };
    Ok(result)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("vrp-cfgctl: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&args).await {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to encode result: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
