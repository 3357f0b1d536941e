use crate::wallets;
use clap::Parser;
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use craps::{
    ledger::DEFAULT_NAMESPACE,
    storage::{
        InMemoryStore,
        KeyValueStore,
        SledStore,
    },
    wallet::StaticWallet,
};
use std::path::PathBuf;

pub const DATA_DIR_NAME: &str = ".street-craps";

#[derive(Parser, Debug)]
#[command(
    name = "street-craps",
    version,
    about = "Pass-line craps in the terminal with a local leaderboard",
    long_about = None
)]
pub struct Args {
    /// Wallet address to play as; rolling is disabled without one
    #[arg(short, long)]
    pub address: Option<String>,

    /// Wallet balance in ETH, as a decimal string
    #[arg(short, long)]
    pub balance: Option<String>,

    /// Directory for the sled ledger (defaults to ~/.street-craps)
    #[arg(long, conflicts_with = "in_memory")]
    pub data_dir: Option<String>,

    /// Prefix for every ledger key
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Keep the ledger in memory only
    #[arg(long)]
    pub in_memory: bool,

    /// Seed the dice for a reproducible session
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for log files (defaults to <data dir>/logs)
    #[arg(long)]
    pub log_dir: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreTarget {
    InMemory,
    Sled { path: PathBuf },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub wallet: StaticWallet,
    pub store: StoreTarget,
    pub namespace: String,
    pub seed: Option<u64>,
    pub log_dir: PathBuf,
    /// Accepted but suspicious flags, logged once tracing is installed.
    pub warnings: Vec<String>,
}

impl AppConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        let (address, balance) = (args.address.as_deref(), args.balance.as_deref());
        let wallet = wallets::wallet_from_flags(address, balance)?;
        let warnings = wallets::flag_warnings(address, balance);
        let data_dir = || resolve_data_dir(args.data_dir.as_deref());
        let store = if args.in_memory {
            StoreTarget::InMemory
        } else {
            StoreTarget::Sled {
                path: data_dir()?.join("ledger"),
            }
        };
        let log_dir = match args.log_dir.as_deref() {
            Some(raw) => expand_path(raw),
            None => data_dir()?.join("logs"),
        };
        Ok(Self {
            wallet,
            store,
            namespace: args.namespace,
            seed: args.seed,
            log_dir,
            warnings,
        })
    }

    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>> {
        match &self.store {
            StoreTarget::InMemory => Ok(Box::new(InMemoryStore::new())),
            StoreTarget::Sled { path } => {
                std::fs::create_dir_all(path).wrap_err_with(|| {
                    format!("create ledger directory {}", path.display())
                })?;
                let store = SledStore::open(path).map_err(|e| eyre!("{e:#}"))?;
                tracing::info!("Using sled ledger at {}", path.display());
                Ok(Box::new(store))
            }
        }
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").wrap_err("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(DATA_DIR_NAME))
}

pub fn resolve_data_dir(dir: Option<&str>) -> Result<PathBuf> {
    match dir {
        Some(raw) => Ok(expand_path(raw)),
        None => default_data_dir(),
    }
}

fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    PathBuf::from(expanded.into_owned())
}
