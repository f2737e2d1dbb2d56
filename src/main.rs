//! tx-guard: inspect what the guard would do with a transaction.
//!
//! Works against real guard and RPC endpoints using an account that needs
//! no wallet (no temp-account flow, no signing).

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use tx_guard::chain::{ChainRpc, Transaction};
use tx_guard::config::{load_config, TxGuardConfig};
use tx_guard::guard::{GuardClient, TransactionGuard};
use tx_guard::observability::init_logging;
use tx_guard::provider::{GuardProvider, RpcProvider};

#[derive(Parser)]
#[command(name = "tx-guard")]
#[command(about = "Query the transaction guard and preview sponsored transactions", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chain RPC URL (overrides config).
    #[arg(long)]
    rpc: Option<String>,

    /// Guard URL (overrides config; defaults to the RPC URL).
    #[arg(long)]
    guard: Option<String>,

    /// Account the transaction is signed for.
    #[arg(short, long)]
    account: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the raw guard policy for a transaction
    Policy {
        /// Transaction JSON file
        #[arg(short, long)]
        tx: PathBuf,
    },
    /// Show the account's CPU/NET availability
    Resources,
    /// Run the guard and print the prepared transaction
    Prepare {
        /// Transaction JSON file
        #[arg(short, long)]
        tx: PathBuf,

        /// Exit with an error instead of printing the unsponsored fallback
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TxGuardConfig::default(),
    };
    if let Some(rpc) = cli.rpc {
        config.chain.rpc_url = rpc;
    }
    if let Some(guard) = cli.guard {
        config.guard.endpoint = Some(guard);
    }

    init_logging(&config.observability.log_level);

    tracing::debug!(
        rpc_url = %config.chain.rpc_url,
        guard_endpoint = ?config.guard.endpoint,
        "Configuration loaded"
    );

    let provider = RpcProvider::new(cli.account.as_str(), &config.chain)?;

    match cli.command {
        Commands::Policy { tx } => {
            let transaction = read_transaction(&tx)?;
            let endpoint = config
                .guard
                .endpoint
                .clone()
                .unwrap_or_else(|| config.chain.rpc_url.clone());
            let client = GuardClient::new(
                &endpoint,
                std::time::Duration::from_secs(config.guard.request_timeout_secs),
            )?;
            let policy = client.fetch_policy(&cli.account, &transaction.actions).await?;
            print_json(&policy)?;
        }
        Commands::Resources => {
            let resources = provider.rpc().get_account(&cli.account).await?;
            print_json(&resources)?;
        }
        Commands::Prepare { tx, strict } => {
            let transaction = read_transaction(&tx)?;
            let guard = TransactionGuard::with_config(&provider, transaction, &config.guard)?;
            match guard.prepare().await {
                Ok(prepared) => print_json(&prepared)?,
                Err(failure) if strict => return Err(failure.into()),
                Err(failure) => {
                    eprintln!("Guard failed: {}", failure.error);
                    print_json(&failure.fallback)?;
                }
            }
        }
    }

    Ok(())
}

fn read_transaction(path: &Path) -> Result<Transaction, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
