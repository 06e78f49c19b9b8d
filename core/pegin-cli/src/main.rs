//! pegin: command-line driver for the pegin session tracker.
//!
//! Each invocation restores the stored session, fires one transition and
//! prints the resulting record as JSON. Intended for scripting the flow from
//! polling jobs and for inspecting a user's stored session. Transitions other
//! than `start` fail when no complete session is stored.
//!
//! ## Subcommands
//!
//! - `show`: Print the stored session (no transition)
//! - `start`: Session started, reads the service's StartSessionResponse JSON from stdin
//! - `btc-arrived`, `minting`, `timeout-minting`, `timeout-btc-not-sent`,
//!   `minted`, `claimed`: one per pegin transition

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use pegin_core::{load_config, StorageConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pegin")]
#[command(about = "Pegin session state tracker")]
#[command(version)]
struct Cli {
    /// Session store file (default: from config.json, else ~/.pegin/session.json)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the stored session
    Show,

    /// Record a started session (reads StartSessionResponse JSON from stdin)
    Start,

    /// BTC observed at the escrow address
    BtcArrived,

    /// Minting still in progress
    Minting,

    /// Minting did not complete in time
    TimeoutMinting,

    /// BTC was never sent to the escrow address
    TimeoutBtcNotSent,

    /// tBTC minted; record redemption details
    Minted {
        /// Address receiving the minted tBTC
        #[arg(long)]
        address: String,

        /// Plasma bridge public key
        #[arg(long)]
        pkey: String,

        /// Redemption template
        #[arg(long)]
        template: String,
    },

    /// Redemption claimed
    Claimed,
}

fn main() {
    let cli = Cli::parse();
    let storage = StorageConfig::from_env();
    let logging_guard = logging::init(storage.as_ref().ok());

    let code = run(cli, storage);

    // Flush buffered log lines before exiting.
    drop(logging_guard);
    std::process::exit(code);
}

fn run(cli: Cli, storage: pegin_core::Result<StorageConfig>) -> i32 {
    let store_path = match (cli.store, storage) {
        (Some(path), _) => path,
        (None, Ok(storage)) => load_config(&storage).resolve_store_file(&storage),
        (None, Err(e)) => {
            tracing::error!(error = %e, "pegin could not resolve storage root");
            eprintln!("pegin: {}", e);
            return 1;
        }
    };

    let record = match commands::run(&cli.command, &store_path, std::io::stdin().lock()) {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(error = %e, command = ?cli.command, "pegin command failed");
            eprintln!("pegin: {}", e);
            return 1;
        }
    };

    match serde_json::to_string_pretty(&record) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "pegin failed to serialize session");
            1
        }
    }
}
