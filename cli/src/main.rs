//! Sigma CLI - Command line interface for Sigma coin mints and spends

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sigma::ProtocolVersion;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;


use commands::*;

#[derive(Parser)]
#[command(name = "sigmacli")]
#[command(version = "0.1.0")]
#[command(about = "Sigma zero-knowledge coins - derive, mint, spend and verify")]
#[command(long_about = r#"
Sigma coins are minted by publishing a commitment and spent by proving,
in zero knowledge, that one commitment of an anonymity set is yours.

Every coin is derived from your master key and a coin index, so nothing
but the key has to be kept. The key is read from --key or SIGMA_MASTER_KEY
and is never stored.

Quick Start:
  1. sigmacli mint-value --amount 1.5     Derive coins for an amount
  2. sigmacli spend --index 1 --set ...   Spend one of them
  3. sigmacli verify --proof ...          Check a spend
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Protocol version (30 or 31); overrides the config file
    #[arg(long, global = true)]
    protocol_version: Option<u32>,

    /// Path to the config file (default: ~/.sigma/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a coin and print its mint commitment
    Mint {
        /// Denomination (0.05, 0.1, 0.5, 1, 10, 25, 100)
        #[arg(short, long)]
        denomination: String,

        /// Master key (64 hex characters)
        #[arg(short, long, env = "SIGMA_MASTER_KEY", hide_env_values = true)]
        key: String,

        /// Coin index
        #[arg(short, long)]
        index: u32,
    },

    /// Split an amount into coins and print their commitments
    MintValue {
        /// Amount in coins, e.g. 126.65
        #[arg(short, long)]
        amount: String,

        /// Master key (64 hex characters)
        #[arg(short, long, env = "SIGMA_MASTER_KEY", hide_env_values = true)]
        key: String,

        /// Most recently used coin index; new coins start after it
        #[arg(long, default_value = "0")]
        last_index: u32,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a coin's serial number
    Serial {
        #[arg(short, long)]
        denomination: String,

        #[arg(short, long, env = "SIGMA_MASTER_KEY", hide_env_values = true)]
        key: String,

        #[arg(short, long)]
        index: u32,

        /// Print only the hex serial
        #[arg(long)]
        raw: bool,
    },

    /// Build a spend proof for a coin
    Spend {
        #[arg(short, long)]
        denomination: String,

        #[arg(short, long, env = "SIGMA_MASTER_KEY", hide_env_values = true)]
        key: String,

        #[arg(short, long)]
        index: u32,

        /// Anonymity set: comma separated commitments, or @file with one per line
        #[arg(short, long)]
        set: String,

        /// Anonymity set group id
        #[arg(short, long)]
        group_id: u32,

        /// Hash of the block the set was read at
        #[arg(long)]
        block_hash: String,

        /// Hash of the spending transaction
        #[arg(long)]
        tx_hash: String,

        /// Print only the proof hex
        #[arg(long)]
        raw: bool,
    },

    /// Verify a spend proof
    Verify {
        #[arg(short, long)]
        denomination: String,

        /// Spend proof hex
        #[arg(short, long)]
        proof: String,

        /// Anonymity set: comma separated commitments, or @file with one per line
        #[arg(short, long)]
        set: String,

        #[arg(short, long)]
        group_id: u32,

        #[arg(long)]
        block_hash: String,

        #[arg(long)]
        tx_hash: String,
    },

    /// Show protocol parameters and configuration
    Info,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective config
    Show,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let config = config::load_config(config_path)?;
    init_tracing(&config.log_filter);

    let version = match cli.protocol_version {
        Some(number) => ProtocolVersion::try_from(number)?,
        None => config.protocol_version()?,
    };
    tracing::debug!(%version, "resolved protocol version");

    match cli.command {
        Commands::Mint { denomination, key, index } => {
            let master = parse_master_key(&key)?;
            mint::run(parse_denomination(&denomination)?, &master, index, version)?;
        }
        Commands::MintValue { amount, key, last_index, json } => {
            let master = parse_master_key(&key)?;
            mint_value::run(parse_amount(&amount)?, &master, last_index, version, json)?;
        }
        Commands::Serial { denomination, key, index, raw } => {
            let master = parse_master_key(&key)?;
            serial::run(parse_denomination(&denomination)?, &master, index, raw)?;
        }
        Commands::Spend {
            denomination,
            key,
            index,
            set,
            group_id,
            block_hash,
            tx_hash,
            raw,
        } => {
            let master = parse_master_key(&key)?;
            spend::run(
                &master,
                spend::SpendOptions {
                    denomination: parse_denomination(&denomination)?,
                    index,
                    anonymity_set: read_anonymity_set(&set)?,
                    group_id,
                    block_hash,
                    tx_hash,
                    version,
                    raw,
                },
            )?;
        }
        Commands::Verify {
            denomination,
            proof,
            set,
            group_id,
            block_hash,
            tx_hash,
        } => {
            verify::run(verify::VerifyOptions {
                denomination: parse_denomination(&denomination)?,
                proof,
                anonymity_set: read_anonymity_set(&set)?,
                group_id,
                block_hash,
                tx_hash,
            })?;
        }
        Commands::Info => {
            info::run(&config, config_path)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config::init(config_path, cli.protocol_version, force)?,
            ConfigAction::Show => commands::config::show(config_path)?,
        },
    }

    Ok(())
}
