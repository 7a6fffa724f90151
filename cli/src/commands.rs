pub mod distribute;
pub mod networks;
pub mod registry;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use scatter_common::config::{
    AUDIT_LOG_FILE, Config, NETWORKS_FILE, RECIPIENTS_FILE, REGISTRY_FILE,
};

#[derive(Parser)]
#[command(name = "scatter")]
#[command(about = "Distribute a deployed token to many wallets across several networks.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Deployment registry written by the deploy step
    #[arg(long, global = true, default_value = REGISTRY_FILE)]
    pub registry: PathBuf,

    /// Newline separated recipient addresses
    #[arg(long, global = true, default_value = RECIPIENTS_FILE)]
    pub recipients: PathBuf,

    /// JSON file declaring the target networks
    #[arg(long, global = true, default_value = NETWORKS_FILE)]
    pub networks: PathBuf,

    /// Append-only audit log
    #[arg(long, global = true, default_value = AUDIT_LOG_FILE)]
    pub log: PathBuf,

    /// Raise terminal verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send the token to every sampled recipient on every target network
    #[command(alias = "d")]
    Distribute {
        /// Token symbol to distribute; prompted for when omitted
        #[arg(short, long)]
        symbol: Option<String>,
        /// Blocks to wait for before a transfer counts as sent (0 = submitted)
        #[arg(long, default_value_t = 0)]
        confirmations: usize,
        /// Pause between transfers on one network, in milliseconds
        #[arg(long, default_value_t = 2_000)]
        delay_ms: u64,
        /// Seed for recipient sampling and amounts
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show each target network and the endpoint it resolves to
    #[command(alias = "n")]
    Networks,
    /// List deployment records
    #[command(alias = "r")]
    Registry {
        /// Only show this token
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            registry_path: self.registry.clone(),
            recipients_path: self.recipients.clone(),
            networks_path: self.networks.clone(),
            audit_log_path: self.log.clone(),
            ..Config::default()
        }
    }
}
