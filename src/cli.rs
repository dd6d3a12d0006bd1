use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use transmuter::Address;

/// mutate: inspect gem-bank whitelists and plan transmuter mutations.
#[derive(Parser, Debug)]
#[command(name = "mutate", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Solana JSON-RPC endpoint
    #[arg(long, env = "SOLANA_RPC_URL", global = true)]
    pub rpc_url: Option<String>,

    /// Commitment level for reads (processed, confirmed, finalized)
    #[arg(long, default_value = "confirmed", global = true)]
    pub commitment: String,

    /// Override the gem-bank program id
    #[arg(long, global = true)]
    pub gem_bank_program: Option<Address>,

    /// Output as JSON instead of TSV
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a mutation's vaults, price, and usage
    Show(ShowArgs),

    /// List the whitelist entries of one or more banks
    Whitelist(WhitelistArgs),

    /// Compute which whitelisted tokens a wallet can supply to each taker bank
    Availability(AvailabilityArgs),

    /// Validate token selections and print the execution steps
    Plan(PlanArgs),
}

/// Where the mutation rules come from: a local manifest or the chain.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MutationSourceArgs {
    /// Mutation manifest (JSON)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Mutation account address, read over RPC
    #[arg(long)]
    pub mutation: Option<Address>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: MutationSourceArgs,
}

#[derive(Args, Debug)]
pub struct WhitelistArgs {
    /// Bank addresses
    #[arg(required = true)]
    pub banks: Vec<Address>,
}

#[derive(Args, Debug)]
pub struct AvailabilityArgs {
    #[command(flatten)]
    pub source: MutationSourceArgs,

    /// Wallet address
    #[arg(long, env = "WALLET")]
    pub owner: Option<Address>,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub source: MutationSourceArgs,

    /// Token selections (JSON object of bank -> mint or token choice)
    #[arg(long)]
    pub selections: PathBuf,

    /// Re-check selections against the wallet's live whitelist availability
    #[arg(long)]
    pub check: bool,

    /// Wallet address, required with --check
    #[arg(long, env = "WALLET")]
    pub owner: Option<Address>,
}
