pub mod availability;
pub mod clients;
pub mod config;
pub mod error;
pub mod executor;
pub mod gem_bank;
pub mod rpc;
pub mod transmuter_state;
pub mod types;

#[cfg(feature = "solana")]
pub mod solana;

// ---- Top-level re-exports for ergonomic usage ----

// Config + errors
pub use config::ClientConfig;
pub use error::{Result, TransmuterError};

// Client seams
pub use clients::{
    AccountFetcher, DepositRequest, MutationClient, MutationSource, TakerVault, TransactionSender,
    VaultClient, WhitelistSource,
};

// JSON-RPC, gem-bank, and transmuter readers
pub use gem_bank::{GemBankWhitelist, WhitelistProof};
pub use rpc::RpcClient;
pub use transmuter_state::{MutationAccount, TransmuterAccount, TransmuterReader};

// Workflows
pub use availability::{compute_availability, fetch_whitelists, load_availability};
pub use executor::{plan_execution, DepositReceipt, ExecutionReport, ExecutionStep, MutationExecutor};

// Core types
pub use types::{
    Address, Availability, BankAvailability, BankId, ChoiceOrigin, MakerPayout, MutationConfig,
    MutationPrice,
    OwnedTokenAccount, PendingTransaction, Selections, TakerRequirement, TokenChoice, TokenMatch,
    WhitelistEntry, WhitelistKind,
};
