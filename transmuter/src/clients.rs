//! Seams to the external collaborators the workflows drive.
//!
//! The aggregator and executor never reach for ambient state: every chain
//! read or write goes through one of these traits, handed in by the caller.
//! [`crate::rpc::RpcClient`], [`crate::gem_bank::GemBankWhitelist`], and
//! [`crate::transmuter_state::TransmuterReader`] cover the read side over
//! JSON-RPC; write-side instruction encoding belongs to the
//! vault and mutation program clients.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{
    Address, MutationConfig, OwnedTokenAccount, PendingTransaction, Signature, WhitelistEntry,
};

/// Reads token holdings and mint state.
pub trait AccountFetcher {
    /// Every SPL token account owned by `owner`.
    async fn token_accounts_by_owner(&self, owner: &Address) -> Result<Vec<OwnedTokenAccount>>;

    /// `owner`'s token accounts for one mint, read fresh.
    async fn token_accounts_by_mint(
        &self,
        owner: &Address,
        mint: &Address,
    ) -> Result<Vec<OwnedTokenAccount>>;

    /// The mint's current minting authority, `None` if it has been revoked.
    async fn mint_authority(&self, mint: &Address) -> Result<Option<Address>>;
}

/// Lists the whitelist entries of a bank.
pub trait WhitelistSource {
    async fn fetch_whitelist(&self, bank: &Address) -> Result<Vec<WhitelistEntry>>;
}

/// Reads a mutation's on-chain configuration, taker banks included.
pub trait MutationSource {
    async fn fetch_mutation(&self, mutation: &Address) -> Result<MutationConfig>;
}

/// A taker vault address plus the transaction that creates it.
///
/// `tx` is empty when the vault already exists.
#[derive(Debug, Clone)]
pub struct TakerVault {
    pub vault: Address,
    pub tx: PendingTransaction,
}

/// Parameters of a single deposit into a taker vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRequest {
    pub bank: Address,
    pub vault: Address,
    pub owner: Address,
    pub amount: u64,
    pub mint: Address,
    pub source: Address,
}

/// Builds vault lifecycle and funding transactions.
pub trait VaultClient {
    async fn init_taker_vault(&self, bank: &Address, owner: &Address) -> Result<TakerVault>;

    async fn deposit(&self, request: &DepositRequest) -> Result<PendingTransaction>;
}

/// Builds the mutation's execute transaction.
pub trait MutationClient {
    async fn execute(&self, owner: &Address) -> Result<PendingTransaction>;
}

/// Signs, submits, and waits for confirmation.
pub trait TransactionSender {
    async fn send_and_confirm(&self, tx: &PendingTransaction) -> Result<Signature>;
}
