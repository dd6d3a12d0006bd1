use serde::{Deserialize, Serialize};

use super::Address;

/// A token account owned by the connected wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedTokenAccount {
    /// Token type held by the account.
    pub mint: Address,
    /// Address of the token account itself.
    pub account: Address,
    /// Raw balance in base units.
    pub amount: u64,
}

impl OwnedTokenAccount {
    pub fn holds_any(&self) -> bool {
        self.amount > 0
    }
}

/// Parsed SPL mint state, as far as availability checks need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintInfo {
    pub mint_authority: Option<Address>,
    pub supply: u64,
    pub decimals: u8,
}

/// Sum of balances for `mint` across `accounts`.
pub fn total_held(accounts: &[OwnedTokenAccount], mint: &Address) -> u64 {
    accounts
        .iter()
        .filter(|a| &a.mint == mint)
        .fold(0u64, |acc, a| acc.saturating_add(a.amount))
}
