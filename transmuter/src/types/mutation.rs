use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::{Result, TransmuterError};

/// A mutation has at most this many taker and maker vaults.
pub const MAX_VAULTS: usize = 3;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Tokens a user must deposit into one taker vault per use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakerRequirement {
    pub bank: Address,
    pub required_amount: u64,
}

/// Tokens paid out of one maker vault per use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakerPayout {
    pub mint: Address,
    pub amount_per_use: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPrice {
    pub price_lamports: u64,
    #[serde(default)]
    pub reversal_price_lamports: u64,
}

/// Mutation rules as configured on-chain. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationConfig {
    #[serde(default)]
    pub name: String,
    pub takers: Vec<TakerRequirement>,
    pub makers: Vec<MakerPayout>,
    #[serde(default)]
    pub price: MutationPrice,
    #[serde(default)]
    pub reversible: bool,
    #[serde(default)]
    pub duration_sec: u64,
    #[serde(default)]
    pub total_uses: u64,
    #[serde(default)]
    pub remaining_uses: u64,
}

impl MutationConfig {
    /// Check the shape constraints the on-chain program enforces.
    pub fn validate(&self) -> Result<()> {
        if self.takers.len() > MAX_VAULTS {
            return Err(TransmuterError::Validation(format!(
                "mutation has {} taker vaults, at most {MAX_VAULTS} allowed",
                self.takers.len()
            )));
        }
        if self.makers.len() > MAX_VAULTS {
            return Err(TransmuterError::Validation(format!(
                "mutation has {} maker vaults, at most {MAX_VAULTS} allowed",
                self.makers.len()
            )));
        }
        for (i, taker) in self.takers.iter().enumerate() {
            if self.takers[..i].iter().any(|t| t.bank == taker.bank) {
                return Err(TransmuterError::Validation(format!(
                    "bank {} appears in more than one taker slot",
                    taker.bank
                )));
            }
        }
        if self.remaining_uses > self.total_uses {
            return Err(TransmuterError::Validation(format!(
                "remaining uses {} exceed total uses {}",
                self.remaining_uses, self.total_uses
            )));
        }
        Ok(())
    }

    /// Takers the user actually has to fund.
    pub fn required_takers(&self) -> impl Iterator<Item = &TakerRequirement> {
        self.takers.iter().filter(|t| t.required_amount > 0)
    }

    pub fn taker_banks(&self) -> Vec<Address> {
        self.takers.iter().map(|t| t.bank).collect()
    }

    pub fn times_used(&self) -> u64 {
        self.total_uses.saturating_sub(self.remaining_uses)
    }

    pub fn price_sol(&self) -> f64 {
        self.price.price_lamports as f64 / LAMPORTS_PER_SOL as f64
    }

    pub fn reversal_price_sol(&self) -> f64 {
        self.price.reversal_price_lamports as f64 / LAMPORTS_PER_SOL as f64
    }
}

/// Slot label (`A`, `B`, `C`) for the vault at `index`.
pub fn vault_label(index: usize) -> char {
    (b'A' + (index as u8 % 26)) as char
}
