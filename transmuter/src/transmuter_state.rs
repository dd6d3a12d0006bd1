//! Mutation and transmuter account state.
//!
//! Both are Anchor accounts: an 8-byte discriminator followed by the
//! Borsh-encoded body.
//!
//! `Mutation`:
//!
//! | field              | type                          |
//! |--------------------|-------------------------------|
//! | `version`          | `u16`                         |
//! | `transmuter`       | `Pubkey`                      |
//! | `taker_token_a`    | `TakerTokenConfig`            |
//! | `taker_token_b/c`  | `Option<TakerTokenConfig>`    |
//! | `maker_token_a`    | `MakerTokenConfig`            |
//! | `maker_token_b/c`  | `Option<MakerTokenConfig>`    |
//! | `price_config`     | `u64` price, `u64` reversal   |
//! | `mutation_time_sec`| `u64`                         |
//! | `reversible`       | `bool`                        |
//! | `total_uses`       | `u64`                         |
//! | `remaining_uses`   | `u64`                         |
//!
//! `Transmuter`: `version: u16`, `authority`, `authority_seed`,
//! `authority_bump_seed: [u8; 1]`, `owner`, then `bank_a`, `bank_b`, `bank_c`.

use borsh::BorshDeserialize;
use tracing::debug;

use crate::clients::MutationSource;
use crate::error::{Result, TransmuterError};
use crate::rpc::RpcClient;
use crate::types::{
    Address, MakerPayout, MutationConfig, MutationPrice, TakerRequirement,
};

/// Anchor discriminator of `Mutation` accounts.
pub const MUTATION_DISCRIMINATOR: [u8; 8] = [52, 193, 122, 254, 219, 154, 89, 215];

/// Anchor discriminator of `Transmuter` accounts.
pub const TRANSMUTER_DISCRIMINATOR: [u8; 8] = [2, 44, 195, 228, 154, 156, 214, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshDeserialize)]
pub struct TakerTokenConfig {
    pub gem_bank: [u8; 32],
    pub required_amount: u64,
    pub required_units: u8,
    pub vault_action: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshDeserialize)]
pub struct MakerTokenConfig {
    pub mint: [u8; 32],
    pub total_funding: u64,
    pub amount_per_use: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshDeserialize)]
pub struct PriceConfig {
    pub price_lamports: u64,
    pub reversal_price_lamports: u64,
}

/// Decoded `Mutation` account body.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize)]
pub struct MutationAccount {
    pub version: u16,
    pub transmuter: [u8; 32],
    pub taker_token_a: TakerTokenConfig,
    pub taker_token_b: Option<TakerTokenConfig>,
    pub taker_token_c: Option<TakerTokenConfig>,
    pub maker_token_a: MakerTokenConfig,
    pub maker_token_b: Option<MakerTokenConfig>,
    pub maker_token_c: Option<MakerTokenConfig>,
    pub price_config: PriceConfig,
    pub mutation_time_sec: u64,
    pub reversible: bool,
    pub total_uses: u64,
    pub remaining_uses: u64,
}

/// Decoded `Transmuter` account body.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize)]
pub struct TransmuterAccount {
    pub version: u16,
    pub authority: [u8; 32],
    pub authority_seed: [u8; 32],
    pub authority_bump_seed: [u8; 1],
    pub owner: [u8; 32],
    pub bank_a: [u8; 32],
    pub bank_b: [u8; 32],
    pub bank_c: [u8; 32],
}

fn decode_anchor<T: BorshDeserialize>(data: &[u8], discriminator: &[u8; 8], what: &str) -> Result<T> {
    let Some((head, mut body)) = data.split_first_chunk::<8>() else {
        return Err(TransmuterError::Lookup(format!(
            "{what} account too short: {} bytes",
            data.len()
        )));
    };
    if head != discriminator {
        return Err(TransmuterError::Lookup(format!(
            "account is not a {what}: discriminator mismatch"
        )));
    }
    // Trailing padding is expected; only the prefix is decoded.
    T::deserialize(&mut body)
        .map_err(|e| TransmuterError::Lookup(format!("malformed {what} account: {e}")))
}

impl MutationAccount {
    pub fn decode(data: &[u8]) -> Result<Self> {
        decode_anchor(data, &MUTATION_DISCRIMINATOR, "mutation")
    }

    pub fn transmuter(&self) -> Address {
        Address::new(self.transmuter)
    }

    /// Flatten into a [`MutationConfig`], checking every taker bank belongs
    /// to `transmuter`.
    pub fn to_config(&self, name: String, transmuter: &TransmuterAccount) -> Result<MutationConfig> {
        let banks = transmuter.banks();
        let takers = [Some(self.taker_token_a), self.taker_token_b, self.taker_token_c]
            .into_iter()
            .flatten()
            .map(|taker| {
                let bank = Address::new(taker.gem_bank);
                if !banks.contains(&bank) {
                    return Err(TransmuterError::Lookup(format!(
                        "taker bank {bank} is not one of the transmuter's banks"
                    )));
                }
                Ok(TakerRequirement {
                    bank,
                    required_amount: taker.required_amount,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let makers = [Some(self.maker_token_a), self.maker_token_b, self.maker_token_c]
            .into_iter()
            .flatten()
            .map(|maker| MakerPayout {
                mint: Address::new(maker.mint),
                amount_per_use: maker.amount_per_use,
            })
            .collect();

        Ok(MutationConfig {
            name,
            takers,
            makers,
            price: MutationPrice {
                price_lamports: self.price_config.price_lamports,
                reversal_price_lamports: self.price_config.reversal_price_lamports,
            },
            reversible: self.reversible,
            duration_sec: self.mutation_time_sec,
            total_uses: self.total_uses,
            remaining_uses: self.remaining_uses,
        })
    }
}

impl TransmuterAccount {
    pub fn decode(data: &[u8]) -> Result<Self> {
        decode_anchor(data, &TRANSMUTER_DISCRIMINATOR, "transmuter")
    }

    pub fn banks(&self) -> [Address; 3] {
        [
            Address::new(self.bank_a),
            Address::new(self.bank_b),
            Address::new(self.bank_c),
        ]
    }
}

/// [`MutationSource`] reading mutation and transmuter accounts over JSON-RPC.
#[derive(Debug, Clone)]
pub struct TransmuterReader {
    rpc: RpcClient,
}

impl TransmuterReader {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    pub async fn fetch_mutation_account(&self, mutation: &Address) -> Result<MutationAccount> {
        let (owner, data) = self.rpc.get_account_data(mutation).await?;
        debug!(mutation = %mutation.short(), program = %owner.short(), bytes = data.len(), "mutation account fetched");
        MutationAccount::decode(&data)
    }

    pub async fn fetch_transmuter_account(&self, transmuter: &Address) -> Result<TransmuterAccount> {
        let (owner, data) = self.rpc.get_account_data(transmuter).await?;
        debug!(transmuter = %transmuter.short(), program = %owner.short(), bytes = data.len(), "transmuter account fetched");
        TransmuterAccount::decode(&data)
    }
}

impl MutationSource for TransmuterReader {
    async fn fetch_mutation(&self, mutation: &Address) -> Result<MutationConfig> {
        let account = self.fetch_mutation_account(mutation).await?;
        let transmuter = self.fetch_transmuter_account(&account.transmuter()).await?;
        let config = account.to_config(mutation.to_string(), &transmuter)?;
        config.validate()?;
        Ok(config)
    }
}
