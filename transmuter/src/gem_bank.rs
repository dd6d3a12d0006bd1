//! Bank whitelists, read from gem-bank whitelist proof accounts.
//!
//! Each proof account is laid out as:
//!
//! | offset | size | field                 |
//! |--------|------|-----------------------|
//! | 0      | 8    | account discriminator |
//! | 8      | 1    | `whitelist_type` bits |
//! | 9      | 32   | `whitelisted_address` |
//! | 41     | 32   | `bank`                |

use tracing::debug;

use crate::clients::WhitelistSource;
use crate::error::{Result, TransmuterError};
use crate::rpc::{Memcmp, RpcClient};
use crate::types::{Address, WhitelistEntry, WhitelistKind};

/// Anchor discriminator of `WhitelistProof` accounts.
pub const WHITELIST_PROOF_DISCRIMINATOR: [u8; 8] = [194, 230, 60, 10, 60, 98, 236, 39];

const TYPE_OFFSET: usize = 8;
const ADDRESS_OFFSET: usize = 9;
const BANK_OFFSET: usize = 41;
const MIN_PROOF_LEN: usize = BANK_OFFSET + Address::LEN;

/// A decoded whitelist proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitelistProof {
    pub whitelist_type: u8,
    pub whitelisted_address: Address,
    pub bank: Address,
}

impl WhitelistProof {
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_PROOF_LEN {
            return Err(TransmuterError::Lookup(format!(
                "whitelist proof too short: {} bytes, need {MIN_PROOF_LEN}",
                data.len()
            )));
        }
        if data[..TYPE_OFFSET] != WHITELIST_PROOF_DISCRIMINATOR {
            return Err(TransmuterError::Lookup(
                "account is not a whitelist proof: discriminator mismatch".into(),
            ));
        }
        let whitelisted_address = Address::from_slice(&data[ADDRESS_OFFSET..])
            .ok_or_else(|| TransmuterError::Lookup("whitelist proof address truncated".into()))?;
        let bank = Address::from_slice(&data[BANK_OFFSET..])
            .ok_or_else(|| TransmuterError::Lookup("whitelist proof bank truncated".into()))?;
        Ok(Self {
            whitelist_type: data[TYPE_OFFSET],
            whitelisted_address,
            bank,
        })
    }

    /// One entry per kind flagged on the proof.
    pub fn entries(&self) -> impl Iterator<Item = WhitelistEntry> {
        let address = self.whitelisted_address;
        WhitelistKind::from_flags(self.whitelist_type)
            .into_iter()
            .map(move |kind| WhitelistEntry { kind, address })
    }
}

/// [`WhitelistSource`] backed by gem-bank program accounts.
#[derive(Debug, Clone)]
pub struct GemBankWhitelist {
    rpc: RpcClient,
    program: Address,
}

impl GemBankWhitelist {
    pub fn new(rpc: RpcClient, program: Address) -> Self {
        Self { rpc, program }
    }

    /// Every whitelist proof recorded for `bank`.
    pub async fn fetch_proofs(&self, bank: &Address) -> Result<Vec<(Address, WhitelistProof)>> {
        let accounts = self
            .rpc
            .get_program_accounts(
                &self.program,
                &[
                    Memcmp::new(0, WHITELIST_PROOF_DISCRIMINATOR),
                    Memcmp::new(BANK_OFFSET, bank.to_bytes()),
                ],
            )
            .await?;

        let mut proofs = Vec::with_capacity(accounts.len());
        for (address, data) in accounts {
            let proof = WhitelistProof::decode(&data)?;
            if &proof.bank != bank {
                continue;
            }
            proofs.push((address, proof));
        }
        // Stable output regardless of RPC ordering.
        proofs.sort_by_key(|(address, _)| *address);
        debug!(bank = %bank.short(), proofs = proofs.len(), "whitelist proofs fetched");
        Ok(proofs)
    }
}

impl WhitelistSource for GemBankWhitelist {
    async fn fetch_whitelist(&self, bank: &Address) -> Result<Vec<WhitelistEntry>> {
        let proofs = self.fetch_proofs(bank).await?;
        Ok(proofs
            .iter()
            .flat_map(|(_, proof)| proof.entries())
            .collect())
    }
}
