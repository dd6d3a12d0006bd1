use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Address, WhitelistKind};

/// Which whitelist rule admitted a token type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TokenMatch {
    Mint,
    Creator { creator: Address },
}

impl TokenMatch {
    pub fn kind(&self) -> WhitelistKind {
        match self {
            TokenMatch::Mint => WhitelistKind::Mint,
            TokenMatch::Creator { .. } => WhitelistKind::Creator,
        }
    }

    pub fn creator(&self) -> Option<Address> {
        match self {
            TokenMatch::Mint => None,
            TokenMatch::Creator { creator } => Some(*creator),
        }
    }
}

/// Whether the wallet can supply a given token type to a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub has_sufficient_balance: bool,
    #[serde(rename = "match")]
    pub matched: TokenMatch,
}

impl Availability {
    pub fn mint(has_sufficient_balance: bool) -> Self {
        Self {
            has_sufficient_balance,
            matched: TokenMatch::Mint,
        }
    }

    pub fn creator(has_sufficient_balance: bool, creator: Address) -> Self {
        Self {
            has_sufficient_balance,
            matched: TokenMatch::Creator { creator },
        }
    }
}

/// Availability of every candidate token type for one bank.
///
/// An empty record means nothing is known to be acceptable; callers fall back
/// to free-text token entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAvailability {
    pub mints: BTreeMap<Address, Availability>,
    /// Number of whitelist entries the bank declares.
    pub whitelist_len: usize,
}

impl BankAvailability {
    pub fn new(whitelist_len: usize) -> Self {
        Self {
            mints: BTreeMap::new(),
            whitelist_len,
        }
    }

    /// Record `availability` for `mint`. A positive record is never replaced.
    ///
    /// Returns `true` if the stored record changed.
    pub fn record(&mut self, mint: Address, availability: Availability) -> bool {
        match self.mints.get(&mint) {
            Some(existing) if existing.has_sufficient_balance => false,
            // Both negative: keep the first rule that named this mint.
            Some(_) if !availability.has_sufficient_balance => false,
            _ => {
                self.mints.insert(mint, availability);
                true
            }
        }
    }

    pub fn get(&self, mint: &Address) -> Option<&Availability> {
        self.mints.get(mint)
    }

    pub fn is_free_text(&self) -> bool {
        self.mints.is_empty()
    }

    /// Token types the wallet can actually supply.
    pub fn sufficient(&self) -> impl Iterator<Item = (&Address, &Availability)> {
        self.mints.iter().filter(|(_, a)| a.has_sufficient_balance)
    }
}
