use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Address, BankAvailability, TokenMatch, WhitelistKind};

/// Where a token choice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum ChoiceOrigin {
    /// Picked from the bank's computed availability.
    Whitelisted {
        #[serde(rename = "match")]
        matched: TokenMatch,
    },
    /// Typed in by the user for a bank without a usable whitelist.
    FreeText,
}

/// The token a user chose to deposit into one bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenChoice {
    pub mint: Address,
    pub origin: ChoiceOrigin,
}

impl TokenChoice {
    pub fn kind(&self) -> WhitelistKind {
        match self.origin {
            ChoiceOrigin::Whitelisted { matched } => matched.kind(),
            ChoiceOrigin::FreeText => WhitelistKind::Mint,
        }
    }

    pub fn is_from_whitelist(&self) -> bool {
        matches!(self.origin, ChoiceOrigin::Whitelisted { .. })
    }

    pub fn creator(&self) -> Option<Address> {
        match self.origin {
            ChoiceOrigin::Whitelisted { matched } => matched.creator(),
            ChoiceOrigin::FreeText => None,
        }
    }
}

/// At most one token choice per bank; later choices replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(BTreeMap<Address, TokenChoice>);

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose `mint` for `bank` from the bank's availability.
    ///
    /// Token types without a sufficient balance (or unknown to the bank) are
    /// not selectable; returns whether the choice was stored.
    pub fn select_whitelisted(
        &mut self,
        bank: Address,
        mint: Address,
        availability: &BankAvailability,
    ) -> bool {
        match availability.get(&mint) {
            Some(a) if a.has_sufficient_balance => {
                self.0.insert(
                    bank,
                    TokenChoice {
                        mint,
                        origin: ChoiceOrigin::Whitelisted { matched: a.matched },
                    },
                );
                true
            }
            _ => {
                tracing::debug!(%bank, %mint, "ignoring selection without sufficient balance");
                false
            }
        }
    }

    /// Choose a free-text mint for `bank`.
    pub fn select_free_text(&mut self, bank: Address, mint: Address) {
        self.0.insert(
            bank,
            TokenChoice {
                mint,
                origin: ChoiceOrigin::FreeText,
            },
        );
    }

    pub fn insert(&mut self, bank: Address, choice: TokenChoice) -> Option<TokenChoice> {
        self.0.insert(bank, choice)
    }

    pub fn clear(&mut self, bank: &Address) -> Option<TokenChoice> {
        self.0.remove(bank)
    }

    pub fn get(&self, bank: &Address) -> Option<&TokenChoice> {
        self.0.get(bank)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &TokenChoice)> {
        self.0.iter()
    }
}

impl FromIterator<(Address, TokenChoice)> for Selections {
    fn from_iter<I: IntoIterator<Item = (Address, TokenChoice)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
