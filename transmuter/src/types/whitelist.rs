use std::fmt;

use serde::{Deserialize, Serialize};

use super::Address;

/// How a whitelist entry admits tokens into a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitelistKind {
    /// Any token whose minting authority is the entry's address.
    Creator,
    /// Exactly the token type identified by the entry's address.
    Mint,
}

impl WhitelistKind {
    /// Bit used for this kind in the gem-bank `whitelist_type` field.
    pub const fn flag(self) -> u8 {
        match self {
            WhitelistKind::Creator => 1 << 0,
            WhitelistKind::Mint => 1 << 1,
        }
    }

    /// Expand a `whitelist_type` bitfield into the kinds it carries.
    pub fn from_flags(flags: u8) -> Vec<WhitelistKind> {
        [WhitelistKind::Creator, WhitelistKind::Mint]
            .into_iter()
            .filter(|kind| flags & kind.flag() != 0)
            .collect()
    }
}

impl fmt::Display for WhitelistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhitelistKind::Creator => f.write_str("creator"),
            WhitelistKind::Mint => f.write_str("mint"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistEntry {
    pub kind: WhitelistKind,
    pub address: Address,
}

impl WhitelistEntry {
    pub fn creator(address: Address) -> Self {
        Self {
            kind: WhitelistKind::Creator,
            address,
        }
    }

    pub fn mint(address: Address) -> Self {
        Self {
            kind: WhitelistKind::Mint,
            address,
        }
    }
}
