mod address;
mod availability;
mod mutation;
mod selection;
mod token;
mod transaction;
mod whitelist;

pub use address::Address;
pub use availability::{Availability, BankAvailability, TokenMatch};
pub use mutation::{
    vault_label, MakerPayout, MutationConfig, MutationPrice, TakerRequirement, LAMPORTS_PER_SOL,
    MAX_VAULTS,
};
pub use selection::{ChoiceOrigin, Selections, TokenChoice};
pub use token::{total_held, MintInfo, OwnedTokenAccount};
pub use transaction::{AccountMeta, Instruction, PendingTransaction, Signature};
pub use whitelist::{WhitelistEntry, WhitelistKind};

/// Banks are identified by their account address.
pub type BankId = Address;
