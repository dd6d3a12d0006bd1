use thiserror::Error;

use crate::types::Address;

#[derive(Error, Debug)]
pub enum TransmuterError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("missing required tokens for bank {bank}: select a token for each required vault")]
    MissingSelection { bank: Address },

    #[error("no token account holds enough of {mint} to fund bank {bank}")]
    NoFundingSource { bank: Address, mint: Address },

    #[error("transaction failed during {step}: {message}")]
    Transaction { step: String, message: String },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[cfg(feature = "solana")]
    #[error("solana error: {0}")]
    Solana(String),
}

impl TransmuterError {
    /// Collapse any error raised while reading chain state into a `Lookup`.
    pub fn into_lookup(self) -> Self {
        match self {
            TransmuterError::Lookup(_) => self,
            other => TransmuterError::Lookup(other.to_string()),
        }
    }

    /// Tag an error raised by an on-chain submission with the step it failed in.
    pub fn into_transaction(self, step: impl Into<String>) -> Self {
        match self {
            TransmuterError::Transaction { .. } => self,
            other => TransmuterError::Transaction {
                step: step.into(),
                message: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, TransmuterError>;
