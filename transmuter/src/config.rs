use crate::error::{Result, TransmuterError};
use crate::types::Address;

/// Public mainnet RPC endpoint.
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Gem-bank program that owns banks and their whitelist proofs.
pub const GEM_BANK_PROGRAM_ID: &str = "bankHHdqMuaaST4qQk6mkzxGeKPHWmqdgor6Gs8r88m";

/// SPL token program.
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Configuration for the transmuter clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Solana JSON-RPC URL.
    pub rpc_url: String,
    /// Commitment level for reads (`processed`, `confirmed`, `finalized`).
    pub commitment: String,
    /// Gem-bank program id.
    pub gem_bank_program: Address,
    /// SPL token program id used to list token accounts.
    pub token_program: Address,
}

impl ClientConfig {
    /// Default config pointed at `rpc_url`.
    pub fn with_rpc_url(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }

    /// Check that the URL parses and the commitment level is known.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.rpc_url)
            .map_err(|e| TransmuterError::Validation(format!("invalid rpc url {}: {e}", self.rpc_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransmuterError::Validation(format!(
                "rpc url must be http(s), got {}",
                url.scheme()
            )));
        }
        if !matches!(self.commitment.as_str(), "processed" | "confirmed" | "finalized") {
            return Err(TransmuterError::Validation(format!(
                "unknown commitment level: {}",
                self.commitment
            )));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: MAINNET_RPC_URL.into(),
            commitment: "confirmed".into(),
            gem_bank_program: GEM_BANK_PROGRAM_ID.parse().unwrap_or_default(),
            token_program: TOKEN_PROGRAM_ID.parse().unwrap_or_default(),
        }
    }
}
