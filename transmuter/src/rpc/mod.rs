pub mod endpoints;
pub mod types;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::trace;

use crate::config::ClientConfig;
use crate::error::{Result, TransmuterError};
use crate::types::Address;

pub use endpoints::{Memcmp, TokenAccountsFilter};

/// Minimal Solana JSON-RPC client over HTTP.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    url: String,
    commitment: String,
    token_program: Address,
}

impl RpcClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.rpc_url.trim_end_matches('/').to_string(),
            commitment: config.commitment.clone(),
            token_program: config.token_program,
        }
    }

    /// Call a JSON-RPC method and decode its `result`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        trace!(method, "rpc call");

        let resp = self.client.post(&self.url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransmuterError::Http {
                status,
                message: body,
            });
        }

        let envelope: types::RpcResponse<T> = resp.json().await?;
        match (envelope.result, envelope.error) {
            (_, Some(err)) => Err(TransmuterError::Rpc {
                code: err.code,
                message: err.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(TransmuterError::Lookup(format!(
                "{method}: response carried neither result nor error"
            ))),
        }
    }

    /// Get the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn commitment(&self) -> &str {
        &self.commitment
    }

    pub fn token_program(&self) -> &Address {
        &self.token_program
    }
}
