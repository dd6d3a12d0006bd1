//! Wire shapes of the JSON-RPC responses this crate reads.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RpcContext {
    pub slot: u64,
}

/// `{ context, value }` wrapper used by most account methods.
#[derive(Debug, Deserialize)]
pub struct WithContext<T> {
    pub context: RpcContext,
    pub value: T,
}

#[derive(Debug, Deserialize)]
pub struct KeyedAccount {
    pub pubkey: String,
    pub account: UiAccount,
}

#[derive(Debug, Deserialize)]
pub struct UiAccount {
    pub lamports: u64,
    pub owner: String,
    pub data: AccountData,
}

/// Account data as returned for `jsonParsed` or `base64` encodings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AccountData {
    Parsed(ParsedAccountData),
    /// `[data, encoding]`
    Binary(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct ParsedAccountData {
    pub program: String,
    pub parsed: Value,
}

/// `{ "type": ..., "info": ... }` body of a parsed account.
#[derive(Debug, Deserialize)]
pub struct ParsedInfo<T> {
    #[serde(rename = "type")]
    pub kind: String,
    pub info: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTokenAccount {
    pub mint: String,
    pub owner: String,
    pub token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    pub amount: String,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMint {
    pub mint_authority: Option<String>,
    pub supply: String,
    pub decimals: u8,
}
