use base64::Engine;
use serde_json::{json, Value};
use tracing::debug;

use super::types::{
    AccountData, KeyedAccount, ParsedInfo, ParsedMint, ParsedTokenAccount, UiAccount, WithContext,
};
use super::RpcClient;
use crate::clients::AccountFetcher;
use crate::error::{Result, TransmuterError};
use crate::types::{Address, MintInfo, OwnedTokenAccount};

/// Which token accounts `getTokenAccountsByOwner` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAccountsFilter {
    /// Only accounts of this mint.
    Mint(Address),
    /// Every account owned by this token program.
    ProgramId(Address),
}

impl TokenAccountsFilter {
    fn to_json(self) -> Value {
        match self {
            TokenAccountsFilter::Mint(mint) => json!({ "mint": mint.to_string() }),
            TokenAccountsFilter::ProgramId(program) => json!({ "programId": program.to_string() }),
        }
    }
}

/// `memcmp` filter for `getProgramAccounts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memcmp {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl Memcmp {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "memcmp": {
                "offset": self.offset,
                "bytes": bs58::encode(&self.bytes).into_string(),
            }
        })
    }
}

impl RpcClient {
    /// getTokenAccountsByOwner (jsonParsed) - Token accounts held by `owner`.
    pub async fn get_token_accounts_by_owner(
        &self,
        owner: &Address,
        filter: TokenAccountsFilter,
    ) -> Result<Vec<OwnedTokenAccount>> {
        let resp: WithContext<Vec<KeyedAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    filter.to_json(),
                    { "encoding": "jsonParsed", "commitment": self.commitment() }
                ]),
            )
            .await?;

        debug!(slot = resp.context.slot, count = resp.value.len(), "token accounts fetched");
        resp.value.into_iter().map(parse_token_account).collect()
    }

    /// getAccountInfo (jsonParsed) - Parsed state of an SPL mint.
    pub async fn get_mint_info(&self, mint: &Address) -> Result<MintInfo> {
        let resp: WithContext<Option<UiAccount>> = self
            .call(
                "getAccountInfo",
                json!([
                    mint.to_string(),
                    { "encoding": "jsonParsed", "commitment": self.commitment() }
                ]),
            )
            .await?;

        let account = resp
            .value
            .ok_or_else(|| TransmuterError::Lookup(format!("mint account {mint} not found")))?;
        let parsed: ParsedInfo<ParsedMint> = parsed_info(&account.data, "mint", mint)?;

        Ok(MintInfo {
            mint_authority: parsed
                .info
                .mint_authority
                .as_deref()
                .map(str::parse::<Address>)
                .transpose()?,
            supply: parse_amount(&parsed.info.supply)?,
            decimals: parsed.info.decimals,
        })
    }

    /// getAccountInfo (base64) - Raw data and owning program of one account.
    pub async fn get_account_data(&self, address: &Address) -> Result<(Address, Vec<u8>)> {
        let resp: WithContext<Option<UiAccount>> = self
            .call(
                "getAccountInfo",
                json!([
                    address.to_string(),
                    { "encoding": "base64", "commitment": self.commitment() }
                ]),
            )
            .await?;

        let account = resp
            .value
            .ok_or_else(|| TransmuterError::Lookup(format!("account {address} not found")))?;
        let owner: Address = account.owner.parse()?;
        Ok((owner, decode_binary(&account.data, address)?))
    }

    /// getProgramAccounts (base64) - Raw data of every matching program account.
    pub async fn get_program_accounts(
        &self,
        program: &Address,
        filters: &[Memcmp],
    ) -> Result<Vec<(Address, Vec<u8>)>> {
        let filters: Vec<Value> = filters.iter().map(Memcmp::to_json).collect();
        let accounts: Vec<KeyedAccount> = self
            .call(
                "getProgramAccounts",
                json!([
                    program.to_string(),
                    {
                        "encoding": "base64",
                        "commitment": self.commitment(),
                        "filters": filters,
                    }
                ]),
            )
            .await?;

        accounts
            .into_iter()
            .map(|keyed| -> Result<(Address, Vec<u8>)> {
                let address: Address = keyed.pubkey.parse()?;
                let data = decode_binary(&keyed.account.data, &address)?;
                Ok((address, data))
            })
            .collect()
    }
}

impl AccountFetcher for RpcClient {
    async fn token_accounts_by_owner(&self, owner: &Address) -> Result<Vec<OwnedTokenAccount>> {
        let program = *self.token_program();
        self.get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(program))
            .await
    }

    async fn token_accounts_by_mint(
        &self,
        owner: &Address,
        mint: &Address,
    ) -> Result<Vec<OwnedTokenAccount>> {
        self.get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*mint))
            .await
    }

    async fn mint_authority(&self, mint: &Address) -> Result<Option<Address>> {
        Ok(self.get_mint_info(mint).await?.mint_authority)
    }
}

fn parse_token_account(keyed: KeyedAccount) -> Result<OwnedTokenAccount> {
    let account: Address = keyed.pubkey.parse()?;
    let parsed: ParsedInfo<ParsedTokenAccount> =
        parsed_info(&keyed.account.data, "account", &account)?;
    Ok(OwnedTokenAccount {
        mint: parsed.info.mint.parse()?,
        account,
        amount: parse_amount(&parsed.info.token_amount.amount)?,
    })
}

fn parsed_info<T: serde::de::DeserializeOwned>(
    data: &AccountData,
    expected: &str,
    address: &Address,
) -> Result<ParsedInfo<T>> {
    let AccountData::Parsed(parsed) = data else {
        return Err(TransmuterError::Lookup(format!(
            "account {address} is not a parsed token account"
        )));
    };
    let info: ParsedInfo<T> = serde_json::from_value(parsed.parsed.clone()).map_err(|e| {
        TransmuterError::Lookup(format!("malformed {} data for {address}: {e}", parsed.program))
    })?;
    if info.kind != expected {
        return Err(TransmuterError::Lookup(format!(
            "account {address} is a {}, expected {expected}",
            info.kind
        )));
    }
    Ok(info)
}

fn decode_binary(data: &AccountData, address: &Address) -> Result<Vec<u8>> {
    match data {
        AccountData::Binary(parts) if parts.len() == 2 && parts[1] == "base64" => {
            base64::engine::general_purpose::STANDARD
                .decode(&parts[0])
                .map_err(|e| TransmuterError::Lookup(format!("bad base64 data for {address}: {e}")))
        }
        _ => Err(TransmuterError::Lookup(format!(
            "account {address} data is not base64-encoded"
        ))),
    }
}

fn parse_amount(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|e| TransmuterError::Lookup(format!("invalid token amount {raw:?}: {e}")))
}
