//! JSON-RPC reader tests against a mock HTTP node.

use std::collections::BTreeMap;

use base64::Engine;
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use transmuter::gem_bank::WHITELIST_PROOF_DISCRIMINATOR;
use transmuter::transmuter_state::{MUTATION_DISCRIMINATOR, TRANSMUTER_DISCRIMINATOR};
use transmuter::{
    load_availability, AccountFetcher, Address, Availability, ClientConfig, GemBankWhitelist,
    MutationSource, RpcClient, TransmuterError, TransmuterReader, WhitelistEntry, WhitelistSource,
};

const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

fn addr(b: u8) -> Address {
    Address::new([b; 32])
}

/// Matches a JSON-RPC request by method, first positional param, and the
/// key of the token-accounts filter object.
struct RpcCall {
    method: &'static str,
    first_param: Option<String>,
    filter_key: Option<&'static str>,
}

impl RpcCall {
    fn new(method: &'static str) -> Self {
        Self {
            method,
            first_param: None,
            filter_key: None,
        }
    }

    fn for_address(mut self, address: &Address) -> Self {
        self.first_param = Some(address.to_string());
        self
    }

    fn with_filter(mut self, key: &'static str) -> Self {
        self.filter_key = Some(key);
        self
    }
}

impl Match for RpcCall {
    fn matches(&self, request: &Request) -> bool {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return false;
        };
        if body["method"] != self.method {
            return false;
        }
        if let Some(first) = &self.first_param {
            if body["params"][0] != first.as_str() {
                return false;
            }
        }
        if let Some(key) = self.filter_key {
            if body["params"][1].get(key).is_none() {
                return false;
            }
        }
        true
    }
}

fn rpc_ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
    }))
}

fn token_account(account: &Address, mint: &Address, owner: &Address, amount: u64) -> Value {
    json!({
        "pubkey": account.to_string(),
        "account": {
            "lamports": 2039280,
            "owner": TOKEN_PROGRAM,
            "executable": false,
            "rentEpoch": 0,
            "data": {
                "program": "spl-token",
                "space": 165,
                "parsed": {
                    "type": "account",
                    "info": {
                        "mint": mint.to_string(),
                        "owner": owner.to_string(),
                        "state": "initialized",
                        "isNative": false,
                        "tokenAmount": {
                            "amount": amount.to_string(),
                            "decimals": 0,
                            "uiAmount": amount as f64,
                            "uiAmountString": amount.to_string(),
                        }
                    }
                }
            }
        }
    })
}

fn token_accounts(accounts: Vec<Value>) -> Value {
    json!({ "context": { "slot": 250_000_000u64 }, "value": accounts })
}

fn mint_account(authority: Option<&Address>) -> Value {
    json!({
        "context": { "slot": 250_000_000u64 },
        "value": {
            "lamports": 1461600,
            "owner": TOKEN_PROGRAM,
            "executable": false,
            "rentEpoch": 0,
            "data": {
                "program": "spl-token",
                "space": 82,
                "parsed": {
                    "type": "mint",
                    "info": {
                        "mintAuthority": authority.map(|a| a.to_string()),
                        "supply": "1",
                        "decimals": 0,
                        "isInitialized": true,
                        "freezeAuthority": null,
                    }
                }
            }
        }
    })
}

fn proof_account(address: &Address, kind: u8, whitelisted: &Address, bank: &Address) -> Value {
    let mut data = WHITELIST_PROOF_DISCRIMINATOR.to_vec();
    data.push(kind);
    data.extend_from_slice(whitelisted.as_bytes());
    data.extend_from_slice(bank.as_bytes());
    data.push(255);
    json!({
        "pubkey": address.to_string(),
        "account": {
            "lamports": 1197120,
            "owner": "bankHHdqMuaaST4qQk6mkzxGeKPHWmqdgor6Gs8r88m",
            "executable": false,
            "rentEpoch": 0,
            "data": [base64::engine::general_purpose::STANDARD.encode(&data), "base64"],
        }
    })
}

fn client(server: &MockServer) -> RpcClient {
    RpcClient::new(&ClientConfig::with_rpc_url(server.uri()))
}

#[tokio::test]
async fn test_token_accounts_by_owner_parses_json() {
    let server = MockServer::start().await;
    let owner = addr(200);
    Mock::given(method("POST"))
        .and(RpcCall::new("getTokenAccountsByOwner").for_address(&owner).with_filter("programId"))
        .respond_with(rpc_ok(token_accounts(vec![
            token_account(&addr(110), &addr(10), &owner, 3),
            token_account(&addr(111), &addr(11), &owner, 0),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rpc = client(&server);
    let accounts = rpc.token_accounts_by_owner(&owner).await.unwrap();

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].mint, addr(10));
    assert_eq!(accounts[0].account, addr(110));
    assert_eq!(accounts[0].amount, 3);
    assert_eq!(accounts[1].amount, 0);
}

#[tokio::test]
async fn test_token_accounts_by_mint_uses_mint_filter() {
    let server = MockServer::start().await;
    let owner = addr(200);
    Mock::given(method("POST"))
        .and(RpcCall::new("getTokenAccountsByOwner").with_filter("mint"))
        .respond_with(rpc_ok(token_accounts(vec![token_account(
            &addr(110),
            &addr(10),
            &owner,
            7,
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let rpc = client(&server);
    let accounts = rpc.token_accounts_by_mint(&owner, &addr(10)).await.unwrap();
    assert_eq!(accounts[0].amount, 7);
}

#[tokio::test]
async fn test_mint_authority_present_and_revoked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getAccountInfo").for_address(&addr(10)))
        .respond_with(rpc_ok(mint_account(Some(&addr(50)))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getAccountInfo").for_address(&addr(11)))
        .respond_with(rpc_ok(mint_account(None)))
        .mount(&server)
        .await;

    let rpc = client(&server);
    assert_eq!(rpc.mint_authority(&addr(10)).await.unwrap(), Some(addr(50)));
    assert_eq!(rpc.mint_authority(&addr(11)).await.unwrap(), None);

    let info = rpc.get_mint_info(&addr(10)).await.unwrap();
    assert_eq!(info.supply, 1);
    assert_eq!(info.decimals, 0);
}

#[tokio::test]
async fn test_missing_mint_account_is_lookup_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getAccountInfo"))
        .respond_with(rpc_ok(json!({ "context": { "slot": 1 }, "value": null })))
        .mount(&server)
        .await;

    let rpc = client(&server);
    let err = rpc.get_mint_info(&addr(10)).await.unwrap_err();
    assert!(matches!(err, TransmuterError::Lookup(_)), "{err}");
}

#[tokio::test]
async fn test_rpc_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid param: could not find account" }
        })))
        .mount(&server)
        .await;

    let rpc = client(&server);
    let err = rpc.mint_authority(&addr(10)).await.unwrap_err();
    match err {
        TransmuterError::Rpc { code, message } => {
            assert_eq!(code, -32602);
            assert!(message.contains("could not find account"));
        }
        other => panic!("expected rpc error, got {other}"),
    }
}

#[tokio::test]
async fn test_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
        .mount(&server)
        .await;

    let rpc = client(&server);
    let err = rpc.token_accounts_by_owner(&addr(200)).await.unwrap_err();
    match err {
        TransmuterError::Http { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Too many requests");
        }
        other => panic!("expected http error, got {other}"),
    }
}

#[tokio::test]
async fn test_gem_bank_whitelist_decodes_proofs() {
    let server = MockServer::start().await;
    let bank = addr(1);
    Mock::given(method("POST"))
        .and(RpcCall::new("getProgramAccounts"))
        .respond_with(rpc_ok(json!([
            proof_account(&addr(31), 1, &addr(50), &bank),
            proof_account(&addr(30), 2, &addr(10), &bank),
            proof_account(&addr(32), 3, &addr(60), &bank),
            // Filtered server-side in practice; dropped here as well.
            proof_account(&addr(33), 2, &addr(11), &addr(2)),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::with_rpc_url(server.uri());
    let whitelist = GemBankWhitelist::new(RpcClient::new(&config), config.gem_bank_program);
    let entries = whitelist.fetch_whitelist(&bank).await.unwrap();

    // Sorted by proof address.
    assert_eq!(
        entries,
        vec![
            WhitelistEntry::mint(addr(10)),
            WhitelistEntry::creator(addr(50)),
            WhitelistEntry::creator(addr(60)),
            WhitelistEntry::mint(addr(60)),
        ]
    );
}

#[tokio::test]
async fn test_gem_bank_rejects_non_base64_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getProgramAccounts"))
        .respond_with(rpc_ok(json!([{
            "pubkey": addr(30).to_string(),
            "account": {
                "lamports": 1,
                "owner": "bankHHdqMuaaST4qQk6mkzxGeKPHWmqdgor6Gs8r88m",
                "data": ["abc", "base58"],
            }
        }])))
        .mount(&server)
        .await;

    let config = ClientConfig::with_rpc_url(server.uri());
    let whitelist = GemBankWhitelist::new(RpcClient::new(&config), config.gem_bank_program);
    let err = whitelist.fetch_whitelist(&addr(1)).await.unwrap_err();
    assert!(matches!(err, TransmuterError::Lookup(_)), "{err}");
}

#[tokio::test]
async fn test_load_availability_over_rpc() {
    let server = MockServer::start().await;
    let owner = addr(200);
    let creator = addr(50);

    Mock::given(method("POST"))
        .and(RpcCall::new("getTokenAccountsByOwner").with_filter("programId"))
        .respond_with(rpc_ok(token_accounts(vec![
            token_account(&addr(110), &addr(10), &owner, 1),
            token_account(&addr(120), &addr(20), &owner, 1),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getTokenAccountsByOwner").with_filter("mint"))
        .respond_with(rpc_ok(token_accounts(vec![token_account(
            &addr(120),
            &addr(20),
            &owner,
            1,
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getAccountInfo").for_address(&addr(10)))
        .respond_with(rpc_ok(mint_account(Some(&addr(51)))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getAccountInfo").for_address(&addr(20)))
        .respond_with(rpc_ok(mint_account(Some(&creator))))
        .mount(&server)
        .await;

    let rpc = client(&server);
    let banks = BTreeMap::from([
        (addr(1), vec![WhitelistEntry::mint(addr(10)), WhitelistEntry::mint(addr(12))]),
        (addr(2), vec![WhitelistEntry::creator(creator)]),
        (addr(3), vec![]),
    ]);
    let result = load_availability(&rpc, &owner, &banks).await.unwrap();

    let first = &result[&addr(1)];
    assert_eq!(first.get(&addr(10)), Some(&Availability::mint(true)));
    assert_eq!(first.get(&addr(12)), Some(&Availability::mint(false)));

    let second = &result[&addr(2)];
    assert_eq!(second.mints.len(), 1);
    assert_eq!(second.get(&addr(20)), Some(&Availability::creator(true, creator)));

    assert!(result[&addr(3)].is_free_text());
}

#[tokio::test]
async fn test_gem_bank_filters_on_discriminator_and_bank() {
    let server = MockServer::start().await;
    let bank = addr(1);
    let expected_filters = json!([
        { "memcmp": { "offset": 0, "bytes": bs58::encode(WHITELIST_PROOF_DISCRIMINATOR).into_string() } },
        { "memcmp": { "offset": 41, "bytes": bank.to_string() } },
    ]);
    Mock::given(method("POST"))
        .and(RpcCall::new("getProgramAccounts"))
        .and(move |request: &Request| {
            serde_json::from_slice::<Value>(&request.body)
                .map(|body| body["params"][1]["filters"] == expected_filters)
                .unwrap_or(false)
        })
        .respond_with(rpc_ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::with_rpc_url(server.uri());
    let whitelist = GemBankWhitelist::new(RpcClient::new(&config), config.gem_bank_program);
    assert!(whitelist.fetch_whitelist(&bank).await.unwrap().is_empty());
}

fn raw_account(data: &[u8]) -> Value {
    json!({
        "context": { "slot": 250_000_000u64 },
        "value": {
            "lamports": 3_000_000,
            "owner": addr(77).to_string(),
            "executable": false,
            "rentEpoch": 0,
            "data": [base64::engine::general_purpose::STANDARD.encode(data), "base64"],
        }
    })
}

fn taker_config(bank: &Address, required_amount: u64) -> Vec<u8> {
    let mut out = bank.as_bytes().to_vec();
    out.extend_from_slice(&required_amount.to_le_bytes());
    // required units, vault action
    out.extend_from_slice(&[0, 0]);
    out
}

fn maker_config(mint: &Address, amount_per_use: u64) -> Vec<u8> {
    let mut out = mint.as_bytes().to_vec();
    out.extend_from_slice(&50u64.to_le_bytes());
    out.extend_from_slice(&amount_per_use.to_le_bytes());
    out
}

fn mutation_data(transmuter: &Address, bank_a: &Address, bank_b: &Address, mint: &Address) -> Vec<u8> {
    let mut out = MUTATION_DISCRIMINATOR.to_vec();
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(transmuter.as_bytes());
    out.extend(taker_config(bank_a, 1));
    out.push(1);
    out.extend(taker_config(bank_b, 3));
    out.push(0);
    out.extend(maker_config(mint, 1));
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&100_000_000u64.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.push(0);
    out.extend_from_slice(&10u64.to_le_bytes());
    out.extend_from_slice(&9u64.to_le_bytes());
    out.extend_from_slice(&[0u8; 64]);
    out
}

fn transmuter_data(banks: [&Address; 3]) -> Vec<u8> {
    let mut out = TRANSMUTER_DISCRIMINATOR.to_vec();
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&[0u8; 32 + 32 + 1 + 32]);
    for bank in banks {
        out.extend_from_slice(bank.as_bytes());
    }
    out
}

#[tokio::test]
async fn test_fetch_mutation_resolves_transmuter_banks() {
    let server = MockServer::start().await;
    let mutation = addr(60);
    let transmuter = addr(61);
    Mock::given(method("POST"))
        .and(RpcCall::new("getAccountInfo").for_address(&mutation))
        .respond_with(rpc_ok(raw_account(&mutation_data(
            &transmuter,
            &addr(1),
            &addr(2),
            &addr(9),
        ))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getAccountInfo").for_address(&transmuter))
        .respond_with(rpc_ok(raw_account(&transmuter_data([&addr(1), &addr(2), &addr(3)]))))
        .expect(1)
        .mount(&server)
        .await;

    let reader = TransmuterReader::new(client(&server));
    let config = reader.fetch_mutation(&mutation).await.unwrap();

    assert_eq!(config.name, mutation.to_string());
    assert_eq!(config.taker_banks(), vec![addr(1), addr(2)]);
    assert_eq!(config.takers[1].required_amount, 3);
    assert_eq!(config.makers.len(), 1);
    assert_eq!(config.makers[0].mint, addr(9));
    assert_eq!(config.price_sol(), 0.1);
    assert_eq!(config.times_used(), 1);
}

#[tokio::test]
async fn test_fetch_mutation_rejects_wrong_account_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(RpcCall::new("getAccountInfo"))
        .respond_with(rpc_ok(raw_account(&transmuter_data([&addr(1), &addr(2), &addr(3)]))))
        .mount(&server)
        .await;

    let reader = TransmuterReader::new(client(&server));
    let err = reader.fetch_mutation(&addr(60)).await.unwrap_err();
    assert!(matches!(err, TransmuterError::Lookup(ref m) if m.contains("discriminator")), "{err}");
}
