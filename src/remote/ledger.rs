//! Ledger read boundary: account data and blockhashes over JSON-RPC

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use solana_sdk::hash::Hash;

use crate::error::RemoteError;
use crate::models::{Address, Commitment};
use crate::network::rpc::JsonRpcClient;

/// Raw account as returned by the ledger
#[derive(Clone, Debug, PartialEq)]
pub struct AccountInfo {
    pub owner: Address,
    pub data: Vec<u8>,
}

/// Read operations the remote state client needs from the ledger
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// `None` when the account does not exist
    async fn account_info(
        &self,
        address: &Address,
        commitment: Commitment,
    ) -> Result<Option<AccountInfo>, RemoteError>;

    async fn latest_blockhash(&self, commitment: Commitment) -> Result<Hash, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    /// `[payload, encoding]`
    data: (String, String),
    owner: String,
}

#[derive(Debug, Deserialize)]
struct RawBlockhash {
    blockhash: String,
}

/// `LedgerRpc` backed by a cluster JSON-RPC endpoint
pub struct RpcLedger {
    rpc: JsonRpcClient,
}

impl RpcLedger {
    pub fn new(rpc: JsonRpcClient) -> Self {
        RpcLedger { rpc }
    }
}

#[async_trait]
impl LedgerRpc for RpcLedger {
    async fn account_info(
        &self,
        address: &Address,
        commitment: Commitment,
    ) -> Result<Option<AccountInfo>, RemoteError> {
        let resp: WithContext<Option<RawAccount>> = self
            .rpc
            .call(
                "getAccountInfo",
                json!([address.to_string(), { "encoding": "base64", "commitment": commitment.as_str() }]),
            )
            .await?;

        resp.value.map(decode_account).transpose()
    }

    async fn latest_blockhash(&self, commitment: Commitment) -> Result<Hash, RemoteError> {
        let resp: WithContext<RawBlockhash> = self
            .rpc
            .call("getLatestBlockhash", json!([{ "commitment": commitment.as_str() }]))
            .await?;

        parse_blockhash(&resp.value.blockhash)
    }
}

fn parse_blockhash(raw: &str) -> Result<Hash, RemoteError> {
    raw.parse()
        .map_err(|_| RemoteError::RemoteRejected(format!("bad blockhash '{}'", raw)))
}

fn decode_account(raw: RawAccount) -> Result<AccountInfo, RemoteError> {
    let (payload, encoding) = raw.data;
    if encoding != "base64" {
        return Err(RemoteError::InvalidAccountData(format!("unexpected encoding {}", encoding)));
    }
    let data = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| RemoteError::InvalidAccountData(format!("base64: {}", e)))?;
    let owner: Address = raw
        .owner
        .parse()
        .map_err(|_| RemoteError::InvalidAccountData(format!("bad owner '{}'", raw.owner)))?;
    Ok(AccountInfo { owner, data })
}
