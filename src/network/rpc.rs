//! JSON-RPC 2.0 over HTTP, shared by the ledger client and the wallet bridge

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::RpcError;

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Minimal JSON-RPC client bound to one endpoint
#[derive(Debug)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Client with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        JsonRpcClient {
            client: create_client(Some(timeout)),
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Client that waits as long as the other side needs (user prompts)
    pub fn without_timeout(endpoint: impl Into<String>) -> Self {
        JsonRpcClient {
            client: create_client(None),
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `method` and deserialize the `result` member
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let start = Instant::now();
        tracing::debug!(id, method, endpoint = %self.endpoint, "RPC call");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(describe_send_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Transport(format!("HTTP {} from {}", status.as_u16(), self.endpoint)));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| RpcError::Transport(format!("Error reading body: {}", e)))?;
        tracing::debug!(id, method, time_ms = start.elapsed().as_millis() as u64, "RPC response");

        parse_response(&text)
    }
}

/// Split a JSON-RPC response body into result or error
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, RpcError> {
    let envelope: RpcEnvelope =
        serde_json::from_str(body).map_err(|e| RpcError::Malformed(e.to_string()))?;

    if let Some(err) = envelope.error {
        return Err(RpcError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    let result = envelope.result.unwrap_or(Value::Null);
    serde_json::from_value(result).map_err(|e| RpcError::Malformed(e.to_string()))
}

fn describe_send_error(e: reqwest::Error) -> RpcError {
    let msg = if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    };
    RpcError::Transport(msg)
}

/// Create an HTTP client, optionally with a request timeout
pub fn create_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}
