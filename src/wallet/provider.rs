//! Wallet provider boundary and its JSON-RPC bridge implementation

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::error::{RemoteError, RpcError, SessionError, USER_REJECTED_CODE};
use crate::models::{Address, Commitment, TxSignature};
use crate::network::rpc::JsonRpcClient;

/// What the client needs from a user-controlled wallet
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Resolve the wallet's public key. With `only_if_trusted` the wallet
    /// must not prompt and fails if this client was never approved.
    async fn connect(&self, only_if_trusted: bool) -> Result<Address, SessionError>;

    /// Add the wallet's signature to a wire transaction and submit it
    async fn sign_and_send(&self, wire_tx: &[u8], commitment: Commitment) -> Result<TxSignature, RemoteError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectResult {
    public_key: String,
}

#[derive(Debug, Deserialize)]
struct SendResult {
    signature: String,
}

/// Wallet reached through a local JSON-RPC bridge
pub struct BridgeWallet {
    rpc: JsonRpcClient,
}

impl BridgeWallet {
    /// The bridge waits for the user, so requests carry no timeout
    pub fn new(bridge_url: impl Into<String>) -> Self {
        BridgeWallet {
            rpc: JsonRpcClient::without_timeout(bridge_url),
        }
    }
}

#[async_trait]
impl WalletProvider for BridgeWallet {
    async fn connect(&self, only_if_trusted: bool) -> Result<Address, SessionError> {
        let result: ConnectResult = self
            .rpc
            .call("connect", json!({ "onlyIfTrusted": only_if_trusted }))
            .await?;

        result.public_key.parse().map_err(|_| {
            SessionError::WalletUnreachable(format!("wallet returned a bad public key '{}'", result.public_key))
        })
    }

    async fn sign_and_send(&self, wire_tx: &[u8], commitment: Commitment) -> Result<TxSignature, RemoteError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(wire_tx);
        let result: SendResult = self
            .rpc
            .call(
                "signAndSendTransaction",
                json!({
                    "transaction": encoded,
                    "encoding": "base64",
                    "commitment": commitment.as_str(),
                }),
            )
            .await
            .map_err(send_error)?;
        Ok(TxSignature(result.signature))
    }
}

/// A declined prompt or a failed simulation is a rejection; a dead bridge
/// means nobody can sign.
fn send_error(err: RpcError) -> RemoteError {
    match err {
        RpcError::Rpc { code, message } if code == USER_REJECTED_CODE => {
            RemoteError::RemoteRejected(format!("wallet declined: {}", message))
        }
        RpcError::Transport(msg) => RemoteError::SignerUnavailable(format!("wallet unreachable: {}", msg)),
        other => RemoteError::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::rpc::parse_response;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// One-shot HTTP bridge: answers a single request with `reply` and
    /// hands back the JSON body it received.
    async fn bridge_once(reply: &'static str) -> (String, JoinHandle<Value>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let body = loop {
                let n = stream.read(&mut chunk).await.unwrap();
                assert!(n > 0, "bridge client hung up early");
                buf.extend_from_slice(&chunk[..n]);

                let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else { continue };
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let length: usize = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .map(|v| v.trim().parse().unwrap())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break buf[end + 4..end + 4 + length].to_vec();
                }
            };

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                reply.len(),
                reply
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            serde_json::from_slice(&body).unwrap()
        });

        (url, handle)
    }

    #[test]
    fn test_connect_result_shape() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":{"publicKey":"11111111111111111111111111111111"}}"#;
        let result: ConnectResult = parse_response(body).unwrap();
        assert_eq!(result.public_key.parse::<Address>().unwrap(), Address::new([0u8; 32]));
    }

    #[test]
    fn test_user_rejection_surfaces_as_rejected_connection() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#;
        let err = SessionError::from(parse_response::<ConnectResult>(body).unwrap_err());
        assert!(matches!(err, SessionError::UserRejectedConnection(_)));
    }

    #[test]
    fn test_send_errors_are_classified() {
        let declined = RpcError::Rpc { code: USER_REJECTED_CODE, message: String::from("no") };
        assert!(matches!(send_error(declined), RemoteError::RemoteRejected(_)));

        let simulation = RpcError::Rpc { code: -32002, message: String::from("custom program error: 0x0") };
        assert_eq!(
            send_error(simulation),
            RemoteError::RemoteRejected(String::from("custom program error: 0x0"))
        );

        let dead = RpcError::Transport(String::from("connection refused"));
        assert!(matches!(send_error(dead), RemoteError::SignerUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_bridge() {
        let wallet = BridgeWallet::new("http://127.0.0.1:9");
        let err = wallet.connect(true).await.unwrap_err();
        assert!(matches!(err, SessionError::WalletUnreachable(_)));
    }

    #[tokio::test]
    async fn test_send_request_carries_commitment() {
        let (url, request) = bridge_once(r#"{"jsonrpc":"2.0","id":1,"result":{"signature":"5sig"}}"#).await;
        let wallet = BridgeWallet::new(url);

        let signature = wallet.sign_and_send(&[1, 2, 3], Commitment::Confirmed).await.unwrap();
        assert_eq!(signature, TxSignature(String::from("5sig")));

        let request = request.await.unwrap();
        assert_eq!(request["method"], "signAndSendTransaction");
        assert_eq!(
            request["params"],
            json!({ "transaction": "AQID", "encoding": "base64", "commitment": "confirmed" })
        );
        assert!(request["params"].get("options").is_none());
    }
}
