//! Error taxonomy for the wallet and ledger boundaries
//!
//! Nothing in this crate retries: every variant here ends up as a status
//! message tied to the action that produced it.

use thiserror::Error;

/// Transport-level failure of a JSON-RPC call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RpcError {
    /// Connection refused, DNS failure, timeout, non-2xx status
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a JSON-RPC error object
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response body was not the shape we asked for
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Failures while establishing or using a wallet session
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// No wallet bridge is configured for this client
    #[error("no wallet capability found, configure a wallet bridge")]
    CapabilityAbsent,

    /// The wallet has not trusted this client yet (silent probe miss)
    #[error("wallet has not trusted this client yet")]
    NotTrusted,

    /// The user declined the connection prompt
    #[error("connection rejected: {0}")]
    UserRejectedConnection(String),

    /// The bridge could not be reached or answered nonsense
    #[error("wallet unreachable: {0}")]
    WalletUnreachable(String),
}

/// Failures reported by the remote state client
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The shared account has not been created yet
    #[error("account not initialized")]
    AccountNotInitialized,

    #[error("remote rejected the request: {0}")]
    RemoteRejected(String),

    /// A required signer (local keypair or wallet) cannot sign
    #[error("signer unavailable: {0}")]
    SignerUnavailable(String),

    /// The account exists but its data could not be decoded
    #[error("invalid account data: {0}")]
    InvalidAccountData(String),
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("invalid keypair file {path}: {message}")]
    InvalidKeypair { path: String, message: String },

    #[error("invalid cluster url '{0}'")]
    InvalidCluster(String),
}

impl From<RpcError> for RemoteError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Transport(msg) => RemoteError::NetworkUnavailable(msg),
            RpcError::Rpc { message, .. } => RemoteError::RemoteRejected(message),
            RpcError::Malformed(msg) => RemoteError::RemoteRejected(format!("malformed response: {}", msg)),
        }
    }
}

/// Wallet-standard code for "user rejected the request"
pub const USER_REJECTED_CODE: i64 = 4001;

impl From<RpcError> for SessionError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Rpc { code, message } if code == USER_REJECTED_CODE => {
                SessionError::UserRejectedConnection(message)
            }
            other => SessionError::WalletUnreachable(other.to_string()),
        }
    }
}

impl From<SessionError> for RemoteError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UserRejectedConnection(msg) => {
                RemoteError::RemoteRejected(format!("wallet declined: {}", msg))
            }
            other => RemoteError::SignerUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_code_maps_to_user_rejected() {
        let err = RpcError::Rpc { code: 4001, message: "User rejected the request.".into() };
        assert_eq!(
            SessionError::from(err),
            SessionError::UserRejectedConnection("User rejected the request.".into())
        );
    }

    #[test]
    fn test_transport_error_maps_to_network_unavailable() {
        let err = RpcError::Transport("connection refused".into());
        assert!(matches!(RemoteError::from(err), RemoteError::NetworkUnavailable(_)));
    }

    #[test]
    fn test_wallet_decline_during_send_is_a_remote_rejection() {
        let err = SessionError::UserRejectedConnection("nope".into());
        assert!(matches!(RemoteError::from(err), RemoteError::RemoteRejected(_)));
        let err = SessionError::WalletUnreachable("down".into());
        assert!(matches!(RemoteError::from(err), RemoteError::SignerUnavailable(_)));
    }
}
