//! Wallet session - connection lifecycle against the wallet capability

use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::transaction::Transaction;

use crate::config::PortalConfig;
use crate::error::{RemoteError, SessionError};
use crate::models::{Address, Commitment, Session, TxSignature};
use crate::remote::transaction::wire_bytes;
use crate::remote::TransactionSender;
use crate::wallet::provider::{BridgeWallet, WalletProvider};

/// Result of looking for a wallet on the host
#[derive(Clone)]
pub enum WalletCapability {
    Present(Arc<dyn WalletProvider>),
    Absent,
}

impl WalletCapability {
    /// A configured bridge counts as a present wallet
    pub fn detect(config: &PortalConfig) -> Self {
        match &config.wallet_bridge_url {
            Some(url) => {
                tracing::info!(bridge = %url, "Wallet bridge found");
                WalletCapability::Present(Arc::new(BridgeWallet::new(url.clone())))
            }
            None => WalletCapability::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, WalletCapability::Present(_))
    }
}

pub struct WalletSession {
    capability: WalletCapability,
    commitment: Commitment,
}

impl WalletSession {
    pub fn new(capability: WalletCapability, commitment: Commitment) -> Self {
        WalletSession { capability, commitment }
    }

    fn provider(&self) -> Result<&Arc<dyn WalletProvider>, SessionError> {
        match &self.capability {
            WalletCapability::Present(provider) => Ok(provider),
            WalletCapability::Absent => Err(SessionError::CapabilityAbsent),
        }
    }

    /// Silent reconnect to a previously trusted wallet. A wallet that
    /// declines is reported as `NotTrusted`, never as a user rejection.
    pub async fn probe_existing_session(&self) -> Result<Session, SessionError> {
        let provider = self.provider()?;
        match provider.connect(true).await {
            Ok(address) => {
                tracing::info!(address = %address, "Connected with trusted wallet");
                Ok(Session { address, trusted: true })
            }
            Err(SessionError::UserRejectedConnection(_)) => Err(SessionError::NotTrusted),
            Err(e) => Err(e),
        }
    }

    /// Interactive connect; waits until the user answers the wallet prompt
    pub async fn request_session(&self) -> Result<Session, SessionError> {
        let provider = self.provider()?;
        let address = provider.connect(false).await?;
        tracing::info!(address = %address, "Connected with wallet");
        Ok(Session { address, trusted: false })
    }

    /// Bind a session to the wallet so it can authorize writes
    pub fn signer_for(&self, session: &Session) -> Result<SessionSigner, SessionError> {
        Ok(SessionSigner {
            address: session.address,
            provider: Arc::clone(self.provider()?),
            commitment: self.commitment,
        })
    }
}

/// Session identity that signs through the wallet
pub struct SessionSigner {
    address: Address,
    provider: Arc<dyn WalletProvider>,
    commitment: Commitment,
}

#[async_trait]
impl TransactionSender for SessionSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_and_send(&self, tx: &Transaction) -> Result<TxSignature, RemoteError> {
        let wire = wire_bytes(tx)?;
        let signature = self.provider.sign_and_send(&wire, self.commitment).await?;
        tracing::info!(signature = %signature, "Transaction sent");
        Ok(signature)
    }
}
