//! Wallet layer - session establishment and signing through the user's wallet

pub mod provider;
pub mod session;

pub use provider::{BridgeWallet, WalletProvider};
pub use session::{SessionSigner, WalletCapability, WalletSession};
