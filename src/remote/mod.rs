//! Remote layer - the shared account on the ledger
//!
//! Reads go straight to the cluster's JSON-RPC endpoint. Writes are compiled
//! here, co-signed locally when needed, and handed to the session signer.

pub mod account;
pub mod client;
pub mod ledger;
pub mod signer;
pub mod transaction;

pub use client::{RemoteStateClient, TransactionSender};
pub use ledger::{LedgerRpc, RpcLedger};
pub use signer::KeypairSigner;
