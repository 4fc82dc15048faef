//! # GIF Portal
//!
//! A terminal client for a shared, append-only collection of GIF links kept
//! in a ledger account, driven through a wallet.
//!
//! ## Features
//! - Silent reconnect to a trusted wallet, interactive connect otherwise
//! - One-time initialization of the shared account
//! - Submitting links, with a reconciling fetch after every submission
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (sync controller state machine)
//! - Network Layer (Tokio runtime; wallet and ledger)

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod remote;
pub mod ui;
pub mod wallet;

// Re-export commonly used types
pub use app::{AppActor, SyncController};
pub use config::PortalConfig;
pub use error::{RemoteError, SessionError};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Address, GifCollection, GifItem, Session};
pub use network::NetworkActor;
