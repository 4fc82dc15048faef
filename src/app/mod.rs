//! App layer - the sync controller and its actor
//!
//! The App actor receives UI intents and network responses, applies them to
//! the controller, forwards any resulting network command and publishes a
//! fresh render state.

pub mod actor;
pub mod commands;
pub mod state;

pub use actor::AppActor;
pub use state::{ConnectionStatus, Operation, SyncController};
