//! Network messages - communication between App and Network layers

use crate::error::{RemoteError, SessionError};
use crate::models::{GifItem, Session, TxSignature};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Silent reconnect to a trusted wallet
    ProbeSession { id: u64 },
    /// Interactive wallet connect
    RequestSession { id: u64 },
    /// Read the shared list
    FetchCollection { id: u64 },
    /// One-time account creation
    InitializeAccount { id: u64, session: Session },
    /// Append one link
    AppendItem { id: u64, link: String, session: Session },

    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    /// Short operation name for logs
    pub fn name(&self) -> &'static str {
        match self {
            NetworkCommand::ProbeSession { .. } => "probe_session",
            NetworkCommand::RequestSession { .. } => "request_session",
            NetworkCommand::FetchCollection { .. } => "fetch_collection",
            NetworkCommand::InitializeAccount { .. } => "initialize_account",
            NetworkCommand::AppendItem { .. } => "append_item",
            NetworkCommand::Shutdown => "shutdown",
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Outcome of a probe or an interactive connect
    Session {
        id: u64,
        result: Result<Session, SessionError>,
    },
    Collection {
        id: u64,
        result: Result<Vec<GifItem>, RemoteError>,
    },
    Initialized {
        id: u64,
        result: Result<TxSignature, RemoteError>,
    },
    Appended {
        id: u64,
        result: Result<TxSignature, RemoteError>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Session { id, .. } => *id,
            NetworkResponse::Collection { id, .. } => *id,
            NetworkResponse::Initialized { id, .. } => *id,
            NetworkResponse::Appended { id, .. } => *id,
        }
    }
}
