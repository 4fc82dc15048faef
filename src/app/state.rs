//! Sync controller state - pure data structure with no I/O logic

use std::collections::VecDeque;

use crate::config::PortalConfig;
use crate::constants::MAX_ACTIVITY;
use crate::messages::ui_events::InputMode;
use crate::messages::RenderState;
use crate::models::{GifCollection, Session};

/// Wallet connection as seen by the controller
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    /// Interactive connect in flight
    Connecting,
    Connected(Session),
}

impl ConnectionStatus {
    pub fn session(&self) -> Option<&Session> {
        match self {
            ConnectionStatus::Connected(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected(_))
    }
}

/// The single remote operation the controller may have outstanding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Probe,
    Connect,
    Fetch,
    Initialize,
    Append,
    /// The fetch that follows every append
    Reconcile,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Probe => "probe",
            Operation::Connect => "connect",
            Operation::Fetch => "fetch",
            Operation::Initialize => "initialize",
            Operation::Append => "submit",
            Operation::Reconcile => "sync",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InFlight {
    pub id: u64,
    pub op: Operation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A status line tied to the action that produced it
#[derive(Clone, Debug)]
pub struct ActivityEntry {
    pub severity: Severity,
    pub action: &'static str,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Main controller state - pure data, no I/O
pub struct SyncController {
    pub connection: ConnectionStatus,
    pub collection: GifCollection,

    // Pending input
    pub pending_input: String,
    pub cursor_position: usize,
    pub input_mode: InputMode,

    // Remote operation bookkeeping
    pub in_flight: Option<InFlight>,
    pub next_request_id: u64,
    /// Link of the last append, kept so it can be restored on failure
    pub last_submitted: Option<String>,
    pub restore_input_on_failure: bool,

    // Observable status
    pub activity: VecDeque<ActivityEntry>,

    // UI state
    pub selected_item: usize,
    pub show_help: bool,

    // Static labels from configuration
    pub cluster_label: String,
    pub account_label: Option<String>,
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new(&PortalConfig::default())
    }
}

impl SyncController {
    pub fn new(config: &PortalConfig) -> Self {
        SyncController {
            connection: ConnectionStatus::Disconnected,
            collection: GifCollection::Unknown,
            pending_input: String::new(),
            cursor_position: 0,
            input_mode: InputMode::Normal,
            in_flight: None,
            next_request_id: 1,
            last_submitted: None,
            restore_input_on_failure: config.restore_input_on_failure,
            activity: VecDeque::with_capacity(MAX_ACTIVITY),
            selected_item: 0,
            show_help: false,
            cluster_label: config.cluster.url().to_string(),
            account_label: config.base_account.map(|a| a.to_string()),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record a status message
    pub fn report(&mut self, severity: Severity, action: &'static str, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Error => tracing::warn!(action, %message, "Action failed"),
            _ => tracing::info!(action, %message, "Status"),
        }
        if self.activity.len() >= MAX_ACTIVITY {
            self.activity.pop_back();
        }
        self.activity.push_front(ActivityEntry {
            severity,
            action,
            message,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Most recent status message
    pub fn status(&self) -> Option<&ActivityEntry> {
        self.activity.front()
    }

    pub fn can_initialize(&self) -> bool {
        self.connection.is_connected() && self.collection.is_uninitialized() && !self.is_busy()
    }

    pub fn can_submit(&self) -> bool {
        self.connection.is_connected() && self.collection.is_loaded() && !self.is_busy()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            connection: self.connection.clone(),
            collection: self.collection.clone(),
            pending_input: self.pending_input.clone(),
            cursor_position: self.cursor_position,
            input_mode: self.input_mode,
            in_flight: self.in_flight.map(|f| f.op),
            status: self.status().cloned(),
            activity: self.activity.iter().cloned().collect(),
            can_initialize: self.can_initialize(),
            can_submit: self.can_submit(),
            selected_item: self.selected_item,
            show_help: self.show_help,
            cluster_label: self.cluster_label.clone(),
            account_label: self.account_label.clone(),
        }
    }
}
