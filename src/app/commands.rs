//! Command handlers - the controller's state transitions
//!
//! Every intent and every network response is a synchronous transition that
//! may hand back one `NetworkCommand` for the network actor to run.

use crate::app::state::{ConnectionStatus, InFlight, Operation, Severity, SyncController};
use crate::error::SessionError;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{GifCollection, Session};

impl SyncController {
    fn begin(&mut self, op: Operation) -> u64 {
        let id = self.next_id();
        self.in_flight = Some(InFlight { id, op });
        tracing::debug!(id, op = op.label(), "Operation started");
        id
    }

    fn ignore_while_busy(&self, intent: &str) -> bool {
        if let Some(flight) = self.in_flight {
            tracing::debug!(intent, busy = flight.op.label(), "Ignoring intent while busy");
            return true;
        }
        false
    }

    fn fetch(&mut self, op: Operation) -> NetworkCommand {
        let id = self.begin(op);
        NetworkCommand::FetchCollection { id }
    }

    // ========================
    // Session intents
    // ========================

    /// Application start: try a silent reconnect
    pub fn start(&mut self) -> Option<NetworkCommand> {
        if self.connection != ConnectionStatus::Disconnected || self.ignore_while_busy("start") {
            return None;
        }
        let id = self.begin(Operation::Probe);
        Some(NetworkCommand::ProbeSession { id })
    }

    /// Explicit connect; valid from `Disconnected` only
    pub fn connect(&mut self) -> Option<NetworkCommand> {
        if self.connection != ConnectionStatus::Disconnected || self.ignore_while_busy("connect") {
            return None;
        }
        self.connection = ConnectionStatus::Connecting;
        let id = self.begin(Operation::Connect);
        self.report(Severity::Info, "connect", "Waiting for wallet approval...");
        Some(NetworkCommand::RequestSession { id })
    }

    /// Forget the session locally
    pub fn disconnect(&mut self) {
        if !self.connection.is_connected() || self.ignore_while_busy("disconnect") {
            return;
        }
        self.connection = ConnectionStatus::Disconnected;
        self.collection = GifCollection::Unknown;
        self.selected_item = 0;
        self.report(Severity::Info, "disconnect", "Disconnected");
    }

    // ========================
    // Remote state intents
    // ========================

    /// One-time account setup; only valid while the collection is uninitialized
    pub fn initialize_account(&mut self) -> Option<NetworkCommand> {
        if !self.collection.is_uninitialized() || self.ignore_while_busy("initialize") {
            return None;
        }
        let session = self.connection.session()?.clone();
        let id = self.begin(Operation::Initialize);
        self.report(Severity::Info, "initialize", "Creating the shared account...");
        Some(NetworkCommand::InitializeAccount { id, session })
    }

    /// Submit the pending link; only valid while the collection is loaded.
    ///
    /// The buffer is cleared as soon as the request is issued, so a failed
    /// append loses the text unless `restore_input_on_failure` is set.
    pub fn submit_pending_input(&mut self) -> Option<NetworkCommand> {
        if !self.collection.is_loaded() || self.ignore_while_busy("submit") {
            return None;
        }
        let session = self.connection.session()?.clone();
        if self.pending_input.trim().is_empty() {
            return None;
        }

        let link = std::mem::take(&mut self.pending_input);
        self.cursor_position = 0;
        self.input_mode = InputMode::Normal;
        self.last_submitted = Some(link.clone());

        let id = self.begin(Operation::Append);
        self.report(Severity::Info, "submit", format!("Submitting {}", link));
        Some(NetworkCommand::AppendItem { id, link, session })
    }

    /// Manual re-fetch
    pub fn refresh(&mut self) -> Option<NetworkCommand> {
        if !self.connection.is_connected() || self.ignore_while_busy("refresh") {
            return None;
        }
        Some(self.fetch(Operation::Fetch))
    }

    // ========================
    // Network responses
    // ========================

    /// Apply a network response. Responses that do not match the operation
    /// in flight are stale and dropped.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        let flight = match self.in_flight {
            Some(flight) if flight.id == response.id() => flight,
            _ => {
                tracing::debug!(id = response.id(), "Dropping stale response");
                return None;
            }
        };
        self.in_flight = None;

        match response {
            NetworkResponse::Session { result, .. } => self.on_session(flight.op, result),
            NetworkResponse::Collection { result, .. } => {
                self.on_collection(flight.op, GifCollection::from_fetch(result));
                None
            }
            NetworkResponse::Initialized { result, .. } => match result {
                Ok(signature) => {
                    self.report(Severity::Success, "initialize", format!("Account created ({})", signature));
                    Some(self.fetch(Operation::Fetch))
                }
                Err(e) => {
                    self.report(Severity::Error, "initialize", e.to_string());
                    None
                }
            },
            NetworkResponse::Appended { result, .. } => {
                let submitted = self.last_submitted.take();
                match result {
                    Ok(signature) => {
                        self.report(Severity::Success, "submit", format!("GIF submitted ({})", signature));
                    }
                    Err(e) => {
                        self.report(Severity::Error, "submit", e.to_string());
                        if self.restore_input_on_failure && self.pending_input.is_empty() {
                            if let Some(link) = submitted {
                                self.cursor_position = link.len();
                                self.pending_input = link;
                            }
                        }
                    }
                }
                // Exactly one reconciling fetch, whatever the outcome
                Some(self.fetch(Operation::Reconcile))
            }
        }
    }

    fn on_session(&mut self, op: Operation, result: Result<Session, SessionError>) -> Option<NetworkCommand> {
        match result {
            Ok(session) => {
                self.report(Severity::Success, op.label(), format!("Connected as {}", session.address));
                self.connection = ConnectionStatus::Connected(session);
                self.collection = GifCollection::Unknown;
                self.selected_item = 0;
                Some(self.fetch(Operation::Fetch))
            }
            Err(e) => {
                self.connection = ConnectionStatus::Disconnected;
                match (op, e) {
                    (_, SessionError::CapabilityAbsent) => {
                        self.report(
                            Severity::Error,
                            op.label(),
                            "Wallet not found! Configure a wallet bridge to connect.",
                        );
                    }
                    (Operation::Probe, SessionError::NotTrusted) => {
                        self.report(Severity::Info, op.label(), "Not connected yet. Press 'c' to connect your wallet.");
                    }
                    (_, e) => self.report(Severity::Error, op.label(), e.to_string()),
                }
                None
            }
        }
    }

    fn on_collection(&mut self, op: Operation, collection: GifCollection) {
        if !self.connection.is_connected() {
            return;
        }
        match &collection {
            GifCollection::Loaded(items) => {
                if op == Operation::Fetch {
                    self.report(Severity::Info, op.label(), format!("Loaded {} GIFs", items.len()));
                }
                self.selected_item = self.selected_item.min(items.len().saturating_sub(1));
            }
            GifCollection::Uninitialized => {
                self.report(
                    Severity::Info,
                    op.label(),
                    "The shared account does not exist yet. Press 'i' to initialize it.",
                );
            }
            GifCollection::Unavailable(reason) => {
                self.report(Severity::Error, op.label(), format!("Could not load GIFs: {}", reason));
            }
            GifCollection::Unknown => {}
        }
        self.collection = collection;
    }

    // ========================
    // Pending input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.collection.is_loaded() {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.pending_input.len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position = self.pending_input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = &self.pending_input;
        if self.cursor_position < input.len() {
            self.cursor_position = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.cursor_position <= self.pending_input.len() {
            self.pending_input.insert(self.cursor_position, c);
            self.cursor_position += c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let prev = self.pending_input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.pending_input.remove(prev);
            self.cursor_position = prev;
        }
    }

    // ========================
    // List and popups
    // ========================

    pub fn scroll_up(&mut self) {
        self.selected_item = self.selected_item.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let len = self.collection.items().len();
        if self.selected_item + 1 < len {
            self.selected_item += 1;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::models::{Address, GifItem, TxSignature};

    fn session() -> Session {
        Session { address: Address::new([7u8; 32]), trusted: false }
    }

    fn item(link: &str) -> GifItem {
        GifItem::new(link, Address::new([7u8; 32]))
    }

    fn id_of(cmd: &NetworkCommand) -> u64 {
        match cmd {
            NetworkCommand::ProbeSession { id }
            | NetworkCommand::RequestSession { id }
            | NetworkCommand::FetchCollection { id }
            | NetworkCommand::InitializeAccount { id, .. }
            | NetworkCommand::AppendItem { id, .. } => *id,
            NetworkCommand::Shutdown => 0,
        }
    }

    /// Controller that is connected and has loaded `items`
    fn loaded(items: Vec<GifItem>) -> SyncController {
        let mut c = SyncController::default();
        let cmd = c.connect().unwrap();
        let fetch = c
            .handle_response(NetworkResponse::Session { id: id_of(&cmd), result: Ok(session()) })
            .unwrap();
        assert!(c
            .handle_response(NetworkResponse::Collection { id: id_of(&fetch), result: Ok(items) })
            .is_none());
        c
    }

    fn type_text(c: &mut SyncController, text: &str) {
        c.start_editing();
        for ch in text.chars() {
            c.enter_char(ch);
        }
    }

    #[test]
    fn test_probe_without_capability_stays_disconnected() {
        let mut c = SyncController::default();
        let cmd = c.start().unwrap();
        assert!(matches!(cmd, NetworkCommand::ProbeSession { .. }));

        let next = c.handle_response(NetworkResponse::Session {
            id: id_of(&cmd),
            result: Err(SessionError::CapabilityAbsent),
        });
        assert!(next.is_none());
        assert_eq!(c.connection, ConnectionStatus::Disconnected);
        let status = c.status().unwrap();
        assert_eq!(status.severity, Severity::Error);
        assert!(status.message.contains("Wallet not found"));
    }

    #[test]
    fn test_untrusted_probe_is_a_notice_not_an_error() {
        let mut c = SyncController::default();
        let cmd = c.start().unwrap();
        c.handle_response(NetworkResponse::Session { id: id_of(&cmd), result: Err(SessionError::NotTrusted) });
        assert_eq!(c.connection, ConnectionStatus::Disconnected);
        assert_eq!(c.status().unwrap().severity, Severity::Info);
        assert!(!c.is_busy());
    }

    #[test]
    fn test_connect_then_uninitialized_then_initialize() {
        let mut c = SyncController::default();
        let cmd = c.connect().unwrap();
        assert_eq!(c.connection, ConnectionStatus::Connecting);

        let fetch = c
            .handle_response(NetworkResponse::Session { id: id_of(&cmd), result: Ok(session()) })
            .unwrap();
        assert!(matches!(fetch, NetworkCommand::FetchCollection { .. }));
        c.handle_response(NetworkResponse::Collection {
            id: id_of(&fetch),
            result: Err(RemoteError::AccountNotInitialized),
        });
        assert_eq!(c.collection, GifCollection::Uninitialized);
        assert!(c.can_initialize());

        let init = c.initialize_account().unwrap();
        assert!(matches!(&init, NetworkCommand::InitializeAccount { session: s, .. } if *s == session()));
        let refetch = c
            .handle_response(NetworkResponse::Initialized {
                id: id_of(&init),
                result: Ok(TxSignature(String::from("sig"))),
            })
            .unwrap();
        assert!(matches!(refetch, NetworkCommand::FetchCollection { .. }));

        c.handle_response(NetworkResponse::Collection { id: id_of(&refetch), result: Ok(vec![]) });
        assert_eq!(c.collection, GifCollection::Loaded(vec![]));
    }

    #[test]
    fn test_failed_initialize_stays_uninitialized() {
        let mut c = loaded(vec![]);
        c.collection = GifCollection::Uninitialized;
        let init = c.initialize_account().unwrap();
        let next = c.handle_response(NetworkResponse::Initialized {
            id: id_of(&init),
            result: Err(RemoteError::RemoteRejected(String::from("already in use"))),
        });
        assert!(next.is_none());
        assert_eq!(c.collection, GifCollection::Uninitialized);
        assert_eq!(c.status().unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_connect_failure_returns_to_disconnected_and_can_retry() {
        let mut c = SyncController::default();
        let cmd = c.connect().unwrap();
        c.handle_response(NetworkResponse::Session {
            id: id_of(&cmd),
            result: Err(SessionError::UserRejectedConnection(String::from("User rejected the request."))),
        });
        assert_eq!(c.connection, ConnectionStatus::Disconnected);
        assert!(c.status().unwrap().message.contains("rejected"));
        assert!(c.connect().is_some());
    }

    #[test]
    fn test_fetch_failure_keeps_connection() {
        let mut c = SyncController::default();
        let cmd = c.connect().unwrap();
        let fetch = c
            .handle_response(NetworkResponse::Session { id: id_of(&cmd), result: Ok(session()) })
            .unwrap();
        c.handle_response(NetworkResponse::Collection {
            id: id_of(&fetch),
            result: Err(RemoteError::NetworkUnavailable(String::from("timeout"))),
        });
        assert!(c.connection.is_connected());
        assert!(matches!(c.collection, GifCollection::Unavailable(_)));
    }

    #[test]
    fn test_whitespace_submit_is_a_silent_noop() {
        let mut c = loaded(vec![item("a")]);
        let before = c.activity.len();
        type_text(&mut c, "   \t ");
        assert!(c.submit_pending_input().is_none());
        assert!(c.collection.is_loaded());
        assert!(!c.is_busy());
        assert_eq!(c.activity.len(), before);
    }

    #[test]
    fn test_initialize_is_ignored_when_loaded() {
        let mut c = loaded(vec![item("a")]);
        assert!(c.initialize_account().is_none());
        assert!(!c.is_busy());
    }

    #[test]
    fn test_second_initialize_while_pending_is_ignored() {
        let mut c = loaded(vec![]);
        c.collection = GifCollection::Uninitialized;
        let first = c.initialize_account().unwrap();

        assert!(c.initialize_account().is_none());
        assert_eq!(c.in_flight.map(|f| f.id), Some(id_of(&first)));
        assert_eq!(c.collection, GifCollection::Uninitialized);
    }

    #[test]
    fn test_connect_during_silent_reconnect_is_ignored() {
        let mut c = SyncController::default();
        let silent = c.start().unwrap();

        assert!(c.connect().is_none());
        assert_eq!(c.connection, ConnectionStatus::Disconnected);
        assert_eq!(c.in_flight.map(|f| f.id), Some(id_of(&silent)));

        c.handle_response(NetworkResponse::Session { id: id_of(&silent), result: Err(SessionError::NotTrusted) });
        assert!(c.connect().is_some());
        assert_eq!(c.connection, ConnectionStatus::Connecting);
    }

    #[test]
    fn test_submit_clears_input_and_reconciles_once() {
        let mut c = loaded(vec![item("a")]);
        type_text(&mut c, "b");

        let append = c.submit_pending_input().unwrap();
        assert!(matches!(&append, NetworkCommand::AppendItem { link, .. } if link == "b"));
        assert!(c.pending_input.is_empty());

        // Busy until the reconciling fetch lands
        type_text(&mut c, "c");
        assert!(c.submit_pending_input().is_none());

        let reconcile = c
            .handle_response(NetworkResponse::Appended {
                id: id_of(&append),
                result: Err(RemoteError::RemoteRejected(String::from("custom program error"))),
            })
            .unwrap();
        assert!(matches!(reconcile, NetworkCommand::FetchCollection { .. }));
        assert_eq!(c.status().unwrap().severity, Severity::Error);
        assert!(c.submit_pending_input().is_none());

        let done = c.handle_response(NetworkResponse::Collection {
            id: id_of(&reconcile),
            result: Ok(vec![item("a")]),
        });
        assert!(done.is_none());
        assert_eq!(c.collection, GifCollection::Loaded(vec![item("a")]));
        assert!(c.can_submit());
    }

    #[test]
    fn test_failed_append_loses_text_by_default() {
        let mut c = loaded(vec![item("a")]);
        type_text(&mut c, "b");
        let append = c.submit_pending_input().unwrap();
        c.handle_response(NetworkResponse::Appended {
            id: id_of(&append),
            result: Err(RemoteError::RemoteRejected(String::from("nope"))),
        });
        assert!(c.pending_input.is_empty());
    }

    #[test]
    fn test_failed_append_restores_text_when_configured() {
        let mut c = loaded(vec![item("a")]);
        c.restore_input_on_failure = true;
        type_text(&mut c, "b");
        let append = c.submit_pending_input().unwrap();
        c.handle_response(NetworkResponse::Appended {
            id: id_of(&append),
            result: Err(RemoteError::NetworkUnavailable(String::from("down"))),
        });
        assert_eq!(c.pending_input, "b");
        assert_eq!(c.cursor_position, 1);
    }

    #[test]
    fn test_successful_append_never_inserts_locally() {
        let mut c = loaded(vec![item("a")]);
        type_text(&mut c, "b");
        let append = c.submit_pending_input().unwrap();
        c.handle_response(NetworkResponse::Appended {
            id: id_of(&append),
            result: Ok(TxSignature(String::from("sig"))),
        });
        assert_eq!(c.collection.items(), &[item("a")]);
    }

    #[test]
    fn test_fetch_replaces_whole_collection() {
        let mut c = loaded(vec![item("a"), item("b")]);
        let fetch = c.refresh().unwrap();
        c.handle_response(NetworkResponse::Collection { id: id_of(&fetch), result: Ok(vec![item("z")]) });
        assert_eq!(c.collection.items(), &[item("z")]);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut c = loaded(vec![item("a")]);
        let fetch = c.refresh().unwrap();
        let stale = c.handle_response(NetworkResponse::Collection {
            id: id_of(&fetch) + 100,
            result: Ok(vec![]),
        });
        assert!(stale.is_none());
        assert!(c.is_busy());
        assert_eq!(c.collection.items(), &[item("a")]);
    }

    #[test]
    fn test_disconnect_then_reconnect() {
        let mut c = loaded(vec![item("a")]);
        c.disconnect();
        assert_eq!(c.connection, ConnectionStatus::Disconnected);
        assert_eq!(c.collection, GifCollection::Unknown);
        assert!(matches!(c.connect(), Some(NetworkCommand::RequestSession { .. })));
    }

    #[test]
    fn test_cursor_editing_handles_multibyte() {
        let mut c = loaded(vec![]);
        type_text(&mut c, "gé");
        c.move_cursor_left();
        c.enter_char('x');
        assert_eq!(c.pending_input, "gxé");
        c.move_cursor_right();
        c.delete_char();
        assert_eq!(c.pending_input, "gx");
    }
}
