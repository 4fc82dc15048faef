//! App actor - message loop hosting the sync controller

use tokio::sync::mpsc;

use crate::app::state::SyncController;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// Actor that owns the controller; the only writer of its state
pub struct AppActor {
    controller: SyncController,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        controller: SyncController,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor { controller, network_tx, render_tx }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Silent reconnect on startup
        let probe = self.controller.start();
        self.dispatch(probe);
        self.publish();

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.publish();
                }
                Some(response) = net_rx.recv() => {
                    let next = self.controller.handle_response(response);
                    self.dispatch(next);
                    self.publish();
                }
                else => break,
            }
        }
        tracing::info!("App actor stopped");
    }

    fn dispatch(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            tracing::debug!(command = cmd.name(), "Dispatching network command");
            let _ = self.network_tx.send(cmd);
        }
    }

    fn publish(&self) {
        let _ = self.render_tx.send(self.controller.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            UiEvent::Connect => self.controller.connect(),
            UiEvent::Disconnect => {
                self.controller.disconnect();
                None
            }
            UiEvent::InitializeAccount => self.controller.initialize_account(),
            UiEvent::SubmitPendingInput => self.controller.submit_pending_input(),
            UiEvent::Refresh => self.controller.refresh(),

            UiEvent::StartEditing => {
                self.controller.start_editing();
                None
            }
            UiEvent::StopEditing => {
                self.controller.stop_editing();
                None
            }
            UiEvent::CharInput(c) => {
                self.controller.enter_char(c);
                None
            }
            UiEvent::Backspace => {
                self.controller.delete_char();
                None
            }
            UiEvent::CursorLeft => {
                self.controller.move_cursor_left();
                None
            }
            UiEvent::CursorRight => {
                self.controller.move_cursor_right();
                None
            }

            UiEvent::ScrollUp => {
                self.controller.scroll_up();
                None
            }
            UiEvent::ScrollDown => {
                self.controller.scroll_down();
                None
            }

            UiEvent::ToggleHelp => {
                self.controller.toggle_help();
                None
            }
            UiEvent::CloseHelp => {
                self.controller.close_help();
                None
            }

            UiEvent::Quit => return true,
        };

        self.dispatch(cmd);
        false
    }
}
