//! Render state - snapshot sent from the controller to the terminal shell

use crate::app::state::{ActivityEntry, ConnectionStatus, Operation};
use crate::messages::ui_events::InputMode;
use crate::models::GifCollection;

/// Everything the UI needs to draw one frame
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub connection: ConnectionStatus,
    pub collection: GifCollection,

    // Pending input
    pub pending_input: String,
    pub cursor_position: usize,
    pub input_mode: InputMode,

    /// Remote operation currently outstanding, if any
    pub in_flight: Option<Operation>,
    pub status: Option<ActivityEntry>,
    pub activity: Vec<ActivityEntry>,

    // Which controls are live
    pub can_initialize: bool,
    pub can_submit: bool,

    pub selected_item: usize,
    pub show_help: bool,

    pub cluster_label: String,
    pub account_label: Option<String>,
}
