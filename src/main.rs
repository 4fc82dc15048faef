//! GIF Portal - terminal client for the shared GIF collection
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - sync controller processing intents and responses
//! - Network Layer (Tokio) - wallet and ledger calls

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use gif_portal::app::{AppActor, ConnectionStatus, Operation, SyncController};
use gif_portal::config::PortalConfig;
use gif_portal::constants::{APP_NAME, LOG_FILE_NAME};
use gif_portal::messages::ui_events::{key_to_ui_event, InputMode};
use gif_portal::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use gif_portal::models::GifCollection;
use gif_portal::network::{JsonRpcClient, NetworkActor};
use gif_portal::remote::{RemoteStateClient, RpcLedger};
use gif_portal::ui::{activity_line, centered_rect, connection_line, render_gif_list, render_input, severity_color};
use gif_portal::wallet::{WalletCapability, WalletSession};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Configuration errors surface before the terminal is taken over
    let config = Arc::new(PortalConfig::load()?);
    tracing::info!(
        cluster = config.cluster.url(),
        program = %config.program_id,
        wallet = config.wallet_bridge_url.as_deref().unwrap_or("none"),
        "Starting"
    );

    let ledger = RpcLedger::new(JsonRpcClient::new(config.cluster.url(), config.rpc_timeout));
    let remote = Arc::new(RemoteStateClient::new(Arc::clone(&config), Arc::new(ledger)));
    let wallet = Arc::new(WalletSession::new(WalletCapability::detect(&config), config.commitment));
    let controller = SyncController::new(&config);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(wallet, remote, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(controller, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.input_mode, current_state.show_help) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Connection
            Constraint::Min(0),    // Collection
            Constraint::Length(7), // Activity
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    draw_title(f, state, chunks[0]);
    draw_connection(f, state, chunks[1]);
    draw_collection(f, state, chunks[2]);
    draw_activity(f, state, chunks[3]);
    draw_status_bar(f, state, chunks[4]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Magenta).bold()),
        Span::styled(format!("  {}", state.cluster_label), Style::default().fg(Color::Gray)),
    ];
    if let Some(account) = &state.account_label {
        spans.push(Span::styled(format!("  account {}", account), Style::default().fg(Color::DarkGray)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_connection(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut line = connection_line(&state.connection);
    if let Some(op) = state.in_flight {
        line.push_span(Span::styled(
            format!("   ⟳ {}...", op.label()),
            Style::default().fg(Color::Yellow),
        ));
    }
    let block = Block::default().borders(Borders::ALL).title(" Wallet ");
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_collection(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" GIFs ");

    let message = match (&state.connection, &state.collection) {
        (ConnectionStatus::Disconnected, _) => Some(Line::from(vec![
            Span::raw("Press "),
            Span::styled("c", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" to connect your wallet."),
        ])),
        (ConnectionStatus::Connecting, _) => Some(Line::from("Waiting for the wallet...")),
        (_, GifCollection::Unknown) => Some(Line::from("Loading...")),
        (_, GifCollection::Uninitialized) => Some(Line::from(vec![
            Span::raw("The shared account does not exist yet. "),
            if state.can_initialize {
                Span::styled("Press i to do one-time initialization.", Style::default().fg(Color::Yellow).bold())
            } else {
                Span::styled("Initializing...", Style::default().fg(Color::DarkGray))
            },
        ])),
        (_, GifCollection::Unavailable(reason)) => Some(Line::from(Span::styled(
            format!("Could not load GIFs: {}  (r to retry)", reason),
            Style::default().fg(Color::Red),
        ))),
        (_, GifCollection::Loaded(_)) => None,
    };

    if let Some(message) = message {
        let paragraph = Paragraph::new(message).block(block).wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let title = if state.in_flight == Some(Operation::Append) || state.in_flight == Some(Operation::Reconcile) {
        " Submitting... "
    } else {
        " Enter gif link "
    };
    f.render_widget(render_input(&state.pending_input, title, editing, state.can_submit), chunks[0]);

    if editing {
        let cursor_chars = state.pending_input[..state.cursor_position].chars().count() as u16;
        let cursor_x = chunks[0].x + 1 + cursor_chars;
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    let items = state.collection.items();
    let list_title = format!(" GIFs ({}) ", items.len());
    if items.is_empty() {
        let empty = Paragraph::new("No GIFs yet. Press e to add the first one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(list_title));
        f.render_widget(empty, chunks[1]);
    } else {
        let mut list_state = ListState::default();
        list_state.select(Some(state.selected_item));
        f.render_stateful_widget(render_gif_list(items, state.selected_item, list_title), chunks[1], &mut list_state);
    }
}

fn draw_activity(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = match &state.status {
        Some(status) => Line::from(Span::styled(
            " Activity ",
            Style::default().fg(severity_color(status.severity)),
        )),
        None => Line::from(" Activity "),
    };
    let lines: Vec<Line> = state.activity.iter().map(activity_line).collect();
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.input_mode == InputMode::Editing {
        " ESC:stop editing | Enter:submit | arrows:move "
    } else if state.connection.is_connected() {
        " e:edit | s:submit | i:initialize | r:refresh | d:disconnect | ?:help | q:quit "
    } else {
        " c:connect | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 GIF PORTAL - Keyboard Shortcuts

 WALLET
   c                  Connect wallet
   d                  Disconnect

 COLLECTION
   i                  Initialize the shared account
   r                  Refresh the list
   ↑ / ↓  (k / j)     Move through the list

 SUBMITTING
   e                  Edit the gif link
   s / Enter          Submit the link
   Esc                Stop editing

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
