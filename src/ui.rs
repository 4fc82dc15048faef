//! Widget helpers shared by the terminal shell

use ratatui::{prelude::*, widgets::*};

use crate::app::state::{ActivityEntry, ConnectionStatus, Severity};
use crate::models::GifItem;

/// Renders a text input field
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool, enabled: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else if enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Renders the shared list, newest submission last
pub fn render_gif_list<'a>(items: &'a [GifItem], selected: usize, title: String) -> List<'a> {
    let items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(item.link.clone(), style),
                Span::styled(
                    format!("  by {}", item.submitter.short()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    List::new(items).block(Block::default().borders(Borders::ALL).title(title))
}

/// One-line description of the wallet connection
pub fn connection_line(connection: &ConnectionStatus) -> Line<'static> {
    match connection {
        ConnectionStatus::Disconnected => Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Red)),
            Span::raw("Not connected"),
        ]),
        ConnectionStatus::Connecting => Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Yellow)),
            Span::raw("Connecting..."),
        ]),
        ConnectionStatus::Connected(session) => Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Green)),
            Span::raw("Connected as "),
            Span::styled(session.address.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled(
                if session.trusted { " (trusted)" } else { "" },
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
    }
}

/// Activity entry as a timestamped line
pub fn activity_line(entry: &ActivityEntry) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            entry.timestamp.format("%H:%M:%S ").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("[{}] ", entry.action),
            Style::default().fg(severity_color(entry.severity)),
        ),
        Span::raw(entry.message.clone()),
    ])
}

/// Rect of the given percentage size centered in `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
