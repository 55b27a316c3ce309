//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::audio::MediaEngine;
use crate::config::{ControlsSettings, UiSettings};
use crate::playback::PlaybackStatus;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play"),
    ("space/p", "play/pause"),
    ("x", "stop"),
    ("h/l", "prev/next"),
    // H/L is filled in from config.
    ("0-9", "seek"),
    ("+/-", "volume"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("/", "search"),
    ("a", "add folder"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    parts.insert(6, format!("[H/L] scrub -/+{scrub_seconds}s"));
    parts.join(" | ")
}

fn status_text(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Stopped => "Stopped",
        PlaybackStatus::Playing => "Playing",
        PlaybackStatus::Paused => "Paused",
    }
}

/// Compute the visible window `[start, end)` of a list of `total` rows that
/// keeps `selected` roughly centered in `height` rows.
fn list_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<E: MediaEngine>(
    frame: &mut Frame,
    app: &App<E>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" musicblue ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, app, chunks[1]);
    draw_seek_bar(frame, app, chunks[2]);
    draw_input_line(frame, app, chunks[3]);
    draw_track_list(frame, app, chunks[4]);

    let footer_title = match app.status_message.as_deref() {
        Some(msg) => format!(" {msg} "),
        None => " controls ".to_string(),
    };
    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded(&footer_title))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}

fn draw_now_playing<E: MediaEngine>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let state = app.player.state();
    let now = app.player.now_playing();

    let mut flags = vec![
        status_text(state.status).to_string(),
        format!("Vol: {}%", state.volume),
        format!("Shuffle: {}", if state.shuffle { "ON" } else { "OFF" }),
        format!("Repeat: {}", state.repeat.label()),
    ];
    if app.pending_scans > 0 {
        flags.push("Scanning...".to_string());
    }

    let lines = vec![
        Line::from(Span::styled(
            now.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(now.location.as_str()),
        Line::from(flags.join(" • ")),
    ];
    let paragraph = Paragraph::new(lines)
        .block(padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_seek_bar<E: MediaEngine>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let bar = app.player.seek_bar();
    let style = if bar.enabled() {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(style)
        .ratio(bar.ratio().clamp(0.0, 1.0))
        .label(app.player.time_label().to_string());
    frame.render_widget(gauge, area);
}

fn draw_input_line<E: MediaEngine>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let (title, text, editing) = match app.mode {
        InputMode::AddFolder => (" add folder (enter scans, esc cancels) ", app.folder_input.as_str(), true),
        InputMode::Search => (" search (enter keeps, esc clears) ", app.query(), true),
        InputMode::Normal => (" search (/) ", app.query(), false),
    };
    let style = if editing {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(text).style(style).block(padded(title));
    frame.render_widget(paragraph, area);

    if editing {
        // Border + left padding put the text two cells in.
        let typed = text.chars().count() as u16;
        let x = (area.x + 2 + typed).min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_track_list<E: MediaEngine>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let visible = app.visible();
    let total = visible.len();
    let title = if app.is_filtered() {
        format!(" tracks ({} of {}) ", total, app.catalog().len())
    } else {
        format!(" tracks ({}) ", total)
    };

    if app.catalog().is_empty() {
        let hint = if app.pending_scans > 0 {
            "Scanning..."
        } else {
            "No tracks yet. Press [a] to add a folder."
        };
        let paragraph = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    // Only build ListItems for the visible window.
    let height = area.height.saturating_sub(2) as usize;
    let sel_row = app.selected_row();
    let (start, end) = list_window(total, height, sel_row.unwrap_or(0));
    let playing = app.player.state().current_file.as_deref();

    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .filter_map(|&i| app.catalog().get(i))
        .map(|track| {
            if playing == Some(track.path.as_path()) {
                ListItem::new(format!("♪ {}", track.title))
                    .style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {}", track.title))
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if let Some(row) = sel_row {
        state.select(Some(row - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_includes_scrub_seconds_in_order() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        let hl = text.find("[h/l]").unwrap();
        let scrub = text.find("[H/L]").unwrap();
        let seek = text.find("[0-9]").unwrap();
        assert!(hl < scrub && scrub < seek);
    }

    #[test]
    fn list_window_centers_selection() {
        assert_eq!(list_window(5, 10, 3), (0, 5));
        assert_eq!(list_window(100, 10, 0), (0, 10));
        assert_eq!(list_window(100, 10, 50), (45, 55));
        assert_eq!(list_window(100, 10, 99), (90, 100));
        assert_eq!(list_window(3, 0, 1), (0, 3));
    }
}
