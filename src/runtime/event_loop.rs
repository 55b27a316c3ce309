use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{App, InputMode};
use crate::audio::{AudioPlayer, EngineEvent, MediaEngine};
use crate::config;
use crate::library::{ScanOutcome, title_of};
use crate::playback::PlayerEvent;
use crate::runtime::startup::start_scan;
use crate::ui;

/// Channels the event loop drains on every iteration.
pub struct Channels {
    pub engine_rx: Receiver<EngineEvent>,
    pub player_rx: Receiver<PlayerEvent>,
    pub scan_tx: Sender<ScanOutcome>,
    pub scan_rx: Receiver<ScanOutcome>,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Main terminal event loop: merges scan results and engine notifications,
/// draws, and handles input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<AudioPlayer>,
    channels: &Channels,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        drain(app, channels);

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, &channels.scan_tx, state)
                    == KeyOutcome::Quit
                {
                    app.player
                        .engine()
                        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply everything that arrived from worker threads since the last frame.
pub fn drain<E: MediaEngine>(app: &mut App<E>, channels: &Channels) {
    while let Ok(outcome) = channels.scan_rx.try_recv() {
        app.apply_scan(&outcome);
    }
    while let Ok(event) = channels.engine_rx.try_recv() {
        app.handle_engine_event(event);
    }
    while let Ok(event) = channels.player_rx.try_recv() {
        if let Some(msg) = describe(&event) {
            app.status_message = Some(msg);
        }
    }
}

/// One-line status text for events worth surfacing to the user.
pub fn describe(event: &PlayerEvent) -> Option<String> {
    match event {
        PlayerEvent::LoadFailed { path, reason } => Some(match path {
            Some(p) => format!("Cannot play {}: {reason}", title_of(p)),
            None => format!("Cannot play: {reason}"),
        }),
        PlayerEvent::ModeChanged { shuffle, repeat } => Some(format!(
            "Shuffle {}, repeat {}",
            if *shuffle { "on" } else { "off" },
            repeat.label()
        )),
        PlayerEvent::VolumeChanged(v) => Some(format!("Volume {v}%")),
        _ => None,
    }
}

pub fn handle_key_event<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<E>,
    scan_tx: &Sender<ScanOutcome>,
    state: &mut EventLoopState,
) -> KeyOutcome {
    match app.mode {
        InputMode::Search => {
            state.pending_gg = false;
            handle_search_key(key, app);
            return KeyOutcome::Continue;
        }
        InputMode::AddFolder => {
            state.pending_gg = false;
            handle_folder_key(key, settings, app, scan_tx);
            return KeyOutcome::Continue;
        }
        InputMode::Normal => {}
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let step = i16::from(settings.controls.volume_step);
    let scrub = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;

    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.enter_search();
        }
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('a') => app.enter_add_folder(),
        KeyCode::Esc => app.clear_query(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Home => app.select_first(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => {
            app.play_selected();
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_play_pause(),
        KeyCode::Char('x') => app.stop(),
        KeyCode::Char('l') => {
            app.play_next();
        }
        KeyCode::Char('h') => {
            app.play_previous();
        }
        KeyCode::Char('L') => app.player.seek_by(scrub),
        KeyCode::Char('H') => app.player.seek_by(-scrub),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = f64::from(c.to_digit(10).unwrap_or(0));
            app.player.seek_fraction(tenth / 10.0);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => app.player.change_volume(step),
        KeyCode::Char('-') => app.player.change_volume(-step),
        KeyCode::Char('s') => app.player.toggle_shuffle(),
        KeyCode::Char('r') => app.player.cycle_repeat(),
        _ => {}
    }

    KeyOutcome::Continue
}

fn handle_search_key<E: MediaEngine>(key: KeyEvent, app: &mut App<E>) {
    match key.code {
        KeyCode::Esc => {
            app.clear_query();
            app.leave_input();
        }
        KeyCode::Enter => app.leave_input(),
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => app.select_next(),
        KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => app.select_prev(),
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.push_query_char(c);
            }
        }
        _ => {}
    }
}

fn handle_folder_key<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<E>,
    scan_tx: &Sender<ScanOutcome>,
) {
    match key.code {
        KeyCode::Esc => {
            app.folder_input.clear();
            app.leave_input();
        }
        KeyCode::Enter => match app.take_folder_input() {
            Some(root) => scan_folder(app, root, settings, scan_tx),
            None => debug!("add folder cancelled with empty input"),
        },
        KeyCode::Backspace => {
            app.folder_input.pop();
        }
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.folder_input.push(c);
            }
        }
        _ => {}
    }
}

fn scan_folder<E: MediaEngine>(
    app: &mut App<E>,
    root: PathBuf,
    settings: &config::Settings,
    scan_tx: &Sender<ScanOutcome>,
) {
    app.status_message = Some(format!("Scanning {}...", root.display()));
    start_scan(app, root, &settings.library, scan_tx);
}
