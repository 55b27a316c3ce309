//! Application model types: `App` and `InputMode`.
//!
//! The `App` struct holds the catalog, the search filter and its visible
//! projection, the list selection and the playback controller. Every user
//! command and engine notification lands here on the controlling thread.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::audio::{EngineEvent, MediaEngine, MediaStatus};
use crate::library::{Catalog, ScanOutcome, ScanSummary, SearchFilter, Track, apply_outcome};
use crate::playback::{EndOfTrack, PlaybackController, Previous, next_index, previous};

/// What keystrokes currently edit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search line; the view refilters on every change.
    Search,
    /// Typing a folder path to scan.
    AddFolder,
}

/// The main application model.
pub struct App<E: MediaEngine> {
    catalog: Catalog,
    filter: SearchFilter,
    visible: Vec<usize>,
    /// Catalog index of the highlighted row, when it is visible.
    selected: Option<usize>,

    pub player: PlaybackController<E>,
    pub mode: InputMode,
    pub folder_input: String,
    pub status_message: Option<String>,
    pub pending_scans: usize,

    consecutive_failures: usize,
    rng: StdRng,
}

impl<E: MediaEngine> App<E> {
    /// Create a new `App` with an empty catalog.
    pub fn new(player: PlaybackController<E>) -> Self {
        Self {
            catalog: Catalog::new(),
            filter: SearchFilter::new(),
            visible: Vec::new(),
            selected: None,

            player,
            mode: InputMode::Normal,
            folder_input: String::new(),
            status_message: None,
            pending_scans: 0,

            consecutive_failures: 0,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a fixed seed for shuffle picks.
    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &str {
        self.filter.query()
    }

    /// Whether the search query hides anything.
    pub fn is_filtered(&self) -> bool {
        self.filter.is_active()
    }

    /// Catalog indices of the visible rows, in display order.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Row of the selection within the visible list.
    pub fn selected_row(&self) -> Option<usize> {
        let selected = self.selected?;
        self.visible.iter().position(|&i| i == selected)
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.and_then(|i| self.catalog.get(i))
    }

    fn track_at_row(&self, row: usize) -> Option<&Track> {
        self.visible.get(row).and_then(|&i| self.catalog.get(i))
    }

    fn refresh_visible(&mut self) {
        self.visible = self.filter.visible(&self.catalog);
        if self.selected_row().is_none() {
            self.selected = None;
        }
    }

    // ---- library --------------------------------------------------------

    /// Replace the search query and refilter the whole catalog.
    pub fn set_query(&mut self, text: &str) {
        self.filter.set_query(text);
        self.refresh_visible();
        debug!(query = text, visible = self.visible.len(), "filter updated");
    }

    pub fn push_query_char(&mut self, c: char) {
        let mut q = self.filter.query().to_string();
        q.push(c);
        self.set_query(&q);
    }

    pub fn pop_query_char(&mut self) {
        let mut q = self.filter.query().to_string();
        q.pop();
        self.set_query(&q);
    }

    pub fn clear_query(&mut self) {
        self.set_query("");
    }

    /// Merge a finished scan into the catalog, keeping the selection on the same file.
    pub fn apply_scan(&mut self, outcome: &ScanOutcome) -> ScanSummary {
        let selected_path = self.selected_track().map(|t| t.path.clone());

        let summary = apply_outcome(&mut self.catalog, outcome);

        self.selected = selected_path.and_then(|p| self.catalog.position_of(&p));
        self.refresh_visible();
        self.pending_scans = self.pending_scans.saturating_sub(1);

        self.status_message = Some(if summary.skipped > 0 {
            format!(
                "{}: {} new tracks, {} unreadable entries skipped",
                outcome.root.display(),
                summary.added,
                summary.skipped
            )
        } else {
            format!("{}: {} new tracks", outcome.root.display(), summary.added)
        });
        summary
    }

    // ---- selection ------------------------------------------------------

    fn select_row(&mut self, row: usize) {
        if let Some(&i) = self.visible.get(row) {
            self.selected = Some(i);
            if let Some(path) = self.catalog.get(i).map(|t| t.path.clone()) {
                self.player.preview(&path);
            }
        }
    }

    pub fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let row = match self.selected_row() {
            Some(r) => (r + 1).min(self.visible.len() - 1),
            None => 0,
        };
        self.select_row(row);
    }

    pub fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let row = self.selected_row().map_or(0, |r| r.saturating_sub(1));
        self.select_row(row);
    }

    pub fn select_first(&mut self) {
        self.select_row(0);
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.visible.len().checked_sub(1) {
            self.select_row(last);
        }
    }

    // ---- playback -------------------------------------------------------

    /// Play `path` and move the selection onto it when it is visible.
    fn play_path(&mut self, path: &Path, record_history: bool) {
        self.player.play(path, record_history);
        if let Some(i) = self.catalog.position_of(path) {
            if self.visible.contains(&i) {
                self.selected = Some(i);
            }
        }
    }

    fn play_row(&mut self, row: usize) -> bool {
        let Some(path) = self.track_at_row(row).map(|t| t.path.clone()) else {
            return false;
        };
        self.play_path(&path, true);
        true
    }

    pub fn play_selected(&mut self) -> bool {
        match self.selected_row() {
            Some(row) => self.play_row(row),
            None => false,
        }
    }

    pub fn toggle_play_pause(&mut self) {
        let selection = self.selected_track().map(|t| t.path.clone());
        let first = self.track_at_row(0).map(|t| t.path.clone());
        let was_loaded = self.player.state().current_file.is_some();

        self.player
            .toggle_play_pause(selection.as_deref(), first.as_deref());

        // A fallback play should move the cursor like any other play.
        if !was_loaded {
            if let Some(path) = self.player.state().current_file.clone() {
                if let Some(i) = self.catalog.position_of(&path) {
                    self.selected = Some(i);
                }
            }
        }
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// Advance according to shuffle and repeat. Returns false at the end of the list.
    pub fn play_next(&mut self) -> bool {
        let state = self.player.state();
        let (shuffle, repeat) = (state.shuffle, state.repeat);
        let next = next_index(
            self.selected_row(),
            self.visible.len(),
            shuffle,
            repeat,
            &mut self.rng,
        );
        match next {
            Some(row) => self.play_row(row),
            None => false,
        }
    }

    pub fn play_previous(&mut self) -> bool {
        let current = self.selected_row();
        let total = self.visible.len();
        let repeat = self.player.state().repeat;

        match previous(self.player.history_mut(), current, total, repeat) {
            Some(Previous::History(path)) => {
                self.play_path(&path, false);
                true
            }
            Some(Previous::Index(row)) => self.play_row(row),
            None => false,
        }
    }

    /// Route an engine notification to the controller and react to track ends.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::PositionChanged(pos) => self.player.on_position_changed(pos),
            EngineEvent::DurationChanged(d) => self.player.on_duration_changed(d),
            EngineEvent::StateChanged(s) => self.player.on_state_changed(s),
            EngineEvent::StatusChanged { source, status } => {
                if self.player.state().current_file.as_deref() != Some(source.as_path()) {
                    debug!(source = %source.display(), ?status, "ignoring status of a replaced track");
                    return;
                }
                self.handle_media_status(status);
            }
        }
    }

    fn handle_media_status(&mut self, status: MediaStatus) {
        match status {
            MediaStatus::Loaded => {
                self.consecutive_failures = 0;
            }
            MediaStatus::EndOfMedia => {
                if self.player.on_end_of_media() == EndOfTrack::Advance && !self.play_next() {
                    info!("reached the end of the list");
                }
            }
            MediaStatus::Invalid(reason) => {
                self.player.on_load_failed(&reason);
                self.consecutive_failures += 1;
                if self.consecutive_failures < self.visible.len() {
                    self.play_next();
                } else {
                    warn!(
                        failures = self.consecutive_failures,
                        "giving up advancing after repeated load failures"
                    );
                }
            }
        }
    }

    // ---- input modes ----------------------------------------------------

    pub fn enter_search(&mut self) {
        self.mode = InputMode::Search;
    }

    pub fn enter_add_folder(&mut self) {
        self.mode = InputMode::AddFolder;
        self.folder_input.clear();
    }

    pub fn leave_input(&mut self) {
        self.mode = InputMode::Normal;
    }

    /// Take the typed folder path, if any, and return to normal mode.
    pub fn take_folder_input(&mut self) -> Option<PathBuf> {
        self.mode = InputMode::Normal;
        let typed = std::mem::take(&mut self.folder_input);
        let typed = typed.trim();
        if typed.is_empty() {
            return None;
        }
        Some(expand_home(typed))
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(typed: &str) -> PathBuf {
    if let Some(rest) = typed.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(typed)
}
