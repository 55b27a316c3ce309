//! The playback state machine.
//!
//! `PlaybackController` owns the `PlaybackState`, the play history and the
//! now-playing display fields. It issues commands to a `MediaEngine` and is fed
//! the engine's notifications back by the runtime.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{EngineState, MediaEngine};
use crate::library::{directory_of, title_of};

use super::history::PlayHistory;
use super::navigation::RepeatMode;
use super::progress::{SEEK_STEPS, SeekBar, time_label};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl From<EngineState> for PlaybackStatus {
    fn from(state: EngineState) -> Self {
        match state {
            EngineState::Stopped => Self::Stopped,
            EngineState::Playing => Self::Playing,
            EngineState::Paused => Self::Paused,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_file: Option<PathBuf>,
    pub status: PlaybackStatus,
    pub position: Duration,
    pub duration: Duration,
    /// 0-100.
    pub volume: u8,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_file: None,
            status: PlaybackStatus::Stopped,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 70,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Text for the now-playing area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub location: String,
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self {
            title: "No track selected".to_string(),
            location: "---".to_string(),
        }
    }
}

impl NowPlaying {
    fn for_path(path: &Path) -> Self {
        Self {
            title: title_of(path),
            location: directory_of(path),
        }
    }
}

/// Notifications for whoever renders or mirrors playback.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    NowPlaying(PathBuf),
    StatusChanged(PlaybackStatus),
    Progress { position: Duration, duration: Duration },
    VolumeChanged(u8),
    ModeChanged { shuffle: bool, repeat: RepeatMode },
    LoadFailed { path: Option<PathBuf>, reason: String },
}

/// What the caller must do after the current track ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndOfTrack {
    /// The track was restarted (repeat one).
    Replayed,
    /// Navigation should pick the next track.
    Advance,
}

pub struct PlaybackController<E: MediaEngine> {
    engine: E,
    state: PlaybackState,
    history: PlayHistory,
    now_playing: NowPlaying,
    time_label: String,
    seek_bar: SeekBar,
    subscribers: Vec<Sender<PlayerEvent>>,
    /// The engine rejected `current_file`; resuming must reload it.
    load_failed: bool,
}

impl<E: MediaEngine> PlaybackController<E> {
    pub fn new(engine: E, history_limit: usize) -> Self {
        Self {
            engine,
            state: PlaybackState::default(),
            history: PlayHistory::new(history_limit),
            now_playing: NowPlaying::default(),
            time_label: time_label(Duration::ZERO, Duration::ZERO),
            seek_bar: SeekBar::default(),
            subscribers: Vec::new(),
            load_failed: false,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    pub fn seek_bar(&self) -> SeekBar {
        self.seek_bar
    }

    #[cfg(test)]
    pub fn history(&self) -> &PlayHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut PlayHistory {
        &mut self.history
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_playing(&self) -> bool {
        self.state.status == PlaybackStatus::Playing
    }

    /// Register for state-change notifications.
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.state.status != status {
            self.state.status = status;
            self.emit(PlayerEvent::StatusChanged(status));
        }
    }

    /// Load `path` and start playing it.
    pub fn play(&mut self, path: &Path, record_history: bool) {
        info!(path = %path.display(), record_history, "play");
        self.engine.load(path);
        self.engine.play();
        self.load_failed = false;

        self.state.current_file = Some(path.to_path_buf());
        self.state.position = Duration::ZERO;
        self.state.duration = Duration::ZERO;
        self.seek_bar.reset();
        self.seek_bar.set_enabled(false);
        self.time_label = time_label(Duration::ZERO, Duration::ZERO);
        self.now_playing = NowPlaying::for_path(path);

        if record_history {
            self.history.record(path);
        }

        self.emit(PlayerEvent::NowPlaying(path.to_path_buf()));
        self.set_status(PlaybackStatus::Playing);
    }

    /// Play/pause with fallbacks, in this order: pause if playing, resume the
    /// loaded track, play `selection`, play `first_visible`.
    ///
    /// Returns false when there was nothing to act on.
    pub fn toggle_play_pause(
        &mut self,
        selection: Option<&Path>,
        first_visible: Option<&Path>,
    ) -> bool {
        if self.is_playing() {
            self.engine.pause();
            self.set_status(PlaybackStatus::Paused);
        } else if let Some(path) = self.state.current_file.clone() {
            if self.load_failed {
                // Try the file again so a lasting failure is reported again.
                self.play(&path, false);
            } else {
                self.engine.play();
                self.set_status(PlaybackStatus::Playing);
            }
        } else if let Some(path) = selection {
            self.play(path, true);
        } else if let Some(path) = first_visible {
            self.play(path, true);
        } else {
            debug!("play/pause with nothing to play");
            return false;
        }
        true
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.set_status(PlaybackStatus::Stopped);
        self.on_position_changed(Duration::ZERO);
    }

    /// Seek to `fraction` of the track. Ignored while the duration is unknown.
    pub fn seek_fraction(&mut self, fraction: f64) {
        if self.state.duration.is_zero() {
            return;
        }
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let value = (fraction * f64::from(SEEK_STEPS)).round() as u32;
        self.seek_slider(value);
    }

    /// The user moved the seek bar handle to `value` (0-1000).
    pub fn seek_slider(&mut self, value: u32) {
        if let Some(position) = SeekBar::target(value, self.state.duration) {
            debug!(?position, "seek");
            self.engine.set_position(position);
        }
    }

    /// Seek relative to the current position, clamped to the track.
    pub fn seek_by(&mut self, seconds: i64) {
        let duration = self.state.duration;
        if duration.is_zero() {
            return;
        }
        let delta = Duration::from_secs(seconds.unsigned_abs());
        let position = if seconds >= 0 {
            self.state.position.saturating_add(delta).min(duration)
        } else {
            self.state.position.saturating_sub(delta)
        };
        self.engine.set_position(position);
    }

    pub fn on_position_changed(&mut self, position: Duration) {
        self.state.position = position;
        self.seek_bar.show(position, self.state.duration);
        self.time_label = time_label(position, self.state.duration);
        self.emit(PlayerEvent::Progress {
            position,
            duration: self.state.duration,
        });
    }

    pub fn on_duration_changed(&mut self, duration: Duration) {
        self.state.duration = duration;
        self.seek_bar.set_enabled(!duration.is_zero());
        self.seek_bar.show(self.state.position, duration);
        self.time_label = time_label(self.state.position, duration);
    }

    pub fn on_state_changed(&mut self, state: EngineState) {
        self.set_status(state.into());
    }

    /// The engine reached the end of the current track.
    pub fn on_end_of_media(&mut self) -> EndOfTrack {
        if self.state.repeat == RepeatMode::One {
            if let Some(path) = self.state.current_file.clone() {
                self.play(&path, false);
                return EndOfTrack::Replayed;
            }
        }
        EndOfTrack::Advance
    }

    /// The engine could not open the current track.
    pub fn on_load_failed(&mut self, reason: &str) {
        let path = self.state.current_file.clone();
        warn!(path = ?path, reason, "cannot play track");
        self.load_failed = true;
        self.set_status(PlaybackStatus::Stopped);
        self.seek_bar.set_enabled(false);
        self.now_playing.location = format!("Cannot play: {reason}");
        self.emit(PlayerEvent::LoadFailed {
            path,
            reason: reason.to_string(),
        });
    }

    /// Show `path` in the now-playing area while nothing is playing.
    pub fn preview(&mut self, path: &Path) {
        if !self.is_playing() {
            self.now_playing = NowPlaying::for_path(path);
        }
    }

    /// Set the volume (clamped to 0-100); the engine gets a linear gain.
    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        self.state.volume = volume;
        self.engine.set_volume(f32::from(volume) / 100.0);
        self.emit(PlayerEvent::VolumeChanged(volume));
    }

    pub fn change_volume(&mut self, delta: i16) {
        let volume = (i16::from(self.state.volume) + delta).clamp(0, 100) as u8;
        self.set_volume(volume);
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.state.shuffle = shuffle;
        self.emit_mode();
    }

    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.state.shuffle);
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.state.repeat = repeat;
        self.emit_mode();
    }

    pub fn cycle_repeat(&mut self) {
        self.set_repeat(self.state.repeat.cycled());
    }

    fn emit_mode(&mut self) {
        self.emit(PlayerEvent::ModeChanged {
            shuffle: self.state.shuffle,
            repeat: self.state.repeat,
        });
    }
}
