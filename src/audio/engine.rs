//! The media engine seam.
//!
//! The playback controller drives any `MediaEngine`. Engines report back
//! asynchronously with `EngineEvent`s, which the runtime forwards to the
//! controller on the controlling thread.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Commands the playback controller issues to a media engine.
pub trait MediaEngine {
    /// Open `path` as the current source. Playback does not start until `play`.
    fn load(&mut self, path: &Path);
    fn play(&mut self);
    fn pause(&mut self);
    /// Stop playback and rewind to the start of the loaded source.
    fn stop(&mut self);
    fn set_position(&mut self, position: Duration);
    /// Output gain in `[0.0, 1.0]`.
    fn set_volume(&mut self, gain: f32);
}

/// Transport state as reported by the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Playing,
    Paused,
}

/// Status of the loaded media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaStatus {
    Loaded,
    EndOfMedia,
    /// The source could not be opened or decoded.
    Invalid(String),
}

/// Notifications from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PositionChanged(Duration),
    DurationChanged(Duration),
    StateChanged(EngineState),
    /// `source` is the file the status belongs to. It may already have been
    /// replaced by a newer load when the event is handled.
    StatusChanged { source: PathBuf, status: MediaStatus },
}
