//! Commands understood by the audio thread.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Open the file and prepare a paused sink for it.
    Load(PathBuf),
    /// Start or resume playback of the loaded file.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Stop playback and rewind the loaded file.
    Stop,
    /// Seek to an absolute position.
    Seek(Duration),
    /// Set the output gain (0.0 - 1.0).
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
