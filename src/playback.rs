//! Playback control: the state machine, play history and navigation policy.

mod controller;
mod history;
mod navigation;
mod progress;

pub use controller::{EndOfTrack, PlaybackController, PlaybackStatus, PlayerEvent};
pub use navigation::{Previous, RepeatMode, next_index, previous};
