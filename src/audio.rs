//! Audio playback: the media engine interface and its rodio implementation.
//!
//! `AudioPlayer` forwards commands to a dedicated audio thread which owns the
//! output stream and the current sink, and reports progress back as
//! `EngineEvent`s.

mod engine;
mod player;
mod probe;
mod sink;
mod thread;
mod types;

pub use engine::{EngineEvent, EngineState, MediaEngine, MediaStatus};
pub use player::AudioPlayer;

#[cfg(test)]
pub(crate) mod testing;
