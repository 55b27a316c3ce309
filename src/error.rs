//! Error types for scanning and media loading.
//!
//! Neither kind is fatal: scan errors are logged and the walk continues,
//! media errors are reported to the playback controller which goes idle.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to read an entry while walking a music folder.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Failure to open or start playing a file on the audio engine.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
}
