use std::path::PathBuf;
use std::sync::mpsc::Sender;

use tracing::info;

use crate::app::App;
use crate::audio::MediaEngine;
use crate::config;
use crate::library::{ScanOutcome, spawn_scan};
use crate::playback::RepeatMode;

/// Push configured volume, shuffle and repeat into the controller.
pub fn apply_playback_defaults<E: MediaEngine>(app: &mut App<E>, settings: &config::Settings) {
    app.player.set_volume(settings.audio.initial_volume);
    app.player.set_shuffle(settings.playback.shuffle);
    app.player
        .set_repeat(RepeatMode::from(settings.playback.repeat));
}

/// Folders to scan at startup: the OS music directory (unless disabled) and
/// any given on the command line, without duplicates.
pub fn startup_roots(
    settings: &config::LibrarySettings,
    skip_music_dir: bool,
    extra: &[PathBuf],
) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if settings.scan_music_dir && !skip_music_dir {
        if let Some(music) = dirs::audio_dir() {
            roots.push(music);
        }
    }
    for dir in extra {
        if !roots.contains(dir) {
            roots.push(dir.clone());
        }
    }
    roots
}

/// Start a background scan and count it as pending on `app`.
pub fn start_scan<E: MediaEngine>(
    app: &mut App<E>,
    root: PathBuf,
    settings: &config::LibrarySettings,
    tx: &Sender<ScanOutcome>,
) {
    info!(root = %root.display(), "scanning folder");
    app.pending_scans += 1;
    // Workers are detached; results arrive over `tx`.
    drop(spawn_scan(root, settings.clone(), tx.clone()));
}
