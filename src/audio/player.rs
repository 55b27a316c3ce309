use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use super::engine::{EngineEvent, MediaEngine};
use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// rodio-backed media engine. Commands go to a dedicated audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Start the audio thread. Engine events arrive on the returned receiver.
    pub fn new(initial_gain: f32) -> (Self, Receiver<EngineEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        let audio_handle = spawn_audio_thread(rx, event_tx, initial_gain);

        let player = Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        };
        (player, event_rx)
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Fade out, stop the audio thread and wait for it.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }

    fn command(&self, cmd: AudioCmd) {
        if let Err(e) = self.send(cmd) {
            warn!(command = ?e.0, "audio thread is gone");
        }
    }
}

impl MediaEngine for AudioPlayer {
    fn load(&mut self, path: &Path) {
        self.command(AudioCmd::Load(path.to_path_buf()));
    }

    fn play(&mut self) {
        self.command(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.command(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        self.command(AudioCmd::Stop);
    }

    fn set_position(&mut self, position: Duration) {
        self.command(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, gain: f32) {
        self.command(AudioCmd::SetVolume(gain));
    }
}
