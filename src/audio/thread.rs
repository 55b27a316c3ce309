use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use crate::error::MediaError;

use super::engine::{EngineEvent, EngineState, MediaStatus};
use super::sink::create_sink;
use super::types::AudioCmd;

/// How often position updates are published while playing.
const TICK: Duration = Duration::from_millis(200);

/// Everything the audio thread owns between commands.
struct Deck {
    stream: Option<OutputStream>,
    events: Sender<EngineEvent>,
    loaded: Option<PathBuf>,
    sink: Option<Sink>,
    state: EngineState,
    volume: f32,
}

impl Deck {
    fn new(stream: Option<OutputStream>, events: Sender<EngineEvent>, initial_gain: f32) -> Self {
        Self {
            stream,
            events,
            loaded: None,
            sink: None,
            state: EngineState::Stopped,
            volume: initial_gain.clamp(0.0, 1.0),
        }
    }

    fn emit(&self, event: EngineEvent) {
        // The receiver only goes away during shutdown.
        let _ = self.events.send(event);
    }

    fn set_state(&mut self, state: EngineState) {
        if self.state != state {
            self.state = state;
            self.emit(EngineEvent::StateChanged(state));
        }
    }

    fn emit_status(&self, source: PathBuf, status: MediaStatus) {
        self.emit(EngineEvent::StatusChanged { source, status });
    }

    /// Drop the source that failed. A later `Play` has nothing to open until
    /// the next `Load`.
    fn fail(&mut self, source: PathBuf, err: MediaError) {
        error!(error = %err, "media load failed");
        self.sink = None;
        self.loaded = None;
        self.set_state(EngineState::Stopped);
        self.emit_status(source, MediaStatus::Invalid(err.to_string()));
    }

    /// Open the loaded file into a fresh paused sink.
    fn open(&mut self) -> bool {
        let Some(path) = self.loaded.clone() else {
            return false;
        };
        let Some(stream) = self.stream.as_ref() else {
            self.fail(
                path,
                MediaError::NoOutputDevice("output stream unavailable".to_string()),
            );
            return false;
        };

        match create_sink(stream, &path) {
            Ok((sink, duration)) => {
                sink.set_volume(self.volume);
                self.sink = Some(sink);
                self.emit(EngineEvent::DurationChanged(duration.unwrap_or(Duration::ZERO)));
                self.emit(EngineEvent::PositionChanged(Duration::ZERO));
                true
            }
            Err(err) => {
                self.fail(path, err);
                false
            }
        }
    }

    fn load(&mut self, path: PathBuf) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.set_state(EngineState::Stopped);
        debug!(path = %path.display(), "loading");
        self.loaded = Some(path.clone());
        if self.open() {
            self.emit_status(path, MediaStatus::Loaded);
        }
    }

    fn play(&mut self) {
        if self.sink.is_none() {
            if self.loaded.is_none() {
                // The controller may already show Playing; always correct it.
                debug!("play with nothing loaded");
                self.state = EngineState::Stopped;
                self.emit(EngineEvent::StateChanged(EngineState::Stopped));
                return;
            }
            if !self.open() {
                return;
            }
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.set_state(EngineState::Playing);
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
            self.set_state(EngineState::Paused);
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.set_state(EngineState::Stopped);
        self.emit(EngineEvent::PositionChanged(Duration::ZERO));
    }

    fn seek(&mut self, position: Duration) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        match s.try_seek(position) {
            Ok(()) => self.emit(EngineEvent::PositionChanged(position)),
            Err(e) => warn!(error = %e, ?position, "seek failed"),
        }
    }

    fn set_volume(&mut self, gain: f32) {
        self.volume = gain.clamp(0.0, 1.0);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    /// Publish progress and detect the end of the current source.
    fn tick(&mut self) {
        if self.state != EngineState::Playing {
            return;
        }
        let Some(s) = self.sink.as_ref() else {
            return;
        };

        if s.empty() {
            self.sink = None;
            self.set_state(EngineState::Stopped);
            if let Some(source) = self.loaded.clone() {
                self.emit_status(source, MediaStatus::EndOfMedia);
            }
        } else {
            let pos = s.get_pos();
            self.emit(EngineEvent::PositionChanged(pos));
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if fade_out_ms == 0 || self.state != EngineState::Playing {
            sink.stop();
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.stop();
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<EngineEvent>,
    initial_gain: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                // Keep serving commands so every load reports a clean failure.
                error!(error = %e, "no audio output device");
                None
            }
        };

        let mut deck = Deck::new(stream, events, initial_gain);
        let mut last_tick = Instant::now();

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(path) => deck.load(path),
                    AudioCmd::Play => deck.play(),
                    AudioCmd::Pause => deck.pause(),
                    AudioCmd::Stop => deck.stop(),
                    AudioCmd::Seek(position) => deck.seek(position),
                    AudioCmd::SetVolume(gain) => deck.set_volume(gain),
                    AudioCmd::Quit { fade_out_ms } => {
                        deck.fade_out(fade_out_ms);
                        info!("audio thread exiting");
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= TICK {
                deck.tick();
                last_tick = Instant::now();
            }
        }
    })
}
