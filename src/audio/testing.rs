//! A recording engine for controller and app tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::engine::MediaEngine;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    SetPosition(Duration),
    SetVolume(f32),
}

#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    pub calls: Vec<Call>,
}

impl FakeEngine {
    pub fn last_gain(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::SetVolume(g) => Some(*g),
            _ => None,
        })
    }

    pub fn loaded(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }
}

impl MediaEngine for FakeEngine {
    fn load(&mut self, path: &Path) {
        self.calls.push(Call::Load(path.to_path_buf()));
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
    }

    fn set_position(&mut self, position: Duration) {
        self.calls.push(Call::SetPosition(position));
    }

    fn set_volume(&mut self, gain: f32) {
        self.calls.push(Call::SetVolume(gain));
    }
}
