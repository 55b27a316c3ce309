//! The set of tracks discovered during this session.
//!
//! Tracks are only ever added. A `HashSet` of paths keeps membership checks
//! constant time so rescanning a folder never duplicates entries.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::model::Track;

#[derive(Debug, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    known: HashSet<PathBuf>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path` unless it is already present. Returns whether a track was added.
    pub fn add(&mut self, path: &Path) -> bool {
        if self.contains(path) {
            return false;
        }
        self.known.insert(path.to_path_buf());
        self.tracks.push(Track::from_path(path));
        true
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.known.contains(path)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.tracks.iter().position(|t| t.path == path)
    }

    /// Stable, case-insensitive sort by title.
    pub fn sort_by_title(&mut self) {
        self.tracks
            .sort_by_cached_key(|t| t.title.to_lowercase());
    }
}
