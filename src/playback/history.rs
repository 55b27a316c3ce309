use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Tracks played by hand or by advancing, newest last.
///
/// The same path is never recorded twice in a row. Beyond `limit` entries
/// the oldest ones are dropped.
#[derive(Debug, Clone)]
pub struct PlayHistory {
    entries: VecDeque<PathBuf>,
    limit: usize,
}

impl PlayHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Append `path` unless it is already the latest entry.
    pub fn record(&mut self, path: &Path) {
        if self.last() == Some(path) {
            return;
        }
        self.entries.push_back(path.to_path_buf());
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Drop the latest entry and return the one before it.
    ///
    /// Needs at least two entries; otherwise the history is left untouched.
    pub fn step_back(&mut self) -> Option<&Path> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop_back();
        self.entries.back().map(PathBuf::as_path)
    }

    pub fn last(&self) -> Option<&Path> {
        self.entries.back().map(PathBuf::as_path)
    }
}

#[cfg(test)]
impl PlayHistory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }
}
