//! Next / previous track selection.
//!
//! Indices are positions in the visible (filtered) list. An empty view makes
//! every operation return `None`.

use std::path::PathBuf;

use rand::Rng;

use crate::config::RepeatSetting;

use super::history::PlayHistory;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the list.
    #[default]
    Off,
    /// Wrap around to the other end of the list.
    All,
    /// Replay the current track when it ends.
    One,
}

impl RepeatMode {
    /// `Off -> All -> One -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::All => "All",
            Self::One => "One",
        }
    }
}

impl From<RepeatSetting> for RepeatMode {
    fn from(setting: RepeatSetting) -> Self {
        match setting {
            RepeatSetting::Off => Self::Off,
            RepeatSetting::All => Self::All,
            RepeatSetting::One => Self::One,
        }
    }
}

/// Where "previous" should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Previous {
    /// Replay this path from history without recording it again.
    History(PathBuf),
    /// Play the visible row at this index.
    Index(usize),
}

/// Pick the row after `current`.
///
/// With shuffle on, any row may come next, so the list never runs out.
pub fn next_index<R: Rng + ?Sized>(
    current: Option<usize>,
    total: usize,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> Option<usize> {
    if total == 0 {
        return None;
    }

    let next = if shuffle {
        rng.random_range(0..total)
    } else {
        current.map_or(0, |c| c + 1)
    };

    if next < total {
        Some(next)
    } else if repeat == RepeatMode::All {
        Some(0)
    } else {
        None
    }
}

/// Step back through `history`, or fall back to the row before `current`.
pub fn previous(
    history: &mut PlayHistory,
    current: Option<usize>,
    total: usize,
    repeat: RepeatMode,
) -> Option<Previous> {
    if total == 0 {
        return None;
    }

    if let Some(path) = history.step_back() {
        return Some(Previous::History(path.to_path_buf()));
    }

    match current {
        Some(c) if c > 0 => Some(Previous::Index(c - 1)),
        _ if repeat == RepeatMode::All => Some(Previous::Index(total - 1)),
        _ => None,
    }
}
