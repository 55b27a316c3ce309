use std::path::{Path, PathBuf};

use super::normalize::normalize;

/// One audio file known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    /// Filename without its extension.
    pub title: String,
    /// Normalized `title filename directory`, matched by the search filter.
    pub search_key: String,
}

impl Track {
    /// Build a track for `path`, deriving title and search key from the filename.
    pub fn from_path(path: &Path) -> Self {
        let title = title_of(path);
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let search_key = normalize(&format!("{} {} {}", title, filename, directory_of(path)));

        Self {
            path: path.to_path_buf(),
            title,
            search_key,
        }
    }
}

/// Filename with the last extension removed.
pub fn title_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn directory_of(path: &Path) -> String {
    path.parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
