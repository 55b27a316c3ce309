use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::ScanError;

use super::catalog::Catalog;

/// Files found under one root, plus the entries that could not be read.
#[derive(Debug)]
pub struct ScanOutcome {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub errors: Vec<ScanError>,
}

/// What applying a `ScanOutcome` did to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    pub found: usize,
    pub added: usize,
    pub skipped: usize,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `root` and collect every audio file it contains.
///
/// Unreadable entries and symlink loops are logged and recorded in
/// `errors`; they never stop the walk.
pub fn collect_audio_files(root: &Path, settings: &LibrarySettings) -> ScanOutcome {
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let mut files: Vec<PathBuf> = Vec::new();
    let mut errors: Vec<ScanError> = Vec::new();

    let mut walker = WalkDir::new(&root).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let path = source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone());
                let err = ScanError::FileAccess { path, source };
                warn!(error = %err, "skipping unreadable entry");
                errors.push(err);
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() {
            continue;
        }
        // With follow_links the entry already describes the target.
        if !path.is_file() {
            debug!(path = %path.display(), "skipping non-regular file");
            continue;
        }
        if is_audio_file(path, settings) {
            files.push(path.to_path_buf());
        }
    }

    ScanOutcome {
        root,
        files,
        errors,
    }
}

/// Add every file of `outcome` to `catalog`, then re-sort it.
pub fn apply_outcome(catalog: &mut Catalog, outcome: &ScanOutcome) -> ScanSummary {
    let added = outcome.files.iter().filter(|p| catalog.add(p)).count();
    catalog.sort_by_title();

    let summary = ScanSummary {
        found: outcome.files.len(),
        added,
        skipped: outcome.errors.len(),
    };
    info!(
        root = %outcome.root.display(),
        found = summary.found,
        added = summary.added,
        skipped = summary.skipped,
        "scan applied"
    );
    summary
}

/// Scan `root` synchronously into `catalog`.
pub fn scan(root: &Path, settings: &LibrarySettings, catalog: &mut Catalog) -> ScanSummary {
    let outcome = collect_audio_files(root, settings);
    apply_outcome(catalog, &outcome)
}

/// Scan `root` on a worker thread and send the outcome back through `tx`.
///
/// The catalog is not touched here; the receiver applies the outcome on the
/// thread that owns it.
pub fn spawn_scan(
    root: PathBuf,
    settings: LibrarySettings,
    tx: Sender<ScanOutcome>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!(root = %root.display(), "scan started");
        let outcome = collect_audio_files(&root, &settings);
        if tx.send(outcome).is_err() {
            debug!(root = %root.display(), "scan finished after receiver closed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        for name in ["a.mp3", "a.MP3", "a.flac", "a.wav", "a.ogg", "a.m4a", "a.AAC"] {
            assert!(is_audio_file(&Path::new("/tmp").join(name), &settings), "{name}");
        }
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn is_audio_file_tolerates_dotted_extension_settings() {
        let settings = LibrarySettings {
            extensions: vec![" .OPUS ".into()],
            ..LibrarySettings::default()
        };
        assert!(is_audio_file(Path::new("/tmp/a.opus"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    }

    #[test]
    fn scan_keeps_distinct_paths_and_skips_non_audio() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("upper");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.path().join("song.mp3"), b"same bytes").unwrap();
        fs::write(sub.join("SONG.MP3"), b"same bytes").unwrap();
        fs::write(dir.path().join("notes.txt"), b"not audio").unwrap();

        let mut catalog = Catalog::new();
        let summary = scan(dir.path(), &LibrarySettings::default(), &mut catalog);

        assert_eq!(catalog.len(), 2);
        assert_eq!(summary.found, 2);
        assert_eq!(summary.added, 2);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn rescanning_adds_nothing_new() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.flac"), b"x").unwrap();

        let mut catalog = Catalog::new();
        let settings = LibrarySettings::default();
        scan(dir.path(), &settings, &mut catalog);
        let again = scan(dir.path(), &settings, &mut catalog);

        assert_eq!(catalog.len(), 1);
        assert_eq!(again.found, 1);
        assert_eq!(again.added, 0);
    }

    #[test]
    fn scan_sorts_catalog_by_title() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.MP3"), b"x").unwrap();
        fs::write(dir.path().join("A.ogg"), b"x").unwrap();
        fs::write(dir.path().join("c.wav"), b"x").unwrap();

        let mut catalog = Catalog::new();
        scan(dir.path(), &LibrarySettings::default(), &mut catalog);

        let titles: Vec<&str> = catalog.tracks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "b", "c"]);
    }

    #[test]
    fn scan_produces_absolute_paths() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();

        let outcome = collect_audio_files(dir.path(), &LibrarySettings::default());
        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].is_absolute());
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        let hidden_dir = dir.path().join(".cache");
        fs::create_dir_all(&hidden_dir).unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
        fs::write(hidden_dir.join("inside.mp3"), b"x").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"x").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let outcome = collect_audio_files(dir.path(), &settings);

        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].ends_with("visible.mp3"));
    }

    #[test]
    fn scan_respects_recursive_false_and_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        fs::write(d1.join("one.mp3"), b"x").unwrap();
        fs::write(d2.join("two.mp3"), b"x").unwrap();

        let flat = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(collect_audio_files(dir.path(), &flat).files.len(), 1);

        // Root is depth 0, so depth 2 reaches d1/* but not d1/d2/*.
        let capped = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let outcome = collect_audio_files(dir.path(), &capped);
        assert_eq!(outcome.files.len(), 2);
        assert!(!outcome.files.iter().any(|p| p.ends_with("two.mp3")));
    }

    #[test]
    fn missing_root_is_reported_not_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let outcome = collect_audio_files(&missing, &LibrarySettings::default());
        assert!(outcome.files.is_empty());
        assert_eq!(outcome.errors.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loops_are_skipped() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("a.mp3"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path(), sub.join("loop")).unwrap();

        let outcome = collect_audio_files(dir.path(), &LibrarySettings::default());
        assert_eq!(outcome.files.len(), 1);
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn spawn_scan_delivers_outcome_over_channel() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();

        let (tx, rx) = mpsc::channel();
        let handle = spawn_scan(dir.path().to_path_buf(), LibrarySettings::default(), tx);
        handle.join().unwrap();

        let outcome = rx.recv().unwrap();
        let mut catalog = Catalog::new();
        let summary = apply_outcome(&mut catalog, &outcome);
        assert_eq!(summary.added, 1);
        assert_eq!(catalog.len(), 1);
    }
}
