//! Music library: track catalog, search filter and folder scanning.

mod catalog;
mod model;
mod normalize;
mod scan;
mod search;

pub use catalog::Catalog;
pub use model::{Track, directory_of, title_of};
pub use scan::{ScanOutcome, ScanSummary, apply_outcome, scan, spawn_scan};
pub use search::SearchFilter;
