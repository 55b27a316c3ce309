use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use tracing::debug;

/// Read the total duration from the file's audio properties.
///
/// Used when the decoder cannot tell the length of a stream up front
/// (common for MP3 and AAC). Tags are not read.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let duration = tagged.properties().duration();
            (!duration.is_zero()).then_some(duration)
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "duration probe failed");
            None
        }
    }
}
