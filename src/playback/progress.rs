use std::time::Duration;

/// Resolution of the seek bar.
pub const SEEK_STEPS: u32 = 1000;

/// Format a `Duration` as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `elapsed / total`, both as `MM:SS`.
pub fn time_label(position: Duration, duration: Duration) -> String {
    format!("{} / {}", format_mmss(position), format_mmss(duration))
}

/// Display state of the seek bar.
///
/// `show` moves the handle to follow playback and never produces a seek;
/// `target` turns a user-chosen handle value into a position to seek to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeekBar {
    value: u32,
    enabled: bool,
}

impl SeekBar {
    #[cfg(test)]
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn ratio(&self) -> f64 {
        f64::from(self.value) / f64::from(SEEK_STEPS)
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Follow playback. Leaves the handle alone while the duration is unknown.
    pub(crate) fn show(&mut self, position: Duration, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        let steps = position.as_millis() * u128::from(SEEK_STEPS) / duration.as_millis().max(1);
        self.value = steps.min(u128::from(SEEK_STEPS)) as u32;
    }

    pub(crate) fn reset(&mut self) {
        self.value = 0;
    }

    /// Position for a handle at `value`, or `None` when the duration is unknown.
    pub fn target(value: u32, duration: Duration) -> Option<Duration> {
        if duration.is_zero() {
            return None;
        }
        let value = value.min(SEEK_STEPS);
        let ms = duration.as_millis() * u128::from(value) / u128::from(SEEK_STEPS);
        Some(Duration::from_millis(ms as u64))
    }
}
