//! Viewer configuration.
use std::time::Duration;

use crate::slice::Plane;

/// Options for a viewing session.
///
/// Build from `ViewerOptions::default()` and adjust with the `with_*`
/// methods:
///
/// ```
/// use niiview::viewer::ViewerOptions;
/// use niiview::Plane;
///
/// let options = ViewerOptions::default()
///     .with_plane(Plane::Coronal)
///     .with_playback_speed_ms(100);
/// assert_eq!(options.playback_speed_ms(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    plane: Plane,
    playback_speed_ms: u64,
    min_speed_ms: u64,
    max_speed_ms: u64,
    speed_step_ms: u64,
    best_guess_recovery: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        ViewerOptions {
            plane: Plane::Axial,
            playback_speed_ms: 200,
            min_speed_ms: 50,
            max_speed_ms: 500,
            speed_step_ms: 50,
            best_guess_recovery: true,
        }
    }
}

impl ViewerOptions {
    /// Plane selected when the viewer starts.
    pub fn with_plane(mut self, plane: Plane) -> Self {
        self.plane = plane;
        self
    }

    /// Initial interval between two playback ticks. Snapped into the
    /// speed bounds.
    pub fn with_playback_speed_ms(mut self, ms: u64) -> Self {
        self.playback_speed_ms = self.snap_speed(ms);
        self
    }

    /// Bounds and granularity of the playback speed control.
    pub fn with_speed_bounds(mut self, min_ms: u64, max_ms: u64, step_ms: u64) -> Self {
        self.min_speed_ms = min_ms.max(1);
        self.max_speed_ms = max_ms.max(self.min_speed_ms);
        self.speed_step_ms = step_ms.max(1);
        self.playback_speed_ms = self.snap_speed(self.playback_speed_ms);
        self
    }

    /// Whether a file no detection stage recognizes is shown with a
    /// guessed layout (with a warning) instead of failing.
    pub fn with_best_guess_recovery(mut self, enabled: bool) -> Self {
        self.best_guess_recovery = enabled;
        self
    }

    /// Initial plane.
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Initial playback interval in milliseconds.
    pub fn playback_speed_ms(&self) -> u64 {
        self.playback_speed_ms
    }

    /// `(min, max, step)` of the playback interval, in milliseconds.
    pub fn speed_bounds(&self) -> (u64, u64, u64) {
        (self.min_speed_ms, self.max_speed_ms, self.speed_step_ms)
    }

    /// Whether best-guess recovery is enabled.
    pub fn best_guess_recovery(&self) -> bool {
        self.best_guess_recovery
    }

    /// Clamp `ms` into the speed bounds and round it to the nearest step
    /// above the minimum.
    pub fn snap_speed(&self, ms: u64) -> u64 {
        let ms = ms.max(self.min_speed_ms).min(self.max_speed_ms);
        let steps = (ms - self.min_speed_ms + self.speed_step_ms / 2) / self.speed_step_ms;
        (self.min_speed_ms + steps * self.speed_step_ms).min(self.max_speed_ms)
    }

    /// Initial playback interval.
    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback_speed_ms)
    }
}
