//! Millisecond birth-mark timestamp model.
//!
//! Items carry their creation time as a comparable, serializable integer
//! rather than an opaque [`Instant`]. A [`MarkClock`] fixes the reference
//! epoch for one controller and converts between the two representations.

use std::time::{Duration, Instant};

/// Integer timestamp: whole milliseconds since a [`MarkClock`] epoch.
pub type BirthMark = i64;

/// Per-controller monotonic reference clock.
///
/// The epoch is captured when the clock is created and never shared between
/// controllers, so birth marks are only comparable within one controller's
/// lifetime. The clock is `Copy`; producers hold their own copy to stamp
/// items in the controller's reference frame.
///
/// # Resolution
///
/// Conversions truncate to whole milliseconds. `to_instant(to_mark(x))`
/// reproduces `x` at millisecond resolution; sub-millisecond precision is
/// not preserved anywhere in the pacing engine.
#[derive(Debug, Clone, Copy)]
pub struct MarkClock {
    epoch: Instant,
}

impl MarkClock {
    /// Create a clock whose epoch is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// The fixed reference epoch.
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Milliseconds between `instant` and the epoch, truncated.
    ///
    /// Instants before the epoch saturate to mark 0; with a per-controller
    /// epoch they can only arise from callers stamping instants captured
    /// before the controller existed.
    #[must_use]
    pub fn to_mark(&self, instant: Instant) -> BirthMark {
        instant.saturating_duration_since(self.epoch).as_millis() as BirthMark
    }

    /// Reconstruct the monotonic instant a mark refers to.
    #[must_use]
    pub fn to_instant(&self, mark: BirthMark) -> Instant {
        self.epoch + Duration::from_millis(mark.max(0).unsigned_abs())
    }

    /// The current instant expressed as a mark.
    #[must_use]
    pub fn now_mark(&self) -> BirthMark {
        self.to_mark(Instant::now())
    }
}

impl Default for MarkClock {
    fn default() -> Self {
        Self::new()
    }
}
