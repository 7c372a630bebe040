//! Portable pacing thread support for non-Linux targets.

use std::time::Instant;

/// Sleep implementation using the standard library.
pub(crate) struct PlatformSleep;

impl PlatformSleep {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Priority elevation is not available; always reports refusal.
    pub(crate) fn elevate_priority(&mut self) -> bool {
        false
    }

    /// Sleep until `target` using `std::thread::sleep`.
    pub(crate) fn sleep_until(&mut self, target: Instant) {
        let now = Instant::now();
        if target > now {
            std::thread::sleep(target.duration_since(now));
        }
    }
}

impl Default for PlatformSleep {
    fn default() -> Self {
        Self::new()
    }
}
