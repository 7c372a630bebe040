//! Lock-free counters for pacing observability.
//!
//! The drop-oldest and drop-stale policies are intentional and silent on the
//! data path; these counters are the only visibility into how often the
//! fallbacks fire. All increments happen on the pacing or producer hot path,
//! so they are single relaxed atomic instructions with no allocation and no
//! locking.

use core::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counter snapshot returned by [`PacerCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PacerSnapshot {
    /// Items accepted by `insert`.
    pub items_inserted: u64,
    /// Items evicted from a saturated queue by a newer insert.
    pub items_evicted: u64,
    /// Items discarded at drain time for being older than the last emission.
    pub items_discarded_stale: u64,
    /// Real (non-synthesized) items handed to the sink.
    pub items_emitted: u64,
    /// Ticks processed in total.
    pub ticks_total: u64,
    /// Ticks that emitted a synthesized placeholder.
    pub ticks_extrapolated: u64,
    /// Deliveries the sink reported as failed.
    pub sink_errors: u64,
    /// Ticks whose wake time was already past the scheduled deadline.
    pub missed_deadlines: u64,
}

impl PacerSnapshot {
    /// Fraction of ticks that fell back to extrapolation (0.0 to 1.0).
    #[must_use]
    pub fn extrapolation_rate(&self) -> f64 {
        if self.ticks_total == 0 {
            0.0
        } else {
            self.ticks_extrapolated as f64 / self.ticks_total as f64
        }
    }

    /// Fraction of inserted items later discarded as stale (0.0 to 1.0).
    #[must_use]
    pub fn stale_drop_rate(&self) -> f64 {
        if self.items_inserted == 0 {
            0.0
        } else {
            self.items_discarded_stale as f64 / self.items_inserted as f64
        }
    }
}

/// Atomic counters shared between producers and the pacing thread.
#[derive(Debug, Default)]
pub struct PacerCounters {
    items_inserted: AtomicU64,
    items_evicted: AtomicU64,
    items_discarded_stale: AtomicU64,
    items_emitted: AtomicU64,
    ticks_total: AtomicU64,
    ticks_extrapolated: AtomicU64,
    sink_errors: AtomicU64,
    missed_deadlines: AtomicU64,
}

impl PacerCounters {
    /// Create counters initialized to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items_inserted: AtomicU64::new(0),
            items_evicted: AtomicU64::new(0),
            items_discarded_stale: AtomicU64::new(0),
            items_emitted: AtomicU64::new(0),
            ticks_total: AtomicU64::new(0),
            ticks_extrapolated: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            missed_deadlines: AtomicU64::new(0),
        }
    }

    /// Record an accepted insert.
    #[inline]
    pub fn inc_inserted(&self) {
        self.items_inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an item pushed out of a saturated queue.
    #[inline]
    pub fn inc_evicted(&self) {
        self.items_evicted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an item discarded at drain time as stale.
    #[inline]
    pub fn inc_discarded_stale(&self) {
        self.items_discarded_stale.fetch_add(1, Ordering::Relaxed);
    }

    /// Record several items discarded in one drain pass.
    #[inline]
    pub fn add_discarded_stale(&self, count: u64) {
        self.items_discarded_stale.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a real item handed to the sink.
    #[inline]
    pub fn inc_emitted(&self) {
        self.items_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a processed tick.
    #[inline]
    pub fn inc_tick(&self) {
        self.ticks_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a tick that emitted a synthesized placeholder.
    #[inline]
    pub fn inc_extrapolated(&self) {
        self.ticks_extrapolated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed sink delivery.
    #[inline]
    pub fn inc_sink_error(&self) {
        self.sink_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a tick that woke past its scheduled deadline.
    #[inline]
    pub fn inc_missed_deadline(&self) {
        self.missed_deadlines.fetch_add(1, Ordering::Relaxed);
    }

    /// Read a consistent-enough snapshot of all counters.
    ///
    /// Individual loads are relaxed; counters are eventually consistent with
    /// each other, which is sufficient for monitoring.
    #[must_use]
    pub fn snapshot(&self) -> PacerSnapshot {
        PacerSnapshot {
            items_inserted: self.items_inserted.load(Ordering::Relaxed),
            items_evicted: self.items_evicted.load(Ordering::Relaxed),
            items_discarded_stale: self.items_discarded_stale.load(Ordering::Relaxed),
            items_emitted: self.items_emitted.load(Ordering::Relaxed),
            ticks_total: self.ticks_total.load(Ordering::Relaxed),
            ticks_extrapolated: self.ticks_extrapolated.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
            missed_deadlines: self.missed_deadlines.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = PacerCounters::new();
        assert_eq!(counters.snapshot(), PacerSnapshot::default());
    }

    #[test]
    fn test_increments_visible_in_snapshot() {
        let counters = PacerCounters::new();

        counters.inc_inserted();
        counters.inc_inserted();
        counters.inc_evicted();
        counters.inc_tick();
        counters.inc_extrapolated();
        counters.inc_sink_error();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.items_inserted, 2);
        assert_eq!(snapshot.items_evicted, 1);
        assert_eq!(snapshot.ticks_total, 1);
        assert_eq!(snapshot.ticks_extrapolated, 1);
        assert_eq!(snapshot.sink_errors, 1);
    }

    #[test]
    fn test_extrapolation_rate() {
        let counters = PacerCounters::new();
        assert_eq!(counters.snapshot().extrapolation_rate(), 0.0);

        for _ in 0..4 {
            counters.inc_tick();
        }
        counters.inc_extrapolated();

        let rate = counters.snapshot().extrapolation_rate();
        assert!((rate - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_stale_drop_rate() {
        let counters = PacerCounters::new();

        for _ in 0..10 {
            counters.inc_inserted();
        }
        counters.inc_discarded_stale();
        counters.inc_discarded_stale();

        let rate = counters.snapshot().stale_drop_rate();
        assert!((rate - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_concurrent_increments() {
        use std::sync::Arc;

        let counters = Arc::new(PacerCounters::new());
        let mut handles = Vec::new();

        for _ in 0..4 {
            let counters = Arc::clone(&counters);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    counters.inc_inserted();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counters.snapshot().items_inserted, 4000);
    }
}
