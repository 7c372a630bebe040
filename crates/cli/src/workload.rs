//! Scripted producer workload for demonstration runs.

use std::thread;
use std::time::Instant;

use opencadence_pacer::{PacedItem, RateController};

/// Demo burst: three quick arrivals, a long starvation gap, then two
/// stragglers. Offsets are milliseconds from workload start.
pub const BURST_SCHEDULE: [(u64, u32); 5] =
    [(100, 1), (200, 2), (300, 3), (1_700, 4), (2_300, 5)];

/// Insert each scheduled payload at its offset, stamped on arrival.
///
/// Returns early if the pacer is stopped mid-schedule.
pub fn run_scripted(pacer: &RateController<u32>, schedule: &[(u64, u32)]) {
    let clock = pacer.clock();
    let start = Instant::now();

    for &(offset_ms, payload) in schedule {
        let target = start + std::time::Duration::from_millis(offset_ms);
        let now = Instant::now();
        if target > now {
            thread::sleep(target.duration_since(now));
        }

        if pacer.insert(PacedItem::stamped(&clock, payload)).is_err() {
            tracing::warn!(payload, "pacer stopped; remaining workload dropped");
            return;
        }
        tracing::debug!(payload, offset_ms, "inserted workload item");
    }
}
