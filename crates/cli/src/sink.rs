//! Terminal sink for demonstration runs.

use std::sync::Arc;
use std::time::Instant;

use opencadence_pacer::{MarkClock, PaceSink, PacedItem, RateController, SinkError};

/// Prints one line per emission with elapsed times relative to loop start.
///
/// Stands in for a real transmission path; the pacing engine only sees the
/// [`PaceSink`] contract.
pub struct EmissionLog {
    pacer: Arc<RateController<u32>>,
    clock: MarkClock,
}

impl EmissionLog {
    pub fn new(pacer: Arc<RateController<u32>>) -> Self {
        let clock = pacer.clock();
        Self { pacer, clock }
    }

    /// Signed milliseconds from loop start to the item's birth instant.
    ///
    /// Slightly negative values are normal for items stamped between
    /// controller construction and loop start.
    fn birth_offset_ms(&self, item: &PacedItem<u32>, init: Instant) -> i128 {
        let born = self.clock.to_instant(item.birth_mark);
        if born >= init {
            born.duration_since(init).as_millis() as i128
        } else {
            -(init.duration_since(born).as_millis() as i128)
        }
    }
}

impl PaceSink<u32> for EmissionLog {
    fn send(&mut self, item: PacedItem<u32>) -> Result<(), SinkError> {
        let init = self.pacer.init_time().unwrap_or_else(|| self.clock.epoch());
        let curr_ms = init.elapsed().as_millis();
        let birth_ms = self.birth_offset_ms(&item, init);

        match item.payload {
            Some(payload) => {
                println!("curr: {curr_ms} ms, birth: {birth_ms} ms, payload: {payload}");
            }
            None => {
                println!("curr: {curr_ms} ms, birth: {birth_ms} ms, extrapolated");
            }
        }
        Ok(())
    }
}
