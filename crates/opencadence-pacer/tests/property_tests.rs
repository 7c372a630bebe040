//! Property-based tests for the pacer crate.

use opencadence_pacer::{
    BoundedItemQueue, FnSink, MILLIS_PER_SEC, MarkClock, PacedItem, PacerConfig, RateController,
};
use proptest::prelude::*;
use quickcheck_macros::quickcheck;
use std::time::Duration;

#[quickcheck]
fn queue_size_never_exceeds_capacity(marks: Vec<i64>, capacity: u8) {
    let capacity = usize::from(capacity.clamp(1, 16));
    let mut queue = BoundedItemQueue::new(capacity);

    for mark in marks {
        queue.insert(PacedItem::new(mark, 0u32));
        assert!(queue.len() <= capacity);
    }
}

#[quickcheck]
fn saturated_queue_holds_most_recent_inserts(marks: Vec<i64>, capacity: u8) {
    let capacity = usize::from(capacity.clamp(1, 16));
    let mut queue = BoundedItemQueue::new(capacity);

    for &mark in &marks {
        queue.insert(PacedItem::new(mark, 0u32));
    }

    let expected: Vec<i64> = marks
        .iter()
        .copied()
        .skip(marks.len().saturating_sub(capacity))
        .collect();

    let mut drained = Vec::new();
    while let Some(item) = queue.pop_front() {
        drained.push(item.birth_mark);
    }

    assert_eq!(drained, expected);
}

#[quickcheck]
fn eviction_happens_exactly_when_saturated(marks: Vec<i64>) {
    let mut queue = BoundedItemQueue::new(4);
    let mut evictions = 0usize;

    for mark in &marks {
        if queue.insert(PacedItem::new(*mark, 0u32)).is_some() {
            evictions += 1;
        }
    }

    assert_eq!(evictions, marks.len().saturating_sub(4));
}

#[quickcheck]
fn capacity_formula_matches_validation(rate_hz: u32, freshness_ms: u32) {
    let rate_hz = rate_hz % 2_000;
    let freshness_ms = freshness_ms % 10_000;
    let config = PacerConfig::new(rate_hz, freshness_ms);

    let derived = u64::from(rate_hz) * u64::from(freshness_ms) / u64::from(MILLIS_PER_SEC);
    assert_eq!(config.max_queue_size() as u64, derived);

    let valid =
        rate_hz > 0 && freshness_ms > 0 && rate_hz <= MILLIS_PER_SEC && derived > 0;
    assert_eq!(config.validate().is_ok(), valid);
}

#[quickcheck]
fn zero_parameters_never_validate(freshness_ms: u32) {
    assert!(PacerConfig::new(0, freshness_ms).validate().is_err());
    assert!(PacerConfig::new(freshness_ms, 0).validate().is_err());
}

#[quickcheck]
fn mark_round_trip_truncates_to_millisecond(offset_us: u32) {
    let clock = MarkClock::new();
    let instant = clock.epoch() + Duration::from_micros(u64::from(offset_us));

    let mark = clock.to_mark(instant);
    assert_eq!(mark, i64::from(offset_us / 1_000));

    let reconstructed = clock.to_instant(mark);
    assert!(reconstructed <= instant);
    assert!(instant.duration_since(reconstructed) < Duration::from_millis(1));
}

proptest! {
    /// Whatever producers throw at it, each tick emits exactly one item,
    /// emitted marks never regress, and every synthesized mark is the
    /// previous emission advanced by one period.
    #[test]
    fn selection_emits_monotone_marks(
        batches in prop::collection::vec(
            prop::collection::vec(0i64..10_000, 0..4),
            1..40,
        )
    ) {
        let pacer = RateController::<u32>::new(PacerConfig::new(10, 400)).unwrap();
        let period_ms = pacer.config().period_ms() as i64;
        let tick_count = batches.len();

        let mut emitted = Vec::new();
        let mut sink = FnSink(|item: PacedItem<u32>| emitted.push(item));

        for batch in batches {
            for mark in batch {
                pacer.insert(PacedItem::new(mark, 0)).unwrap();
            }
            pacer.tick(&mut sink);
        }

        prop_assert_eq!(emitted.len(), tick_count);

        let mut prev_mark = 0i64;
        for item in &emitted {
            prop_assert!(item.birth_mark >= prev_mark, "mark regressed");
            if item.synthesized {
                prop_assert_eq!(item.birth_mark, prev_mark + period_ms);
                prop_assert!(item.payload.is_none());
            } else {
                prop_assert!(item.payload.is_some());
            }
            prev_mark = item.birth_mark;
        }

        let snapshot = pacer.metrics();
        prop_assert_eq!(snapshot.ticks_total as usize, tick_count);
        prop_assert_eq!(
            snapshot.items_emitted + snapshot.ticks_extrapolated,
            snapshot.ticks_total
        );
    }
}
