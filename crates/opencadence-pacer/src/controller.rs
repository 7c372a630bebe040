//! Fixed-rate pacing controller.
//!
//! This module combines the bounded queue, the birth-mark clock and the
//! absolute tick schedule into the engine that emits exactly one item per
//! tick: a real item when a fresh-enough one is queued, a synthesized
//! placeholder otherwise.

use core::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::clock::MarkClock;
use crate::config::PacerConfig;
use crate::error::{PacerError, PacerResult};
use crate::item::PacedItem;
use crate::metrics::{PacerCounters, PacerSnapshot};
use crate::queue::BoundedItemQueue;
use crate::sink::PaceSink;

#[cfg(target_os = "linux")]
use crate::linux::PlatformSleep;

#[cfg(not(target_os = "linux"))]
use crate::fallback::PlatformSleep;

/// When the first emission happens relative to loop start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Tick immediately, then settle into the cadence: first emission at t≈0.
    Immediate,
    /// Wait one period before the first tick: first emission at t≈period.
    Deferred,
}

/// Queue contents and emission watermark, guarded by one lock.
///
/// `insert` and the per-tick drain are the only mutation entry points, so
/// the lock is held only for bounded pointer work, never across sleeps or
/// sink calls.
struct SharedState<T> {
    queue: BoundedItemQueue<T>,
    /// Birth-mark instant of the most recently emitted item. Non-decreasing
    /// once emission begins; starts at the clock epoch so every item stamped
    /// after construction is eligible for the first tick.
    prev_birth_mark: Instant,
    /// Recorded when the pacing loop starts; reference origin for
    /// elapsed-time reporting.
    init_time: Option<Instant>,
}

/// Fixed-rate output pacer.
///
/// One instance paces one stream: producers on any thread call
/// [`insert`](Self::insert); a dedicated thread calls [`run`](Self::run),
/// which ticks at `1000 / rate_hz` ms using an accumulating absolute
/// deadline so per-tick overhead never drifts the cadence.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use opencadence_pacer::{FnSink, PacedItem, PacerConfig, RateController, StartMode};
///
/// let pacer = Arc::new(RateController::<u32>::new(PacerConfig::new(10, 400)).expect("config"));
/// let clock = pacer.clock();
///
/// let worker = {
///     let pacer = Arc::clone(&pacer);
///     std::thread::spawn(move || {
///         let mut sink = FnSink(|item: PacedItem<u32>| {
///             let _ = item;
///         });
///         pacer.run(StartMode::Deferred, &mut sink)
///     })
/// };
///
/// pacer.insert(PacedItem::stamped(&clock, 1)).expect("running");
/// pacer.stop();
/// worker.join().expect("pacing thread").expect("single start");
/// ```
pub struct RateController<T> {
    config: PacerConfig,
    period: Duration,
    clock: MarkClock,
    shared: Mutex<SharedState<T>>,
    counters: PacerCounters,
    started: AtomicBool,
    stopped: AtomicBool,
}

impl<T> RateController<T> {
    /// Create a controller for the given configuration.
    ///
    /// The clock epoch (and with it the birth-mark reference frame) is fixed
    /// here; items stamped against another controller's clock are not
    /// meaningfully comparable.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::InvalidConfig`] when the configuration fails
    /// validation (zero rate or freshness, zero derived capacity, or a tick
    /// period below one millisecond).
    pub fn new(config: PacerConfig) -> PacerResult<Self> {
        config.validate()?;

        let clock = MarkClock::new();
        let shared = SharedState {
            queue: BoundedItemQueue::new(config.max_queue_size()),
            prev_birth_mark: clock.epoch(),
            init_time: None,
        };

        Ok(Self {
            period: config.period(),
            config,
            clock,
            shared: Mutex::new(shared),
            counters: PacerCounters::new(),
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        })
    }

    /// The controller's configuration.
    #[must_use]
    pub fn config(&self) -> &PacerConfig {
        &self.config
    }

    /// The clock producers must stamp items with.
    #[must_use]
    pub fn clock(&self) -> MarkClock {
        self.clock
    }

    /// Snapshot of the observability counters.
    #[must_use]
    pub fn metrics(&self) -> PacerSnapshot {
        self.counters.snapshot()
    }

    /// Number of items currently pending in the queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Instant the pacing loop started, if it has.
    #[must_use]
    pub fn init_time(&self) -> Option<Instant> {
        self.shared.lock().init_time
    }

    /// Queue an item for paced emission.
    ///
    /// Bounded and short: one lock-scoped append, evicting the oldest
    /// pending item first when the queue is saturated. The eviction is
    /// silent by policy and visible in
    /// [`PacerSnapshot::items_evicted`].
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::Stopped`] once the controller has been stopped;
    /// the item is not queued.
    pub fn insert(&self, item: PacedItem<T>) -> PacerResult<()> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(PacerError::Stopped);
        }

        let evicted = self.shared.lock().queue.insert(item);

        self.counters.inc_inserted();
        if let Some(old) = evicted {
            self.counters.inc_evicted();
            tracing::trace!(birth_mark = old.birth_mark, "evicted oldest pending item");
        }
        Ok(())
    }

    /// Request cooperative shutdown.
    ///
    /// The pacing loop observes the flag at the next tick boundary, so
    /// shutdown latency is bounded by one period. Subsequent `insert` calls
    /// are rejected.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::debug!("pacer stop requested");
        }
    }

    /// True once [`stop`](Self::stop) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Run one selection/emission cycle immediately.
    ///
    /// Drains the queue front-to-back until an item at least as fresh as the
    /// last emission is found, discarding stale ones; synthesizes a
    /// placeholder advanced one period past the last emission when the drain
    /// comes up empty. Exactly one item reaches the sink either way.
    ///
    /// The pacing loop calls this once per tick; tests can call it directly
    /// to drive selection deterministically.
    pub fn tick<S: PaceSink<T>>(&self, sink: &mut S) {
        let (selected, discarded) = {
            let mut shared = self.shared.lock();
            let mut discarded = 0u64;
            let mut found = None;

            while let Some(item) = shared.queue.pop_front() {
                if self.clock.to_instant(item.birth_mark) >= shared.prev_birth_mark {
                    found = Some(item);
                    break;
                }
                discarded += 1;
            }

            let selected = found.unwrap_or_else(|| {
                PacedItem::extrapolated(self.clock.to_mark(shared.prev_birth_mark + self.period))
            });

            shared.prev_birth_mark = self.clock.to_instant(selected.birth_mark);
            (selected, discarded)
        };

        self.counters.inc_tick();
        if discarded > 0 {
            self.counters.add_discarded_stale(discarded);
            tracing::trace!(discarded, "dropped stale items at drain");
        }

        if selected.synthesized {
            self.counters.inc_extrapolated();
        } else {
            self.counters.inc_emitted();
        }

        if let Err(err) = sink.send(selected) {
            self.counters.inc_sink_error();
            tracing::warn!(error = %err, "sink rejected paced item");
        }
    }

    /// Run the pacing loop until [`stop`](Self::stop) is requested.
    ///
    /// Blocks the calling thread; intended to run on a dedicated one. Ticks
    /// are scheduled against an accumulating deadline (`next += period`)
    /// anchored at loop start, so scheduler overhead and sink latency do not
    /// accumulate drift. A wake past its deadline is counted in
    /// [`PacerSnapshot::missed_deadlines`] and the loop continues on the
    /// nominal sequence.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::AlreadyStarted`] if the loop was started
    /// before; `init_time` and the cadence anchor are set exactly once per
    /// controller.
    pub fn run<S: PaceSink<T>>(&self, mode: StartMode, sink: &mut S) -> PacerResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PacerError::AlreadyStarted);
        }
        if self.is_stopped() {
            return Ok(());
        }

        let mut sleeper = PlatformSleep::new();
        if self.config.elevate_priority && !sleeper.elevate_priority() {
            tracing::debug!("priority elevation refused; pacing at normal priority");
        }

        let start = Instant::now();
        self.shared.lock().init_time = Some(start);
        tracing::debug!(
            rate_hz = self.config.rate_hz,
            freshness_ms = self.config.freshness_ms,
            period_ms = self.config.period_ms(),
            ?mode,
            "pacing loop started"
        );

        if mode == StartMode::Immediate {
            self.tick(sink);
        }

        let mut next = start;
        while !self.is_stopped() {
            next += self.period;

            if Instant::now() >= next {
                self.counters.inc_missed_deadline();
            } else {
                sleeper.sleep_until(next);
            }

            if self.is_stopped() {
                break;
            }
            self.tick(sink);
        }

        tracing::debug!(
            ticks = self.counters.snapshot().ticks_total,
            "pacing loop stopped"
        );
        Ok(())
    }
}

impl<T> std::fmt::Debug for RateController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateController")
            .field("config", &self.config)
            .field("pending", &self.pending())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
