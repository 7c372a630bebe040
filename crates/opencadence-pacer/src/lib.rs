//! Fixed-rate output pacing with bounded queueing and extrapolation fallback.
//!
//! This crate turns an irregular, possibly bursty item stream into a strict
//! constant-cadence feed for downstream consumers that cannot tolerate stalls
//! (control loops, display refreshes, transmission channels). It includes:
//!
//! - **MarkClock**: per-controller millisecond timestamp model over a monotonic epoch
//! - **BoundedItemQueue**: drop-oldest FIFO sized from rate and freshness tolerance
//! - **RateController**: per-tick selection with extrapolated placeholders on starvation
//! - **Absolute scheduling**: accumulating tick deadlines so overhead never drifts the cadence
//! - **PacerCounters**: lock-free visibility into evictions, stale drops and extrapolations
//!
//! # Pacing Guarantees
//!
//! - Exactly one item reaches the sink per tick, real or synthesized
//! - Emitted birth marks are non-decreasing across ticks
//! - Producers are never blocked by pacing sleeps or sink latency
//! - Stop requests are honored within one tick period
//!
//! # Example
//!
//! ```no_run
//! use opencadence_pacer::{PacedItem, PacerConfig, RateController, StartMode};
//!
//! let config = PacerConfig::new(10, 400);
//! let pacer = RateController::<u32>::new(config).expect("valid pacing config");
//! let clock = pacer.clock();
//!
//! // Producer side, any thread:
//! pacer.insert(PacedItem::stamped(&clock, 7)).expect("pacer running");
//!
//! // Pacing thread:
//! use opencadence_pacer::FnSink;
//! let mut sink = FnSink(|item: PacedItem<u32>| {
//!     // Hand off to the downstream consumer here.
//!     let _ = item;
//! });
//! pacer.run(StartMode::Deferred, &mut sink).expect("single start");
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod item;
pub mod metrics;
pub mod queue;
pub mod sink;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(not(target_os = "linux"))]
mod fallback;

pub mod prelude;

pub use clock::{BirthMark, MarkClock};
pub use config::{PacerConfig, PacerConfigBuilder};
pub use controller::{RateController, StartMode};
pub use error::{PacerError, PacerResult, SinkError};
pub use item::PacedItem;
pub use metrics::{PacerCounters, PacerSnapshot};
pub use queue::BoundedItemQueue;
pub use sink::{FnSink, PaceSink};

/// Milliseconds per second, used wherever rate and freshness interact.
pub const MILLIS_PER_SEC: u32 = 1_000;
