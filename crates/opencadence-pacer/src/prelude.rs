//! Prelude module for common pacer types.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the pacer crate.

pub use crate::MILLIS_PER_SEC;
pub use crate::clock::{BirthMark, MarkClock};
pub use crate::config::{PacerConfig, PacerConfigBuilder};
pub use crate::controller::{RateController, StartMode};
pub use crate::error::{PacerError, PacerResult, SinkError};
pub use crate::item::PacedItem;
pub use crate::metrics::{PacerCounters, PacerSnapshot};
pub use crate::queue::BoundedItemQueue;
pub use crate::sink::{FnSink, PaceSink};
