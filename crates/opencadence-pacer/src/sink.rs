//! Downstream sink contract.

use crate::error::SinkError;
use crate::item::PacedItem;

/// Receiver of exactly one item per tick, real or synthesized.
///
/// What `send` does with the item (transmit, render, actuate) is entirely
/// the consumer's concern. A failure is reported back so the owner can see
/// it in [`crate::PacerSnapshot::sink_errors`], but it never disturbs the
/// pacing cadence: the controller logs it and ticks on.
///
/// `send` is called from the pacing thread with the queue lock released, so
/// a slow sink delays at most its own tick, never producers.
pub trait PaceSink<T> {
    /// Deliver one paced item.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the item could not be delivered; the
    /// controller counts and logs the failure and keeps ticking.
    fn send(&mut self, item: PacedItem<T>) -> Result<(), SinkError>;
}

/// Adapter making an infallible closure usable as a sink.
///
/// Convenient for tests and consumers that cannot fail:
///
/// ```
/// use opencadence_pacer::{FnSink, PaceSink, PacedItem};
///
/// let mut marks = Vec::new();
/// let mut sink = FnSink(|item: PacedItem<u32>| marks.push(item.birth_mark));
/// sink.send(PacedItem::new(10, 1)).unwrap();
/// drop(sink);
/// assert_eq!(marks, vec![10]);
/// ```
pub struct FnSink<F>(pub F);

impl<T, F> PaceSink<T> for FnSink<F>
where
    F: FnMut(PacedItem<T>),
{
    fn send(&mut self, item: PacedItem<T>) -> Result<(), SinkError> {
        (self.0)(item);
        Ok(())
    }
}
