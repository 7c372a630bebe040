//! Generic payload envelope carried through the pacing engine.

use crate::clock::{BirthMark, MarkClock};

/// One unit of paced output.
///
/// The payload is opaque to the engine; the envelope only needs a creation
/// timestamp and a flag distinguishing real items from the placeholders the
/// controller manufactures when no fresh input is eligible for a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacedItem<T> {
    /// Milliseconds since the owning controller's clock epoch at which the
    /// item was logically created.
    pub birth_mark: BirthMark,

    /// True only for items manufactured by the controller's extrapolation
    /// fallback; real producer items are always `false`.
    pub synthesized: bool,

    /// Domain data. `None` when the item is synthesized.
    pub payload: Option<T>,
}

impl<T> PacedItem<T> {
    /// Wrap a payload with an explicit birth mark.
    #[must_use]
    pub fn new(birth_mark: BirthMark, payload: T) -> Self {
        Self {
            birth_mark,
            synthesized: false,
            payload: Some(payload),
        }
    }

    /// Wrap a payload stamped with the clock's current mark.
    #[must_use]
    pub fn stamped(clock: &MarkClock, payload: T) -> Self {
        Self::new(clock.now_mark(), payload)
    }

    /// Manufacture a placeholder item for a tick without eligible input.
    #[must_use]
    pub fn extrapolated(birth_mark: BirthMark) -> Self {
        Self {
            birth_mark,
            synthesized: true,
            payload: None,
        }
    }
}
