//! Logical time source.

use std::cell::Cell;

/// Source of monotonically non-decreasing logical timestamps
/// (one tick per host-defined unit, e.g. an epoch).
pub trait Clock {
    fn now(&self) -> u64;
}

/// Clock advanced by hand. Used by tests and the demo binary.
///
/// ```
/// use virtual_block::types::{Clock, ManualClock};
///
/// let clock = ManualClock::new(10);
/// clock.advance(5);
/// assert_eq!(clock.now(), 15);
///
/// // Never moves backwards
/// clock.set(3);
/// assert_eq!(clock.now(), 15);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move forward by `ticks`, saturating at `u64::MAX`
    pub fn advance(&self, ticks: u64) {
        self.now.set(self.now.get().saturating_add(ticks));
    }

    /// Jump to `time` if it is not in the past
    pub fn set(&self, time: u64) {
        self.now.set(self.now.get().max(time));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}
