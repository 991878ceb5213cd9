//! Two-stage shift-register debouncer.
//!
//! Runs on the low-rate input-sampling tick (2 ms). Pure logic, no hardware
//! dependencies, fully testable on host; the interrupt shell samples the
//! pins and feeds the raw vector in.
//!
//! A stable bit flips only when the raw sample has disagreed with it on this
//! tick and on each of the previous two, so the commit latency is three
//! ticks and any 1- or 2-tick glitch is rejected outright. There are no
//! error conditions: every tick produces a (possibly unchanged) vector.

use crate::input::ButtonState;

/// Debounce filter state for the four-button vector.
///
/// `age1`/`age2` are the disagreement-age registers: `age1` holds the bits
/// that disagreed last tick, `age2` the bits that disagreed the two previous
/// ticks. A flip commits where the fresh disagreement has already persisted
/// through both.
#[derive(Debug, Default)]
pub struct Debouncer {
    stable: ButtonState,
    age1: u8,
    age2: u8,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            stable: ButtonState::IDLE,
            age1: 0,
            age2: 0,
        }
    }

    /// Current stable vector.
    #[inline]
    pub fn stable(&self) -> ButtonState {
        self.stable
    }

    /// Feed one raw sample, returning the updated stable vector.
    ///
    /// O(1): three bitwise operations per tick.
    #[inline]
    pub fn tick(&mut self, raw: ButtonState) -> ButtonState {
        let delta = raw.bits() ^ self.stable.bits();

        // Commit only where the disagreement survived both age stages.
        self.stable = ButtonState::from_bits(self.stable.bits() ^ (self.age2 & delta));

        // Shift the disagreement through the age registers.
        self.age2 = self.age1 & delta;
        self.age1 = delta;

        self.stable
    }

    /// Drop all pending disagreement history, keeping the stable vector.
    pub fn reset(&mut self) {
        self.age1 = 0;
        self.age2 = 0;
    }
}
