//! Compile-time configuration for the siren.
//!
//! All tuning lives here: the reference clock the sweep math is scaled to,
//! the legal frequency windows, the adjustment step and the tick rates of
//! the two interrupt sources. Nothing is runtime-configurable; the only
//! mutable piece is [`FrequencyBounds`], owned by the foreground loop.

/// Reference clock rate in Hz. One full sweep cycle spans exactly this many
/// PWM timer ticks, so it doubles as the phase-accumulator wrap point.
pub const REF_CLOCK_HZ: u32 = 16_000_000;

/// Debounce sampling period in milliseconds.
pub const DEBOUNCE_TICK_MS: u32 = 2;

/// Default upper sweep frequency in Hz.
pub const F_MAX_DEFAULT: u16 = 5_100;

/// Default lower sweep frequency in Hz.
pub const F_MIN_DEFAULT: u16 = 2_400;

/// Adjustment step for either bound, in Hz.
pub const F_STEP: u16 = 100;

/// Legal window for the upper bound.
pub const F_MAX_FLOOR: u16 = 4_600;
pub const F_MAX_CEIL: u16 = 5_600;

/// Legal window for the lower bound.
pub const F_MIN_FLOOR: u16 = 1_900;
pub const F_MIN_CEIL: u16 = 2_900;

/// The adjustable sweep window.
///
/// Mutated only by the foreground loop, and only while the corresponding
/// Adjust mode is active. Every adjustment saturates at the legal window:
/// a press that would leave the window clamps to the edge instead, so
/// repeated presses at the edge are no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrequencyBounds {
    f_max: u16,
    f_min: u16,
}

impl FrequencyBounds {
    /// Factory-default window (5100 / 2400 Hz).
    pub const DEFAULT: Self = Self {
        f_max: F_MAX_DEFAULT,
        f_min: F_MIN_DEFAULT,
    };

    /// Rebuild a window from raw field values, clamping each into its legal
    /// range. Used when the pair round-trips through shared storage.
    pub const fn from_clamped(f_max: u16, f_min: u16) -> Self {
        const fn clamp(v: u16, lo: u16, hi: u16) -> u16 {
            if v < lo {
                lo
            } else if v > hi {
                hi
            } else {
                v
            }
        }
        Self {
            f_max: clamp(f_max, F_MAX_FLOOR, F_MAX_CEIL),
            f_min: clamp(f_min, F_MIN_FLOOR, F_MIN_CEIL),
        }
    }

    /// Upper bound in Hz.
    #[inline]
    pub const fn f_max(&self) -> u16 {
        self.f_max
    }

    /// Lower bound in Hz.
    #[inline]
    pub const fn f_min(&self) -> u16 {
        self.f_min
    }

    /// Sweep span in Hz. Always positive: the legal windows are disjoint.
    #[inline]
    pub const fn span(&self) -> u16 {
        self.f_max - self.f_min
    }

    /// Raise the upper bound one step, clamped to [`F_MAX_CEIL`].
    ///
    /// Returns `true` if the bound actually moved.
    pub fn raise_max(&mut self) -> bool {
        let next = (self.f_max + F_STEP).min(F_MAX_CEIL);
        let moved = next != self.f_max;
        self.f_max = next;
        moved
    }

    /// Lower the upper bound one step, clamped to [`F_MAX_FLOOR`].
    pub fn lower_max(&mut self) -> bool {
        let next = self.f_max.saturating_sub(F_STEP).max(F_MAX_FLOOR);
        let moved = next != self.f_max;
        self.f_max = next;
        moved
    }

    /// Raise the lower bound one step, clamped to [`F_MIN_CEIL`].
    pub fn raise_min(&mut self) -> bool {
        let next = (self.f_min + F_STEP).min(F_MIN_CEIL);
        let moved = next != self.f_min;
        self.f_min = next;
        moved
    }

    /// Lower the lower bound one step, clamped to [`F_MIN_FLOOR`].
    pub fn lower_min(&mut self) -> bool {
        let next = self.f_min.saturating_sub(F_STEP).max(F_MIN_FLOOR);
        let moved = next != self.f_min;
        self.f_min = next;
        moved
    }

    /// Restore the factory defaults (panic-reset path).
    pub fn restore_defaults(&mut self) {
        *self = Self::DEFAULT;
    }
}

impl Default for FrequencyBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
