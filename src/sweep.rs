//! Falling-sawtooth sweep generator.
//!
//! Runs on the high-rate PWM-recompute tick. Pure logic, no hardware
//! dependencies; the interrupt shell writes the emitted [`PwmCommand`] into
//! the timer/compare unit. Everything is integer arithmetic scaled to
//! [`REF_CLOCK_HZ`] — no floating point anywhere in the hot path.
//!
//! One sweep cycle: the period starts at `REF/f_max`, relaxes linearly in
//! frequency toward `f_min` as the phase accumulator advances across the
//! reference span, then snaps back when the accumulator wraps. The tone it
//! produces is the classic falling siren.

use crate::config::{FrequencyBounds, REF_CLOCK_HZ};

/// Which computation the generator runs each tick.
///
/// Maintained by the foreground mode machine, consumed in interrupt context.
/// Decoupled from the UI mode on purpose: the state machine decides *what
/// the operator is doing*, this selects *what the tone does*.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SweepMode {
    /// No PWM computation; output frozen or disabled by the shell.
    #[default]
    Idle = 0,
    /// Full falling-sawtooth sweep between the configured bounds.
    Sweep = 1,
    /// Hold `1/f_max` so the operator can hear the bound being adjusted.
    PreviewMax = 2,
    /// Hold `1/f_min`, the analogous preview for the lower bound.
    PreviewMin = 3,
}

impl SweepMode {
    /// Decode from the raw byte stored in shared state.
    ///
    /// Unknown values decode to `Idle`: the defensive default for a field
    /// that crosses the interrupt boundary as a plain `u8`.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => SweepMode::Sweep,
            2 => SweepMode::PreviewMax,
            3 => SweepMode::PreviewMin,
            _ => SweepMode::Idle,
        }
    }
}

/// One (period, compare) pair for the PWM timer.
///
/// Write-only from the core's perspective: the hardware consumes it to
/// produce the tone. Duty cycle is fixed at 50 %, so `compare` is always
/// `top / 2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmCommand {
    /// Timer period (TOP) in reference-clock ticks.
    pub top: u32,
    /// Compare threshold in reference-clock ticks.
    pub compare: u32,
}

impl PwmCommand {
    /// Command holding a fixed tone at `freq_hz`.
    #[inline]
    pub const fn fixed_tone(freq_hz: u16) -> Self {
        let top = REF_CLOCK_HZ / freq_hz as u32;
        Self { top, compare: top / 2 }
    }
}

/// Sweep phase state.
///
/// Mutated exclusively in the PWM interrupt context; the foreground resets
/// it only inside a critical section (see [`crate::shared`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepGen {
    /// Phase accumulator in reference-clock ticks, wraps past one second.
    elapsed: u32,
    /// Period to emit on the next tick, in reference-clock ticks.
    period: u32,
}

impl SweepGen {
    /// Fresh generator seeded from the given upper bound: the first emitted
    /// period is exactly `REF / f_max`.
    pub const fn seeded(f_max: u16) -> Self {
        Self {
            elapsed: 0,
            period: REF_CLOCK_HZ / f_max as u32,
        }
    }

    /// Rebuild from raw state (interrupt-shell round trip through atomics).
    #[inline]
    pub const fn from_raw(elapsed: u32, period: u32) -> Self {
        Self { elapsed, period }
    }

    /// Raw state as `(elapsed, period)`.
    #[inline]
    pub const fn raw(&self) -> (u32, u32) {
        (self.elapsed, self.period)
    }

    /// Restart the sweep at `1/f_max` with a zeroed accumulator.
    #[inline]
    pub fn reseed(&mut self, bounds: FrequencyBounds) {
        *self = Self::seeded(bounds.f_max());
    }

    /// One sweep tick: emit the current period, then advance the phase and
    /// derive the next.
    ///
    /// Emit-then-advance ordering matters: the first command after a re-seed
    /// is exactly `REF / f_max`, and every later command reflects the phase
    /// accumulated *before* this tick.
    ///
    /// Hard real-time: a handful of integer ops and one division, O(1).
    #[inline]
    pub fn tick(&mut self, bounds: FrequencyBounds) -> PwmCommand {
        let cmd = PwmCommand {
            top: self.period,
            compare: self.period / 2,
        };

        self.elapsed += self.period;
        if self.elapsed > REF_CLOCK_HZ {
            self.elapsed = 0;
        }

        // dev = span * elapsed / REF, exact in 64-bit: span ≤ 3700 and
        // elapsed ≤ REF, so the product tops out around 2^36.
        let dev = (bounds.span() as u64 * self.elapsed as u64 / REF_CLOCK_HZ as u64) as u32;
        self.period = REF_CLOCK_HZ / (bounds.f_max() as u32 - dev);

        cmd
    }
}
