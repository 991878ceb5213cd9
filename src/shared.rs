//! Shared state across the interrupt/foreground boundary.
//!
//! [`SirenShared`] is the one structure both interrupt contexts and the
//! foreground loop touch. Every field has exactly one writer context:
//!
//! | field                  | writer        | readers    |
//! |------------------------|---------------|------------|
//! | stable button vector   | debounce tick | foreground |
//! | sweep mode selector    | foreground    | PWM tick   |
//! | f_max / f_min          | foreground    | PWM tick   |
//! | sweep elapsed / period | PWM tick      | —          |
//!
//! Single-writer fields are plain atomics, never locked. The two updates
//! that must touch more than one field at once — the sweep re-seed and the
//! panic-reset restore — run inside `critical_section::with`, so the PWM
//! tick can never observe a half-updated bound pair or a zeroed accumulator
//! paired with a stale period. The critical section is released on every
//! exit path by construction.
//!
//! Both tick entry points are O(1) and never block: a handful of atomic
//! loads/stores plus one integer division. That keeps them inside the
//! hard per-tick deadline; a missed deadline is not detected here, it just
//! glitches the tone.

use core::sync::atomic::{AtomicU16, AtomicU32, AtomicU8, Ordering};

use crate::config::{FrequencyBounds, F_MAX_DEFAULT, F_MIN_DEFAULT, REF_CLOCK_HZ};
use crate::debounce::Debouncer;
use crate::input::ButtonState;
use crate::sweep::{PwmCommand, SweepGen, SweepMode};

/// The cross-context siren state. One static instance per device.
pub struct SirenShared {
    /// Debounced button vector. Writer: debounce tick.
    buttons: AtomicU8,

    /// Encoded [`SweepMode`]. Writer: foreground.
    sweep_mode: AtomicU8,

    /// Sweep window. Writer: foreground.
    f_max: AtomicU16,
    f_min: AtomicU16,

    /// Sweep phase accumulator in reference ticks. Writer: PWM tick
    /// (foreground resets it only inside a critical section).
    sweep_elapsed: AtomicU32,

    /// Next PWM period in reference ticks. Writer: PWM tick (same caveat).
    sweep_period: AtomicU32,
}

impl SirenShared {
    /// Power-on state: no buttons, Idle behavior, default window, sweep
    /// seeded at `1/f_max`.
    pub const fn new() -> Self {
        Self {
            buttons: AtomicU8::new(0),
            sweep_mode: AtomicU8::new(SweepMode::Idle as u8),
            f_max: AtomicU16::new(F_MAX_DEFAULT),
            f_min: AtomicU16::new(F_MIN_DEFAULT),
            sweep_elapsed: AtomicU32::new(0),
            sweep_period: AtomicU32::new(REF_CLOCK_HZ / F_MAX_DEFAULT as u32),
        }
    }

    // --- Debounce-tick context ---

    /// Debounce-tick entry point: filter one raw sample and publish the
    /// stable vector. `debouncer` is owned by the calling interrupt context.
    #[inline]
    pub fn debounce_tick(&self, debouncer: &mut Debouncer, raw: ButtonState) -> ButtonState {
        let stable = debouncer.tick(raw);
        self.buttons.store(stable.bits(), Ordering::Release);
        stable
    }

    // --- PWM-tick context ---

    /// PWM-tick entry point: run the selected sweep behavior and return the
    /// command to write to the timer, or `None` when Idle.
    #[inline]
    pub fn pwm_tick(&self) -> Option<PwmCommand> {
        match SweepMode::from_u8(self.sweep_mode.load(Ordering::Acquire)) {
            SweepMode::Idle => None,
            SweepMode::PreviewMax => {
                Some(PwmCommand::fixed_tone(self.f_max.load(Ordering::Acquire)))
            }
            SweepMode::PreviewMin => {
                Some(PwmCommand::fixed_tone(self.f_min.load(Ordering::Acquire)))
            }
            SweepMode::Sweep => {
                let bounds = self.bounds();
                let mut gen = SweepGen::from_raw(
                    self.sweep_elapsed.load(Ordering::Relaxed),
                    self.sweep_period.load(Ordering::Relaxed),
                );
                let cmd = gen.tick(bounds);
                let (elapsed, period) = gen.raw();
                self.sweep_elapsed.store(elapsed, Ordering::Relaxed);
                self.sweep_period.store(period, Ordering::Relaxed);
                Some(cmd)
            }
        }
    }

    // --- Foreground context ---

    /// Latest debounced button vector.
    #[inline]
    pub fn buttons(&self) -> ButtonState {
        ButtonState::from_bits(self.buttons.load(Ordering::Acquire))
    }

    /// Select the sweep behavior.
    #[inline]
    pub fn set_sweep_mode(&self, mode: SweepMode) {
        self.sweep_mode.store(mode as u8, Ordering::Release);
    }

    /// Currently selected sweep behavior.
    #[inline]
    pub fn sweep_mode(&self) -> SweepMode {
        SweepMode::from_u8(self.sweep_mode.load(Ordering::Acquire))
    }

    /// Publish the foreground's frequency window.
    ///
    /// Two independent stores. The pair can tear against a concurrent PWM
    /// tick, but adjustments only happen in the Adjust modes, where the
    /// generator reads exactly one of the two fields; the paths that change
    /// both at once go through [`reseed`](Self::reseed) instead.
    #[inline]
    pub fn publish_bounds(&self, bounds: FrequencyBounds) {
        self.f_max.store(bounds.f_max(), Ordering::Release);
        self.f_min.store(bounds.f_min(), Ordering::Release);
    }

    /// Frequency window as last published. Field-by-field read; the clamp
    /// keeps the window invariants even against a torn pair.
    #[inline]
    pub fn bounds(&self) -> FrequencyBounds {
        FrequencyBounds::from_clamped(
            self.f_max.load(Ordering::Acquire),
            self.f_min.load(Ordering::Acquire),
        )
    }

    /// Multi-field update: publish `bounds` and restart the sweep at
    /// `1/f_max` with a zeroed accumulator, as one unit.
    ///
    /// Runs with interrupts masked for its (O(1)) duration so the PWM tick
    /// never sees the window and the phase in disagreement.
    pub fn reseed(&self, bounds: FrequencyBounds) {
        critical_section::with(|_cs| {
            self.f_max.store(bounds.f_max(), Ordering::Relaxed);
            self.f_min.store(bounds.f_min(), Ordering::Relaxed);
            let seed = SweepGen::seeded(bounds.f_max());
            let (elapsed, period) = seed.raw();
            self.sweep_elapsed.store(elapsed, Ordering::Relaxed);
            self.sweep_period.store(period, Ordering::Release);
        });
    }

    /// Sweep phase as `(elapsed, period)`, for diagnostics and tests.
    #[inline]
    pub fn sweep_raw(&self) -> (u32, u32) {
        (
            self.sweep_elapsed.load(Ordering::Acquire),
            self.sweep_period.load(Ordering::Acquire),
        )
    }
}

impl Default for SirenShared {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REF_CLOCK_HZ;

    #[test]
    fn test_power_on_state() {
        let shared = SirenShared::new();
        assert!(shared.buttons().is_idle());
        assert_eq!(shared.sweep_mode(), SweepMode::Idle);
        assert_eq!(shared.bounds(), FrequencyBounds::DEFAULT);
        assert_eq!(shared.sweep_raw(), (0, REF_CLOCK_HZ / 5_100));
    }

    #[test]
    fn test_idle_produces_no_command() {
        let shared = SirenShared::new();
        assert_eq!(shared.pwm_tick(), None);
        // And does not advance the phase
        assert_eq!(shared.sweep_raw(), (0, REF_CLOCK_HZ / 5_100));
    }

    #[test]
    fn test_preview_holds_bound_tone() {
        let shared = SirenShared::new();

        shared.set_sweep_mode(SweepMode::PreviewMax);
        let cmd = shared.pwm_tick().unwrap();
        assert_eq!(cmd.top, REF_CLOCK_HZ / 5_100);
        // Stable across ticks
        assert_eq!(shared.pwm_tick().unwrap(), cmd);

        shared.set_sweep_mode(SweepMode::PreviewMin);
        let cmd = shared.pwm_tick().unwrap();
        assert_eq!(cmd.top, REF_CLOCK_HZ / 2_400);
    }

    #[test]
    fn test_preview_tracks_adjustment() {
        let shared = SirenShared::new();
        shared.set_sweep_mode(SweepMode::PreviewMax);

        let mut bounds = FrequencyBounds::DEFAULT;
        bounds.raise_max();
        shared.publish_bounds(bounds);

        assert_eq!(shared.pwm_tick().unwrap().top, REF_CLOCK_HZ / 5_200);
    }

    #[test]
    fn test_sweep_advances_phase_in_shared_state() {
        let shared = SirenShared::new();
        shared.set_sweep_mode(SweepMode::Sweep);

        let first = shared.pwm_tick().unwrap();
        assert_eq!(first.top, REF_CLOCK_HZ / 5_100);

        let (elapsed, _) = shared.sweep_raw();
        assert_eq!(elapsed, first.top);

        // Periods never shrink until the wrap
        let mut last = first.top;
        for _ in 0..1_000 {
            let cmd = shared.pwm_tick().unwrap();
            assert!(cmd.top >= last);
            last = cmd.top;
        }
    }

    #[test]
    fn test_reseed_restarts_sweep() {
        let shared = SirenShared::new();
        shared.set_sweep_mode(SweepMode::Sweep);
        for _ in 0..500 {
            shared.pwm_tick();
        }

        let mut bounds = FrequencyBounds::DEFAULT;
        bounds.raise_max();
        shared.reseed(bounds);

        assert_eq!(shared.bounds(), bounds);
        assert_eq!(shared.sweep_raw(), (0, REF_CLOCK_HZ / 5_200));
        assert_eq!(shared.pwm_tick().unwrap().top, REF_CLOCK_HZ / 5_200);
    }

    #[test]
    fn test_debounce_tick_publishes_stable_vector() {
        let shared = SirenShared::new();
        let mut deb = Debouncer::new();
        let raw = ButtonState::from_bits(ButtonState::CONFIRM);

        shared.debounce_tick(&mut deb, raw);
        shared.debounce_tick(&mut deb, raw);
        assert!(shared.buttons().is_idle());

        shared.debounce_tick(&mut deb, raw);
        assert!(shared.buttons().confirm());
    }
}
