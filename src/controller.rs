//! Foreground loop body.
//!
//! [`Controller`] owns everything local to the foreground context: the edge
//! detector, the mode machine and the authoritative copy of the frequency
//! window. One [`poll`](Controller::poll) per loop iteration reads the
//! debounced vector out of shared state, steps the machine, publishes the
//! results back and reports which indicator to light. The board shell wires
//! `poll` into its tight polling cycle; the loop never blocks and never
//! yields.

use crate::config::FrequencyBounds;
use crate::input::{EdgeDetector, Indicators};
use crate::logging::{LogRing, LOG_RING_SIZE};
use crate::mode::{Mode, ModeMachine, SweepAction};
use crate::shared::SirenShared;
use crate::{siren_debug, siren_info, siren_warn};

/// Foreground state plus its handles into the shared world.
pub struct Controller<'a, const N: usize = LOG_RING_SIZE> {
    shared: &'a SirenShared,
    log: &'a LogRing<N>,
    edges: EdgeDetector,
    fsm: ModeMachine,
    bounds: FrequencyBounds,
    iteration: u32,
}

impl<'a, const N: usize> Controller<'a, N> {
    pub fn new(shared: &'a SirenShared, log: &'a LogRing<N>) -> Self {
        Self {
            shared,
            log,
            edges: EdgeDetector::new(),
            fsm: ModeMachine::new(),
            bounds: FrequencyBounds::DEFAULT,
            iteration: 0,
        }
    }

    /// Current operator mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.fsm.mode()
    }

    /// Foreground-owned frequency window.
    #[inline]
    pub fn bounds(&self) -> FrequencyBounds {
        self.bounds
    }

    /// Foreground iterations since start.
    #[inline]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// One foreground iteration.
    ///
    /// Reads the stable vector, derives press edges, steps the mode machine,
    /// pushes mode/bounds/sweep updates into shared state and returns the
    /// indicator to drive. O(1); the only non-trivial cost is the masked
    /// section inside a re-seed, itself O(1).
    pub fn poll(&mut self) -> Indicators {
        self.iteration = self.iteration.wrapping_add(1);

        let pressed = self.edges.step(self.shared.buttons());
        let mode_before = self.fsm.mode();
        let bounds_before = self.bounds;

        let out = self.fsm.step(pressed, &mut self.bounds);
        let mode_after = self.fsm.mode();

        if pressed.reset() {
            siren_warn!(self.log, self.iteration, "panic reset from {:?}", mode_before);
        } else if mode_after != mode_before {
            siren_info!(
                self.log,
                self.iteration,
                "mode {:?} -> {:?}",
                mode_before,
                mode_after
            );
        }

        if self.bounds != bounds_before {
            siren_debug!(
                self.log,
                self.iteration,
                "bounds f_max={} f_min={}",
                self.bounds.f_max(),
                self.bounds.f_min()
            );
        } else if (pressed.up() || pressed.down())
            && matches!(mode_after, Mode::AdjustMax | Mode::AdjustMin)
        {
            siren_debug!(self.log, self.iteration, "bound clamped at range edge");
        }

        match out.action {
            SweepAction::None => self.shared.publish_bounds(self.bounds),
            // Both re-seed paths must land bounds and sweep state together.
            SweepAction::Reseed | SweepAction::RestoreDefaults => {
                self.shared.reseed(self.bounds)
            }
        }
        self.shared.set_sweep_mode(out.sweep);

        out.indicators
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REF_CLOCK_HZ;
    use crate::debounce::Debouncer;
    use crate::input::ButtonState;
    use crate::logging::LogLevel;
    use crate::sweep::SweepMode;

    /// Push one debounced press (and release) through the shared vector.
    fn press(shared: &SirenShared, deb: &mut Debouncer, bits: u8) {
        for _ in 0..3 {
            shared.debounce_tick(deb, ButtonState::from_bits(bits));
        }
    }

    fn release(shared: &SirenShared, deb: &mut Debouncer) {
        for _ in 0..3 {
            shared.debounce_tick(deb, ButtonState::IDLE);
        }
    }

    #[test]
    fn test_poll_publishes_sweep_mode() {
        let shared = SirenShared::new();
        let log = LogRing::<16>::new();
        let mut deb = Debouncer::new();
        let mut ctl = Controller::new(&shared, &log);

        ctl.poll();
        assert_eq!(shared.sweep_mode(), SweepMode::Idle);

        press(&shared, &mut deb, ButtonState::CONFIRM);
        ctl.poll();
        assert_eq!(ctl.mode(), Mode::AdjustMax);
        assert_eq!(shared.sweep_mode(), SweepMode::PreviewMax);
    }

    #[test]
    fn test_adjustments_reach_shared_bounds() {
        let shared = SirenShared::new();
        let log = LogRing::<16>::new();
        let mut deb = Debouncer::new();
        let mut ctl = Controller::new(&shared, &log);

        press(&shared, &mut deb, ButtonState::CONFIRM);
        ctl.poll(); // → AdjustMax
        release(&shared, &mut deb);
        ctl.poll();

        press(&shared, &mut deb, ButtonState::UP);
        ctl.poll();
        assert_eq!(shared.bounds().f_max(), 5_200);
    }

    #[test]
    fn test_run_entry_reseeds_shared_sweep() {
        let shared = SirenShared::new();
        let log = LogRing::<16>::new();
        let mut deb = Debouncer::new();
        let mut ctl = Controller::new(&shared, &log);

        for _ in 0..3 {
            press(&shared, &mut deb, ButtonState::CONFIRM);
            ctl.poll();
            release(&shared, &mut deb);
            ctl.poll();
        }
        assert_eq!(ctl.mode(), Mode::Run);
        assert_eq!(shared.sweep_mode(), SweepMode::Sweep);
        assert_eq!(shared.sweep_raw(), (0, REF_CLOCK_HZ / 5_100));
    }

    #[test]
    fn test_transitions_are_logged() {
        let shared = SirenShared::new();
        let log = LogRing::<16>::new();
        let mut deb = Debouncer::new();
        let mut ctl = Controller::new(&shared, &log);

        press(&shared, &mut deb, ButtonState::CONFIRM);
        ctl.poll();

        let entry = log.drain().expect("transition entry");
        assert_eq!(entry.level, LogLevel::Info);
        assert!(entry.text().contains("Idle"));
        assert!(entry.text().contains("AdjustMax"));
    }

    #[test]
    fn test_panic_press_logs_warning_and_flashes() {
        let shared = SirenShared::new();
        let log = LogRing::<16>::new();
        let mut deb = Debouncer::new();
        let mut ctl = Controller::new(&shared, &log);

        press(&shared, &mut deb, ButtonState::RESET);
        let ind = ctl.poll();
        assert_eq!(ind, Indicators::Slot4);

        let entry = log.drain().expect("panic entry");
        assert_eq!(entry.level, LogLevel::Warn);
    }
}
