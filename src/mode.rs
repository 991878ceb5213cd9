//! Foreground mode state machine.
//!
//! Pure logic, no hardware dependencies. Consumes one-shot press events,
//! produces the indicator to light, the sweep behavior to select and any
//! shared-state action (sweep re-seed, default restore) for the caller to
//! apply. Fully testable on host.
//!
//! The panic-reset button is checked unconditionally ahead of the per-state
//! dispatch: it forces the Reset state from anywhere, a global override
//! rather than a per-state transition.

use crate::config::FrequencyBounds;
use crate::input::{Indicators, PressSet};
use crate::sweep::SweepMode;

/// Operator-visible mode. Exactly one active; cyclic, no terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Waiting; indicator 1, tone idle.
    #[default]
    Idle,
    /// Adjusting the upper bound; indicator 2, previewing `f_max`.
    AdjustMax,
    /// Adjusting the lower bound; indicator 3, previewing `f_min`.
    AdjustMin,
    /// Sweeping; indicator 1 (shared slot), full sawtooth.
    Run,
    /// Panic landing state; indicator 1, defaults restored on entry.
    Reset,
}

/// Shared-state action the caller must apply after a step.
///
/// Kept out of the FSM so the machine stays pure: the controller applies
/// these against [`crate::shared::SirenShared`] inside a critical section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepAction {
    /// Nothing to apply beyond the published mode/bounds.
    None,
    /// Zero the phase accumulator and recompute the period from `f_max`.
    Reseed,
    /// Restore default bounds, then re-seed (panic-reset restore).
    RestoreDefaults,
}

/// Output of one foreground step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutput {
    /// Which status indicator to light this iteration.
    pub indicators: Indicators,
    /// Behavior the sweep generator should run.
    pub sweep: SweepMode,
    /// Multi-field shared-state update to apply, if any.
    pub action: SweepAction,
}

/// The mode machine. Re-evaluated once per foreground loop iteration.
#[derive(Debug, Default)]
pub struct ModeMachine {
    mode: Mode,
    /// One-shot latch: set by a panic press, cleared when the restore is
    /// emitted. A repeated panic press re-arms it, so every press performs
    /// the (idempotent) restore.
    restore_pending: bool,
}

impl ModeMachine {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Idle,
            restore_pending: false,
        }
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Process one iteration's press events.
    ///
    /// `bounds` is the foreground-owned frequency window; adjustments
    /// saturate at the legal range and are never rejected.
    pub fn step(&mut self, pressed: PressSet, bounds: &mut FrequencyBounds) -> StepOutput {
        // Global override, ahead of dispatch. The acknowledgment flash
        // lights indicator 4 for exactly this iteration; Reset repaints
        // indicator 1 from the next one.
        if pressed.reset() {
            self.mode = Mode::Reset;
            self.restore_pending = true;
            return StepOutput {
                indicators: Indicators::Slot4,
                sweep: SweepMode::Idle,
                action: SweepAction::None,
            };
        }

        match self.mode {
            Mode::Idle => {
                if pressed.confirm() {
                    self.mode = Mode::AdjustMax;
                }
                StepOutput {
                    indicators: Indicators::Slot1,
                    sweep: SweepMode::Idle,
                    action: SweepAction::None,
                }
            }

            Mode::AdjustMax => {
                if pressed.up() {
                    bounds.raise_max();
                }
                if pressed.down() {
                    bounds.lower_max();
                }
                if pressed.confirm() {
                    self.mode = Mode::AdjustMin;
                }
                StepOutput {
                    indicators: Indicators::Slot2,
                    sweep: SweepMode::PreviewMax,
                    action: SweepAction::None,
                }
            }

            Mode::AdjustMin => {
                if pressed.up() {
                    bounds.raise_min();
                }
                if pressed.down() {
                    bounds.lower_min();
                }
                if pressed.confirm() {
                    // Entering Run from a bound change: restart the sweep
                    // from a clean phase so the tone begins at 1/f_max.
                    self.mode = Mode::Run;
                    return StepOutput {
                        indicators: Indicators::Slot1,
                        sweep: SweepMode::Sweep,
                        action: SweepAction::Reseed,
                    };
                }
                StepOutput {
                    indicators: Indicators::Slot3,
                    sweep: SweepMode::PreviewMin,
                    action: SweepAction::None,
                }
            }

            Mode::Run => {
                if pressed.confirm() {
                    self.mode = Mode::AdjustMax;
                }
                StepOutput {
                    indicators: Indicators::Slot1,
                    sweep: SweepMode::Sweep,
                    action: SweepAction::None,
                }
            }

            Mode::Reset => {
                let action = if self.restore_pending {
                    self.restore_pending = false;
                    bounds.restore_defaults();
                    SweepAction::RestoreDefaults
                } else {
                    SweepAction::None
                };
                if pressed.confirm() {
                    self.mode = Mode::AdjustMax;
                }
                StepOutput {
                    indicators: Indicators::Slot1,
                    sweep: SweepMode::Idle,
                    action,
                }
            }
        }
    }
}
