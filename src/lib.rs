//! # pwm-siren
//!
//! Swept-tone siren controller: four debounced pushbuttons configure a
//! falling-sawtooth frequency sweep emitted on a PWM channel, with four
//! status indicators mirroring the current mode.
//!
//! ## Architecture
//!
//! Three contexts share one structure, [`SirenShared`]:
//!
//! ```text
//! debounce tick (2 ms)      foreground loop          PWM tick (kHz)
//! ────────────────────      ───────────────          ──────────────
//! raw pins ─▶ Debouncer ─▶ [stable vector] ─▶ EdgeDetector
//!                           ModeMachine ─▶ [mode, bounds] ─▶ SweepGen
//!                           indicators ◀┘                └─▶ PwmCommand
//! ```
//!
//! Every shared field has exactly one writer context; the two multi-field
//! updates (sweep re-seed, panic-reset restore) run inside a critical
//! section. All core logic is pure and host-testable; hardware enters only
//! through the [`hal`] port traits.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod hal;
pub mod input;
pub mod logging;
pub mod mode;
pub mod shared;
pub mod sweep;

pub use config::FrequencyBounds;
pub use controller::Controller;
pub use debounce::Debouncer;
pub use input::{ButtonState, EdgeDetector, Indicators, PressSet};
pub use logging::{LogLevel, LogRing};
pub use mode::{Mode, ModeMachine};
pub use shared::SirenShared;
pub use sweep::{PwmCommand, SweepGen, SweepMode};
