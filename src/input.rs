//! Button and indicator bit vectors.
//!
//! [`ButtonState`] is one sampled/filtered snapshot of the four pushbuttons,
//! stored as a single byte so it crosses the interrupt/foreground boundary
//! in one atomic store. [`PressSet`] is the derived one-shot edge set: which
//! buttons went down since the previous foreground iteration. It lives for
//! exactly one iteration.
//!
//! [`Indicators`] is the mirror image on the output side: one of four status
//! bits, written once per foreground iteration.

/// State of the four pushbuttons, one bit per button.
///
/// Bit layout:
/// - Bit 0: confirm (advance to the next mode)
/// - Bit 1: up (raise the bound being adjusted)
/// - Bit 2: down (lower the bound being adjusted)
/// - Bit 3: panic reset (global override)
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState(u8);

impl ButtonState {
    /// Confirm button bit mask (bit 0).
    pub const CONFIRM: u8 = 0x01;

    /// Up button bit mask (bit 1).
    pub const UP: u8 = 0x02;

    /// Down button bit mask (bit 2).
    pub const DOWN: u8 = 0x04;

    /// Panic-reset button bit mask (bit 3).
    pub const RESET: u8 = 0x08;

    /// All four button bits.
    pub const ALL: u8 = 0x0F;

    /// No buttons held.
    pub const IDLE: Self = Self(0);

    /// Build from raw bits. Bits above the four buttons are masked off.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    /// Raw bits value.
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn confirm(&self) -> bool {
        (self.0 & Self::CONFIRM) != 0
    }

    #[inline]
    pub const fn up(&self) -> bool {
        (self.0 & Self::UP) != 0
    }

    #[inline]
    pub const fn down(&self) -> bool {
        (self.0 & Self::DOWN) != 0
    }

    #[inline]
    pub const fn reset(&self) -> bool {
        (self.0 & Self::RESET) != 0
    }

    /// No buttons held.
    #[inline]
    pub const fn is_idle(&self) -> bool {
        self.0 == 0
    }
}

/// Buttons that transitioned released → held this foreground iteration.
///
/// Same bit layout as [`ButtonState`]. Holding a button produces exactly one
/// event; a second event requires a release and a fresh (debounced) press.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PressSet(u8);

impl PressSet {
    /// No edges this iteration.
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn confirm(&self) -> bool {
        (self.0 & ButtonState::CONFIRM) != 0
    }

    #[inline]
    pub const fn up(&self) -> bool {
        (self.0 & ButtonState::UP) != 0
    }

    #[inline]
    pub const fn down(&self) -> bool {
        (self.0 & ButtonState::DOWN) != 0
    }

    #[inline]
    pub const fn reset(&self) -> bool {
        (self.0 & ButtonState::RESET) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Converts the debounced button vector into one-shot press events.
///
/// `pressed = now & (now ^ prev)`: a bit is set only where the stable vector
/// is high now and was low on the previous iteration. Foreground-only state.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    prev: ButtonState,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self {
            prev: ButtonState::IDLE,
        }
    }

    /// Feed the current stable vector, get the rising edges since last call.
    #[inline]
    pub fn step(&mut self, now: ButtonState) -> PressSet {
        let pressed = now.bits() & (now.bits() ^ self.prev.bits());
        self.prev = now;
        PressSet(pressed)
    }
}

/// The four status outputs. Exactly one is lit at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicators {
    /// Indicator 1: shared by Idle, Run and Reset.
    Slot1,
    /// Indicator 2: adjusting the upper bound.
    Slot2,
    /// Indicator 3: adjusting the lower bound.
    Slot3,
    /// Indicator 4: transient panic-reset acknowledgment flash.
    Slot4,
}

impl Indicators {
    /// One-hot bit pattern, bit 0 = indicator 1.
    #[inline]
    pub const fn bits(&self) -> u8 {
        match self {
            Indicators::Slot1 => 0x01,
            Indicators::Slot2 => 0x02,
            Indicators::Slot3 => 0x04,
            Indicators::Slot4 => 0x08,
        }
    }
}
