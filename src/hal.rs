//! Hardware seam.
//!
//! The core never touches registers. The board shell implements these ports
//! and wires them into its two timer interrupts and its run loop:
//!
//! - [`ButtonPort`]: sample the four raw button lines (debounce tick).
//! - [`PwmOut`]: write one (period, compare) pair (PWM tick).
//! - [`IndicatorPort`]: drive the four status outputs (foreground).
//!
//! For boards exposing plain digital pins, [`PinButtons`] and
//! [`PinIndicators`] adapt arrays of `embedded-hal` pins. There is no
//! generic PWM adapter: `embedded-hal` models duty-only PWM, while this
//! timer needs period and compare re-armed together, so each board supplies
//! its own [`PwmOut`].

use embedded_hal::digital::{InputPin, OutputPin};

use crate::input::{ButtonState, Indicators};
use crate::sweep::PwmCommand;

/// Raw button sampling, called once per debounce tick.
pub trait ButtonPort {
    type Error;

    /// One raw (noisy) snapshot of the four lines, active-high.
    fn sample(&mut self) -> Result<ButtonState, Self::Error>;
}

/// PWM timer/compare unit, re-armed once per PWM tick.
pub trait PwmOut {
    type Error;

    /// Write one period/compare pair.
    fn apply(&mut self, cmd: PwmCommand) -> Result<(), Self::Error>;

    /// Stop output (Idle behavior; freezing instead is also acceptable).
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// The four status outputs, driven once per foreground iteration.
pub trait IndicatorPort {
    type Error;

    /// Light exactly the given indicator, all others off.
    fn show(&mut self, indicators: Indicators) -> Result<(), Self::Error>;
}

/// [`ButtonPort`] over four digital input pins.
///
/// Pin order: confirm, up, down, panic-reset. `active_low` matches the
/// common pulled-up wiring where a pressed button reads low.
pub struct PinButtons<P> {
    pins: [P; 4],
    active_low: bool,
}

impl<P: InputPin> PinButtons<P> {
    pub fn new(pins: [P; 4], active_low: bool) -> Self {
        Self { pins, active_low }
    }
}

impl<P: InputPin> ButtonPort for PinButtons<P> {
    type Error = P::Error;

    fn sample(&mut self) -> Result<ButtonState, Self::Error> {
        let mut bits = 0u8;
        for (i, pin) in self.pins.iter_mut().enumerate() {
            let pressed = if self.active_low {
                pin.is_low()?
            } else {
                pin.is_high()?
            };
            if pressed {
                bits |= 1 << i;
            }
        }
        Ok(ButtonState::from_bits(bits))
    }
}

/// [`IndicatorPort`] over four digital output pins, indicator 1 first.
pub struct PinIndicators<P> {
    pins: [P; 4],
}

impl<P: OutputPin> PinIndicators<P> {
    pub fn new(pins: [P; 4]) -> Self {
        Self { pins }
    }
}

impl<P: OutputPin> IndicatorPort for PinIndicators<P> {
    type Error = P::Error;

    fn show(&mut self, indicators: Indicators) -> Result<(), Self::Error> {
        let bits = indicators.bits();
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if bits & (1 << i) != 0 {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{Error, ErrorKind, ErrorType};

    #[derive(Default)]
    struct MockPin {
        high: bool,
        fail: bool,
    }

    #[derive(Debug)]
    struct PinFault;

    impl Error for PinFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    impl ErrorType for MockPin {
        type Error = PinFault;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, PinFault> {
            if self.fail {
                return Err(PinFault);
            }
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, PinFault> {
            Ok(!self.is_high()?)
        }
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), PinFault> {
            if self.fail {
                return Err(PinFault);
            }
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), PinFault> {
            if self.fail {
                return Err(PinFault);
            }
            self.high = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct InfalliblePin {
        high: bool,
    }

    impl ErrorType for InfalliblePin {
        type Error = Infallible;
    }

    impl OutputPin for InfalliblePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    fn pins(levels: [bool; 4]) -> [MockPin; 4] {
        levels.map(|high| MockPin { high, fail: false })
    }

    #[test]
    fn test_active_high_sampling() {
        let mut port = PinButtons::new(pins([true, false, false, true]), false);
        let state = port.sample().unwrap();
        assert!(state.confirm());
        assert!(!state.up());
        assert!(!state.down());
        assert!(state.reset());
    }

    #[test]
    fn test_active_low_sampling_inverts() {
        let mut port = PinButtons::new(pins([false, true, true, true]), true);
        let state = port.sample().unwrap();
        assert!(state.confirm());
        assert!(!state.up());
    }

    #[test]
    fn test_sample_propagates_pin_error() {
        let mut bank = pins([false; 4]);
        bank[2].fail = true;
        let mut port = PinButtons::new(bank, false);
        assert!(port.sample().is_err());
    }

    #[test]
    fn test_indicators_are_mutually_exclusive() {
        let mut port = PinIndicators::new([
            InfalliblePin { high: true },
            InfalliblePin::default(),
            InfalliblePin::default(),
            InfalliblePin { high: true },
        ]);

        port.show(Indicators::Slot2).unwrap();
        let lit: [bool; 4] = core::array::from_fn(|i| port.pins[i].high);
        assert_eq!(lit, [false, true, false, false]);

        port.show(Indicators::Slot4).unwrap();
        let lit: [bool; 4] = core::array::from_fn(|i| port.pins[i].high);
        assert_eq!(lit, [false, false, false, true]);
    }
}
