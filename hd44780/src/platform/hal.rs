use crate::platform::{LcdPlatform, Pin};
use crate::{GpioError, GpioResult};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, OutputPin};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};

/// The seven output pins of a 4-bit HD44780 wiring.
pub struct HalPins<P> {
    pub rs: P,
    pub rw: P,
    pub en: P,
    pub d4: P,
    pub d5: P,
    pub d6: P,
    pub d7: P,
}

/// [LcdPlatform] over `embedded-hal` 1.0 pins and a [DelayNs] timer.
///
/// The HAL traits take `&mut self`, so pins and delay live behind [RefCell]s. The platform is
/// not [Sync]; share it across threads only behind a mutex.
pub struct HalPlatform<P, D> {
    pins: RefCell<HalPins<P>>,
    delay: RefCell<D>,
}

impl<P: OutputPin, D: DelayNs> HalPlatform<P, D> {
    pub fn new(pins: HalPins<P>, delay: D) -> Self {
        HalPlatform {
            pins: RefCell::new(pins),
            delay: RefCell::new(delay),
        }
    }

    /// Gives the pins and the delay back.
    pub fn release(self) -> (HalPins<P>, D) {
        (self.pins.into_inner(), self.delay.into_inner())
    }
}

impl<P, D> Debug for HalPlatform<P, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HalPlatform")
    }
}

impl<P: OutputPin, D: DelayNs> LcdPlatform for HalPlatform<P, D> {
    fn write_pin(&self, pin: Pin, level: bool) -> GpioResult<()> {
        let mut pins = self.pins.borrow_mut();
        let output = match pin {
            Pin::RS => &mut pins.rs,
            Pin::RW => &mut pins.rw,
            Pin::EN => &mut pins.en,
            Pin::D4 => &mut pins.d4,
            Pin::D5 => &mut pins.d5,
            Pin::D6 => &mut pins.d6,
            Pin::D7 => &mut pins.d7,
            Pin::D0 | Pin::D1 | Pin::D2 | Pin::D3 => return Err(GpioError::NotSupported),
        };
        output
            .set_state(level.into())
            .map_err(|err| GpioError::Pin(format!("{:?} {:?}", pin, err.kind())))
    }

    fn delay_ms(&self, ms: u16) -> GpioResult<()> {
        self.delay.borrow_mut().delay_ms(ms.into());
        Ok(())
    }

    fn delay_us(&self, us: u16) -> GpioResult<()> {
        self.delay.borrow_mut().delay_us(us.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock, State, Transaction};

    fn pin(states: &[State]) -> Mock {
        let transactions: Vec<Transaction> = states.iter().map(|&s| Transaction::set(s)).collect();
        Mock::new(&transactions)
    }

    #[test]
    fn writes_reach_the_matching_pin() {
        use State::{High, Low};

        let pins = HalPins {
            rs: pin(&[High]),
            rw: pin(&[Low]),
            en: pin(&[High, Low]),
            d4: pin(&[High]),
            d5: pin(&[Low]),
            d6: pin(&[Low]),
            d7: pin(&[High]),
        };
        let platform = HalPlatform::new(pins, NoopDelay::new());

        platform.write_pin(Pin::RS, true).unwrap();
        platform.write_pin(Pin::RW, false).unwrap();
        platform.write_pin(Pin::D4, true).unwrap();
        platform.write_pin(Pin::D5, false).unwrap();
        platform.write_pin(Pin::D6, false).unwrap();
        platform.write_pin(Pin::D7, true).unwrap();
        platform.write_pin(Pin::EN, true).unwrap();
        platform.delay_us(10).unwrap();
        platform.write_pin(Pin::EN, false).unwrap();
        platform.delay_ms(2).unwrap();

        let (mut pins, _) = platform.release();
        for p in [
            &mut pins.rs, &mut pins.rw, &mut pins.en,
            &mut pins.d4, &mut pins.d5, &mut pins.d6, &mut pins.d7,
        ] {
            p.done();
        }
    }

    #[test]
    fn unused_data_lines_are_rejected() {
        let pins = HalPins {
            rs: pin(&[]),
            rw: pin(&[]),
            en: pin(&[]),
            d4: pin(&[]),
            d5: pin(&[]),
            d6: pin(&[]),
            d7: pin(&[]),
        };
        let platform = HalPlatform::new(pins, NoopDelay::new());

        assert_eq!(platform.write_pin(Pin::D0, true), Err(GpioError::NotSupported));
        assert_eq!(platform.write_pin(Pin::D3, false), Err(GpioError::NotSupported));

        let (mut pins, _) = platform.release();
        for p in [
            &mut pins.rs, &mut pins.rw, &mut pins.en,
            &mut pins.d4, &mut pins.d5, &mut pins.d6, &mut pins.d7,
        ] {
            p.done();
        }
    }
}
