//! [LcdPlatform] on top of the Linux GPIO character device, using the gpiod library.
use crate::platform::{LcdPlatform, Pin};
use crate::{GpioError, GpioResult};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::path::Path;

/// Line offsets on the GPIO chip the display is wired to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LcdPinMap {
    pub rs: u32,
    pub rw: u32,
    pub e: u32,
    /// D4, D5, D6, D7.
    pub data: [u32; 4],
}

/// GpiodPlatform drives the display lines through `/dev/gpiochipN`.
///
/// Every line is requested as a separate output, so writes never touch any other line.
/// Delays use the default [std::thread::sleep] implementations.
pub struct GpiodPlatform {
    chip_name: String,
    pin_map: LcdPinMap,
    rs: gpiod::Lines<gpiod::Output>,
    rw: gpiod::Lines<gpiod::Output>,
    e: gpiod::Lines<gpiod::Output>,
    data: [gpiod::Lines<gpiod::Output>; 4],
}

impl GpiodPlatform {
    /// Opens the chip at `path` and requests all seven driven lines as outputs.
    pub fn open(path: impl AsRef<Path>, pin_map: LcdPinMap) -> GpioResult<Self> {
        let chip = gpiod::Chip::new(path.as_ref())?;
        Self::new(&chip, pin_map)
    }

    pub fn new(chip: &gpiod::Chip, pin_map: LcdPinMap) -> GpioResult<Self> {
        let request = |offset: u32| -> GpioResult<gpiod::Lines<gpiod::Output>> {
            let lines = chip.request_lines(
                gpiod::Options::output([offset]).consumer(env!("CARGO_PKG_NAME")),
            )?;
            Ok(lines)
        };

        let [d4, d5, d6, d7] = pin_map.data;
        let platform = GpiodPlatform {
            chip_name: chip.name().to_string(),
            pin_map,
            rs: request(pin_map.rs)?,
            rw: request(pin_map.rw)?,
            e: request(pin_map.e)?,
            data: [request(d4)?, request(d5)?, request(d6)?, request(d7)?],
        };
        debug!("{:?} requested.", platform);
        Ok(platform)
    }

    fn line(&self, pin: Pin) -> GpioResult<&gpiod::Lines<gpiod::Output>> {
        match pin {
            Pin::RS => Ok(&self.rs),
            Pin::RW => Ok(&self.rw),
            Pin::EN => Ok(&self.e),
            Pin::D4 => Ok(&self.data[0]),
            Pin::D5 => Ok(&self.data[1]),
            Pin::D6 => Ok(&self.data[2]),
            Pin::D7 => Ok(&self.data[3]),
            Pin::D0 | Pin::D1 | Pin::D2 | Pin::D3 => Err(GpioError::NotSupported),
        }
    }
}

impl Debug for GpiodPlatform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GpiodPlatform({}, {:?})", self.chip_name, self.pin_map)
    }
}

impl LcdPlatform for GpiodPlatform {
    fn write_pin(&self, pin: Pin, level: bool) -> GpioResult<()> {
        self.line(pin)?.set_values([level])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_chip_is_an_io_error() {
        let pin_map = LcdPinMap {
            rs: 0,
            rw: 1,
            e: 2,
            data: [3, 4, 5, 6],
        };

        let err = GpiodPlatform::open("/dev/hd44780-no-such-gpiochip", pin_map).unwrap_err();
        assert!(matches!(err, GpioError::Io(_)), "unexpected error: {:?}", err);
    }
}
