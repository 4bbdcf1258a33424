//! The capabilities the driver needs from the platform it runs on.
//!
//! Two adapters ship with the crate: [GpiodPlatform] for Linux GPIO character devices and
//! [HalPlatform] for anything implementing the `embedded-hal` 1.0 traits. Anything else only
//! has to implement [LcdPlatform::write_pin].

mod gpiod;
mod hal;

pub use self::gpiod::*;
pub use self::hal::*;

use crate::GpioResult;
use std::fmt::Debug;
use std::thread::sleep;
use std::time::Duration;

/// Logical lines of the HD44780 interface.
///
/// `D0`–`D3` only exist in 8-bit wiring. They are here so every controller line has a name,
/// but the driver never writes them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pin {
    /// Register select: low for instructions, high for display data.
    RS,
    /// Read/write: always held low, the driver never reads.
    RW,
    /// Enable strobe, latches the data lines on its falling edge.
    EN,
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
}

impl Pin {
    /// Data lines used by the 4-bit interface, least significant bit first.
    pub const DATA_4BIT: [Pin; 4] = [Pin::D4, Pin::D5, Pin::D6, Pin::D7];

    /// Every line the driver writes, in the order it resets them.
    pub const DRIVEN: [Pin; 7] = [Pin::RS, Pin::RW, Pin::EN, Pin::D4, Pin::D5, Pin::D6, Pin::D7];
}

/// Pin and timer access the driver is built on.
///
/// Delays are minimums: sleeping longer is always fine, returning early breaks the protocol.
/// The defaults use [std::thread::sleep], which never wakes up early.
pub trait LcdPlatform: Debug {
    /// Drives the given line to the given level.
    fn write_pin(&self, pin: Pin, level: bool) -> GpioResult<()>;

    /// Blocks for at least `ms` milliseconds.
    fn delay_ms(&self, ms: u16) -> GpioResult<()> {
        sleep(Duration::from_millis(ms.into()));
        Ok(())
    }

    /// Blocks for at least `us` microseconds.
    fn delay_us(&self, us: u16) -> GpioResult<()> {
        sleep(Duration::from_micros(us.into()));
        Ok(())
    }
}
