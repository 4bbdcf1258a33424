use crate::driver::{
    CursorDirection, HD44780Driver, NIBBLE_FUNCTION_SET_4BIT, NIBBLE_FUNCTION_SET_8BIT,
};
use crate::platform::{LcdPlatform, Pin};
use crate::{DisplayConfig, GpioResult};
use bitvec::prelude::*;
use log::{debug, trace, warn};
use std::fmt;

/// Minimum time E is held high for one transfer.
pub const ENABLE_PULSE_US: u16 = 10;
/// Time given to the controller after every transfer. The slowest regular instruction takes
/// 37 us.
pub const COMMAND_RECOVERY_US: u16 = 50;
/// Wait after power-up before talking to the controller. The data sheet asks for 15 ms.
pub const POWER_ON_DELAY_MS: u16 = 40;
/// Wait after the first 8-bit function set of the resync. The data sheet asks for 4.1 ms.
pub const RESYNC_FIRST_DELAY_MS: u16 = 5;
/// Wait after the second 8-bit function set of the resync. The data sheet asks for 100 us.
pub const RESYNC_SECOND_DELAY_US: u16 = 150;

/// GpioHD44780Driver talks to an HD44780 controller over the 4-bit interface, through the pins
/// and timers of an [LcdPlatform].
///
/// The driver only borrows the configuration and the platform and keeps no state of its own, so
/// every operation depends only on its arguments. It never reads from the controller: after each
/// transfer it waits [COMMAND_RECOVERY_US], and after clear/home [CLEAR_DELAY_MS](crate::driver::CLEAR_DELAY_MS).
///
/// Nothing here is synchronized. Two threads driving the same display have to share one driver
/// behind a mutex, otherwise their nibbles interleave.
#[derive(Debug, Copy, Clone)]
pub struct GpioHD44780Driver<'a> {
    config: &'a DisplayConfig,
    platform: &'a dyn LcdPlatform,
}

impl<'a> GpioHD44780Driver<'a> {
    pub fn new(config: &'a DisplayConfig, platform: &'a dyn LcdPlatform) -> Self {
        GpioHD44780Driver { config, platform }
    }

    fn pulse_e(&self) -> GpioResult<()> {
        // Set E pin to high
        self.platform.write_pin(Pin::EN, true)?;
        self.platform.delay_us(ENABLE_PULSE_US)?;
        // Set E pin to low
        self.platform.write_pin(Pin::EN, false)?;
        self.platform.delay_us(COMMAND_RECOVERY_US)?;
        Ok(())
    }

    fn send(&self, data: u8, rs: bool) -> GpioResult<()> {
        trace!("Sending data: {:08b}, RS: {}", data, rs);

        // Set RS pin
        self.platform.write_pin(Pin::RS, rs)?;
        // Set RW pin to write
        self.platform.write_pin(Pin::RW, false)?;

        self.write_nibble(data >> 4)?;
        self.write_nibble(data & 0x0F)?;
        Ok(())
    }
}

impl HD44780Driver for GpioHD44780Driver<'_> {
    /// Initializes the controller from an unknown state.
    ///
    /// After driving every line low and waiting for the supply to settle, the controller gets
    /// `0011` three times on its own, which puts it in 8-bit mode whatever mode it was in, and then
    /// `0010` to switch to 4-bit mode. From there on everything is sent as two nibbles:
    /// - function set: 4-bit bus, 2 lines, 5x8 font,
    /// - display on with the cursor on,
    /// - clear display,
    /// - entry mode: increment, no shift.
    ///
    /// The order is fixed. Changing it leaves the controller out of step with the nibble pairs,
    /// and since nothing is read back, that can't be detected here.
    fn init(&self) -> GpioResult<()> {
        debug!("Resetting lines");
        for pin in Pin::DRIVEN {
            self.platform.write_pin(pin, false)?;
        }
        self.platform.delay_ms(POWER_ON_DELAY_MS)?;

        debug!("Synchronizing to 4-bit mode");
        self.platform.write_pin(Pin::RS, false)?;
        self.platform.write_pin(Pin::RW, false)?;
        self.write_nibble(NIBBLE_FUNCTION_SET_8BIT)?;
        self.platform.delay_ms(RESYNC_FIRST_DELAY_MS)?;
        self.write_nibble(NIBBLE_FUNCTION_SET_8BIT)?;
        self.platform.delay_us(RESYNC_SECOND_DELAY_US)?;
        self.write_nibble(NIBBLE_FUNCTION_SET_8BIT)?;
        self.write_nibble(NIBBLE_FUNCTION_SET_4BIT)?;

        debug!("Configuring display");
        self.function_set(true, false)?;
        self.set_display_control(true, true, false)?;
        self.clear_display()?;
        self.set_entry_mode(CursorDirection::Right, false)?;
        Ok(())
    }

    fn config(&self) -> &DisplayConfig {
        self.config
    }

    /// Only the low four bits of `nibble` are used, bit 0 going to D4.
    fn write_nibble(&self, nibble: u8) -> GpioResult<()> {
        trace!("Writing nibble: {:04b}", nibble & 0x0F);
        for (pin, bit) in Pin::DATA_4BIT.into_iter().zip(nibble.view_bits::<Lsb0>().iter().by_vals()) {
            self.platform.write_pin(pin, bit)?;
        }
        self.pulse_e()
    }

    fn send_command(&self, command: u8) -> GpioResult<()> {
        self.send(command, false)
    }

    fn send_data(&self, data: u8) -> GpioResult<()> {
        self.send(data, true)
    }

    fn delay_ms(&self, ms: u16) -> GpioResult<()> {
        self.platform.delay_ms(ms)
    }
}

/// Lets `write!` print formatted text through [HD44780Driver::print_str].
///
/// [fmt::Error] carries no payload, so a platform failure is only logged here. Use
/// [HD44780Driver::print_str] directly when the [GpioError](crate::GpioError) matters.
impl fmt::Write for GpioHD44780Driver<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print_str(s).map_err(|err| {
            warn!("Failed to print {:?}: {}", s, err);
            fmt::Error
        })
    }
}
