//! HD44780 driver module.
//!
//! [HD44780Driver] holds the instruction set as default methods on top of a few low-level
//! transfers, and [GpioHD44780Driver] implements those transfers over an
//! [LcdPlatform](crate::LcdPlatform) in 4-bit mode.

mod gpio;

use crate::{DisplayConfig, GpioResult};
pub use gpio::*;
use log::trace;
use std::fmt::Debug;

pub const CMD_CLEAR_DISPLAY: u8 = 0b00000001;
pub const CMD_RETURN_HOME: u8 = 0b00000010;
pub const CMD_ENTRY_MODE: u8 = 0b00000100;
pub const CMD_DISPLAY_CONTROL: u8 = 0b00001000;
pub const CMD_CURSOR_SHIFT: u8 = 0b00010000;
pub const CMD_FUNCTION_SET: u8 = 0b00100000;
pub const CMD_SET_DDRAM_ADDRESS: u8 = 0b10000000;

pub const ENTRY_INCREMENT: u8 = 0b00000010;
pub const ENTRY_SHIFT: u8 = 0b00000001;

pub const DISPLAY_ON: u8 = 0b00000100;
pub const DISPLAY_CURSOR_ON: u8 = 0b00000010;
pub const DISPLAY_BLINK_ON: u8 = 0b00000001;

pub const SHIFT_DISPLAY: u8 = 0b00001000;
pub const SHIFT_RIGHT: u8 = 0b00000100;

pub const FUNCTION_8BIT: u8 = 0b00010000;
pub const FUNCTION_2LINE: u8 = 0b00001000;
pub const FUNCTION_5X10: u8 = 0b00000100;

/// Upper nibble of the 8-bit function set, sent alone during the power-on resync.
pub const NIBBLE_FUNCTION_SET_8BIT: u8 = (CMD_FUNCTION_SET | FUNCTION_8BIT) >> 4;
/// Upper nibble of the 4-bit function set, switches the bus to 4-bit mode.
pub const NIBBLE_FUNCTION_SET_4BIT: u8 = CMD_FUNCTION_SET >> 4;

/// Clear display and return home take up to 1.52 ms to execute.
pub const CLEAR_DELAY_MS: u16 = 2;

pub trait HD44780Driver: Debug {
    /// Runs the power-on initialization sequence. Must be called once, before anything else.
    fn init(&self) -> GpioResult<()>;

    /// The configuration this driver was created with.
    fn config(&self) -> &DisplayConfig;

    /// Clears the display and sets the cursor to the home position, then waits for the
    /// controller to finish.
    fn clear_display(&self) -> GpioResult<()> {
        self.send_command(CMD_CLEAR_DISPLAY)?;
        self.delay_ms(CLEAR_DELAY_MS)
    }

    /// Puts the cursor back to the origin.
    ///
    /// This is the same as [Self::clear_display]: the display contents are cleared too. Use
    /// [Self::cursor_home] to keep them.
    fn return_home(&self) -> GpioResult<()> {
        self.clear_display()
    }

    /// Sets the cursor to the home position with the dedicated instruction, leaving the DDRAM
    /// contents alone. Also undoes any display shift.
    fn cursor_home(&self) -> GpioResult<()> {
        self.send_command(CMD_RETURN_HOME)?;
        self.delay_ms(CLEAR_DELAY_MS)
    }

    /// Sets the display to the specified entry mode.
    fn set_entry_mode(&self, cursor_direction: CursorDirection, shift: bool) -> GpioResult<()> {
        let mut command = CMD_ENTRY_MODE;
        if cursor_direction == CursorDirection::Right {
            command |= ENTRY_INCREMENT;
        }
        if shift {
            command |= ENTRY_SHIFT;
        }
        self.send_command(command)
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    fn set_display_control(
        &self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> GpioResult<()> {
        let mut command = CMD_DISPLAY_CONTROL;
        if display_on {
            command |= DISPLAY_ON;
        }
        if cursor_on {
            command |= DISPLAY_CURSOR_ON;
        }
        if blink_on {
            command |= DISPLAY_BLINK_ON;
        }
        self.send_command(command)
    }

    /// Moves the cursor or shifts the display.
    fn cursor_shift(&self, display_shift: bool, direction: CursorDirection) -> GpioResult<()> {
        let mut command = CMD_CURSOR_SHIFT;
        if display_shift {
            command |= SHIFT_DISPLAY;
        }
        if direction == CursorDirection::Right {
            command |= SHIFT_RIGHT;
        }
        self.send_command(command)
    }

    /// Function set for the 4-bit interface. The data length bit is always 0 here.
    fn function_set(&self, two_lines: bool, large_font: bool) -> GpioResult<()> {
        let mut command = CMD_FUNCTION_SET;
        if two_lines {
            command |= FUNCTION_2LINE;
        }
        if large_font {
            command |= FUNCTION_5X10;
        }
        self.send_command(command)
    }

    /// Sets the DDRAM address. Only the low 7 bits of `address` are used.
    fn set_ddram_address(&self, address: u8) -> GpioResult<()> {
        self.send_command(CMD_SET_DDRAM_ADDRESS | (address & 0b01111111))
    }

    /// Moves the cursor to a 1-based `row` and `column`.
    ///
    /// The command sent is `(column - 1) | ((row + 1) * 8 * columns)`, keeping the low 8 bits,
    /// with `columns` taken from the [DisplayConfig]. This matches the wiring this driver was
    /// written for and not the usual `0x00`/`0x40` line bases. Nothing is checked against the
    /// display size, an out-of-range position just lands somewhere else.
    ///
    /// With two or more columns the row term alone is at least `0x100`, so the truncation
    /// happens on practically every call and is only traced.
    fn set_cursor(&self, row: u8, column: u8) -> GpioResult<()> {
        let column = column.wrapping_sub(1);
        let row = row.wrapping_add(1);
        let address = u32::from(column) | (u32::from(row) * 8 * u32::from(self.config().columns));
        if address > u32::from(u8::MAX) {
            trace!("Cursor address {:#x} truncated to {:#04x}", address, address as u8);
        }
        self.send_command(address as u8)
    }

    /// Writes one character code at the cursor.
    fn print_char(&self, char: u8) -> GpioResult<()> {
        self.send_data(char)
    }

    /// Writes character codes until the end of `text` or the first NUL byte.
    ///
    /// Empty input writes nothing. No character set conversion happens, so non-ASCII text shows
    /// whatever the controller ROM has at those codes.
    fn print_str(&self, text: impl AsRef<[u8]>) -> GpioResult<()>
    where
        Self: Sized,
    {
        for &char in text.as_ref().iter().take_while(|&&c| c != 0) {
            self.print_char(char)?;
        }
        Ok(())
    }

    /// Applies the cursor, blink and increment preferences from the [DisplayConfig].
    ///
    /// [Self::init] always leaves the display with the cursor on, blinking off and increment
    /// mode; call this afterwards to switch to the configured mode.
    fn apply_preferences(&self) -> GpioResult<()> {
        let config = *self.config();
        self.set_display_control(true, config.cursor, config.blink)?;
        let direction = if config.increment {
            CursorDirection::Right
        } else {
            CursorDirection::Left
        };
        self.set_entry_mode(direction, false)
    }

    // Low-level commands
    // These are used by the high-level functions above and implemented by the driver
    // implementation.

    /// Puts one nibble on D4..D7 and pulses E. RS and RW have to be set beforehand.
    fn write_nibble(&self, nibble: u8) -> GpioResult<()>;

    /// Sends a command to the HD44780 controller.
    /// Sets the RS pin to 0 (command).
    fn send_command(&self, command: u8) -> GpioResult<()>;

    /// Sends data to the HD44780 controller.
    /// Sets the RS pin to 1 (data).
    fn send_data(&self, data: u8) -> GpioResult<()>;

    /// Waits for at least `ms` milliseconds.
    fn delay_ms(&self, ms: u16) -> GpioResult<()>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing data.
    Left,
    /// Moves the cursor to the right after writing data.
    Right,
}
