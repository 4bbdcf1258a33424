#![allow(dead_code)]

use hd44780_4bit::{GpioResult, LcdPlatform, Pin};
use std::cell::RefCell;

/// Everything a driver does to the platform, in order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Op {
    Write(Pin, bool),
    Ms(u16),
    Us(u16),
}

#[derive(Debug, Default)]
pub struct Recorder {
    ops: RefCell<Vec<Op>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<Op> {
        self.ops.take()
    }
}

impl LcdPlatform for Recorder {
    fn write_pin(&self, pin: Pin, level: bool) -> GpioResult<()> {
        self.ops.borrow_mut().push(Op::Write(pin, level));
        Ok(())
    }

    fn delay_ms(&self, ms: u16) -> GpioResult<()> {
        self.ops.borrow_mut().push(Op::Ms(ms));
        Ok(())
    }

    fn delay_us(&self, us: u16) -> GpioResult<()> {
        self.ops.borrow_mut().push(Op::Us(us));
        Ok(())
    }
}

/// One bus transfer: D4..D7 then the E pulse.
pub fn nibble(value: u8) -> Vec<Op> {
    vec![
        Op::Write(Pin::D4, value & 0b0001 != 0),
        Op::Write(Pin::D5, value & 0b0010 != 0),
        Op::Write(Pin::D6, value & 0b0100 != 0),
        Op::Write(Pin::D7, value & 0b1000 != 0),
        Op::Write(Pin::EN, true),
        Op::Us(10),
        Op::Write(Pin::EN, false),
        Op::Us(50),
    ]
}

fn framed(byte: u8, rs: bool) -> Vec<Op> {
    let mut ops = vec![Op::Write(Pin::RS, rs), Op::Write(Pin::RW, false)];
    ops.extend(nibble(byte >> 4));
    ops.extend(nibble(byte & 0x0F));
    ops
}

pub fn command(byte: u8) -> Vec<Op> {
    framed(byte, false)
}

pub fn data(byte: u8) -> Vec<Op> {
    framed(byte, true)
}

/// Number of E pulses in a recording.
pub fn transfers(ops: &[Op]) -> usize {
    ops.iter().filter(|op| **op == Op::Write(Pin::EN, true)).count()
}
