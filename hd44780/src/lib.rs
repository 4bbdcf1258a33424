//! Driver for HD44780 character LCDs wired over the 4-bit parallel interface.
//!
//! The driver is write-only and open-loop: it never reads the busy flag, it just waits long
//! enough after every transfer. See [driver::HD44780Driver] for the operations and
//! [platform::LcdPlatform] for what a platform has to provide.

pub mod config;
pub mod driver;
pub mod platform;

pub use config::DisplayConfig;
pub use driver::{CursorDirection, GpioHD44780Driver, HD44780Driver};
pub use platform::{LcdPlatform, Pin};

use thiserror::Error;

/// Errors coming from the platform the driver runs on.
///
/// The HD44780 protocol itself has no way to report errors, so everything here originates in a
/// pin write or a delay, and is passed through by the driver as-is.
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum GpioError {
    #[error("the feature is not supported on this backend")]
    NotSupported,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("pin error: {0}")]
    Pin(String),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for GpioError {
    fn from(err: std::io::Error) -> Self {
        GpioError::Io(err.kind())
    }
}

pub type GpioResult<T> = Result<T, GpioError>;
