//! Unified error types for the RemoSquash firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level loop's error handling uniform.  All variants are `Copy` so
//! they can be returned out of the timing loops without allocation.
//!
//! Protocol errors (an unexpected command byte) are *not* represented
//! here: they are answered on the wire with `?` and never leave the
//! state machine.

use core::fmt;

use embedded_hal::digital::ErrorKind;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible hardware operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO read or write failed.
    Pin(PinError),
    /// The command transport could not be read or written.
    Transport(TransportError),
    /// The proximity sensor ADC could not be read.
    Sensor(SensorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "pin: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Pin errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// Driving an output pin failed.
    WriteFailed(ErrorKind),
    /// Sampling an input pin failed.
    ReadFailed(ErrorKind),
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed(kind) => write!(f, "GPIO write failed ({kind:?})"),
            Self::ReadFailed(kind) => write!(f, "GPIO read failed ({kind:?})"),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

/// Map an `embedded-hal` output error into the firmware error.
pub fn pin_write_error<E: embedded_hal::digital::Error>(e: E) -> Error {
    Error::Pin(PinError::WriteFailed(e.kind()))
}

/// Map an `embedded-hal` input error into the firmware error.
pub fn pin_read_error<E: embedded_hal::digital::Error>(e: E) -> Error {
    Error::Pin(PinError::ReadFailed(e.kind()))
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The receive side returned an error.
    ReadFailed,
    /// The transmit side returned an error or accepted fewer bytes than asked.
    WriteFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
