//! Port traits: the hexagonal boundary between the controller and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! GPIO is not wrapped in a bespoke trait: the IR pins and indicators
//! are plain `embedded-hal` 1.0 `OutputPin` / `InputPin`s, and the blink
//! delay is an `embedded_hal::delay::DelayNs`.  This module adds only
//! what `embedded-hal` does not cover.

use embedded_hal::digital::OutputPin;

use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond clock.
///
/// The timing loops call this in a tight spin, so implementations must be
/// a plain register/syscall read with no locking.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin.  Never decreases.
    fn now_us(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

// ───────────────────────────────────────────────────────────────
// Analog input port (driven adapter: ADC → domain)
// ───────────────────────────────────────────────────────────────

/// One-shot analog channel read.  `embedded-hal` 1.0 has no ADC trait.
pub trait AnalogInput {
    /// Raw reading on a 10-bit scale (0–1023).
    fn read_raw(&mut self) -> Result<u16>;
}

// ───────────────────────────────────────────────────────────────
// Precise digital output (capability over any OutputPin)
// ───────────────────────────────────────────────────────────────

/// The only two operations the pulse transmitter may perform on its pin.
///
/// Worst-case call latency is whatever the underlying `OutputPin` costs;
/// on the ESP32-S3 `gpio_set_level` is well under 1 µs, which is what the
/// 9 µs sub-carrier high phase budget assumes.
pub trait PulseOutput {
    type Error: embedded_hal::digital::Error;

    fn assert(&mut self) -> core::result::Result<(), Self::Error>;
    fn deassert(&mut self) -> core::result::Result<(), Self::Error>;
}

impl<P: OutputPin> PulseOutput for P {
    type Error = P::Error;

    #[inline(always)]
    fn assert(&mut self) -> core::result::Result<(), Self::Error> {
        self.set_high()
    }

    #[inline(always)]
    fn deassert(&mut self) -> core::result::Result<(), Self::Error> {
        self.set_low()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured [`ControllerEvent`](super::events::ControllerEvent)s
/// through this port.  Adapters decide where they go (serial log, test
/// recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControllerEvent);
}

/// Sink that drops every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &super::events::ControllerEvent) {}
}
