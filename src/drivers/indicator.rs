//! Single-colour indicator LED.
//!
//! Two of these exist on the board: the generic LED (acknowledgement and
//! completion blinks) and the activity LED (`a` / `b`).  The driver tracks
//! the commanded level so the controller can report it without reading the
//! pin back.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::{Result, pin_write_error};

pub struct Indicator<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Indicator<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn on(&mut self) -> Result<()> {
        self.set(true)
    }

    pub fn off(&mut self) -> Result<()> {
        self.set(false)
    }

    pub fn set(&mut self, on: bool) -> Result<()> {
        if on {
            self.pin.set_high().map_err(pin_write_error)?;
        } else {
            self.pin.set_low().map_err(pin_write_error)?;
        }
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// `times` cycles of on for `len_ms`, off for `len_ms`.  Blocks.
    pub fn blink<D: DelayNs>(&mut self, times: u8, len_ms: u32, delay: &mut D) -> Result<()> {
        for _ in 0..times {
            self.on()?;
            delay.delay_ms(len_ms);
            self.off()?;
            delay.delay_ms(len_ms);
        }
        Ok(())
    }
}
