//! Carrier-modulated IR transmitter.
//!
//! Fills a fixed-capacity [`Frame`] one byte at a time, then plays it out
//! on the LED pin.  A mark slot is a train of sub-carrier pulses
//! (9 µs on / 17 µs off ≈ 38 kHz, 1/3 duty); a space slot leaves the pin
//! low.
//!
//! The sub-carrier runs on its own accumulated counter: pulse `k` starts
//! at `origin + k * period`, and pulses keep coming while their start is
//! before the current slot's end (`origin + (s + 1) * slot`).  Because the
//! period does not divide the slot, a slot gets three or four pulses, but
//! neither counter ever drifts against the clock.

use log::warn;

use crate::app::ports::{Clock, PulseOutput};
use crate::config::FirmwareConfig;
use crate::error::{Result, pin_write_error};

use super::timing::Timebase;
use super::{Frame, byte_slots};

/// Slot and sub-carrier timing, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierTiming {
    pub slot_us: u64,
    pub high_us: u64,
    pub low_us: u64,
}

impl CarrierTiming {
    pub fn from_config(config: &FirmwareConfig) -> Self {
        Self {
            slot_us: u64::from(config.slot_us),
            high_us: u64::from(config.carrier_high_us),
            low_us: u64::from(config.carrier_low_us),
        }
    }

    pub fn period_us(&self) -> u64 {
        self.high_us + self.low_us
    }
}

pub struct IrTransmitter<O> {
    pin: O,
    frame: Frame,
    timing: CarrierTiming,
}

impl<O: PulseOutput> IrTransmitter<O> {
    pub fn new(pin: O, timing: CarrierTiming) -> Self {
        Self {
            pin,
            frame: Frame::new(),
            timing,
        }
    }

    /// Drive the LED off.  Called once at boot.
    pub fn idle(&mut self) -> Result<()> {
        self.pin.deassert().map_err(pin_write_error)
    }

    /// Discard any buffered bytes.
    pub fn reset(&mut self) {
        self.frame.clear();
    }

    /// Append one byte and return the new length.  A byte pushed into a
    /// full buffer is dropped.
    pub fn push(&mut self, byte: u8) -> usize {
        if self.frame.push(byte).is_err() {
            warn!("IR frame buffer full, dropping byte 0x{:02x}", byte);
        }
        self.frame.len()
    }

    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Play the first `length` buffered bytes.  Blocks for
    /// `length * 8 * slot` microseconds and returns the measured duration.
    pub fn transmit<C: Clock>(&mut self, length: usize, clock: &C) -> Result<u64> {
        let length = if length > self.frame.len() {
            warn!(
                "transmit of {} bytes requested, only {} buffered",
                length,
                self.frame.len()
            );
            self.frame.len()
        } else {
            length
        };

        let CarrierTiming { slot_us, high_us, .. } = self.timing;
        let period_us = self.timing.period_us();

        self.pin.deassert().map_err(pin_write_error)?;

        let tb = Timebase::start(clock);
        let mut cycle_start = 0u64;
        let mut slot_end = 0u64;

        for &byte in &self.frame[..length] {
            for mark in byte_slots(byte) {
                slot_end += slot_us;
                while cycle_start < slot_end {
                    if mark {
                        self.pin.assert().map_err(pin_write_error)?;
                    }
                    tb.wait_until(cycle_start + high_us);
                    if mark {
                        self.pin.deassert().map_err(pin_write_error)?;
                    }
                    cycle_start += period_us;
                    tb.wait_until(cycle_start);
                }
            }
        }

        Ok(tb.elapsed_us())
    }
}
