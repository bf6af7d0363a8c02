//! IR receiver: samples the demodulator output once per slot.
//!
//! The demodulator idles HIGH and pulls LOW while it sees carrier.  A
//! receive first waits for the line to be high, then for it to fall: that
//! falling edge is the frame origin.  From there the line is sampled at
//! `origin + n * slot` for every slot `n`, and each completed byte is handed
//! to the caller straight away so the host sees data while the frame is
//! still arriving.
//!
//! Once the edge has been seen the receive runs to completion; there is no
//! way to abandon it part-way.

use embedded_hal::digital::InputPin;

use crate::app::ports::Clock;
use crate::error::{Result, pin_read_error};

use super::assemble_byte;
use super::timing::Timebase;

pub struct IrReceiver<I> {
    pin: I,
    slot_us: u64,
}

impl<I: InputPin> IrReceiver<I> {
    pub fn new(pin: I, slot_us: u32) -> Self {
        Self {
            pin,
            slot_us: u64::from(slot_us),
        }
    }

    /// Block until a falling edge, then decode `length` bytes, calling
    /// `on_byte` with each one as it completes.  Returns the time spent
    /// sampling (edge to last slot boundary).
    pub fn receive<C, F>(&mut self, length: usize, clock: &C, mut on_byte: F) -> Result<u64>
    where
        C: Clock,
        F: FnMut(u8) -> Result<()>,
    {
        self.wait_for_falling_edge()?;

        let tb = Timebase::start(clock);
        let mut slot = 0u64;

        for _ in 0..length {
            let mut levels = [false; 8];
            for level in &mut levels {
                *level = self.pin.is_high().map_err(pin_read_error)?;
                slot += 1;
                tb.wait_until(slot * self.slot_us);
            }
            on_byte(assemble_byte(levels))?;
        }

        Ok(tb.elapsed_us())
    }

    fn wait_for_falling_edge(&mut self) -> Result<()> {
        while self.pin.is_low().map_err(pin_read_error)? {}
        while self.pin.is_high().map_err(pin_read_error)? {}
        Ok(())
    }
}
