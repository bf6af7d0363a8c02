//! Sensor subsystem.
//!
//! The board has a single analog range sensor; [`proximity`] turns its raw
//! readings into one-shot dwell detections.  On the device the channel is
//! read through [`RangeSensor`], a thin [`AnalogInput`] over ADC1.

pub mod proximity;

use crate::app::ports::AnalogInput;
use crate::drivers::hw_init;
use crate::error::Result;

/// ADC1 channel wired to the range sensor.
pub struct RangeSensor {
    channel: u32,
}

impl RangeSensor {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl AnalogInput for RangeSensor {
    fn read_raw(&mut self) -> Result<u16> {
        hw_init::adc1_read(self.channel)
    }
}
