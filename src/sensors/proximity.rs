//! Dwell-time proximity detector on an analog range sensor.
//!
//! A reading above the threshold means "something is in front of the
//! sensor".  The detector fires once that condition has held continuously
//! for the dwell time, then disarms itself: one `q` buys exactly one
//! detection.  Any reading at or below the threshold restarts the dwell.

use log::debug;

use crate::app::ports::{AnalogInput, Clock};
use crate::error::Result;

/// A completed detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// How long the object had been present when the detector fired.
    pub dwell_us: u64,
}

pub struct ProximityDetector<A> {
    adc: A,
    threshold_raw: u16,
    dwell_us: u64,
    enabled: bool,
    present: bool,
    rise_us: u64,
}

impl<A: AnalogInput> ProximityDetector<A> {
    pub fn new(adc: A, threshold_raw: u16, dwell_us: u64) -> Self {
        Self {
            adc,
            threshold_raw,
            dwell_us,
            enabled: false,
            present: false,
            rise_us: 0,
        }
    }

    /// Arm the detector.  Re-arming while armed restarts the dwell.
    pub fn start(&mut self) {
        self.enabled = true;
        self.present = false;
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.present = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Take one reading.  Returns `Some` exactly once per arming, at the
    /// first sample where presence has lasted at least the dwell time.
    /// Does nothing (and touches no hardware) while disarmed.
    pub fn sample<C: Clock>(&mut self, clock: &C) -> Result<Option<Detection>> {
        if !self.enabled {
            return Ok(None);
        }

        let raw = self.adc.read_raw()?;
        if raw <= self.threshold_raw {
            self.present = false;
            return Ok(None);
        }

        let now = clock.now_us();
        if !self.present {
            debug!("proximity: rise at {}us (raw={})", now, raw);
            self.present = true;
            self.rise_us = now;
            return Ok(None);
        }

        let dwell_us = now.saturating_sub(self.rise_us);
        if dwell_us >= self.dwell_us {
            self.stop();
            return Ok(Some(Detection { dwell_us }));
        }
        Ok(None)
    }
}
