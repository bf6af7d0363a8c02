//! Firmware configuration parameters
//!
//! All tunable parameters for the RemoSquash controller.  The defaults
//! reproduce the timing of the Buffalo PC-OP-RS1 remote station the
//! protocol is compatible with.  Nothing here is persisted: the firmware
//! boots from `FirmwareConfig::default()` every time.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which command vocabulary the protocol state machine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtocolVariant {
    /// Fixed 240-byte frames, `t` / `r` only.
    #[default]
    Canonical,
    /// Canonical commands plus `u` / `s`, which take a frame size byte
    /// (frame length = size * 16).
    Sized,
}

/// Core firmware configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmwareConfig {
    // --- Protocol ---
    /// Command vocabulary
    pub protocol_variant: ProtocolVariant,
    /// Command UART baud rate
    pub uart_baud: u32,

    // --- IR timing ---
    /// Duration of one encoded bit (microseconds)
    pub slot_us: u32,
    /// Sub-carrier asserted time within a mark slot (microseconds)
    pub carrier_high_us: u32,
    /// Sub-carrier deasserted time within a mark slot (microseconds)
    pub carrier_low_us: u32,

    // --- Proximity ---
    /// Raw ADC reading above which an object counts as present
    pub presence_threshold_raw: u16,
    /// Continuous presence required before a detection fires (milliseconds)
    pub dwell_ms: u32,

    // --- Indicator ---
    /// On/off time for the single `i` acknowledgement blink (milliseconds)
    pub identify_blink_ms: u32,
    /// On/off time for each completion blink after transmit/receive (milliseconds)
    pub completion_blink_ms: u32,
    /// Number of completion blinks
    pub completion_blinks: u8,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            // Protocol
            protocol_variant: ProtocolVariant::Canonical,
            uart_baud: 115_200,

            // IR timing: 100us slots, 9/17us sub-carrier ≈ 38 kHz at 1/3 duty
            slot_us: 100,
            carrier_high_us: 9,
            carrier_low_us: 17,

            // Proximity
            presence_threshold_raw: 300,
            dwell_ms: 700,

            // Indicator
            identify_blink_ms: 100,
            completion_blink_ms: 50,
            completion_blinks: 2,
        }
    }
}

impl FirmwareConfig {
    /// Full sub-carrier period (asserted + deasserted).
    pub fn carrier_period_us(&self) -> u32 {
        self.carrier_high_us + self.carrier_low_us
    }

    /// Dwell time in microseconds, the unit the detector compares against.
    pub fn dwell_us(&self) -> u64 {
        u64::from(self.dwell_ms) * 1000
    }

    /// Reject values the timing code cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.slot_us == 0 {
            return Err(Error::Config("slot_us must be non-zero"));
        }
        if self.carrier_high_us == 0 || self.carrier_low_us == 0 {
            return Err(Error::Config("carrier phases must be non-zero"));
        }
        if self.carrier_period_us() > self.slot_us {
            return Err(Error::Config("carrier period longer than a slot"));
        }
        if self.dwell_ms == 0 {
            return Err(Error::Config("dwell_ms must be non-zero"));
        }
        if self.uart_baud == 0 {
            return Err(Error::Config("uart_baud must be non-zero"));
        }
        Ok(())
    }
}
