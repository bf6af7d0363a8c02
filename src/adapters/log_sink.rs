//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events to the `log`
//! facade (the ESP-IDF console in production).  One line per event,
//! prefixed by subsystem: `PROTO`, `IR`, `SENSE`, `IND`, `FAULT`.

use log::{debug, error, info, warn};

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControllerEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Started => info!("PROTO | ready"),
            ControllerEvent::StateChanged { from, to } => {
                debug!("PROTO | {} -> {}", from.name(), to.name());
            }
            ControllerEvent::ProtocolError { byte, state } => {
                warn!("PROTO | rejected 0x{:02x} in {}", byte, state.name());
            }
            ControllerEvent::Identified => info!("IND   | identify blink"),
            ControllerEvent::FrameOpened { channel, length } => {
                info!("IR    | tx frame opened ch={} len={}", channel, length);
            }
            ControllerEvent::FrameTransmitted { length, elapsed_us } => {
                info!("IR    | tx {} bytes in {}us", length, elapsed_us);
            }
            ControllerEvent::ReceiveStarted { length } => {
                info!("IR    | rx waiting for edge ({} bytes)", length);
            }
            ControllerEvent::FrameReceived { length, elapsed_us } => {
                info!("IR    | rx {} bytes in {}us", length, elapsed_us);
            }
            ControllerEvent::SensorArmed => info!("SENSE | armed"),
            ControllerEvent::ProximityDetected { dwell_us } => {
                info!("SENSE | detected after {}ms", dwell_us / 1_000);
            }
            ControllerEvent::ActivityIndicator(on) => {
                info!("IND   | activity {}", if *on { "on" } else { "off" });
            }
            ControllerEvent::Fault(e) => error!("FAULT | {}", e),
        }
    }
}
