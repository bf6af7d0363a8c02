//! Outbound controller events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They never go out on the
//! command transport; that link carries only protocol bytes.

use crate::fsm::ProtocolState;

/// Structured events emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The controller is ready to accept commands.
    Started,

    /// The protocol state machine moved between states.
    StateChanged {
        from: ProtocolState,
        to: ProtocolState,
    },

    /// A byte was rejected with `?`.
    ProtocolError { byte: u8, state: ProtocolState },

    /// The `i` acknowledgement blink ran.
    Identified,

    /// A frame buffer was opened for the given channel.
    FrameOpened { channel: u8, length: usize },

    /// A frame finished transmitting.
    FrameTransmitted { length: usize, elapsed_us: u64 },

    /// A receive operation started waiting for the frame edge.
    ReceiveStarted { length: usize },

    /// A frame finished receiving.
    FrameReceived { length: usize, elapsed_us: u64 },

    /// The proximity detector was armed.
    SensorArmed,

    /// The proximity detector fired (and disarmed itself).
    ProximityDetected { dwell_us: u64 },

    /// The activity indicator was switched.
    ActivityIndicator(bool),

    /// A hardware fault.  Command-path faults also reset the protocol to
    /// Idle; sensor faults do not.
    Fault(crate::error::Error),
}
