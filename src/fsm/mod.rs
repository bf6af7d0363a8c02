//! Command protocol state machine.
//!
//! ```text
//!            ┌──────────── '?' on any unexpected byte ─────────────┐
//!            ▼                                                     │
//!   ┌──────────────┐ 't' ┌─────────────────────────┐ '1'..'4' ┌──────────────┐
//!   │     Idle     │────▶│ AwaitingTransmitChannel │─────────▶│ Transmitting │
//!   └──────────────┘     └─────────────────────────┘          └──────────────┘
//!     │ 'u'    │ 's'                  ▲                    last byte │
//!     ▼        ▼                      │ size                         ▼
//!  ┌──────────────────────┐ ┌─────────────────────┐            transmit, 'E',
//!  │ AwaitingTransmitSize │ │ AwaitingReceiveSize │            back to Idle
//!  └──────────────────────┘ └─────────────────────┘
//! ```
//!
//! The machine is pure: [`transition`] maps `(state, byte)` to the next
//! state plus one [`Action`] describing the side effect.  The
//! [`Controller`](crate::app::service::Controller) carries the action out
//! against real hardware.  Keeping the two apart makes totality (every
//! state answers every byte) checkable without any hardware in the loop.
//!
//! `u` / `AwaitingTransmitSize` and `s` / `AwaitingReceiveSize` exist only
//! under [`ProtocolVariant::Sized`]; in the canonical variant those bytes
//! are protocol errors like any other unknown command.

use crate::app::commands::{Command, FRAME_LEN, SIZE_UNIT, parse_channel};
use crate::config::ProtocolVariant;

/// Largest size byte a sized transmit accepts (15 * 16 = 240).
pub const MAX_TRANSMIT_SIZE: u8 = (FRAME_LEN / SIZE_UNIT) as u8;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Where the protocol is in a command sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolState {
    /// Waiting for a command byte.
    Idle,
    /// `u` acknowledged, expecting the size byte.
    AwaitingTransmitSize,
    /// Expecting the channel byte `'1'..='4'`.
    AwaitingTransmitChannel { length: usize },
    /// Filling the frame buffer; `filled` bytes stored so far.  The
    /// payload is always a full frame; only the first `length` bytes go
    /// out over IR.
    Transmitting { length: usize, filled: usize },
    /// `s` acknowledged, expecting the size byte.
    AwaitingReceiveSize,
}

impl ProtocolState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AwaitingTransmitSize => "AwaitingTransmitSize",
            Self::AwaitingTransmitChannel { .. } => "AwaitingTransmitChannel",
            Self::Transmitting { .. } => "Transmitting",
            Self::AwaitingReceiveSize => "AwaitingReceiveSize",
        }
    }

    /// True when both values are the same state, ignoring fill counters.
    pub fn same_kind(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

// ---------------------------------------------------------------------------
// Side effects
// ---------------------------------------------------------------------------

/// What the controller must do in response to one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Blink the generic LED once, reply `O`.
    Identify,
    /// Reply `Y`.
    Ack,
    /// Reply `Y` and reset the frame buffer.
    OpenFrame { channel: u8, length: usize },
    /// Store one payload byte.
    Append(u8),
    /// Store the final payload byte, transmit the first `length` bytes of
    /// the frame, reply `E`.
    AppendAndTransmit { byte: u8, length: usize },
    /// Reply `Y`,`S`, receive `length` bytes onto the transport, reply `E`.
    Receive { length: usize },
    /// Arm the proximity detector.
    ArmSensor,
    /// Switch the activity indicator.
    SetActivity(bool),
    /// Reply `?`.
    Reject,
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Total transition function: every `(state, byte)` pair has an answer.
pub fn transition(
    state: ProtocolState,
    byte: u8,
    variant: ProtocolVariant,
) -> (ProtocolState, Action) {
    use ProtocolState as S;

    const REJECT: (ProtocolState, Action) = (ProtocolState::Idle, Action::Reject);

    match state {
        S::Idle => match Command::from_byte(byte) {
            Some(cmd) if cmd.is_sized_extension() && variant != ProtocolVariant::Sized => REJECT,
            Some(Command::Led) => (S::Idle, Action::Identify),
            Some(Command::Transmit) => (
                S::AwaitingTransmitChannel { length: FRAME_LEN },
                Action::Ack,
            ),
            Some(Command::TransmitSized) => (S::AwaitingTransmitSize, Action::Ack),
            Some(Command::Receive) => (S::Idle, Action::Receive { length: FRAME_LEN }),
            Some(Command::ReceiveSized) => (S::AwaitingReceiveSize, Action::Ack),
            Some(Command::SensorStart) => (S::Idle, Action::ArmSensor),
            Some(Command::Active) => (S::Idle, Action::SetActivity(true)),
            Some(Command::Inactive) => (S::Idle, Action::SetActivity(false)),
            None => REJECT,
        },

        S::AwaitingTransmitSize => match byte {
            1..=MAX_TRANSMIT_SIZE => (
                S::AwaitingTransmitChannel {
                    length: usize::from(byte) * SIZE_UNIT,
                },
                Action::Ack,
            ),
            _ => REJECT,
        },

        S::AwaitingTransmitChannel { length } => match parse_channel(byte) {
            Some(channel) => (
                S::Transmitting { length, filled: 0 },
                Action::OpenFrame { channel, length },
            ),
            None => REJECT,
        },

        S::Transmitting { length, filled } => {
            let filled = filled + 1;
            if filled >= FRAME_LEN {
                (S::Idle, Action::AppendAndTransmit { byte, length })
            } else {
                (S::Transmitting { length, filled }, Action::Append(byte))
            }
        }

        S::AwaitingReceiveSize => match byte {
            0 => REJECT,
            n => (
                S::Idle,
                Action::Receive {
                    length: usize::from(n) * SIZE_UNIT,
                },
            ),
        },
    }
}

// ---------------------------------------------------------------------------
// Stateful wrapper
// ---------------------------------------------------------------------------

/// The single protocol instance owned by the controller.
pub struct CommandProtocol {
    state: ProtocolState,
    variant: ProtocolVariant,
}

impl CommandProtocol {
    pub fn new(variant: ProtocolVariant) -> Self {
        Self {
            state: ProtocolState::Idle,
            variant,
        }
    }

    /// Consume one byte: advance the state and return the side effect.
    pub fn step(&mut self, byte: u8) -> Action {
        let (next, action) = transition(self.state, byte, self.variant);
        self.state = next;
        action
    }

    /// Force the machine back to Idle (used after a hardware fault).
    pub fn reset(&mut self) {
        self.state = ProtocolState::Idle;
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    pub fn variant(&self) -> ProtocolVariant {
        self.variant
    }
}
