//! Wire vocabulary of the command transport.
//!
//! Single ASCII bytes in both directions.  The remote-control half is
//! compatible with the Buffalo PC-OP-RS1 "RemoteStation" serial protocol;
//! the sensor half (`q`, `a`, `b`, `P`) is specific to this board.

/// Canonical frame length in bytes (one IR code).
pub const FRAME_LEN: usize = 240;

/// The sized variant's length byte is multiplied by this.
pub const SIZE_UNIT: usize = 16;

/// Replies written by the controller.
pub mod reply {
    /// Transmit or receive finished.
    pub const DATA_COMPLETION: u8 = b'E';
    /// Acknowledges `i`.
    pub const LED_OK: u8 = b'O';
    /// Decoded bytes follow.
    pub const RECEIVE_DATA: u8 = b'S';
    /// Generic acknowledgement.
    pub const OK: u8 = b'Y';
    /// Unsolicited: the proximity detector fired.
    pub const SENSOR_DETECTED: u8 = b'P';
    /// Byte not valid in the current state.
    pub const PROTOCOL_ERROR: u8 = b'?';
}

/// Command bytes accepted in the Idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `i`: blink and answer `O`.
    Led,
    /// `t`: fixed-length transmit.
    Transmit,
    /// `u`: sized transmit (sized variant only).
    TransmitSized,
    /// `r`: fixed-length receive.
    Receive,
    /// `s`: sized receive (sized variant only).
    ReceiveSized,
    /// `q`: arm the proximity detector.
    SensorStart,
    /// `a`: activity indicator on.
    Active,
    /// `b`: activity indicator off.
    Inactive,
}

impl Command {
    /// Decode an Idle-state byte.  `None` for anything unknown.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'i' => Some(Self::Led),
            b't' => Some(Self::Transmit),
            b'u' => Some(Self::TransmitSized),
            b'r' => Some(Self::Receive),
            b's' => Some(Self::ReceiveSized),
            b'q' => Some(Self::SensorStart),
            b'a' => Some(Self::Active),
            b'b' => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Whether the command belongs to the sized protocol extension.
    pub fn is_sized_extension(self) -> bool {
        matches!(self, Self::TransmitSized | Self::ReceiveSized)
    }
}

/// Transmit channel selector `'1'..='4'` → 1..=4.
pub fn parse_channel(byte: u8) -> Option<u8> {
    match byte {
        b'1'..=b'4' => Some(byte - b'0'),
        _ => None,
    }
}
