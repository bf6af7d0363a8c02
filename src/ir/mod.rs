//! Infrared pulse transmitter and receiver.
//!
//! Both sides share one slot model: every byte is eight 100 µs slots,
//! least-significant bit first.  A `1` bit is a *mark* (carrier burst on
//! the LED, which the receiver's demodulator reports as a LOW level); a
//! `0` bit is a *space*.
//!
//! ```text
//!  byte 0b0000_0101   slot: 0    1    2    3 ...
//!  LED  (transmit)        ▌▌▌▌ ____ ▌▌▌▌ ____
//!  demodulator (receive)  ‾‾\__/‾‾‾‾\__/‾‾‾‾‾‾   (idle high, mark low)
//! ```

pub mod receiver;
pub mod timing;
pub mod transmitter;

use crate::app::commands::FRAME_LEN;

/// Fixed-capacity frame buffer (one IR code).
pub type Frame = heapless::Vec<u8, FRAME_LEN>;

/// Mark/space for each of the eight slots of `byte`, LSB first.
pub fn byte_slots(byte: u8) -> impl Iterator<Item = bool> {
    (0..8).map(move |bit| (byte >> bit) & 1 == 1)
}

/// Mark/space sequence for a whole buffer.
pub fn frame_slots(bytes: &[u8]) -> impl Iterator<Item = bool> + '_ {
    bytes.iter().flat_map(|&b| byte_slots(b))
}

/// Rebuild a byte from eight raw line levels (`true` = HIGH), LSB first,
/// then invert: the line idles high and a mark reads low.
pub fn assemble_byte(levels: [bool; 8]) -> u8 {
    let raw = levels
        .iter()
        .enumerate()
        .fold(0u8, |acc, (bit, &high)| acc | (u8::from(high) << bit));
    !raw
}
