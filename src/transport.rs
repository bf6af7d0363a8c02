//! Transport abstraction: the byte channel to the host relay.
//!
//! In production this is the command UART; on the host it is a simulated
//! FIFO (see [`crate::sim`]).  The controller is generic over `Transport`,
//! so swapping the physical link requires no change to the protocol code.

use log::warn;

use crate::error::TransportError;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;

    /// Take one pending byte, if any.  Never blocks.
    fn read_byte(&mut self) -> Result<Option<u8>, TransportError> {
        if !self.available() {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) => {
                warn!("transport read failed: {:?}", e);
                Err(TransportError::ReadFailed)
            }
        }
    }

    /// Write every byte of `data`, retrying short writes.
    fn write_all(&mut self, mut data: &[u8]) -> Result<(), TransportError> {
        while !data.is_empty() {
            match self.write(data) {
                Ok(0) => return Err(TransportError::WriteFailed),
                Ok(n) => data = &data[n..],
                Err(e) => {
                    warn!("transport write failed: {:?}", e);
                    return Err(TransportError::WriteFailed);
                }
            }
        }
        Ok(())
    }
}
