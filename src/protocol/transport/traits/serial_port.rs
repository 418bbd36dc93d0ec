//! Minimal abstraction for a non-blocking UART. Allows the driver to plug
//! into any HAL (embedded peripheral, desktop serial port, test double).
use crate::config::BaudRate;

/// Contract to exchange bytes with the module without blocking the caller.
pub trait SerialPort {
    type Error: core::fmt::Debug;
    /// Number of received bytes that can be read right now.
    fn bytes_waiting(&self) -> usize;
    /// Pop one received byte. Only called while `bytes_waiting() > 0`.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
    /// Queue bytes for transmission.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
    /// `true` once every queued byte has left the transmitter.
    fn is_tx_empty(&self) -> bool;
    /// Reconfigure the line speed.
    fn set_baud_rate(&mut self, baud_rate: BaudRate) -> Result<(), Self::Error>;
}
