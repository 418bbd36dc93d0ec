//! `ublox-nav` library: a receiver-side driver for u-blox modules speaking the
//! UBX binary protocol in a `no_std` environment. The crate exposes the
//! infrastructure modules (checksum, byte codec), the protocol logic (frame
//! decoding, navigation solution, configuration negotiation) and a polled
//! driver that ties them to a serial transport.
#![no_std]
//==================================================================================
/// Protocol constants and fixed-capacity buffers shared by every layer.
pub mod core;
/// Runtime settings applied while negotiating with the module.
pub mod config;
/// Framing, codec, negotiation and link errors.
pub mod error;
/// Checksum engine and little-endian payload cursors.
pub mod infra;
/// UBX protocol implementation: transport, messages, navigation solution,
/// negotiation sequencer and the driver itself.
pub mod protocol;
//==================================================================================

pub use crate::config::DriverConfig;
pub use crate::protocol::driver::{LinkStatus, UbxDriver};
pub use crate::protocol::navigation::{FixType, NavSolution};
