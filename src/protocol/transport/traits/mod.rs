//! Abstraction traits used by the transport layer (serial port, clock,
//! command sender and async timer).
pub mod command_sender;
pub mod driver_timer;
pub mod serial_port;
pub mod ubx_clock;
