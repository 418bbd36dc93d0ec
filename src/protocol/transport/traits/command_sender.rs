//! `SerialPort` extension providing a high-level API to send UBX commands:
//! it serializes the command into a stack buffer, frames it, writes it to the
//! port and registers it with the acknowledgement tracker.
use crate::{
    core::MAX_COMMAND_FRAME,
    error::SendCommandError,
    infra::codec::traits::UbxCommand,
    protocol::negotiation::ack_tracker::AckTracker,
    protocol::transport::encoder::encode_command,
    protocol::transport::traits::serial_port::SerialPort,
};

/// Trait extending `SerialPort` with command-sending helpers.
pub trait CommandSender: SerialPort {
    /// Encode and transmit `command`, then start waiting for its reply.
    ///
    /// Any previously tracked command is abandoned, even if the write fails.
    ///
    /// # Errors
    ///
    /// - [`SendCommandError::Serialization`] when the command does not fit the
    ///   transmit buffer
    /// - [`SendCommandError::Send`] when the port refuses the bytes
    fn send_command<C: UbxCommand>(
        &mut self,
        command: &C,
        tracker: &mut AckTracker,
    ) -> Result<(), SendCommandError<Self::Error>>;
}

impl<S: SerialPort> CommandSender for S {
    fn send_command<C: UbxCommand>(
        &mut self,
        command: &C,
        tracker: &mut AckTracker,
    ) -> Result<(), SendCommandError<Self::Error>> {
        let mut frame = [0u8; MAX_COMMAND_FRAME];
        let len =
            encode_command(command, &mut frame).map_err(SendCommandError::Serialization)?;

        tracker.begin(C::ID);

        #[cfg(feature = "defmt")]
        defmt::debug!("Sending {=u8:#x}/{=u8:#x} ({=usize} bytes)", C::CLASS, C::ID, len);

        self.write(&frame[..len]).map_err(SendCommandError::Send)
    }
}
