//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (framing, payload cursors,
//! command encoding, negotiation, link supervision).
use thiserror_no_std::Error;

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Framing violations detected by the decoder. All of them are recovered
/// locally by resynchronising on the next sync byte.
pub enum FrameError {
    /// Declared payload length does not fit the receive buffer.
    #[error("Declared payload length {declared} exceeds capacity {capacity}")]
    OversizedPayload { declared: u16, capacity: usize },
    /// First checksum byte does not match accumulator A.
    #[error("Checksum A mismatch: expected {expected:#04x}, received {received:#04x}")]
    ChecksumA { expected: u8, received: u8 },
    /// Second checksum byte does not match accumulator B.
    #[error("Checksum B mismatch: expected {expected:#04x}, received {received:#04x}")]
    ChecksumB { expected: u8, received: u8 },
}

//==================================================================================BYTE_READER_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while reading little-endian fields from a payload.
pub enum ByteReaderError {
    /// Attempted to read past the end of the payload.
    #[error("Attempted to read out of bounds -> offset: {offset}, asked: {asked}, available: {available}")]
    OutOfBounds {
        offset: usize,
        asked: usize,
        available: usize,
    },
}

//==================================================================================BYTE_WRITER_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while laying little-endian fields into a buffer.
pub enum ByteWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
}

//================================================================================CODEC_ERROR
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while interpreting a received payload.
pub enum DeserializationError {
    /// Payload is shorter than the message layout requires.
    #[error("Invalid data length for {class:#04x}/{id:#04x}: expected at least {expected}, got {actual}")]
    InvalidDataLength {
        class: u8,
        id: u8,
        expected: usize,
        actual: usize,
    },
    /// Field read outside the payload.
    #[error("ByteReader error: {err}")]
    ByteReaderError { err: ByteReaderError },
}

impl From<ByteReaderError> for DeserializationError {
    fn from(err: ByteReaderError) -> Self {
        DeserializationError::ByteReaderError { err }
    }
}

impl DeserializationError {
    pub(crate) fn too_short(class: u8, id: u8, expected: usize, actual: usize) -> Self {
        Self::InvalidDataLength {
            class,
            id,
            expected,
            actual,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Issues encountered while serializing a command into the transmit buffer.
pub enum SerializationError {
    /// Provided buffer is too small for the command.
    #[error("Buffer too small")]
    BufferTooSmall,
    /// More GNSS blocks than the transmit buffer can describe.
    #[error("Too many GNSS blocks: {count}")]
    TooManyGnssBlocks { count: usize },
    /// Failed while writing fields into the buffer.
    #[error("ByteWriter error: {err}")]
    ByteWriterError { err: ByteWriterError },
}

impl From<ByteWriterError> for SerializationError {
    fn from(err: ByteWriterError) -> Self {
        SerializationError::ByteWriterError { err }
    }
}

//==================================================================================SEND_ERROR
#[derive(Debug, Error)]
/// Errors encountered when sending a configuration command (encode + transmit).
pub enum SendCommandError<E: core::fmt::Debug> {
    /// Command serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(SerializationError),
    /// Serial transport refused or failed to write the frame.
    #[error("Serial write error: {0:?}")]
    Send(E),
}

//==================================================================================NEGOTIATION_ERROR
#[derive(Debug, Error)]
/// Errors that stop the protocol task while it negotiates with the module.
pub enum NegotiationError<E: core::fmt::Debug> {
    /// Serial transport failed outside of a command transmission.
    #[error("Serial transport error: {0:?}")]
    Serial(E),

    /// A command that requires a positive acknowledgement was rejected.
    #[error("Command {class:#04x}/{id:#04x} rejected by the module")]
    Rejected { class: u8, id: u8 },

    /// Failed to encode or transmit a command.
    #[error(transparent)]
    Send(#[from] SendCommandError<E>),
}

//==================================================================================LINK_ERROR
#[derive(Debug, Error)]
/// Reasons a cooperative task terminates. The driver turns every one of
/// them into a communication-lost report followed by a full restart.
pub enum LinkError<E: core::fmt::Debug> {
    /// Receiver task could not read from the transport.
    #[error("Serial read error: {0:?}")]
    Receive(E),

    /// Protocol task ran past the ceiling of its current phase.
    #[error("Phase ceiling of {timeout_ms} ms exceeded")]
    WatchdogExpired { timeout_ms: u64 },

    /// Negotiation stopped on a transport or protocol failure.
    #[error(transparent)]
    Negotiation(#[from] NegotiationError<E>),
}
