//! Public traits exposed by the codec layer. They decouple the typed UBX
//! message structures from framing and provide a uniform API to the
//! negotiation and navigation layers.
use crate::error::{DeserializationError, SerializationError};

//==================================================================================UBX_COMMAND
/// Implemented by every command the driver sends to the module.
///
/// The encoder wraps the payload produced by `to_payload` with the header
/// and checksum; implementations only lay out their own fields.
pub trait UbxCommand {
    /// Message class written in the frame header.
    const CLASS: u8;
    /// Message id written in the frame header and tracked for acknowledgement.
    const ID: u8;

    /// Serialize the payload into `buffer` and return the number of bytes written.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError>;
}

//==================================================================================FROM_PAYLOAD
/// Deserialize a verified frame payload into a typed message.
///
/// Layouts are fixed offsets into the payload; extra trailing bytes are
/// tolerated so that newer firmware revisions still decode. Layouts that
/// keep text fields borrow them from the payload for `'a`.
pub trait FromPayload<'a>: Sized {
    /// Message class this layout belongs to.
    const CLASS: u8;
    /// Message id this layout belongs to.
    const ID: u8;
    /// Shortest payload the layout can be read from.
    const MIN_LEN: usize;

    /// Deserialize a byte slice to produce a new instance.
    fn from_payload(payload: &'a [u8]) -> Result<Self, DeserializationError>;

    /// Reject payloads shorter than `MIN_LEN`.
    fn check_len(payload: &[u8]) -> Result<(), DeserializationError> {
        if payload.len() < Self::MIN_LEN {
            return Err(DeserializationError::too_short(
                Self::CLASS,
                Self::ID,
                Self::MIN_LEN,
                payload.len(),
            ));
        }
        Ok(())
    }
}
