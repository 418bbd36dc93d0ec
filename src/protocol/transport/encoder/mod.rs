//! Command frame encoder: wraps a serialized payload with the sync bytes,
//! header and checksum, entirely inside a caller-provided buffer.
use crate::core::{SYNC_CHAR_1, SYNC_CHAR_2, UBX_CHECKSUM_LEN, UBX_HEADER_LEN};
use crate::error::SerializationError;
use crate::infra::codec::checksum::UbxChecksum;
use crate::infra::codec::traits::UbxCommand;

/// Serialize `command` as a complete frame into `buffer`.
///
/// Returns the number of bytes to transmit.
pub fn encode_command<C: UbxCommand>(
    command: &C,
    buffer: &mut [u8],
) -> Result<usize, SerializationError> {
    if buffer.len() < UBX_HEADER_LEN + UBX_CHECKSUM_LEN {
        return Err(SerializationError::BufferTooSmall);
    }
    let payload_capacity = buffer.len() - UBX_HEADER_LEN - UBX_CHECKSUM_LEN;
    let payload_len = command
        .to_payload(&mut buffer[UBX_HEADER_LEN..UBX_HEADER_LEN + payload_capacity])?;
    finish_frame(C::CLASS, C::ID, payload_len, buffer)
}

/// Build a frame around an already serialized payload.
pub fn encode_frame(
    class: u8,
    id: u8,
    payload: &[u8],
    buffer: &mut [u8],
) -> Result<usize, SerializationError> {
    let total = UBX_HEADER_LEN + payload.len() + UBX_CHECKSUM_LEN;
    if buffer.len() < total {
        return Err(SerializationError::BufferTooSmall);
    }
    buffer[UBX_HEADER_LEN..UBX_HEADER_LEN + payload.len()].copy_from_slice(payload);
    finish_frame(class, id, payload.len(), buffer)
}

/// Write header and checksum around a payload already sitting at
/// `buffer[UBX_HEADER_LEN..]`.
fn finish_frame(
    class: u8,
    id: u8,
    payload_len: usize,
    buffer: &mut [u8],
) -> Result<usize, SerializationError> {
    let length = u16::try_from(payload_len).map_err(|_| SerializationError::BufferTooSmall)?;
    let payload_end = UBX_HEADER_LEN + payload_len;
    let total = payload_end + UBX_CHECKSUM_LEN;
    if buffer.len() < total {
        return Err(SerializationError::BufferTooSmall);
    }

    let [len_lo, len_hi] = length.to_le_bytes();
    buffer[..UBX_HEADER_LEN].copy_from_slice(&[SYNC_CHAR_1, SYNC_CHAR_2, class, id, len_lo, len_hi]);

    // Class through the last payload byte; sync bytes are excluded.
    let mut checksum = UbxChecksum::new();
    checksum.update(&buffer[2..payload_end]);
    let (ck_a, ck_b) = checksum.result();
    buffer[payload_end] = ck_a;
    buffer[payload_end + 1] = ck_b;

    Ok(total)
}
