//! ACK class payloads: positive and negative acknowledgement of a CFG command.
use crate::core::{class, msg};
use crate::error::DeserializationError;
use crate::infra::codec::bytes::ByteReader;
use crate::infra::codec::traits::FromPayload;

/// ACK-ACK: the module accepted `(cls_id, msg_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AckAck {
    pub cls_id: u8,
    pub msg_id: u8,
}

/// ACK-NAK: the module rejected `(cls_id, msg_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AckNak {
    pub cls_id: u8,
    pub msg_id: u8,
}

fn read_pair(payload: &[u8]) -> Result<(u8, u8), DeserializationError> {
    let mut reader = ByteReader::new(payload);
    Ok((reader.read_u8()?, reader.read_u8()?))
}

impl FromPayload<'_> for AckAck {
    const CLASS: u8 = class::ACK;
    const ID: u8 = msg::ack::ACK;
    const MIN_LEN: usize = 2;

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        let (cls_id, msg_id) = read_pair(payload)?;
        Ok(Self { cls_id, msg_id })
    }
}

impl FromPayload<'_> for AckNak {
    const CLASS: u8 = class::ACK;
    const ID: u8 = msg::ack::NAK;
    const MIN_LEN: usize = 2;

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        let (cls_id, msg_id) = read_pair(payload)?;
        Ok(Self { cls_id, msg_id })
    }
}
