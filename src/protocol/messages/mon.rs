//! MON-VER: receiver and software version strings, plus the empty poll
//! request that triggers it.
//!
//! Payload layout (all text fields NUL padded):
//! ```text
//! [0..30)   swVersion
//! [30..40)  hwVersion
//! [40..)    extension strings, 30 bytes each
//! ```
use crate::core::{class, msg};
use crate::error::{DeserializationError, SerializationError};
use crate::infra::codec::traits::{FromPayload, UbxCommand};

/// Length of the software version slot.
pub const SW_VERSION_LEN: usize = 30;
/// Length of the hardware version slot.
pub const HW_VERSION_LEN: usize = 10;
/// Offset of the first extension string.
pub const EXTENSIONS_OFFSET: usize = SW_VERSION_LEN + HW_VERSION_LEN;
/// Length of each extension string slot.
pub const EXTENSION_LEN: usize = 30;

/// Version report borrowed from the receive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonVer<'a> {
    pub sw_version: &'a [u8],
    pub hw_version: &'a [u8],
    /// Raw extension area; may be empty or end with a partial slot.
    pub extensions: &'a [u8],
}

impl<'a> MonVer<'a> {
    /// Hardware version up to its NUL terminator.
    pub fn hw_version_text(&self) -> &'a [u8] {
        until_nul(self.hw_version)
    }

    /// Iterate over the extension slots, each cut at its NUL terminator.
    pub fn extensions(&self) -> impl Iterator<Item = &'a [u8]> {
        self.extensions.chunks(EXTENSION_LEN).map(until_nul)
    }
}

/// Text content of a NUL-padded slot.
pub fn until_nul(slot: &[u8]) -> &[u8] {
    match slot.iter().position(|&b| b == 0) {
        Some(end) => &slot[..end],
        None => slot,
    }
}

impl<'a> FromPayload<'a> for MonVer<'a> {
    const CLASS: u8 = class::MON;
    const ID: u8 = msg::mon::VER;
    const MIN_LEN: usize = EXTENSIONS_OFFSET;

    fn from_payload(payload: &'a [u8]) -> Result<Self, DeserializationError> {
        Self::check_len(payload)?;
        Ok(Self {
            sw_version: &payload[..SW_VERSION_LEN],
            hw_version: &payload[SW_VERSION_LEN..EXTENSIONS_OFFSET],
            extensions: &payload[EXTENSIONS_OFFSET..],
        })
    }
}

/// Empty MON-VER request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonVerPoll;

impl UbxCommand for MonVerPoll {
    const CLASS: u8 = class::MON;
    const ID: u8 = msg::mon::VER;

    fn to_payload(&self, _buffer: &mut [u8]) -> Result<usize, SerializationError> {
        Ok(0)
    }
}
