//! Infrastructure shared by the protocol layers: checksum engine and
//! payload cursors.
pub mod codec;
