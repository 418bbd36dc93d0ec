//! Byte-level codec primitives. Everything above this module works on typed
//! messages; everything here works on raw little-endian bytes.
pub mod bytes;
pub mod checksum;
pub mod traits;
