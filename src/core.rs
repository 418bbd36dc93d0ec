//! UBX wire constants and the fixed-capacity buffers used on both sides of
//! the link.
//!
//! Frame layout:
//! ```text
//! [0xB5][0x62][class][id][len lo][len hi][payload ...][ck_a][ck_b]
//! ```
//! The checksum covers `class` through the last payload byte.

/// First synchronisation byte of every frame.
pub const SYNC_CHAR_1: u8 = 0xB5;
/// Second synchronisation byte of every frame.
pub const SYNC_CHAR_2: u8 = 0x62;
/// Sync bytes, class, id and the two length bytes.
pub const UBX_HEADER_LEN: usize = 6;
/// Trailing checksum bytes.
pub const UBX_CHECKSUM_LEN: usize = 2;

/// Largest payload the receive buffer accepts. Longer frames are dropped
/// by the decoder without touching the buffer.
pub const MAX_UBX_PAYLOAD: usize = 256;

/// Number of GNSS configuration blocks the transmit buffer can hold.
pub const MAX_GNSS_BLOCKS: usize = 7;
/// CFG-GNSS header followed by `MAX_GNSS_BLOCKS` eight-byte blocks; the
/// largest command this driver ever sends.
pub const MAX_COMMAND_PAYLOAD: usize = 4 + 8 * MAX_GNSS_BLOCKS;
/// Transmit buffer size: header, largest payload, checksum.
pub const MAX_COMMAND_FRAME: usize = UBX_HEADER_LEN + MAX_COMMAND_PAYLOAD + UBX_CHECKSUM_LEN;

/// Message classes used by the driver.
pub mod class {
    pub const NAV: u8 = 0x01;
    pub const ACK: u8 = 0x05;
    pub const CFG: u8 = 0x06;
    pub const MON: u8 = 0x0A;
    /// Class of the legacy NMEA text sentences, as addressed by CFG-MSG.
    pub const NMEA: u8 = 0xF0;
}

/// Message identifiers, grouped by class.
pub mod msg {
    pub mod nav {
        pub const POSLLH: u8 = 0x02;
        pub const STATUS: u8 = 0x03;
        pub const SOL: u8 = 0x06;
        pub const PVT: u8 = 0x07;
        pub const VELNED: u8 = 0x12;
        pub const TIMEUTC: u8 = 0x21;
        pub const SVINFO: u8 = 0x30;
        pub const SAT: u8 = 0x35;
        /// u-blox firmware reuses the SAT identifier for the signal variant.
        pub const SIG: u8 = 0x35;
    }
    pub mod ack {
        pub const NAK: u8 = 0x00;
        pub const ACK: u8 = 0x01;
    }
    pub mod cfg {
        pub const MSG: u8 = 0x01;
        pub const RATE: u8 = 0x08;
        pub const SBAS: u8 = 0x16;
        pub const NAV5: u8 = 0x24;
        pub const GNSS: u8 = 0x3E;
    }
    pub mod mon {
        pub const VER: u8 = 0x04;
    }
    pub mod nmea {
        pub const GGA: u8 = 0x00;
        pub const GLL: u8 = 0x01;
        pub const GSA: u8 = 0x02;
        pub const GSV: u8 = 0x03;
        pub const RMC: u8 = 0x04;
        pub const VTG: u8 = 0x05;
    }
}

/// Fixed-capacity byte buffer holding a frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBytes<const N: usize> {
    len: usize,
    data: [u8; N],
}

impl<const N: usize> Default for PayloadBytes<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PayloadBytes<N> {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self { len: 0, data: [0; N] }
    }

    /// Reset the buffer. Stored bytes are left in place and overwritten later.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Store `byte` at `index` if it fits; returns `false` when the index is
    /// beyond capacity. `len` grows to cover the written index.
    #[inline]
    pub fn store(&mut self, index: usize, byte: u8) -> bool {
        if index >= N {
            return false;
        }
        self.data[index] = byte;
        if index >= self.len {
            self.len = index + 1;
        }
        true
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}
