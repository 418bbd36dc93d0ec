//! UBX frame decoder: turns the serial byte stream into checksum-verified
//! `(class, id, payload)` frames, one state transition per input byte.
//!
//! The decoder never backtracks. Any protocol violation (oversized length,
//! checksum mismatch) is counted and recovered by returning to the sync
//! search; nothing is ever surfaced as fatal. Reads may be split at any
//! byte boundary.
use crate::core::{PayloadBytes, MAX_UBX_PAYLOAD, SYNC_CHAR_1, SYNC_CHAR_2};
use crate::error::FrameError;
use crate::infra::codec::checksum::UbxChecksum;

//==================================================================================Enums and Structs
/// Position of the decoder inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeStep {
    SyncChar1,
    SyncChar2,
    Class,
    Id,
    LengthLow,
    LengthHigh,
    Payload,
    ChecksumA,
    ChecksumB,
}

/// Verified frame borrowed from the decoder's payload buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    pub class: u8,
    pub id: u8,
    pub payload: &'a [u8],
}

/// Outcome of feeding a single byte.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeResult<'a> {
    /// Byte consumed, frame not complete yet (or sync search in progress).
    Pending,
    /// Frame verified and ready to dispatch. The view is valid until the
    /// next byte is fed.
    Frame(FrameRef<'a>),
    /// Frame verified but flagged to be skipped; counted, not dispatched.
    /// Unreachable through `feed` as written: the flag is only raised on a
    /// checksum A mismatch, which resyncs, and the next sync byte clears it.
    Skipped,
    /// Framing violation; the decoder is back to the sync search.
    Rejected(FrameError),
}

/// Counters exposed for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Frames whose checksum verified.
    pub packets: u32,
    /// Oversized lengths and checksum mismatches.
    pub errors: u32,
}

/// Byte-at-a-time UBX frame state machine.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    step: DecodeStep,
    class: u8,
    id: u8,
    declared_len: u16,
    consumed: u16,
    payload: PayloadBytes<MAX_UBX_PAYLOAD>,
    checksum: UbxChecksum,
    skip_packet: bool,
    stats: DecoderStats,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Instantiate a decoder searching for the first sync byte.
    pub const fn new() -> Self {
        Self {
            step: DecodeStep::SyncChar1,
            class: 0,
            id: 0,
            declared_len: 0,
            consumed: 0,
            payload: PayloadBytes::new(),
            checksum: UbxChecksum::new(),
            skip_packet: false,
            stats: DecoderStats {
                packets: 0,
                errors: 0,
            },
        }
    }

    /// Current state, mostly useful to tests and diagnostics.
    pub fn step(&self) -> DecodeStep {
        self.step
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Drop any partial frame and counters.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    //==================================================================================Process Functions
    /// Feed one byte from the transport.
    pub fn feed(&mut self, byte: u8) -> DecodeResult<'_> {
        match self.step {
            DecodeStep::SyncChar1 => {
                if byte == SYNC_CHAR_1 {
                    self.skip_packet = false;
                    self.step = DecodeStep::SyncChar2;
                }
            }
            DecodeStep::SyncChar2 => {
                // A mismatching byte is dropped, not retried as sync 1.
                self.step = if byte == SYNC_CHAR_2 {
                    DecodeStep::Class
                } else {
                    DecodeStep::SyncChar1
                };
            }
            DecodeStep::Class => {
                self.class = byte;
                self.checksum = UbxChecksum::seeded(byte);
                self.step = DecodeStep::Id;
            }
            DecodeStep::Id => {
                self.checksum.update_byte(byte);
                self.id = byte;
                self.step = DecodeStep::LengthLow;
            }
            DecodeStep::LengthLow => {
                self.checksum.update_byte(byte);
                self.declared_len = byte as u16;
                self.step = DecodeStep::LengthHigh;
            }
            DecodeStep::LengthHigh => {
                self.checksum.update_byte(byte);
                self.declared_len |= (byte as u16) << 8;

                if self.declared_len as usize > MAX_UBX_PAYLOAD {
                    return self.reject(FrameError::OversizedPayload {
                        declared: self.declared_len,
                        capacity: MAX_UBX_PAYLOAD,
                    });
                }

                self.consumed = 0;
                self.payload.clear();
                self.step = if self.declared_len == 0 {
                    DecodeStep::ChecksumA
                } else {
                    DecodeStep::Payload
                };
            }
            DecodeStep::Payload => {
                self.checksum.update_byte(byte);
                // Bytes past capacity are checksummed but never stored.
                self.payload.store(self.consumed as usize, byte);
                // Compare before incrementing so a length of 0xFFFF cannot wrap.
                if self.consumed == self.declared_len - 1 {
                    self.step = DecodeStep::ChecksumA;
                }
                self.consumed = self.consumed.wrapping_add(1);
            }
            DecodeStep::ChecksumA => {
                let expected = self.checksum.ck_a();
                if byte != expected {
                    self.skip_packet = true;
                    return self.reject(FrameError::ChecksumA {
                        expected,
                        received: byte,
                    });
                }
                self.step = DecodeStep::ChecksumB;
            }
            DecodeStep::ChecksumB => {
                let expected = self.checksum.ck_b();
                if byte != expected {
                    return self.reject(FrameError::ChecksumB {
                        expected,
                        received: byte,
                    });
                }

                self.step = DecodeStep::SyncChar1;
                self.stats.packets = self.stats.packets.wrapping_add(1);

                if self.skip_packet {
                    return DecodeResult::Skipped;
                }

                #[cfg(feature = "defmt")]
                defmt::trace!(
                    "UBX frame {=u8:#x}/{=u8:#x} ({=u16} bytes)",
                    self.class,
                    self.id,
                    self.declared_len
                );

                return DecodeResult::Frame(FrameRef {
                    class: self.class,
                    id: self.id,
                    payload: self.payload.as_slice(),
                });
            }
        }

        DecodeResult::Pending
    }

    /// Count the violation and restart the sync search.
    fn reject(&mut self, error: FrameError) -> DecodeResult<'_> {
        #[cfg(feature = "defmt")]
        defmt::debug!("UBX framing error: {}", error);

        self.stats.errors = self.stats.errors.wrapping_add(1);
        self.step = DecodeStep::SyncChar1;
        DecodeResult::Rejected(error)
    }
}
