//! UBX checksum engine: an 8-bit Fletcher variant with two running
//! accumulators. For every byte, in wire order, `a += byte; b += a`
//! (both modulo 256).
//!
//! The same range is covered on both sides of the link: class, id, the two
//! length bytes and the payload. Sync bytes and the checksum itself are
//! excluded.

/// Running accumulator pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UbxChecksum {
    ck_a: u8,
    ck_b: u8,
}

impl UbxChecksum {
    /// Zeroed accumulators.
    pub const fn new() -> Self {
        Self { ck_a: 0, ck_b: 0 }
    }

    /// Accumulators as they stand after feeding `first` into a zeroed pair.
    /// The decoder starts every frame this way when it reads the class byte.
    pub const fn seeded(first: u8) -> Self {
        Self {
            ck_a: first,
            ck_b: first,
        }
    }

    /// Feed a single byte.
    #[inline]
    pub fn update_byte(&mut self, byte: u8) {
        self.ck_a = self.ck_a.wrapping_add(byte);
        self.ck_b = self.ck_b.wrapping_add(self.ck_a);
    }

    /// Feed a byte range, in order.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update_byte(byte);
        }
    }

    #[inline]
    pub const fn ck_a(&self) -> u8 {
        self.ck_a
    }

    #[inline]
    pub const fn ck_b(&self) -> u8 {
        self.ck_b
    }

    /// `(ck_a, ck_b)` in transmission order.
    pub const fn result(self) -> (u8, u8) {
        (self.ck_a, self.ck_b)
    }
}

/// Single-shot checksum of `bytes`.
pub fn checksum(bytes: &[u8]) -> (u8, u8) {
    let mut calc = UbxChecksum::new();
    calc.update(bytes);
    calc.result()
}
