//! Little-endian cursors over UBX payloads.
//! Every multi-byte UBX field is little-endian and byte aligned, so the
//! reader and writer only deal with whole bytes. Readers also allow random
//! access at a fixed offset, which is how message layouts are documented.
use crate::error::{ByteReaderError, ByteWriterError};

//==================================================================================BYTEREADER
/// Reader extracting little-endian fields from a `&[u8]` without copies.
pub struct ByteReader<'a> {
    /// Source payload.
    buffer: &'a [u8],
    /// Next byte to read.
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of the payload.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Current position in bytes.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Move the cursor to an absolute offset.
    pub fn seek(&mut self, offset: usize) -> Result<(), ByteReaderError> {
        if offset > self.buffer.len() {
            return Err(ByteReaderError::OutOfBounds {
                offset,
                asked: 0,
                available: self.buffer.len(),
            });
        }
        self.cursor = offset;
        Ok(())
    }

    /// Skip reserved bytes.
    pub fn advance(&mut self, len: usize) -> Result<(), ByteReaderError> {
        self.read_slice(len).map(|_| ())
    }

    /// Borrow `len` bytes from the cursor and advance past them.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ByteReaderError> {
        let end = self.cursor + len;
        if end > self.buffer.len() {
            return Err(ByteReaderError::OutOfBounds {
                offset: self.cursor,
                asked: len,
                available: self.remaining(),
            });
        }
        let slice = &self.buffer[self.cursor..end];
        self.cursor = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ByteReaderError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ByteReaderError> {
        self.read_array::<1>().map(|b| b[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ByteReaderError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, ByteReaderError> {
        self.read_array().map(i16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, ByteReaderError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, ByteReaderError> {
        self.read_array().map(i32::from_le_bytes)
    }
}

//==================================================================================BYTEWRITER
/// Writer laying little-endian fields into a `&mut [u8]`. Used to build
/// command payloads in the transmit buffer field by field.
pub struct ByteWriter<'a> {
    /// Target buffer.
    buffer: &'a mut [u8],
    /// Number of bytes written so far.
    cursor: usize,
}

impl<'a> ByteWriter<'a> {
    /// Create a writer positioned at the start of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Bytes written so far; the payload length once serialization ends.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Copy a slice at the cursor.
    pub fn write_slice(&mut self, slice: &[u8]) -> Result<(), ByteWriterError> {
        let end = self.cursor + slice.len();
        if end > self.buffer.len() {
            return Err(ByteWriterError::OutOfBounds {
                asked: slice.len(),
                available: self.buffer.len() - self.cursor,
            });
        }
        self.buffer[self.cursor..end].copy_from_slice(slice);
        self.cursor = end;
        Ok(())
    }

    /// Write `len` zero bytes (reserved fields).
    pub fn write_zeros(&mut self, len: usize) -> Result<(), ByteWriterError> {
        let end = self.cursor + len;
        if end > self.buffer.len() {
            return Err(ByteWriterError::OutOfBounds {
                asked: len,
                available: self.buffer.len() - self.cursor,
            });
        }
        self.buffer[self.cursor..end].fill(0);
        self.cursor = end;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), ByteWriterError> {
        self.write_slice(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), ByteWriterError> {
        self.write_slice(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), ByteWriterError> {
        self.write_slice(&value.to_le_bytes())
    }
}
