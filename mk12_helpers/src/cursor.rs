//! Bounds-checked cursor over an in-memory byte slice.
//!
//! Asset export blobs are deserialized fully in memory. Every read is bounds
//! checked and every seek is validated, so a malformed blob surfaces as an
//! error instead of a panic.

use std::io::SeekFrom;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::CursorError;

/// A seekable reader over a borrowed byte slice.
///
/// The offset always stays within `[0, len]`. Reads that would cross the end
/// of the buffer fail with [`CursorError::ShortRead`], seeks that would land
/// outside fail with [`CursorError::SeekOutOfBounds`].
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a new `ByteCursor` at offset 0
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, offset: 0 }
    }

    /// Current offset
    pub fn position(&self) -> u64 {
        self.offset as u64
    }

    /// Total buffer size
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the offset and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Whether the offset reached the end of the buffer
    pub fn eof(&self) -> bool {
        self.offset == self.data.len()
    }

    /// Move the offset. The target must land inside `[0, len]`.
    pub fn seek(&mut self, style: SeekFrom) -> Result<u64, CursorError> {
        let target = match style {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::Current(offset) => self.offset as i64 + offset,
            SeekFrom::End(offset) => self.data.len() as i64 + offset,
        };
        if target < 0 || target > self.data.len() as i64 {
            return Err(CursorError::SeekOutOfBounds(target, self.data.len()));
        }
        self.offset = target as usize;
        Ok(self.offset as u64)
    }

    /// Read exactly `size` bytes, advancing the offset
    pub fn read(&mut self, size: usize) -> Result<&'a [u8], CursorError> {
        if size > self.remaining() {
            return Err(CursorError::ShortRead {
                requested: size,
                offset: self.offset,
                size: self.data.len(),
            });
        }
        let data = &self.data[self.offset..self.offset + size];
        self.offset += size;
        Ok(data)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.read(1)?[0])
    }

    /// Read a little-endian u16
    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        Ok(LittleEndian::read_u16(self.read(2)?))
    }

    /// Read a big-endian u16. The name table length prefixes use this.
    pub fn read_u16_be(&mut self) -> Result<u16, CursorError> {
        Ok(BigEndian::read_u16(self.read(2)?))
    }

    /// Read a little-endian u32
    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        Ok(LittleEndian::read_u32(self.read(4)?))
    }

    /// Read a little-endian i32
    pub fn read_i32(&mut self) -> Result<i32, CursorError> {
        Ok(LittleEndian::read_i32(self.read(4)?))
    }

    /// Read a little-endian u64
    pub fn read_u64(&mut self) -> Result<u64, CursorError> {
        Ok(LittleEndian::read_u64(self.read(8)?))
    }

    /// Read a little-endian i64
    pub fn read_i64(&mut self) -> Result<i64, CursorError> {
        Ok(LittleEndian::read_i64(self.read(8)?))
    }

    /// Read a little-endian f32
    pub fn read_f32(&mut self) -> Result<f32, CursorError> {
        Ok(LittleEndian::read_f32(self.read(4)?))
    }

    /// Read a little-endian f64
    pub fn read_f64(&mut self) -> Result<f64, CursorError> {
        Ok(LittleEndian::read_f64(self.read(8)?))
    }

    /// Read an unsigned little-endian integer of `width` ∈ {1, 2, 4, 8} bytes
    pub fn read_uint(&mut self, width: usize) -> Result<u64, CursorError> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(CursorError::UnsupportedWidth(width));
        }
        Ok(LittleEndian::read_uint(self.read(width)?, width))
    }

    /// Read a signed little-endian integer of `width` ∈ {1, 2, 4, 8} bytes
    pub fn read_int(&mut self, width: usize) -> Result<i64, CursorError> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(CursorError::UnsupportedWidth(width));
        }
        Ok(LittleEndian::read_int(self.read(width)?, width))
    }
}
