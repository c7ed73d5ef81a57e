//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads the
//! big-endian Bento wire format from a byte slice without copying.

use byteorder::{BigEndian, ByteOrder};

use crate::{Error, Result, TypeTag};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// All multi-byte values are read in network (big-endian) byte order.
///
/// # Example
///
/// ```
/// use bento_common::BinaryReader;
///
/// let data = [0x00, 0x00, 0x00, 0x2A, 0x03, b'a', b'g', b'e'];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_i32().unwrap(), 42);
/// assert_eq!(reader.read_dyn_str().unwrap(), "age");
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Skip `count` bytes, failing if fewer remain.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Split off a reader over the next `count` bytes and advance past them.
    ///
    /// The sub-reader cannot read beyond its window, which keeps a framed
    /// payload from consuming its neighbours.
    pub fn sub_reader(&mut self, count: usize) -> Result<BinaryReader<'a>> {
        self.read_bytes(count).map(BinaryReader::new)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Read a boolean (non-zero = true).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Read a big-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_bytes(2).map(BigEndian::read_u16)
    }

    /// Read a big-endian i16.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_bytes(2).map(BigEndian::read_i16)
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bytes(4).map(BigEndian::read_u32)
    }

    /// Read a big-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_bytes(4).map(BigEndian::read_i32)
    }

    /// Read a big-endian u64.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_bytes(8).map(BigEndian::read_u64)
    }

    /// Read a big-endian i64.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_bytes(8).map(BigEndian::read_i64)
    }

    /// Read a big-endian IEEE-754 f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_bytes(4).map(BigEndian::read_f32)
    }

    /// Read a big-endian IEEE-754 f64.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_bytes(8).map(BigEndian::read_f64)
    }

    /// Read a dynamic length (1, 3, 5 or 9 bytes).
    pub fn read_length(&mut self) -> Result<u64> {
        match self.read_u8()? {
            crate::length::LEAD_U16 => self.read_u16().map(u64::from),
            crate::length::LEAD_U32 => self.read_u32().map(u64::from),
            crate::length::LEAD_U64 => self.read_u64(),
            inline => Ok(u64::from(inline)),
        }
    }

    /// Read a dynamic length that must address bytes in memory.
    pub fn read_length_usize(&mut self) -> Result<usize> {
        let length = self.read_length()?;
        usize::try_from(length).map_err(|_| Error::LengthOverflow(length))
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_dyn_str(&mut self) -> Result<&'a str> {
        let length = self.read_length_usize()?;
        let bytes = self.read_bytes(length)?;
        std::str::from_utf8(bytes).map_err(Error::Utf8)
    }

    /// Read a 4-byte type tag.
    pub fn read_tag(&mut self) -> Result<TypeTag> {
        let bytes = self.read_bytes(TypeTag::LEN)?;
        Ok(TypeTag::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x01020304
            0xFF, 0xFF, 0xFF, 0xFE, // i32: -2
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x01020304);
        assert_eq!(reader.read_i32().unwrap(), -2);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_dyn_str() {
        let data = b"\x05hello\x05world";
        let mut reader = BinaryReader::new(data);

        assert_eq!(reader.read_dyn_str().unwrap(), "hello");
        assert_eq!(reader.read_dyn_str().unwrap(), "world");
    }

    #[test]
    fn test_sub_reader_is_bounded() {
        let data = [0x00, 0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);

        let mut window = reader.sub_reader(2).unwrap();
        assert_eq!(window.read_u16().unwrap(), 0x0001);
        assert!(window.read_u8().is_err());
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.read_u8().unwrap(), 0x02);
    }

    #[test]
    fn test_read_tag() {
        let mut reader = BinaryReader::new(b"s32 ");
        assert_eq!(reader.read_tag().unwrap(), TypeTag::new("s32"));
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof { needed: 4, available: 2 })
        ));
    }
}
