//! Big-endian writing helpers for the Bento wire format.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::length::{encode_length, length_size};
use crate::{Result, TypeTag};

/// Extension of [`Write`] with the framing primitives of the wire format.
///
/// Fixed-width values are written in network byte order.
pub trait WriteExt: Write {
    /// Write a dynamic length in its smallest form.
    fn write_length(&mut self, value: u64) -> Result<()> {
        encode_length(self, value)
    }

    /// Write a length-prefixed UTF-8 string.
    fn write_dyn_str(&mut self, value: &str) -> Result<()> {
        encode_length(self, value.len() as u64)?;
        self.write_all(value.as_bytes())?;
        Ok(())
    }

    /// Write a 4-byte type tag.
    fn write_tag(&mut self, tag: TypeTag) -> Result<()> {
        self.write_all(tag.as_bytes())?;
        Ok(())
    }

    /// Write a big-endian signed 32-bit count.
    fn write_count(&mut self, value: i32) -> Result<()> {
        self.write_i32::<BigEndian>(value)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WriteExt for W {}

/// Encoded size of a length-prefixed string.
#[inline]
pub fn dyn_str_size(value: &str) -> u64 {
    let len = value.len() as u64;
    length_size(len) + len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_write_dyn_str() {
        let mut out = Vec::new();
        out.write_dyn_str("city").unwrap();
        assert_eq!(out, b"\x04city");
        assert_eq!(dyn_str_size("city"), 5);
    }

    #[test]
    fn test_write_tag_and_count() {
        let mut out = Vec::new();
        out.write_tag(TypeTag::new("s8")).unwrap();
        out.write_count(-1).unwrap();
        assert_eq!(out, [b's', b'8', b' ', b' ', 0xFF, 0xFF, 0xFF, 0xFF]);

        let mut reader = BinaryReader::new(&out);
        assert_eq!(reader.read_tag().unwrap().as_str(), "s8");
        assert_eq!(reader.read_i32().unwrap(), -1);
    }

    #[test]
    fn test_long_string_uses_wide_length() {
        let long = "x".repeat(300);
        let mut out = Vec::new();
        out.write_dyn_str(&long).unwrap();
        assert_eq!(out.len(), 303);
        assert_eq!(dyn_str_size(&long), 303);
    }
}
