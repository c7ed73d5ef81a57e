//! Dynamic length framing.
//!
//! Lengths are stored in 1, 3, 5 or 9 bytes:
//!
//! | Lead byte | Following      | Range              |
//! |-----------|----------------|--------------------|
//! | `0..=252` | nothing        | the lead itself    |
//! | `0xFF`    | big-endian u16 | up to 65,535       |
//! | `0xFE`    | big-endian u32 | up to 2^32 - 1     |
//! | `0xFD`    | big-endian u64 | anything larger    |
//!
//! The encoder always picks the smallest form that fits. Decoding lives on
//! [`BinaryReader::read_length`](crate::BinaryReader::read_length).

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::Result;

/// Largest value stored directly in the lead byte.
pub const MAX_INLINE: u64 = 252;

/// Lead byte announcing a 2-byte length.
pub const LEAD_U16: u8 = 0xFF;

/// Lead byte announcing a 4-byte length.
pub const LEAD_U32: u8 = 0xFE;

/// Lead byte announcing an 8-byte length.
pub const LEAD_U64: u8 = 0xFD;

/// Number of bytes `encode_length(value)` produces.
#[inline]
pub const fn length_size(value: u64) -> u64 {
    if value <= MAX_INLINE {
        1
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Write `value` in its smallest dynamic form.
pub fn encode_length<W: Write + ?Sized>(writer: &mut W, value: u64) -> Result<()> {
    if value <= MAX_INLINE {
        writer.write_u8(value as u8)?;
    } else if value <= u16::MAX as u64 {
        writer.write_u8(LEAD_U16)?;
        writer.write_u16::<BigEndian>(value as u16)?;
    } else if value <= u32::MAX as u64 {
        writer.write_u8(LEAD_U32)?;
        writer.write_u32::<BigEndian>(value as u32)?;
    } else {
        writer.write_u8(LEAD_U64)?;
        writer.write_u64::<BigEndian>(value)?;
    }
    Ok(())
}

/// Encode `value` into a fresh buffer.
pub fn length_bytes(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(length_size(value) as usize);
    // Writing into a Vec cannot fail.
    let _ = encode_length(&mut out, value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    fn round_trip(value: u64) -> u64 {
        let bytes = length_bytes(value);
        assert_eq!(bytes.len() as u64, length_size(value));
        let mut reader = BinaryReader::new(&bytes);
        let decoded = reader.read_length().unwrap();
        assert!(reader.is_empty());
        decoded
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(length_bytes(252).len(), 1);
        assert_eq!(length_bytes(253).len(), 3);
        assert_eq!(length_bytes(65_535).len(), 3);
        assert_eq!(length_bytes(65_536).len(), 5);
        assert_eq!(length_bytes(u32::MAX as u64).len(), 5);
        assert_eq!(length_bytes(1u64 << 32).len(), 9);
    }

    #[test]
    fn test_lead_bytes() {
        assert_eq!(length_bytes(0), vec![0]);
        assert_eq!(length_bytes(252), vec![252]);
        assert_eq!(length_bytes(253), vec![0xFF, 0x00, 0xFD]);
        assert_eq!(length_bytes(65_536), vec![0xFE, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(
            length_bytes(1u64 << 32),
            vec![0xFD, 0, 0, 0, 1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_round_trip_values() {
        for value in [0, 1, 252, 253, 254, 255, 65_535, 65_536, u32::MAX as u64, u64::MAX] {
            assert_eq!(round_trip(value), value);
        }
    }

    #[test]
    fn test_truncated_length() {
        let mut reader = BinaryReader::new(&[0xFE, 0x00, 0x01]);
        assert!(reader.read_length().is_err());
    }
}
