//! Four-character attribute type tags.

use std::fmt;

/// A 4-byte ASCII code identifying an attribute's type on the wire.
///
/// Codes shorter than four characters are right-padded with spaces, longer
/// codes are truncated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeTag([u8; 4]);

impl TypeTag {
    /// Encoded width of a tag.
    pub const LEN: usize = 4;

    /// Build a tag from a short code.
    pub const fn new(code: &str) -> Self {
        let src = code.as_bytes();
        let mut bytes = [b' '; 4];
        let mut i = 0;
        while i < 4 && i < src.len() {
            bytes[i] = src[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Wrap raw tag bytes exactly as read from the wire.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The raw 4 bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The code without its space padding.
    ///
    /// Non-ASCII bytes from foreign payloads are rendered lossily by
    /// [`Display`](fmt::Display); this returns an empty string for them.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0)
            .map(|s| s.trim_end_matches(' '))
            .unwrap_or("")
    }

    /// Compare against a textual code, ignoring padding.
    pub fn matches(&self, code: &str) -> bool {
        *self == Self::new(code.trim())
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = String::from_utf8_lossy(&self.0);
        f.write_str(text.trim_end_matches(' '))
    }
}

impl From<&str> for TypeTag {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(TypeTag::new("s8").as_bytes(), b"s8  ");
        assert_eq!(TypeTag::new("bool").as_bytes(), b"bool");
        assert_eq!(TypeTag::new("").as_bytes(), b"    ");
    }

    #[test]
    fn test_truncation() {
        assert_eq!(TypeTag::new("double").as_bytes(), b"doub");
    }

    #[test]
    fn test_as_str_and_matches() {
        let tag = TypeTag::new("str");
        assert_eq!(tag.as_str(), "str");
        assert_eq!(tag.to_string(), "str");
        assert!(tag.matches("str"));
        assert!(tag.matches(" str "));
        assert!(!tag.matches("s32"));
    }
}
