//! Named, typed attributes.

use std::io::Write;

use bento_common::length::length_size;
use bento_common::{dyn_str_size, BinaryReader, TypeTag, WriteExt};

use crate::binary::framed;
use crate::{registry, Error, Result, Value};

/// A named leaf value attached to a node.
///
/// The type tag is fixed at construction: it is derived from the value (or
/// carried by [`Value::Unknown`]), and [`Attribute::set_value`] refuses a
/// value of another type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    name: String,
    value: Value,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The attribute name, case preserved.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the attribute.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The wire type tag.
    #[inline]
    pub fn tag(&self) -> TypeTag {
        self.value.tag()
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the attribute, returning its value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Replace the value with one of the same type.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        if value.tag() != self.tag() {
            return Err(Error::TypeMismatch {
                name: self.name.clone(),
                expected: self.tag(),
                actual: value.tag(),
            });
        }
        self.value = value;
        Ok(())
    }

    /// Overwrite the value; callers guarantee the type matches.
    pub(crate) fn replace_value(&mut self, value: Value) {
        debug_assert_eq!(value.tag(), self.tag());
        self.value = value;
    }

    /// Whether this attribute has the identity `(name, tag)`.
    ///
    /// Names compare case-insensitively.
    pub fn is(&self, name: &str, tag: TypeTag) -> bool {
        self.tag() == tag && crate::names_equal(&self.name, name)
    }

    /// Build an attribute from parsed text.
    ///
    /// With an `annotation`, the raw text is handed to that type's text
    /// reader; without one, the type is inferred from the raw text.
    pub fn from_text(
        name: impl Into<String>,
        annotation: Option<&str>,
        raw: &str,
        qualifier: Option<&str>,
    ) -> Result<Self> {
        let value = match annotation {
            Some(annotation) => {
                let tag = registry::lookup(annotation)
                    .ok_or_else(|| Error::UnsupportedTextType(annotation.trim().to_owned()))?;
                Value::from_text(tag, raw, qualifier)?
            }
            None => Value::infer(raw, qualifier),
        };
        Ok(Self::new(name, value))
    }

    /// Size of everything after this attribute's length prefix.
    pub(crate) fn content_size(&self) -> u64 {
        TypeTag::LEN as u64 + dyn_str_size(&self.name) + self.value.payload_size()
    }

    /// Encoded size including the length prefix.
    pub fn binary_size(&self) -> u64 {
        let content = self.content_size();
        length_size(content) + content
    }

    /// Write `DynLen Tag4 DynStr(name) Payload`.
    pub fn write_binary<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_length(self.content_size())?;
        writer.write_tag(self.tag())?;
        writer.write_dyn_str(&self.name)?;
        self.value.write_payload(writer)
    }

    /// Read one framed attribute.
    pub fn read_binary(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let mut content = framed(reader)?;
        let tag = content.read_tag()?;
        let name = content.read_dyn_str()?.to_owned();
        let declared = content.remaining() as u64;
        let value = Value::read_payload(tag, &mut content).map_err(|e| match e {
            Error::Common(bento_common::Error::UnexpectedEof { available, .. }) => {
                Error::MalformedBinaryLength {
                    declared,
                    available: available as u64,
                }
            }
            other => other,
        })?;
        Ok(Self { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry as tags;

    #[test]
    fn test_binary_layout() {
        let attr = Attribute::new("age", Value::S32(30));
        let mut out = Vec::new();
        attr.write_binary(&mut out).unwrap();

        assert_eq!(out, b"\x0cs32 \x03age\x00\x00\x00\x1e");
        assert_eq!(out.len() as u64, attr.binary_size());

        let mut reader = BinaryReader::new(&out);
        assert_eq!(Attribute::read_binary(&mut reader).unwrap(), attr);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_unknown_pass_through() {
        let bytes = b"\x0bzzzz\x01x\x01\x02\x03\x04\x05";
        let mut reader = BinaryReader::new(bytes);
        let attr = Attribute::read_binary(&mut reader).unwrap();

        assert_eq!(attr.tag(), TypeTag::new("zzzz"));
        assert!(matches!(attr.value(), Value::Unknown { data, .. } if data == &[1, 2, 3, 4, 5]));

        let mut out = Vec::new();
        attr.write_binary(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_trailing_payload_bytes_are_skipped() {
        // s8 payload declared as 3 bytes; only the first is the value.
        let bytes = b"\x09s8  \x01n\x07\xAA\xBB\x42";
        let mut reader = BinaryReader::new(bytes);
        let attr = Attribute::read_binary(&mut reader).unwrap();
        assert_eq!(attr.value(), &Value::S8(7));
        assert_eq!(reader.read_u8().unwrap(), 0x42);
    }

    #[test]
    fn test_short_payload_is_malformed() {
        let bytes = b"\x08s32 \x01n\x00\x01";
        let mut reader = BinaryReader::new(bytes);
        assert!(matches!(
            Attribute::read_binary(&mut reader),
            Err(Error::MalformedBinaryLength { declared: 2, .. })
        ));
    }

    #[test]
    fn test_set_value_keeps_type() {
        let mut attr = Attribute::new("n", Value::S32(1));
        attr.set_value(Value::S32(2)).unwrap();
        assert_eq!(attr.value(), &Value::S32(2));
        assert!(matches!(
            attr.set_value(Value::Bool(true)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(attr.is("N", tags::S32));
    }

    #[test]
    fn test_from_text() {
        let attr = Attribute::from_text("n", Some("u8"), "200", None).unwrap();
        assert_eq!(attr.value(), &Value::U8(200));

        let attr = Attribute::from_text("n", None, "42", None).unwrap();
        assert_eq!(attr.value(), &Value::S32(42));

        assert!(matches!(
            Attribute::from_text("n", Some("what"), "1", None),
            Err(Error::UnsupportedTextType(t)) if t == "what"
        ));
    }
}
