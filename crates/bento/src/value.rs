//! Attribute values.
//!
//! [`Value`] is the closed set of payload kinds an attribute can carry. Each
//! kind knows its binary payload size and layout, its text form, and whether
//! it renders as a list in XML. Unrecognised binary payloads are preserved as
//! [`Value::Unknown`].

use std::io::Write;

use bento_common::lenient::{parse_float, parse_int};
use bento_common::length::length_size;
use bento_common::{
    dyn_str_size, BinaryReader, Color, Duration, ILine, IPoint, IPoint3D, IRect, ISize, Instant,
    Line, Point, Point3D, Rect, Size, TypeTag, WriteExt,
};
use byteorder::{BigEndian, WriteBytesExt};

use crate::registry as tags;
use crate::text::escape::{join_quoted_list, split_quoted_list, unescape, unwrap_quotes};
use crate::{Error, Result};

/// Bytes per `<item>` row when a binary blob is rendered as a list.
const HEX_ROW: usize = 32;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    S8(i8),
    U8(u8),
    S16(i16),
    U16(u16),
    S32(i32),
    U32(u32),
    S64(i64),
    U64(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    String(Text),
    Duration(Duration),
    Instant(Instant),
    Size(Size),
    ISize(ISize),
    Point(Point),
    IPoint(IPoint),
    Point3D(Point3D),
    IPoint3D(IPoint3D),
    Line(Line),
    ILine(ILine),
    Rect(Rect),
    IRect(IRect),
    Polygon(Vec<Point>),
    IPolygon(Vec<IPoint>),
    Color(Color),
    Binary(Vec<u8>),
    S8Array(Vec<i8>),
    S16Array(Vec<i16>),
    S32Array(Vec<i32>),
    S64Array(Vec<i64>),
    StringArray(Vec<String>),
    BoolArray(Vec<bool>),
    DoubleArray(Vec<f64>),
    DurationArray(Vec<Duration>),
    InstantArray(Vec<Instant>),
    /// A payload whose tag this build does not recognise, kept byte-for-byte.
    Unknown { tag: TypeTag, data: Vec<u8> },
}

/// String payload: text with an optional character encoding name.
///
/// An empty or blank encoding is the same as no encoding, both on
/// construction and in comparisons, since the wire form cannot tell them
/// apart.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Text {
    value: String,
    encoding: Option<String>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            encoding: None,
        }
    }

    pub fn with_encoding(value: impl Into<String>, encoding: Option<&str>) -> Self {
        Self {
            value: value.into(),
            encoding: normalize_encoding(encoding),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The encoding name, if one is set.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.encoding() == other.encoding()
    }
}

impl Value {
    /// Build a string value without an encoding.
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(Text::new(value))
    }

    /// Build a string value with an optional encoding name.
    pub fn string_with_encoding(value: impl Into<String>, encoding: Option<&str>) -> Self {
        Value::String(Text::with_encoding(value, encoding))
    }

    /// The wire type tag of this value.
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::S8(_) => tags::S8,
            Value::U8(_) => tags::U8,
            Value::S16(_) => tags::S16,
            Value::U16(_) => tags::U16,
            Value::S32(_) => tags::S32,
            Value::U32(_) => tags::U32,
            Value::S64(_) => tags::S64,
            Value::U64(_) => tags::U64,
            Value::Float(_) => tags::FLOAT,
            Value::Double(_) => tags::DOUBLE,
            Value::Bool(_) => tags::BOOL,
            Value::Char(_) => tags::CHAR,
            Value::String(_) => tags::STRING,
            Value::Duration(_) => tags::DURATION,
            Value::Instant(_) => tags::INSTANT,
            Value::Size(_) => tags::SIZE,
            Value::ISize(_) => tags::ISIZE,
            Value::Point(_) => tags::POINT,
            Value::IPoint(_) => tags::IPOINT,
            Value::Point3D(_) => tags::POINT3D,
            Value::IPoint3D(_) => tags::IPOINT3D,
            Value::Line(_) => tags::LINE,
            Value::ILine(_) => tags::ILINE,
            Value::Rect(_) => tags::RECT,
            Value::IRect(_) => tags::IRECT,
            Value::Polygon(_) => tags::POLYGON,
            Value::IPolygon(_) => tags::IPOLYGON,
            Value::Color(_) => tags::COLOR,
            Value::Binary(_) => tags::BINARY,
            Value::S8Array(_) => tags::S8_ARRAY,
            Value::S16Array(_) => tags::S16_ARRAY,
            Value::S32Array(_) => tags::S32_ARRAY,
            Value::S64Array(_) => tags::S64_ARRAY,
            Value::StringArray(_) => tags::STRING_ARRAY,
            Value::BoolArray(_) => tags::BOOL_ARRAY,
            Value::DoubleArray(_) => tags::DOUBLE_ARRAY,
            Value::DurationArray(_) => tags::DURATION_ARRAY,
            Value::InstantArray(_) => tags::INSTANT_ARRAY,
            Value::Unknown { tag, .. } => *tag,
        }
    }

    /// Whether this value is inherently a list (arrays, blobs, polygons).
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Value::Polygon(_)
                | Value::IPolygon(_)
                | Value::Binary(_)
                | Value::S8Array(_)
                | Value::S16Array(_)
                | Value::S32Array(_)
                | Value::S64Array(_)
                | Value::StringArray(_)
                | Value::BoolArray(_)
                | Value::DoubleArray(_)
                | Value::DurationArray(_)
                | Value::InstantArray(_)
                | Value::Unknown { .. }
        )
    }

    /// Size of the binary payload in bytes.
    pub fn payload_size(&self) -> u64 {
        match self {
            Value::S8(_) | Value::U8(_) | Value::Bool(_) => 1,
            Value::S16(_) | Value::U16(_) => 2,
            Value::S32(_) | Value::U32(_) | Value::Float(_) | Value::Char(_) => 4,
            Value::S64(_) | Value::U64(_) | Value::Double(_) => 8,
            Value::String(text) => {
                dyn_str_size(text.as_str()) + dyn_str_size(text.encoding().unwrap_or(""))
            }
            Value::Duration(_) => Duration::BINARY_SIZE,
            Value::Instant(_) => Instant::BINARY_SIZE,
            Value::Size(_) => Size::BINARY_SIZE,
            Value::ISize(_) => ISize::BINARY_SIZE,
            Value::Point(_) => Point::BINARY_SIZE,
            Value::IPoint(_) => IPoint::BINARY_SIZE,
            Value::Point3D(_) => Point3D::BINARY_SIZE,
            Value::IPoint3D(_) => IPoint3D::BINARY_SIZE,
            Value::Line(_) => Line::BINARY_SIZE,
            Value::ILine(_) => ILine::BINARY_SIZE,
            Value::Rect(_) => Rect::BINARY_SIZE,
            Value::IRect(_) => IRect::BINARY_SIZE,
            Value::Color(_) => Color::BINARY_SIZE,
            Value::Polygon(v) => array_size(v.len(), Point::BINARY_SIZE),
            Value::IPolygon(v) => array_size(v.len(), IPoint::BINARY_SIZE),
            Value::Binary(v) => v.len() as u64,
            Value::S8Array(v) => array_size(v.len(), 1),
            Value::S16Array(v) => array_size(v.len(), 2),
            Value::S32Array(v) => array_size(v.len(), 4),
            Value::S64Array(v) => array_size(v.len(), 8),
            Value::BoolArray(v) => array_size(v.len(), 1),
            Value::DoubleArray(v) => array_size(v.len(), 8),
            Value::DurationArray(v) => array_size(v.len(), Duration::BINARY_SIZE),
            Value::InstantArray(v) => array_size(v.len(), Instant::BINARY_SIZE),
            Value::StringArray(v) => {
                length_size(v.len() as u64) + v.iter().map(|s| dyn_str_size(s)).sum::<u64>()
            }
            Value::Unknown { data, .. } => data.len() as u64,
        }
    }

    /// Write the binary payload (without tag or framing).
    pub fn write_payload<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        match self {
            Value::S8(v) => writer.write_i8(*v)?,
            Value::U8(v) => writer.write_u8(*v)?,
            Value::S16(v) => writer.write_i16::<BigEndian>(*v)?,
            Value::U16(v) => writer.write_u16::<BigEndian>(*v)?,
            Value::S32(v) => writer.write_i32::<BigEndian>(*v)?,
            Value::U32(v) => writer.write_u32::<BigEndian>(*v)?,
            Value::S64(v) => writer.write_i64::<BigEndian>(*v)?,
            Value::U64(v) => writer.write_u64::<BigEndian>(*v)?,
            Value::Float(v) => writer.write_f32::<BigEndian>(*v)?,
            Value::Double(v) => writer.write_f64::<BigEndian>(*v)?,
            Value::Bool(v) => writer.write_u8(u8::from(*v))?,
            Value::Char(v) => writer.write_u32::<BigEndian>(u32::from(*v))?,
            Value::String(text) => {
                writer.write_dyn_str(text.as_str())?;
                writer.write_dyn_str(text.encoding().unwrap_or(""))?;
            }
            Value::Duration(v) => v.write(writer)?,
            Value::Instant(v) => v.write(writer)?,
            Value::Size(v) => v.write(writer)?,
            Value::ISize(v) => v.write(writer)?,
            Value::Point(v) => v.write(writer)?,
            Value::IPoint(v) => v.write(writer)?,
            Value::Point3D(v) => v.write(writer)?,
            Value::IPoint3D(v) => v.write(writer)?,
            Value::Line(v) => v.write(writer)?,
            Value::ILine(v) => v.write(writer)?,
            Value::Rect(v) => v.write(writer)?,
            Value::IRect(v) => v.write(writer)?,
            Value::Color(v) => v.write(writer)?,
            Value::Polygon(v) => write_array(writer, v, |w, p| p.write(w))?,
            Value::IPolygon(v) => write_array(writer, v, |w, p| p.write(w))?,
            Value::Binary(v) | Value::Unknown { data: v, .. } => writer.write_all(v)?,
            Value::S8Array(v) => write_array(writer, v, |w, x| Ok(w.write_i8(*x)?))?,
            Value::S16Array(v) => {
                write_array(writer, v, |w, x| Ok(w.write_i16::<BigEndian>(*x)?))?
            }
            Value::S32Array(v) => {
                write_array(writer, v, |w, x| Ok(w.write_i32::<BigEndian>(*x)?))?
            }
            Value::S64Array(v) => {
                write_array(writer, v, |w, x| Ok(w.write_i64::<BigEndian>(*x)?))?
            }
            Value::BoolArray(v) => write_array(writer, v, |w, x| Ok(w.write_u8(u8::from(*x))?))?,
            Value::DoubleArray(v) => {
                write_array(writer, v, |w, x| Ok(w.write_f64::<BigEndian>(*x)?))?
            }
            Value::DurationArray(v) => write_array(writer, v, |w, d| d.write(w))?,
            Value::InstantArray(v) => write_array(writer, v, |w, t| t.write(w))?,
            Value::StringArray(v) => write_array(writer, v, |w, s| w.write_dyn_str(s))?,
        }
        Ok(())
    }

    /// Decode a payload for `tag` from a reader bounded to exactly the
    /// declared payload bytes.
    ///
    /// Unrecognised tags never fail: the whole window is copied into
    /// [`Value::Unknown`]. Known payloads that leave bytes unread are accepted;
    /// the caller's framing skips the remainder.
    pub fn read_payload(tag: TypeTag, payload: &mut BinaryReader<'_>) -> Result<Self> {
        let value = match tag {
            tags::STRING => {
                let value = payload.read_dyn_str()?;
                let encoding = if payload.is_empty() {
                    None
                } else {
                    Some(payload.read_dyn_str()?)
                };
                Value::string_with_encoding(value, encoding)
            }
            tags::S32 => Value::S32(payload.read_i32()?),
            tags::BOOL => Value::Bool(payload.read_bool()?),
            tags::DOUBLE => Value::Double(payload.read_f64()?),
            tags::S64 => Value::S64(payload.read_i64()?),
            tags::U32 => Value::U32(payload.read_u32()?),
            tags::FLOAT => Value::Float(payload.read_f32()?),
            tags::INSTANT => Value::Instant(Instant::read(payload)?),
            tags::DURATION => Value::Duration(Duration::read(payload)?),
            tags::U8 => Value::U8(payload.read_u8()?),
            tags::S8 => Value::S8(payload.read_i8()?),
            tags::U16 => Value::U16(payload.read_u16()?),
            tags::S16 => Value::S16(payload.read_i16()?),
            tags::U64 => Value::U64(payload.read_u64()?),
            tags::CHAR => {
                let code = payload.read_u32()?;
                Value::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            tags::BINARY => Value::Binary(payload.remaining_bytes().to_vec()),
            tags::STRING_ARRAY => {
                Value::StringArray(read_array(payload, |r| r.read_dyn_str().map(str::to_owned))?)
            }
            tags::S32_ARRAY => Value::S32Array(read_array(payload, BinaryReader::read_i32)?),
            tags::DOUBLE_ARRAY => Value::DoubleArray(read_array(payload, BinaryReader::read_f64)?),
            tags::POINT => Value::Point(Point::read(payload)?),
            tags::IPOINT => Value::IPoint(IPoint::read(payload)?),
            tags::SIZE => Value::Size(Size::read(payload)?),
            tags::ISIZE => Value::ISize(ISize::read(payload)?),
            tags::RECT => Value::Rect(Rect::read(payload)?),
            tags::IRECT => Value::IRect(IRect::read(payload)?),
            tags::COLOR => Value::Color(Color::read(payload)?),
            tags::POINT3D => Value::Point3D(Point3D::read(payload)?),
            tags::IPOINT3D => Value::IPoint3D(IPoint3D::read(payload)?),
            tags::LINE => Value::Line(Line::read(payload)?),
            tags::ILINE => Value::ILine(ILine::read(payload)?),
            tags::POLYGON => Value::Polygon(read_array(payload, Point::read)?),
            tags::IPOLYGON => Value::IPolygon(read_array(payload, IPoint::read)?),
            tags::S8_ARRAY => Value::S8Array(read_array(payload, BinaryReader::read_i8)?),
            tags::S16_ARRAY => Value::S16Array(read_array(payload, BinaryReader::read_i16)?),
            tags::S64_ARRAY => Value::S64Array(read_array(payload, BinaryReader::read_i64)?),
            tags::BOOL_ARRAY => Value::BoolArray(read_array(payload, BinaryReader::read_bool)?),
            tags::DURATION_ARRAY => Value::DurationArray(read_array(payload, Duration::read)?),
            tags::INSTANT_ARRAY => Value::InstantArray(read_array(payload, Instant::read)?),
            tag => Value::Unknown {
                tag,
                data: payload.remaining_bytes().to_vec(),
            },
        };

        if matches!(value, Value::Binary(_) | Value::Unknown { .. }) {
            payload.skip(payload.remaining())?;
        }
        Ok(value)
    }

    /// The plain text form of the value, without notation quoting or escaping.
    ///
    /// String arrays are the exception: their canonical form quotes and
    /// escapes each element.
    pub fn to_text(&self) -> String {
        match self {
            Value::S8(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::S16(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::S32(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::S64(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Char(v) => v.to_string(),
            Value::String(text) => text.as_str().to_owned(),
            Value::Duration(v) => v.to_string(),
            Value::Instant(v) => v.to_string(),
            Value::Size(v) => v.to_string(),
            Value::ISize(v) => v.to_string(),
            Value::Point(v) => v.to_string(),
            Value::IPoint(v) => v.to_string(),
            Value::Point3D(v) => v.to_string(),
            Value::IPoint3D(v) => v.to_string(),
            Value::Line(v) => v.to_string(),
            Value::ILine(v) => v.to_string(),
            Value::Rect(v) => v.to_string(),
            Value::IRect(v) => v.to_string(),
            Value::Color(v) => v.to_string(),
            Value::Polygon(v) => v.iter().map(|p| format!("({p})")).collect(),
            Value::IPolygon(v) => v.iter().map(|p| format!("({p})")).collect(),
            Value::Binary(v) | Value::Unknown { data: v, .. } => format!("0x{}", to_hex(v)),
            Value::S8Array(v) => join(v),
            Value::S16Array(v) => join(v),
            Value::S32Array(v) => join(v),
            Value::S64Array(v) => join(v),
            Value::BoolArray(v) => join(v),
            Value::DoubleArray(v) => join(v),
            Value::DurationArray(v) => join(v),
            Value::InstantArray(v) => join(v),
            Value::StringArray(v) => join_quoted_list(v),
        }
    }

    /// Items of a list-valued attribute, for list renderings such as XML.
    pub fn list_items(&self) -> Option<Vec<String>> {
        let items = match self {
            Value::Polygon(v) => strings(v),
            Value::IPolygon(v) => strings(v),
            Value::Binary(v) | Value::Unknown { data: v, .. } => {
                v.chunks(HEX_ROW).map(to_hex).collect()
            }
            Value::S8Array(v) => strings(v),
            Value::S16Array(v) => strings(v),
            Value::S32Array(v) => strings(v),
            Value::S64Array(v) => strings(v),
            Value::BoolArray(v) => strings(v),
            Value::DoubleArray(v) => strings(v),
            Value::DurationArray(v) => strings(v),
            Value::InstantArray(v) => strings(v),
            Value::StringArray(v) => v.clone(),
            _ => return None,
        };
        Some(items)
    }

    /// Build a value of a known `tag` from its raw token text.
    ///
    /// The raw text is unwrapped of one pair of surrounding quotes and
    /// unescaped first, except for string arrays whose elements carry their
    /// own quoting. Numeric and geometry fields are read leniently.
    pub fn from_text(tag: TypeTag, raw: &str, qualifier: Option<&str>) -> Result<Self> {
        if tag == tags::STRING_ARRAY {
            return Ok(Value::StringArray(split_quoted_list(raw)));
        }

        let text = unescape(unwrap_quotes(raw));
        let text = text.as_str();

        let value = match tag {
            tags::STRING => Value::string_with_encoding(text, qualifier),
            tags::S32 => Value::S32(parse_int(text)),
            tags::BOOL => Value::Bool(parse_bool(text)),
            tags::DOUBLE => Value::Double(parse_float(text)),
            tags::S64 => Value::S64(parse_int(text)),
            tags::U32 => Value::U32(parse_int(text)),
            tags::FLOAT => Value::Float(parse_float(text)),
            tags::INSTANT => Value::Instant(Instant::from_text(text)),
            tags::DURATION => Value::Duration(Duration::from_text(text)),
            tags::U8 => Value::U8(parse_int(text)),
            tags::S8 => Value::S8(parse_int(text)),
            tags::U16 => Value::U16(parse_int(text)),
            tags::S16 => Value::S16(parse_int(text)),
            tags::U64 => Value::U64(parse_int(text)),
            tags::CHAR => Value::Char(text.chars().next().unwrap_or('\0')),
            tags::BINARY => Value::Binary(from_hex(text)),
            tags::S32_ARRAY => Value::S32Array(split(text, parse_int)),
            tags::DOUBLE_ARRAY => Value::DoubleArray(split(text, parse_float)),
            tags::POINT => Value::Point(Point::from_text(text)),
            tags::IPOINT => Value::IPoint(IPoint::from_text(text)),
            tags::SIZE => Value::Size(Size::from_text(text)),
            tags::ISIZE => Value::ISize(ISize::from_text(text)),
            tags::RECT => Value::Rect(Rect::from_text(text)),
            tags::IRECT => Value::IRect(IRect::from_text(text)),
            tags::COLOR => Value::Color(Color::from_text(text)),
            tags::POINT3D => Value::Point3D(Point3D::from_text(text)),
            tags::IPOINT3D => Value::IPoint3D(IPoint3D::from_text(text)),
            tags::LINE => Value::Line(Line::from_text(text)),
            tags::ILINE => Value::ILine(ILine::from_text(text)),
            tags::POLYGON => Value::Polygon(polygon_points(text, Point::from_text)),
            tags::IPOLYGON => Value::IPolygon(polygon_points(text, IPoint::from_text)),
            tags::S8_ARRAY => Value::S8Array(split(text, parse_int)),
            tags::S16_ARRAY => Value::S16Array(split(text, parse_int)),
            tags::S64_ARRAY => Value::S64Array(split(text, parse_int)),
            tags::BOOL_ARRAY => Value::BoolArray(split(text, parse_bool)),
            tags::DURATION_ARRAY => Value::DurationArray(split(text, Duration::from_text)),
            tags::INSTANT_ARRAY => Value::InstantArray(split(text, Instant::from_text)),
            other => return Err(Error::UnsupportedTextType(other.to_string())),
        };
        Ok(value)
    }

    /// Infer a value from an unannotated raw token.
    ///
    /// | Raw text                         | Value   |
    /// |----------------------------------|---------|
    /// | `true`, `false`                  | bool    |
    /// | `NOW`, `PAST`, `FUTURE`, `NEVER` | instant |
    /// | starts with `"` or `(`           | string  |
    /// | starts with `'`                  | char    |
    /// | anything else                    | s32     |
    pub fn infer(raw: &str, qualifier: Option<&str>) -> Self {
        match raw {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        if let Some(instant) = Instant::from_keyword(raw) {
            return Value::Instant(instant);
        }

        match raw.chars().next() {
            Some('"') => Value::string_with_encoding(unescape(unwrap_quotes(raw)), qualifier),
            Some('(') => match raw.find(')') {
                Some(close) => {
                    let inline = &raw[1..close];
                    let rest = &raw[close + 1..];
                    Value::string_with_encoding(unescape(unwrap_quotes(rest)), Some(inline))
                }
                None => Value::string_with_encoding(unescape(raw), qualifier),
            },
            Some('\'') => {
                Value::Char(unescape(unwrap_quotes(raw)).chars().next().unwrap_or('\0'))
            }
            _ => Value::S32(parse_int(&unescape(raw))),
        }
    }
}

fn normalize_encoding(encoding: Option<&str>) -> Option<String> {
    encoding
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_owned)
}

fn array_size(count: usize, element: u64) -> u64 {
    length_size(count as u64) + count as u64 * element
}

fn write_array<W, T, F>(writer: &mut W, items: &[T], mut write_item: F) -> Result<()>
where
    W: Write + ?Sized,
    F: FnMut(&mut W, &T) -> bento_common::Result<()>,
{
    writer.write_length(items.len() as u64)?;
    for item in items {
        write_item(writer, item)?;
    }
    Ok(())
}

fn read_array<'a, T, F>(reader: &mut BinaryReader<'a>, mut read_item: F) -> Result<Vec<T>>
where
    F: FnMut(&mut BinaryReader<'a>) -> bento_common::Result<T>,
{
    let count = reader.read_length_usize()?;
    // Every element takes at least one byte; never trust the count further.
    let mut items = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        items.push(read_item(reader)?);
    }
    Ok(items)
}

fn parse_bool(text: &str) -> bool {
    let text = text.trim();
    text.eq_ignore_ascii_case("true") || parse_int::<i64>(text) != 0
}

fn join<T: ToString>(items: &[T]) -> String {
    strings(items).join(",")
}

fn strings<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

fn split<T>(text: &str, parse: impl Fn(&str) -> T) -> Vec<T> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(|part| parse(part.trim())).collect()
}

fn polygon_points<T>(text: &str, parse: impl Fn(&str) -> T) -> Vec<T> {
    text.split(')')
        .map(|part| part.trim().trim_start_matches('('))
        .filter(|part| !part.trim().is_empty())
        .map(parse)
        .collect()
}

fn to_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0F) as usize] as char);
    }
    out
}

fn from_hex(text: &str) -> Vec<u8> {
    let text = text.trim();
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let nibbles: Vec<u8> = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(16).unwrap_or(0) as u8)
        .collect();
    nibbles
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => (*hi << 4) | *lo,
            [lo] => *lo,
            _ => 0,
        })
        .collect()
}
