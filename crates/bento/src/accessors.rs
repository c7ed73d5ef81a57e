//! Typed attribute accessors.
//!
//! Every value kind gets four methods on [`Node`]:
//!
//! - `get_<kind>(name)` returns the first attribute with that name and type,
//!   or [`Error::AttributeNotFound`] (or [`Error::TypeMismatch`] when the name
//!   is only present with another type)
//! - `get_<kind>_or(name, default)` falls back to `default` instead
//! - `set_<kind>(name, value)` overwrites the first same-name, same-type
//!   attribute or appends a new one
//! - `add_<kind>(name, value)` always appends

use bento_common::{
    Color, Duration, ILine, IPoint, IPoint3D, IRect, ISize, Instant, Line, Point, Point3D, Rect,
    Size, TypeTag,
};

use crate::registry as tags;
use crate::{Attribute, Error, Node, Result, Value};

impl Node {
    fn typed<'a, T>(
        &'a self,
        name: &str,
        tag: TypeTag,
        extract: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<T> {
        if let Some(value) = self
            .find_attribute(name, tag)
            .and_then(|attr| extract(attr.value()))
        {
            return Ok(value);
        }
        Err(match self.attribute(name) {
            Some(other) => Error::TypeMismatch {
                name: name.to_owned(),
                expected: tag,
                actual: other.tag(),
            },
            None => Error::AttributeNotFound {
                name: name.to_owned(),
                tag,
            },
        })
    }

    /// The value of the first attribute with this name and type.
    pub fn get_value(&self, name: &str, tag: TypeTag) -> Result<&Value> {
        self.typed(name, tag, Some)
    }

    /// Overwrite the first attribute with this name and the value's type, or
    /// append a new one.
    pub fn set_value(&mut self, name: &str, value: Value) -> &mut Self {
        match self.find_attribute_mut(name, value.tag()) {
            Some(existing) => existing.replace_value(value),
            None => {
                self.add_attribute(Attribute::new(name, value));
            }
        }
        self
    }

    /// Append an attribute built from `value`.
    pub fn add_value(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.add_attribute(Attribute::new(name, value));
        self
    }
}

macro_rules! copy_accessors {
    ($($variant:ident($t:ty), $tag:ident => $get:ident, $get_or:ident, $set:ident, $add:ident;)*) => {
        impl Node {
            $(
                #[doc = concat!("First `", stringify!($t), "` attribute named `name`.")]
                pub fn $get(&self, name: &str) -> Result<$t> {
                    self.typed(name, tags::$tag, |value| match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    })
                }

                pub fn $get_or(&self, name: &str, default: $t) -> $t {
                    self.$get(name).unwrap_or(default)
                }

                pub fn $set(&mut self, name: &str, value: $t) -> &mut Self {
                    self.set_value(name, Value::$variant(value))
                }

                pub fn $add(&mut self, name: impl Into<String>, value: $t) -> &mut Self {
                    self.add_value(name, Value::$variant(value))
                }
            )*
        }
    };
}

macro_rules! slice_accessors {
    ($($variant:ident($t:ty), $tag:ident => $get:ident, $get_or:ident, $set:ident, $add:ident;)*) => {
        impl Node {
            $(
                #[doc = concat!("Elements of the first `", stringify!($t), "` list attribute named `name`.")]
                pub fn $get(&self, name: &str) -> Result<&[$t]> {
                    self.typed(name, tags::$tag, |value| match value {
                        Value::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    })
                }

                pub fn $get_or<'a>(&'a self, name: &str, default: &'a [$t]) -> &'a [$t] {
                    self.$get(name).unwrap_or(default)
                }

                pub fn $set(&mut self, name: &str, value: impl Into<Vec<$t>>) -> &mut Self {
                    self.set_value(name, Value::$variant(value.into()))
                }

                pub fn $add(&mut self, name: impl Into<String>, value: impl Into<Vec<$t>>) -> &mut Self {
                    self.add_value(name, Value::$variant(value.into()))
                }
            )*
        }
    };
}

copy_accessors! {
    S8(i8), S8 => get_s8, get_s8_or, set_s8, add_s8;
    U8(u8), U8 => get_u8, get_u8_or, set_u8, add_u8;
    S16(i16), S16 => get_s16, get_s16_or, set_s16, add_s16;
    U16(u16), U16 => get_u16, get_u16_or, set_u16, add_u16;
    S32(i32), S32 => get_s32, get_s32_or, set_s32, add_s32;
    U32(u32), U32 => get_u32, get_u32_or, set_u32, add_u32;
    S64(i64), S64 => get_s64, get_s64_or, set_s64, add_s64;
    U64(u64), U64 => get_u64, get_u64_or, set_u64, add_u64;
    Float(f32), FLOAT => get_float, get_float_or, set_float, add_float;
    Double(f64), DOUBLE => get_double, get_double_or, set_double, add_double;
    Bool(bool), BOOL => get_bool, get_bool_or, set_bool, add_bool;
    Char(char), CHAR => get_char, get_char_or, set_char, add_char;
    Duration(Duration), DURATION => get_duration, get_duration_or, set_duration, add_duration;
    Instant(Instant), INSTANT => get_instant, get_instant_or, set_instant, add_instant;
    Size(Size), SIZE => get_size, get_size_or, set_size, add_size;
    ISize(ISize), ISIZE => get_isize, get_isize_or, set_isize, add_isize;
    Point(Point), POINT => get_point, get_point_or, set_point, add_point;
    IPoint(IPoint), IPOINT => get_ipoint, get_ipoint_or, set_ipoint, add_ipoint;
    Point3D(Point3D), POINT3D => get_point3d, get_point3d_or, set_point3d, add_point3d;
    IPoint3D(IPoint3D), IPOINT3D => get_ipoint3d, get_ipoint3d_or, set_ipoint3d, add_ipoint3d;
    Line(Line), LINE => get_line, get_line_or, set_line, add_line;
    ILine(ILine), ILINE => get_iline, get_iline_or, set_iline, add_iline;
    Rect(Rect), RECT => get_rect, get_rect_or, set_rect, add_rect;
    IRect(IRect), IRECT => get_irect, get_irect_or, set_irect, add_irect;
    Color(Color), COLOR => get_color, get_color_or, set_color, add_color;
}

slice_accessors! {
    Polygon(Point), POLYGON => get_polygon, get_polygon_or, set_polygon, add_polygon;
    IPolygon(IPoint), IPOLYGON => get_ipolygon, get_ipolygon_or, set_ipolygon, add_ipolygon;
    Binary(u8), BINARY => get_binary, get_binary_or, set_binary, add_binary;
    S8Array(i8), S8_ARRAY => get_s8_array, get_s8_array_or, set_s8_array, add_s8_array;
    S16Array(i16), S16_ARRAY => get_s16_array, get_s16_array_or, set_s16_array, add_s16_array;
    S32Array(i32), S32_ARRAY => get_s32_array, get_s32_array_or, set_s32_array, add_s32_array;
    S64Array(i64), S64_ARRAY => get_s64_array, get_s64_array_or, set_s64_array, add_s64_array;
    StringArray(String), STRING_ARRAY => get_string_array, get_string_array_or, set_string_array, add_string_array;
    BoolArray(bool), BOOL_ARRAY => get_bool_array, get_bool_array_or, set_bool_array, add_bool_array;
    DoubleArray(f64), DOUBLE_ARRAY => get_double_array, get_double_array_or, set_double_array, add_double_array;
    DurationArray(Duration), DURATION_ARRAY => get_duration_array, get_duration_array_or, set_duration_array, add_duration_array;
    InstantArray(Instant), INSTANT_ARRAY => get_instant_array, get_instant_array_or, set_instant_array, add_instant_array;
}

// Strings carry an optional encoding, so they get hand-written accessors.
impl Node {
    /// Text of the first string attribute named `name`.
    pub fn get_string(&self, name: &str) -> Result<&str> {
        self.typed(name, tags::STRING, |value| match value {
            Value::String(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn get_string_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get_string(name).unwrap_or(default)
    }

    /// Encoding name of the first string attribute named `name`, if it has one.
    pub fn get_string_encoding(&self, name: &str) -> Result<Option<&str>> {
        self.typed(name, tags::STRING, |value| match value {
            Value::String(text) => Some(text.encoding()),
            _ => None,
        })
    }

    /// Set a string without an encoding. An existing encoding is cleared.
    pub fn set_string(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.set_value(name, Value::string(value))
    }

    pub fn set_string_with_encoding(
        &mut self,
        name: &str,
        value: impl Into<String>,
        encoding: &str,
    ) -> &mut Self {
        self.set_value(name, Value::string_with_encoding(value, Some(encoding)))
    }

    pub fn add_string(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.add_value(name, Value::string(value))
    }

    pub fn add_string_with_encoding(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        encoding: &str,
    ) -> &mut Self {
        self.add_value(name, Value::string_with_encoding(value, Some(encoding)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing() {
        let node = Node::new("n");
        assert!(matches!(
            node.get_s32("x"),
            Err(Error::AttributeNotFound { tag, .. }) if tag == tags::S32
        ));
        assert_eq!(node.get_s32_or("x", 9), 9);
        assert_eq!(node.get_string_or("x", "fallback"), "fallback");
    }

    #[test]
    fn test_other_type_does_not_satisfy_getter() {
        let mut node = Node::new("n");
        node.add_bool("flag", true);
        assert!(matches!(
            node.get_s32("flag"),
            Err(Error::TypeMismatch { expected, actual, .. })
                if expected == tags::S32 && actual == tags::BOOL
        ));
        assert_eq!(node.get_s32_or("flag", -1), -1);
        assert!(node.get_bool("FLAG").unwrap());
    }

    #[test]
    fn test_set_overwrites_or_appends() {
        let mut node = Node::new("n");
        node.set_u16("port", 80).set_u16("port", 8080);
        assert_eq!(node.attributes().len(), 1);
        assert_eq!(node.get_u16("port").unwrap(), 8080);

        node.set_s32("port", 1);
        assert_eq!(node.attributes().len(), 2);

        node.add_u16("port", 443);
        assert_eq!(node.attributes().len(), 3);
        assert_eq!(node.get_u16("port").unwrap(), 8080);
    }

    #[test]
    fn test_slices() {
        let mut node = Node::new("n");
        node.add_s16_array("xs", vec![1, 2, 3]);
        node.add_binary("blob", [0xAB, 0xCD]);
        node.set_string_array("names", vec!["a".to_string()]);

        assert_eq!(node.get_s16_array("xs").unwrap(), &[1, 2, 3]);
        assert_eq!(node.get_binary("blob").unwrap(), &[0xAB, 0xCD]);
        assert_eq!(node.get_string_array("names").unwrap(), &["a".to_string()]);
        assert!(node.get_s32_array_or("xs", &[]).is_empty());
    }

    #[test]
    fn test_string_encoding() {
        let mut node = Node::new("n");
        node.add_string_with_encoding("title", "caf\u{e9}", "latin1");
        node.add_string("plain", "x");

        assert_eq!(node.get_string("title").unwrap(), "caf\u{e9}");
        assert_eq!(node.get_string_encoding("title").unwrap(), Some("latin1"));
        assert_eq!(node.get_string_encoding("plain").unwrap(), None);

        node.set_string("title", "new");
        assert_eq!(node.get_string_encoding("title").unwrap(), None);
        assert_eq!(node.attributes().len(), 2);
    }

    #[test]
    fn test_geometry_and_time() {
        let mut node = Node::new("n");
        node.set_irect("bounds", IRect::new(IPoint::new(1, 2), ISize::new(3, 4)))
            .set_color("tint", Color::new(1, 2, 3, 255))
            .set_instant("seen", Instant::PAST)
            .set_duration("ttl", Duration::from_secs(5));

        assert_eq!(node.get_irect("bounds").unwrap().size, ISize::new(3, 4));
        assert_eq!(node.get_color("tint").unwrap().a, 255);
        assert_eq!(node.get_instant("seen").unwrap(), Instant::PAST);
        assert_eq!(node.get_duration("ttl").unwrap().as_micros(), 5_000_000);
        assert_eq!(node.get_value("ttl", tags::DURATION).unwrap().tag(), tags::DURATION);
    }
}
