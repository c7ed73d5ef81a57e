//! Geometry and color payload types.
//!
//! Each type knows its fixed binary layout (fields in declaration order,
//! big-endian) and its text form:
//!
//! | Type              | Text            |
//! |-------------------|-----------------|
//! | size, point       | `a,b`           |
//! | 3D point          | `a,b,c`         |
//! | line              | `x1,y1:x2,y2`   |
//! | rect              | `x,y:w*h`       |
//! | color             | `r,g,b,a`       |
//!
//! Text is read leniently: missing or malformed fields become zero.

use std::fmt;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::lenient::{fields, parse_float, parse_int};
use crate::{BinaryReader, Result};

macro_rules! pair_type {
    ($(#[$meta:meta])* $name:ident, $t:ty, $a:ident, $b:ident, $read:ident, $write:ident, $parse:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            pub $a: $t,
            pub $b: $t,
        }

        impl $name {
            /// Encoded payload width in bytes.
            pub const BINARY_SIZE: u64 = 2 * std::mem::size_of::<$t>() as u64;

            #[inline]
            pub const fn new($a: $t, $b: $t) -> Self {
                Self { $a, $b }
            }

            /// Read from the wire.
            pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
                Ok(Self { $a: reader.$read()?, $b: reader.$read()? })
            }

            /// Write to the wire.
            pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
                writer.$write::<BigEndian>(self.$a)?;
                writer.$write::<BigEndian>(self.$b)?;
                Ok(())
            }

            /// Parse the `a,b` text form leniently.
            pub fn from_text(text: &str) -> Self {
                let [a, b] = fields::<2>(text, ',');
                Self { $a: $parse(a), $b: $parse(b) }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{},{}", self.$a, self.$b)
            }
        }
    };
}

macro_rules! triple_type {
    ($(#[$meta:meta])* $name:ident, $t:ty, $read:ident, $write:ident, $parse:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            pub x: $t,
            pub y: $t,
            pub z: $t,
        }

        impl $name {
            /// Encoded payload width in bytes.
            pub const BINARY_SIZE: u64 = 3 * std::mem::size_of::<$t>() as u64;

            #[inline]
            pub const fn new(x: $t, y: $t, z: $t) -> Self {
                Self { x, y, z }
            }

            /// Read from the wire.
            pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
                Ok(Self { x: reader.$read()?, y: reader.$read()?, z: reader.$read()? })
            }

            /// Write to the wire.
            pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
                writer.$write::<BigEndian>(self.x)?;
                writer.$write::<BigEndian>(self.y)?;
                writer.$write::<BigEndian>(self.z)?;
                Ok(())
            }

            /// Parse the `a,b,c` text form leniently.
            pub fn from_text(text: &str) -> Self {
                let [x, y, z] = fields::<3>(text, ',');
                Self { x: $parse(x), y: $parse(y), z: $parse(z) }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{},{},{}", self.x, self.y, self.z)
            }
        }
    };
}

pair_type!(
    /// A floating point extent.
    Size, f64, width, height, read_f64, write_f64, parse_float
);
pair_type!(
    /// An integer extent.
    ISize, i32, width, height, read_i32, write_i32, parse_int
);
pair_type!(
    /// A floating point 2D point.
    Point, f64, x, y, read_f64, write_f64, parse_float
);
pair_type!(
    /// An integer 2D point.
    IPoint, i32, x, y, read_i32, write_i32, parse_int
);
triple_type!(
    /// A floating point 3D point.
    Point3D, f64, read_f64, write_f64, parse_float
);
triple_type!(
    /// An integer 3D point.
    IPoint3D, i32, read_i32, write_i32, parse_int
);

macro_rules! segment_type {
    ($(#[$meta:meta])* $name:ident, $point:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            pub start: $point,
            pub end: $point,
        }

        impl $name {
            /// Encoded payload width in bytes.
            pub const BINARY_SIZE: u64 = 2 * $point::BINARY_SIZE;

            #[inline]
            pub const fn new(start: $point, end: $point) -> Self {
                Self { start, end }
            }

            /// Read from the wire.
            pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
                Ok(Self { start: $point::read(reader)?, end: $point::read(reader)? })
            }

            /// Write to the wire.
            pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
                self.start.write(writer)?;
                self.end.write(writer)
            }

            /// Parse the `x1,y1:x2,y2` text form leniently.
            pub fn from_text(text: &str) -> Self {
                let [start, end] = fields::<2>(text, ':');
                Self { start: $point::from_text(start), end: $point::from_text(end) }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", self.start, self.end)
            }
        }
    };
}

segment_type!(
    /// A floating point line segment.
    Line, Point
);
segment_type!(
    /// An integer line segment.
    ILine, IPoint
);

macro_rules! rect_type {
    ($(#[$meta:meta])* $name:ident, $point:ident, $size:ident, $parse:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            pub origin: $point,
            pub size: $size,
        }

        impl $name {
            /// Encoded payload width in bytes.
            pub const BINARY_SIZE: u64 = $point::BINARY_SIZE + $size::BINARY_SIZE;

            #[inline]
            pub const fn new(origin: $point, size: $size) -> Self {
                Self { origin, size }
            }

            /// Read from the wire.
            pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
                Ok(Self { origin: $point::read(reader)?, size: $size::read(reader)? })
            }

            /// Write to the wire.
            pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
                self.origin.write(writer)?;
                self.size.write(writer)
            }

            /// Parse the `x,y:w*h` text form leniently.
            pub fn from_text(text: &str) -> Self {
                let [origin, size] = fields::<2>(text, ':');
                let [width, height] = fields::<2>(size, '*');
                Self {
                    origin: $point::from_text(origin),
                    size: $size::new($parse(width), $parse(height)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{}:{}*{}",
                    self.origin, self.size.width, self.size.height
                )
            }
        }
    };
}

rect_type!(
    /// A floating point rectangle.
    Rect, Point, Size, parse_float
);
rect_type!(
    /// An integer rectangle.
    IRect, IPoint, ISize, parse_int
);

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Encoded payload width in bytes.
    pub const BINARY_SIZE: u64 = 4;

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Read from the wire.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let bytes = reader.read_bytes(4)?;
        Ok(Self::new(bytes[0], bytes[1], bytes[2], bytes[3]))
    }

    /// Write to the wire.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[self.r, self.g, self.b, self.a])?;
        Ok(())
    }

    /// Parse the `r,g,b,a` text form leniently. A missing alpha is opaque.
    pub fn from_text(text: &str) -> Self {
        let [r, g, b, a] = fields::<4>(text, ',');
        let a = if a.is_empty() { u8::MAX } else { parse_int(a) };
        Self::new(parse_int(r), parse_int(g), parse_int(b), a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> Vec<u8> {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        out
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(Size::new(1.5, 2.0).to_string(), "1.5,2");
        assert_eq!(IPoint3D::new(1, -2, 3).to_string(), "1,-2,3");
        assert_eq!(
            ILine::new(IPoint::new(0, 0), IPoint::new(10, 20)).to_string(),
            "0,0:10,20"
        );
        assert_eq!(
            IRect::new(IPoint::new(1, 2), ISize::new(30, 40)).to_string(),
            "1,2:30*40"
        );
        assert_eq!(Color::new(255, 128, 0, 255).to_string(), "255,128,0,255");
    }

    #[test]
    fn test_parse_text_forms() {
        assert_eq!(Point::from_text("1.5, -2"), Point::new(1.5, -2.0));
        assert_eq!(
            Rect::from_text("1,2:3*4"),
            Rect::new(Point::new(1.0, 2.0), Size::new(3.0, 4.0))
        );
        assert_eq!(
            Line::from_text("1,2:3,4"),
            Line::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0))
        );
        assert_eq!(Color::from_text("1,2,3"), Color::new(1, 2, 3, 255));
    }

    #[test]
    fn test_lenient_geometry() {
        assert_eq!(IPoint::from_text("oops"), IPoint::new(0, 0));
        assert_eq!(ISize::from_text("5"), ISize::new(5, 0));
    }

    #[test]
    fn test_binary_layout() {
        let bytes = encode(|out| IPoint::new(1, -1).write(out));
        assert_eq!(bytes, [0, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(bytes.len() as u64, IPoint::BINARY_SIZE);

        let rect = Rect::new(Point::new(0.5, 1.0), Size::new(2.0, 3.0));
        let bytes = encode(|out| rect.write(out));
        assert_eq!(bytes.len() as u64, Rect::BINARY_SIZE);
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(Rect::read(&mut reader).unwrap(), rect);
    }
}
