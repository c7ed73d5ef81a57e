//! Common utilities for Bento.
//!
//! This crate provides the foundational pieces the Bento engine is built on:
//!
//! - [`BinaryReader`] - Zero-copy big-endian reading from byte slices
//! - [`WriteExt`] - Big-endian writing on top of [`std::io::Write`]
//! - [`length`] - Variable-length count framing (1, 3, 5 or 9 bytes)
//! - [`TypeTag`] - Fixed 4-byte attribute type codes
//! - [`lenient`] - Best-effort numeric text scanning
//! - Payload value types: [`Duration`], [`Instant`], geometry and [`Color`]

mod error;
mod geometry;
mod reader;
mod tag;
mod time;
mod writer;

pub mod length;
pub mod lenient;

pub use error::{Error, Result};
pub use geometry::{
    Color, ILine, IPoint, IPoint3D, IRect, ISize, Line, Point, Point3D, Rect, Size,
};
pub use reader::BinaryReader;
pub use tag::TypeTag;
pub use time::{Duration, Instant};
pub use writer::{dyn_str_size, WriteExt};
