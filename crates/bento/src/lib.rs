//! Bento hierarchical serialization engine.
//!
//! A Bento document is a tree of named nodes. Each node owns an ordered list
//! of typed attributes and an ordered list of child nodes. The same tree can
//! be written and read in three forms:
//!
//! - a compact length-prefixed binary format ([`Node::to_bytes`], [`Node::from_bytes`])
//! - a bracket/brace text notation ([`Node::to_text`], [`parse_text`])
//! - a write-only XML projection ([`Node::to_xml_string`], feature `xml-output`)
//!
//! Large binary payloads can be inspected without building a tree through
//! the [`scanner`].
//!
//! # Example
//!
//! ```
//! use bento::{parse_text, Node};
//!
//! let mut person = Node::new("person");
//! person.add_s32("age", 30);
//! person.add_new_child("address").add_string("city", "Oakland");
//!
//! let text = person.to_text(false);
//! assert_eq!(text, r#"{ "person" ["age"=30] { "address" ["city"="Oakland"] } }"#);
//!
//! let bytes = person.to_bytes()?;
//! assert_eq!(Node::from_bytes(&bytes)?, parse_text(&text)?);
//! # Ok::<(), bento::Error>(())
//! ```

mod accessors;
mod attribute;
mod binary;
mod cursor;
mod error;
mod node;
mod value;

pub mod registry;
pub mod scanner;
pub mod text;

#[cfg(feature = "xml-output")]
pub mod xml;

pub use attribute::Attribute;
pub use cursor::NodeCursor;
pub use error::{Error, Result};
pub use node::Node;
pub use text::{parse_text, parse_text_all};
pub use binary::MAX_NESTING_DEPTH;
pub use value::{Text, Value};

pub use bento_common::{
    Color, Duration, ILine, IPoint, IPoint3D, IRect, ISize, Instant, Line, Point, Point3D, Rect,
    Size, TypeTag,
};

/// Case-insensitive name comparison used for every node and attribute lookup.
pub fn names_equal(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
