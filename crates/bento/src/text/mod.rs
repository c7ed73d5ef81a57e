//! The bracket/brace text notation.
//!
//! ```text
//! { "person" ["age"=30] ["height"(dbl)=1.8] { "address" ["city"="Oakland"] } }
//! ```
//!
//! A node is `{ "name" ... }` holding attributes and child nodes in any
//! order. An attribute is `["name"(type)=value]`; the type annotation is
//! omitted for bool, char, string and 32-bit integer values, which are
//! recognised from the value text alone. Strings may carry an encoding
//! qualifier before the value: `["title"=(latin1)"menu"]`.

pub mod escape;
mod parser;
mod writer;

use std::io::Read;

pub use parser::Parser;

use crate::{Error, Node, Result};

/// Parse the first top-level node of `text`.
///
/// Anything after that node is not examined. Empty input is an error.
pub fn parse_text(text: &str) -> Result<Node> {
    let mut parser = Parser::new(text);
    parser.next_node()?.ok_or(Error::MalformedText {
        expected: "'{' opening a node",
        found: "end of input".to_owned(),
        line: parser.line(),
        column: parser.column(),
    })
}

/// Parse every top-level node of `text`.
pub fn parse_text_all(text: &str) -> Result<Vec<Node>> {
    Parser::new(text).collect()
}

impl Node {
    /// Read the whole of `reader` and parse its first top-level node.
    pub fn read_text<R: Read>(mut reader: R) -> Result<Node> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        parse_text(&text)
    }
}
