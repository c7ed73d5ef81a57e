//! Error types for Bento encoding and decoding.

use bento_common::TypeTag;
use thiserror::Error;

/// Errors that can occur when building, encoding or decoding Bento trees.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] bento_common::Error),

    /// The text tokenizer met a character it cannot accept in its current state.
    #[error("malformed text at line {line}, column {column}: expected {expected}, found {found}")]
    MalformedText {
        expected: &'static str,
        found: String,
        line: usize,
        column: usize,
    },

    /// A framing length disagrees with the bytes actually available.
    #[error("malformed binary length: declared {declared} bytes but only {available} available")]
    MalformedBinaryLength { declared: u64, available: u64 },

    /// A node header carries a negative attribute or child count.
    #[error("invalid {what} count {count} in node header")]
    InvalidCount { what: &'static str, count: i32 },

    /// Nodes are nested deeper than the decoders accept.
    #[error("node nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    /// A typed accessor found no attribute with that name and type.
    #[error("attribute not found: {name:?} ({tag})")]
    AttributeNotFound { name: String, tag: TypeTag },

    /// An attribute exists under that name but with another type.
    #[error("attribute {name:?} has type {actual}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    /// The text parser was given a type annotation it cannot construct.
    #[error("unsupported text type annotation: {0:?}")]
    UnsupportedTextType(String),

    /// XML writing error.
    #[error("XML error: {0}")]
    Xml(String),
}

/// Result type for Bento operations.
pub type Result<T> = std::result::Result<T, Error>;
