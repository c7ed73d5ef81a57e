//! Single-pass tokenizer and parser for the text notation.

use std::str::Chars;

use crate::binary::check_depth;
use crate::registry as tags;
use crate::text::escape::is_separator;
use crate::{Attribute, Error, Node, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    InNode,
    InNodeName,
    InAttribute,
    InAttributeName,
    InAttributeType,
    InAttributePreValue,
    InAttributePreValueQualifier,
    InAttributeValueDoubleQuoted,
    InAttributeValueSingleQuoted,
    InAttributeValueUnquoted,
}

/// An open `{ ... }` waiting for its closing brace.
struct Frame {
    node: Node,
    named: bool,
}

/// An open `[ ... ]`.
#[derive(Default)]
struct PendingAttribute {
    name: String,
    named: bool,
    annotation: Option<String>,
    qualifier: Option<String>,
    raw: String,
    assigned: bool,
    value_done: bool,
}

impl PendingAttribute {
    /// Whether a `(` before the value opens an encoding qualifier. Only
    /// strings take one; for other types it is part of the value.
    fn accepts_qualifier(&self) -> bool {
        self.qualifier.is_none()
            && self
                .annotation
                .as_deref()
                .map_or(true, |a| tags::lookup(a) == Some(tags::STRING))
    }
}

/// Streaming parser producing one top-level node at a time.
///
/// ```
/// use bento::text::Parser;
///
/// let mut parser = Parser::new(r#"{ "a" } { "b" ["n"=1] }"#);
/// assert_eq!(parser.next_node()?.unwrap().name(), "a");
/// assert_eq!(parser.next_node()?.unwrap().get_s32("n")?, 1);
/// assert!(parser.next_node()?.is_none());
/// # Ok::<(), bento::Error>(())
/// ```
pub struct Parser<'s> {
    chars: Chars<'s>,
    state: State,
    stack: Vec<Frame>,
    token: String,
    attribute: PendingAttribute,
    escaped: bool,
    line: usize,
    column: usize,
    failed: bool,
}

impl<'s> Parser<'s> {
    pub fn new(text: &'s str) -> Self {
        Self {
            chars: text.chars(),
            state: State::Start,
            stack: Vec::new(),
            token: String::new(),
            attribute: PendingAttribute::default(),
            escaped: false,
            line: 1,
            column: 0,
            failed: false,
        }
    }

    /// Line of the last character read, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the last character read, starting at 1.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Parse the next complete top-level node.
    ///
    /// Returns `Ok(None)` when the input ends between nodes.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        while let Some(c) = self.next_char() {
            if let Some(node) = self.step(c)? {
                return Ok(Some(node));
            }
        }
        if self.state == State::Start {
            Ok(None)
        } else {
            Err(self.error("end of input".to_owned()))
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, found: String) -> Error {
        Error::MalformedText {
            expected: self.expected(),
            found,
            line: self.line,
            column: self.column,
        }
    }

    fn unexpected(&self, c: char) -> Error {
        self.error(format!("{c:?}"))
    }

    fn expected(&self) -> &'static str {
        match self.state {
            State::Start => "'{' opening a node",
            State::InNode if !self.top_named() => "'\"' opening a node name",
            State::InNode => "'[', '{' or '}'",
            State::InNodeName => "'\"' closing the node name",
            State::InAttribute if !self.attribute.named => "'\"' opening an attribute name",
            State::InAttribute if !self.attribute.assigned => "'(' or '='",
            State::InAttribute => "']' closing the attribute",
            State::InAttributeName => "'\"' closing the attribute name",
            State::InAttributeType => "')' closing the type",
            State::InAttributePreValue => "an attribute value",
            State::InAttributePreValueQualifier => "')' closing the qualifier",
            State::InAttributeValueDoubleQuoted => "'\"' closing the value",
            State::InAttributeValueSingleQuoted => "'\\'' closing the value",
            State::InAttributeValueUnquoted => "']' closing the attribute",
        }
    }

    fn top_named(&self) -> bool {
        self.stack.last().is_some_and(|frame| frame.named)
    }

    fn open_node(&mut self) -> Result<()> {
        check_depth(self.stack.len())?;
        self.stack.push(Frame {
            node: Node::default(),
            named: false,
        });
        self.state = State::InNode;
        Ok(())
    }

    /// Pop the innermost node; returns it if it was top-level.
    fn close_node(&mut self) -> Option<Node> {
        let frame = self.stack.pop()?;
        match self.stack.last_mut() {
            Some(parent) => {
                parent.node.add_child(frame.node);
                None
            }
            None => {
                self.state = State::Start;
                Some(frame.node)
            }
        }
    }

    fn finish_attribute(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.attribute);
        let attribute = Attribute::from_text(
            pending.name,
            pending.annotation.as_deref(),
            &pending.raw,
            pending.qualifier.as_deref(),
        )?;
        if let Some(frame) = self.stack.last_mut() {
            frame.node.add_attribute(attribute);
        }
        self.state = State::InNode;
        Ok(())
    }

    /// Append to a value token, keeping escapes intact.
    fn push_raw(&mut self, c: char) {
        self.attribute.raw.push(c);
        if self.escaped {
            self.escaped = false;
        } else if c == '\\' {
            self.escaped = true;
        }
    }

    /// Append to a name token, resolving escapes.
    fn push_name(&mut self, c: char) -> bool {
        if self.escaped {
            self.token.push(c);
            self.escaped = false;
        } else if c == '\\' {
            self.escaped = true;
        } else if c == '"' {
            return true;
        } else {
            self.token.push(c);
        }
        false
    }

    fn step(&mut self, c: char) -> Result<Option<Node>> {
        match self.state {
            State::Start => match c {
                c if is_separator(c) => {}
                '{' => self.open_node()?,
                c => return Err(self.unexpected(c)),
            },

            State::InNode => match c {
                c if is_separator(c) => {}
                '"' if !self.top_named() => {
                    self.token.clear();
                    self.state = State::InNodeName;
                }
                '[' if self.top_named() => {
                    self.attribute = PendingAttribute::default();
                    self.state = State::InAttribute;
                }
                '{' if self.top_named() => self.open_node()?,
                '}' if self.top_named() => return Ok(self.close_node()),
                c => return Err(self.unexpected(c)),
            },

            State::InNodeName => {
                if self.push_name(c) {
                    let name = std::mem::take(&mut self.token);
                    if let Some(frame) = self.stack.last_mut() {
                        frame.node.set_name(name);
                        frame.named = true;
                    }
                    self.state = State::InNode;
                }
            }

            State::InAttribute => match c {
                c if is_separator(c) => {}
                '"' if !self.attribute.named => {
                    self.token.clear();
                    self.state = State::InAttributeName;
                }
                '(' if self.attribute.named
                    && !self.attribute.assigned
                    && self.attribute.annotation.is_none() =>
                {
                    self.token.clear();
                    self.state = State::InAttributeType;
                }
                '=' if self.attribute.named && !self.attribute.assigned => {
                    self.attribute.assigned = true;
                    self.state = State::InAttributePreValue;
                }
                ']' if self.attribute.value_done => self.finish_attribute()?,
                c => return Err(self.unexpected(c)),
            },

            State::InAttributeName => {
                if self.push_name(c) {
                    self.attribute.name = std::mem::take(&mut self.token);
                    self.attribute.named = true;
                    self.state = State::InAttribute;
                }
            }

            State::InAttributeType => match c {
                ')' => {
                    self.attribute.annotation = Some(std::mem::take(&mut self.token));
                    self.state = State::InAttribute;
                }
                c => self.token.push(c),
            },

            State::InAttributePreValue => match c {
                c if is_separator(c) => {}
                '(' if self.attribute.accepts_qualifier() => {
                    self.token.clear();
                    self.state = State::InAttributePreValueQualifier;
                }
                ']' => self.finish_attribute()?,
                '"' => {
                    self.push_raw(c);
                    self.state = State::InAttributeValueDoubleQuoted;
                }
                '\'' => {
                    self.push_raw(c);
                    self.state = State::InAttributeValueSingleQuoted;
                }
                c => {
                    self.push_raw(c);
                    self.state = State::InAttributeValueUnquoted;
                }
            },

            State::InAttributePreValueQualifier => {
                if self.escaped {
                    self.token.push(c);
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == ')' {
                    self.attribute.qualifier = Some(std::mem::take(&mut self.token));
                    self.state = State::InAttributePreValue;
                } else {
                    self.token.push(c);
                }
            }

            State::InAttributeValueDoubleQuoted | State::InAttributeValueSingleQuoted => {
                let quote = if self.state == State::InAttributeValueDoubleQuoted {
                    '"'
                } else {
                    '\''
                };
                let closes = c == quote && !self.escaped;
                self.push_raw(c);
                if closes {
                    self.state = State::InAttributeValueUnquoted;
                }
            }

            State::InAttributeValueUnquoted => {
                if self.escaped {
                    self.push_raw(c);
                } else {
                    match c {
                        c if is_separator(c) => {
                            self.attribute.value_done = true;
                            self.state = State::InAttribute;
                        }
                        ']' => self.finish_attribute()?,
                        '"' => {
                            self.push_raw(c);
                            self.state = State::InAttributeValueDoubleQuoted;
                        }
                        '\'' => {
                            self.push_raw(c);
                            self.state = State::InAttributeValueSingleQuoted;
                        }
                        c => self.push_raw(c),
                    }
                }
            }
        }
        Ok(None)
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Node>;

    /// Yields nodes until the input ends or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_node().transpose();
        self.failed = matches!(result, Some(Err(_)));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{text::parse_text, Value};
    use bento_common::{IPoint, Instant};

    fn parse(text: &str) -> Node {
        parse_text(text).unwrap()
    }

    fn malformed(text: &str) -> (&'static str, String, usize, usize) {
        match parse_text(text) {
            Err(Error::MalformedText {
                expected,
                found,
                line,
                column,
            }) => (expected, found, line, column),
            other => panic!("expected malformed text, got {other:?}"),
        }
    }

    #[test]
    fn test_inferred_types() {
        let node = parse(
            r#"{ "n" ["t"=true] ["f"=false] ["now"=NOW] ["s"="abc"] ["c"='c'] ["i"=42] ["neg"=-7] }"#,
        );
        let tags: Vec<_> = node.attributes().iter().map(|a| a.tag()).collect();
        assert_eq!(
            tags,
            [
                tags::BOOL,
                tags::BOOL,
                tags::INSTANT,
                tags::STRING,
                tags::CHAR,
                tags::S32,
                tags::S32
            ]
        );
        assert_eq!(node.get_s32("neg").unwrap(), -7);
        assert!(node.get_instant("now").unwrap() > Instant::EPOCH);
    }

    #[test]
    fn test_annotations_and_qualifiers() {
        let node = parse(
            r#"{ "n"
                ["port"(u16)=8080]
                ["shape"(ipol)=(1,2)(3,4)]
                ["title"=(latin1)"menu"]
                ["typed"(str)=(utf-8)'x']
                ["names"(stra)="a","b\"c"]
                ["bare"(s8a)=1,2,3]
            }"#,
        );
        assert_eq!(node.get_u16("port").unwrap(), 8080);
        assert_eq!(
            node.get_ipolygon("shape").unwrap(),
            &[IPoint::new(1, 2), IPoint::new(3, 4)]
        );
        assert_eq!(node.get_string_encoding("title").unwrap(), Some("latin1"));
        assert_eq!(node.get_string("typed").unwrap(), "x");
        assert_eq!(node.get_string_encoding("typed").unwrap(), Some("utf-8"));
        assert_eq!(
            node.get_string_array("names").unwrap(),
            &["a".to_string(), "b\"c".to_string()]
        );
        assert_eq!(node.get_s8_array("bare").unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_escapes_in_names_and_values() {
        let node = parse(r#"{ "a\"b\{" ["k\\"="v\"}"] ["u"=x\ y] }"#);
        assert_eq!(node.name(), "a\"b{");
        assert_eq!(node.get_string("k\\").unwrap(), "v\"}");
        // Unquoted, unannotated values are integers.
        assert_eq!(node.attributes()[1].value(), &Value::S32(0));
    }

    #[test]
    fn test_nested_and_empty_value() {
        let node = parse(r#"{"root"{"a"{"b"}}["x"(s32a)=]{"c"}}"#);
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.find_path("a/b").unwrap().name(), "b");
        assert!(node.get_s32_array("x").unwrap().is_empty());
    }

    #[test]
    fn test_value_then_separator_then_bracket() {
        let node = parse("{ \"n\" [\"x\"=5 \t\n] }");
        assert_eq!(node.get_s32("x").unwrap(), 5);
    }

    #[test]
    fn test_errors() {
        let (expected, found, line, column) = malformed("x");
        assert_eq!(
            (expected, found.as_str(), line, column),
            ("'{' opening a node", "'x'", 1, 1)
        );

        let (expected, found, ..) = malformed(r#"{ "n" ["x"=1"#);
        assert_eq!(expected, "']' closing the attribute");
        assert_eq!(found, "end of input");

        let (expected, ..) = malformed(r#"{ "n" ["x"=1 2] }"#);
        assert_eq!(expected, "']' closing the attribute");

        let (expected, ..) = malformed(r#"{ "n" ["x"] }"#);
        assert_eq!(expected, "'(' or '='");

        let (_, found, line, column) = malformed("{ \"n\"\n  \"m\" }");
        assert_eq!((found.as_str(), line, column), ("'\"'", 2, 3));

        let (expected, ..) = malformed(r#"{ "n" ["x"="open]"#);
        assert_eq!(expected, "'\"' closing the value");
    }

    #[test]
    fn test_unsupported_annotation() {
        assert!(matches!(
            parse_text(r#"{ "n" ["x"(nope)=1] }"#),
            Err(Error::UnsupportedTextType(t)) if t == "nope"
        ));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut parser = Parser::new(r#"{ "a" } } { "b" }"#);
        assert!(parser.next().unwrap().is_ok());
        assert!(parser.next().unwrap().is_err());
        assert!(parser.next().is_none());
    }
}
