//! Text notation writer.

use std::io::Write;

use crate::registry as tags;
use crate::text::escape::{escape_into, escape_qualifier_into, is_separator};
use crate::{Attribute, Node, Result, Value};

const INDENT: &str = "  ";

impl Node {
    /// Render this subtree in the text notation.
    ///
    /// With `wrap` off the output is a single line. With `wrap` on, every
    /// child starts on its own line, indented two spaces per level.
    pub fn to_text(&self, wrap: bool) -> String {
        let mut out = String::new();
        write_node(&mut out, self, wrap, 0);
        out
    }

    /// Write the text notation of this subtree to `writer`.
    pub fn write_text<W: Write + ?Sized>(&self, writer: &mut W, wrap: bool) -> Result<()> {
        writer.write_all(self.to_text(wrap).as_bytes())?;
        Ok(())
    }
}

impl Attribute {
    /// Render as `["name"(type)=value]`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        write_attribute(&mut out, self);
        out
    }
}

fn write_node(out: &mut String, node: &Node, wrap: bool, depth: usize) {
    out.push_str("{ \"");
    escape_into(out, node.name());
    out.push('"');

    for attribute in node.attributes() {
        out.push(' ');
        write_attribute(out, attribute);
    }

    for child in node.children() {
        if wrap {
            out.push('\n');
            push_indent(out, depth + 1);
        } else {
            out.push(' ');
        }
        write_node(out, child, wrap, depth + 1);
    }

    if wrap && !node.children().is_empty() {
        out.push('\n');
        push_indent(out, depth);
        out.push('}');
    } else {
        out.push_str(" }");
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_attribute(out: &mut String, attribute: &Attribute) {
    out.push_str("[\"");
    escape_into(out, attribute.name());
    out.push('"');

    let tag = attribute.tag();
    if !tags::is_inferable(tag) {
        out.push('(');
        out.push_str(tag.as_str());
        out.push(')');
    }
    out.push('=');

    match attribute.value() {
        Value::String(text) => {
            if let Some(encoding) = text.encoding() {
                out.push('(');
                escape_qualifier_into(out, encoding);
                out.push(')');
            }
            push_quoted(out, '"', text.as_str());
        }
        Value::Char(c) => push_quoted(out, '\'', c.encode_utf8(&mut [0; 4])),
        Value::Bool(_) | Value::S32(_) => out.push_str(&attribute.value().to_text()),
        // Elements are already quoted and escaped.
        Value::StringArray(_) => out.push_str(&attribute.value().to_text()),
        value => {
            let text = value.to_text();
            if needs_quotes(&text) {
                push_quoted(out, '"', &text);
            } else {
                escape_into(out, &text);
            }
        }
    }
    out.push(']');
}

fn push_quoted(out: &mut String, quote: char, text: &str) {
    out.push(quote);
    escape_into(out, text);
    out.push(quote);
}

/// Whether `text` would not survive as a bare value token.
fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.starts_with('(')
        || text
            .chars()
            .any(|c| is_separator(c) || matches!(c, ']' | '"' | '\''))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bento_common::{Instant, IPoint, TypeTag};

    #[test]
    fn test_annotations() {
        let cases = [
            (Value::S32(-7), r#"["v"=-7]"#),
            (Value::Bool(true), r#"["v"=true]"#),
            (Value::Char('q'), r#"["v"='q']"#),
            (Value::string("a \"b\""), r#"["v"="a \"b\""]"#),
            (Value::string_with_encoding("x", Some("latin1")), r#"["v"=(latin1)"x"]"#),
            (Value::U8(7), r#"["v"(u8)=7]"#),
            (Value::Double(1.5), r#"["v"(dbl)=1.5]"#),
            (Value::Instant(Instant::FUTURE), r#"["v"(time)=FUTURE]"#),
            (Value::S16Array(Vec::new()), r#"["v"(s16a)=""]"#),
            (Value::IPolygon(vec![IPoint::new(1, 2)]), r#"["v"(ipol)="(1,2)"]"#),
            (Value::Binary(vec![0xab]), r#"["v"(bin)=0xab]"#),
            (
                Value::StringArray(vec!["a".into(), "b".into()]),
                r#"["v"(stra)="a","b"]"#,
            ),
            (
                Value::Unknown {
                    tag: TypeTag::new("zz"),
                    data: vec![],
                },
                r#"["v"(zz)=0x]"#,
            ),
        ];
        for (value, expected) in cases {
            assert_eq!(Attribute::new("v", value).to_text(), expected);
        }
    }

    #[test]
    fn test_wrapped_layout() {
        let mut root = Node::new("root");
        root.add_s32("a", 1);
        let child = root.add_new_child("child");
        child.add_new_child("leaf");
        root.add_new_child("empty");

        assert_eq!(
            root.to_text(true),
            "{ \"root\" [\"a\"=1]\n  { \"child\"\n    { \"leaf\" }\n  }\n  { \"empty\" }\n}"
        );
        assert_eq!(
            root.to_text(false),
            r#"{ "root" ["a"=1] { "child" { "leaf" } } { "empty" } }"#
        );
    }

    #[test]
    fn test_write_text() {
        let mut out = Vec::new();
        Node::new("x\\y").write_text(&mut out, false).unwrap();
        assert_eq!(out, br#"{ "x\\y" }"#);
    }

    #[test]
    fn test_needs_quotes() {
        assert!(needs_quotes(""));
        assert!(needs_quotes("(1,2)"));
        assert!(needs_quotes("a b"));
        assert!(needs_quotes("a]"));
        assert!(!needs_quotes("1,2:3*4"));
    }
}
