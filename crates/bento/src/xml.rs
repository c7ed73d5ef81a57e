//! Write-only XML projection of a node tree.
//!
//! Each node becomes an element. Scalar attributes become XML attributes;
//! list-valued attributes (arrays, polygons, binary) become a child element
//! named after the attribute with one `<item>` per element:
//!
//! ```xml
//! <person age="30">
//!   <scores>
//!     <item>7</item>
//!     <item>9</item>
//!   </scores>
//!   <address city="Oakland"/>
//! </person>
//! ```

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Write;

use quick_xml::events::attributes::Attribute as XmlAttribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::{Error, Node, Result};

const INDENT: &str = "  ";
const ITEM: &str = "item";

impl Node {
    /// Render this subtree as XML.
    ///
    /// `wrap` puts every element on its own line; `depth` is the indentation
    /// level of this node's element.
    pub fn to_xml_string(&self, wrap: bool, depth: usize) -> Result<String> {
        let mut output = Vec::new();
        self.write_xml(&mut output, wrap, depth)?;
        String::from_utf8(output).map_err(|e| Error::Xml(e.to_string()))
    }

    /// Write this subtree as XML.
    pub fn write_xml<W: Write>(&self, writer: W, wrap: bool, depth: usize) -> Result<()> {
        XmlWriter::new(writer, wrap).node(self, depth)
    }

    /// Write an XML declaration followed by this subtree.
    pub fn write_xml_document<W: Write>(&self, writer: W, wrap: bool) -> Result<()> {
        let mut xml = XmlWriter::new(writer, wrap);
        xml.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml.newline()?;
        xml.node(self, 0)
    }
}

/// Event writer with manual indentation. `Writer::new_with_indent` always
/// starts at column 0, so it cannot place a subtree at a given `depth`.
struct XmlWriter<W: Write> {
    writer: Writer<W>,
    wrap: bool,
}

impl<W: Write> XmlWriter<W> {
    fn new(writer: W, wrap: bool) -> Self {
        Self {
            writer: Writer::new(writer),
            wrap,
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Xml(e.to_string()))
    }

    fn indent(&mut self, depth: usize) -> Result<()> {
        if self.wrap && depth > 0 {
            let indent = INDENT.repeat(depth);
            self.event(Event::Text(BytesText::from_escaped(indent)))?;
        }
        Ok(())
    }

    fn newline(&mut self) -> Result<()> {
        if self.wrap {
            self.event(Event::Text(BytesText::from_escaped("\n")))?;
        }
        Ok(())
    }

    fn node(&mut self, node: &Node, depth: usize) -> Result<()> {
        let name = encode_xml_name(node.name());
        let mut element = BytesStart::new(name.as_str());

        let mut has_lists = false;
        let mut keys = HashSet::new();
        for attribute in node.attributes() {
            if attribute.value().is_list() {
                has_lists = true;
                continue;
            }
            let key = unique_key(&mut keys, encode_xml_name(attribute.name()));
            let value = escape_value(&attribute.value().to_text());
            element.push_attribute(XmlAttribute {
                key: QName(key.as_bytes()),
                value: Cow::Owned(value.into_bytes()),
            });
        }

        self.indent(depth)?;
        if !has_lists && node.children().is_empty() {
            self.event(Event::Empty(element))?;
            return self.newline();
        }

        self.event(Event::Start(element))?;
        self.newline()?;

        for attribute in node.attributes() {
            let Some(items) = attribute.value().list_items() else {
                continue;
            };
            let list_name = encode_xml_name(attribute.name());
            self.indent(depth + 1)?;
            self.event(Event::Start(BytesStart::new(list_name.as_str())))?;
            self.newline()?;
            for item in &items {
                self.indent(depth + 2)?;
                self.event(Event::Start(BytesStart::new(ITEM)))?;
                self.event(Event::Text(BytesText::from_escaped(escape_value(item))))?;
                self.event(Event::End(BytesEnd::new(ITEM)))?;
                self.newline()?;
            }
            self.indent(depth + 1)?;
            self.event(Event::End(BytesEnd::new(list_name.as_str())))?;
            self.newline()?;
        }

        for child in node.children() {
            self.node(child, depth + 1)?;
        }

        self.indent(depth)?;
        self.event(Event::End(BytesEnd::new(name.as_str())))?;
        self.newline()
    }
}

/// Escape markup characters, and write control characters as numeric
/// character references.
fn escape_value(text: &str) -> String {
    let escaped = quick_xml::escape::escape(text);
    if !escaped.chars().any(char::is_control) {
        return escaped.into_owned();
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        if c.is_control() {
            out.push_str(&format!("&#{};", u32::from(c)));
        } else {
            out.push(c);
        }
    }
    out
}

/// Suffix `key` with `_2`, `_3`, ... until it differs from every key already
/// used on the element.
fn unique_key(used: &mut HashSet<String>, key: String) -> String {
    let mut candidate = key.clone();
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{key}_{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Encode a node or attribute name as a valid XML name.
fn encode_xml_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());

    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            // Names start with a letter or underscore.
            if c.is_alphabetic() || c == '_' {
                result.push(c);
            } else {
                result.push('_');
                if c.is_ascii_digit() {
                    result.push(c);
                }
            }
        } else if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
            result.push(c);
        } else {
            result.push('_');
        }
    }

    if result.is_empty() {
        result.push_str("node");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use bento_common::IPoint;

    fn person() -> Node {
        let mut person = Node::new("person");
        person.add_s32("age", 30);
        person.add_s32_array("scores", vec![7, 9]);
        person.add_new_child("address").add_string("city", "Oakland");
        person
    }

    #[test]
    fn test_compact() {
        assert_eq!(
            person().to_xml_string(false, 0).unwrap(),
            r#"<person age="30"><scores><item>7</item><item>9</item></scores><address city="Oakland"/></person>"#
        );
    }

    #[test]
    fn test_wrapped_with_depth() {
        let xml = person().to_xml_string(true, 1).unwrap();
        assert_eq!(
            xml,
            "  <person age=\"30\">\n    <scores>\n      <item>7</item>\n      <item>9</item>\n    </scores>\n    <address city=\"Oakland\"/>\n  </person>\n"
        );
    }

    #[test]
    fn test_list_forces_open_element() {
        let mut node = Node::new("shape");
        node.add_ipolygon("points", vec![IPoint::new(1, 2)]);
        assert_eq!(
            node.to_xml_string(false, 0).unwrap(),
            "<shape><points><item>1,2</item></points></shape>"
        );

        let leaf = Node::new("leaf");
        assert_eq!(leaf.to_xml_string(false, 0).unwrap(), "<leaf/>");
    }

    #[test]
    fn test_escaping_and_names() {
        let mut node = Node::new("1 bad name");
        node.add_string("q", "a<b & \"c\"\n");
        let xml = node.to_xml_string(false, 0).unwrap();
        assert_eq!(
            xml,
            r#"<_1_bad_name q="a&lt;b &amp; &quot;c&quot;&#10;"/>"#
        );
    }

    #[test]
    fn test_repeated_keys_are_suffixed() {
        let mut node = Node::new("n");
        node.add_s32("a", 1)
            .add_s32("a", 2)
            .add_s32("a b", 3)
            .add_s32("a_b", 4)
            .add_s32("a_2", 5);
        assert_eq!(
            node.to_xml_string(false, 0).unwrap(),
            r#"<n a="1" a_2="2" a_b="3" a_b_2="4" a_2_2="5"/>"#
        );
    }

    #[test]
    fn test_binary_rows() {
        let mut node = Node::new("blob");
        node.add_binary("data", vec![0xAB; 33]);
        let xml = node.to_xml_string(false, 0).unwrap();
        assert_eq!(xml.matches("<item>").count(), 2);
        assert!(xml.contains("<item>ab</item>"));
    }

    #[test]
    fn test_document() {
        let mut out = Vec::new();
        Node::new("root").write_xml_document(&mut out, true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root/>\n"
        );
    }

    #[test]
    fn test_encode_xml_name() {
        assert_eq!(encode_xml_name("valid_Name-1.x"), "valid_Name-1.x");
        assert_eq!(encode_xml_name("9lives"), "_9lives");
        assert_eq!(encode_xml_name(""), "node");
        assert_eq!(encode_xml_name("a b"), "a_b");
    }
}
