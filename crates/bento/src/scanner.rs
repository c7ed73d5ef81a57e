//! Streaming walker over binary payloads.
//!
//! [`scan`] walks an encoded tree depth-first and reports every node and
//! attribute header to a [`ScanVisitor`] without building [`crate::Node`]s.
//! Every framing length is checked on the way down, so a successful scan
//! also validates the payload's structure.

use std::collections::BTreeMap;
use std::fmt;

use bento_common::{BinaryReader, TypeTag};

use crate::binary::{check_depth, framed, read_count};
use crate::{registry, Result};

/// A node header as found on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHeader<'a> {
    pub name: &'a str,
    pub attribute_count: usize,
    pub child_count: usize,
    /// Bytes after the length prefix.
    pub length: u64,
    /// Absolute offset of the length prefix.
    pub offset: usize,
}

/// An attribute header as found on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeHeader<'a> {
    pub name: &'a str,
    pub tag: TypeTag,
    /// Bytes after the length prefix.
    pub length: u64,
    pub payload_length: u64,
    /// Absolute offset of the length prefix.
    pub offset: usize,
}

/// Callbacks for [`scan`]. Every method does nothing by default.
pub trait ScanVisitor<'a> {
    fn node_header(&mut self, _depth: usize, _header: &NodeHeader<'a>) {}

    fn attribute_header(&mut self, _depth: usize, _header: &AttributeHeader<'a>) {}

    /// Inspect an attribute payload. `payload` is bounded to exactly the
    /// declared payload bytes; whatever is left unread is skipped.
    fn attribute_payload(
        &mut self,
        _header: &AttributeHeader<'a>,
        _payload: &mut BinaryReader<'a>,
    ) -> Result<()> {
        Ok(())
    }

    fn attribute_done(&mut self, _depth: usize, _header: &AttributeHeader<'a>) {}

    fn node_done(&mut self, _depth: usize, _header: &NodeHeader<'a>) {}
}

/// Walk the node encoded at the start of `data`.
///
/// Returns the number of bytes the node occupies.
pub fn scan<'a, V: ScanVisitor<'a> + ?Sized>(data: &'a [u8], visitor: &mut V) -> Result<usize> {
    let mut reader = BinaryReader::new(data);
    scan_node(&mut reader, 0, 0, visitor)?;
    Ok(reader.position())
}

/// `base` is the absolute offset of `reader`'s first byte.
fn scan_node<'a, V: ScanVisitor<'a> + ?Sized>(
    reader: &mut BinaryReader<'a>,
    base: usize,
    depth: usize,
    visitor: &mut V,
) -> Result<()> {
    check_depth(depth)?;
    let offset = base + reader.position();
    let mut content = framed(reader)?;
    let content_base = base + reader.position() - content.len();

    let attribute_count = read_count(&mut content, "attribute")?;
    let child_count = read_count(&mut content, "child")?;
    let header = NodeHeader {
        name: content.read_dyn_str()?,
        attribute_count,
        child_count,
        length: content.len() as u64,
        offset,
    };
    visitor.node_header(depth, &header);

    for _ in 0..attribute_count {
        let offset = content_base + content.position();
        let mut attribute = framed(&mut content)?;
        let tag = attribute.read_tag()?;
        let name = attribute.read_dyn_str()?;
        let header = AttributeHeader {
            name,
            tag,
            length: attribute.len() as u64,
            payload_length: attribute.remaining() as u64,
            offset,
        };
        visitor.attribute_header(depth, &header);
        let mut payload = attribute.sub_reader(attribute.remaining())?;
        visitor.attribute_payload(&header, &mut payload)?;
        visitor.attribute_done(depth, &header);
    }

    for _ in 0..child_count {
        scan_node(&mut content, content_base, depth + 1, visitor)?;
    }

    visitor.node_done(depth, &header);
    Ok(())
}

/// Byte and count totals for one type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagTotals {
    pub count: u64,
    /// Framed size, including length prefix, tag and name.
    pub bytes: u64,
    pub payload_bytes: u64,
}

/// A visitor that totals what a payload is made of.
#[derive(Debug, Clone, Default)]
pub struct SizeAudit {
    pub nodes: u64,
    pub attributes: u64,
    pub max_depth: usize,
    pub total_bytes: u64,
    pub by_tag: BTreeMap<TypeTag, TagTotals>,
}

impl SizeAudit {
    /// Scan `data` and return the totals.
    pub fn of(data: &[u8]) -> Result<Self> {
        let mut audit = Self::default();
        audit.total_bytes = scan(data, &mut audit)? as u64;
        Ok(audit)
    }

    /// Attributes whose tag this build does not recognise.
    pub fn unknown_attributes(&self) -> u64 {
        self.by_tag
            .iter()
            .filter(|(tag, _)| !registry::is_known(**tag))
            .map(|(_, totals)| totals.count)
            .sum()
    }
}

impl<'a> ScanVisitor<'a> for SizeAudit {
    fn node_header(&mut self, depth: usize, _header: &NodeHeader<'a>) {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    fn attribute_header(&mut self, _depth: usize, header: &AttributeHeader<'a>) {
        self.attributes += 1;
        let totals = self.by_tag.entry(header.tag).or_default();
        totals.count += 1;
        totals.bytes += bento_common::length::length_size(header.length) + header.length;
        totals.payload_bytes += header.payload_length;
    }
}

impl fmt::Display for SizeAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes:      {}", self.nodes)?;
        writeln!(f, "Attributes: {}", self.attributes)?;
        writeln!(f, "Max depth:  {}", self.max_depth)?;
        writeln!(f, "Total size: {} bytes", self.total_bytes)?;
        writeln!(f)?;
        writeln!(f, "{:<6} {:>10} {:>12} {:>12}", "Type", "Count", "Bytes", "Payload")?;
        for (tag, totals) in &self.by_tag {
            let marker = if registry::is_known(*tag) { "" } else { " (unknown)" };
            writeln!(
                f,
                "{:<6} {:>10} {:>12} {:>12}{}",
                tag.as_str(),
                totals.count,
                totals.bytes,
                totals.payload_bytes,
                marker
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Node, Value};

    fn sample() -> Node {
        let mut root = Node::new("root");
        root.add_s32("a", 1).add_string("s", "xyz");
        let child = root.add_new_child("child");
        child.add_s32("b", 2);
        child.add_new_child("grandchild").add_bool("deep", true);
        root
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        strings: Vec<String>,
    }

    impl<'a> ScanVisitor<'a> for Recorder {
        fn node_header(&mut self, depth: usize, header: &NodeHeader<'a>) {
            self.events.push(format!("{depth}+{}", header.name));
        }

        fn attribute_header(&mut self, depth: usize, header: &AttributeHeader<'a>) {
            self.events.push(format!("{depth}@{}:{}", header.name, header.tag.as_str()));
        }

        fn attribute_payload(
            &mut self,
            header: &AttributeHeader<'a>,
            payload: &mut BinaryReader<'a>,
        ) -> Result<()> {
            if header.tag == registry::STRING {
                self.strings.push(payload.read_dyn_str()?.to_owned());
            }
            Ok(())
        }

        fn node_done(&mut self, depth: usize, header: &NodeHeader<'a>) {
            self.events.push(format!("{depth}-{}", header.name));
        }
    }

    #[test]
    fn test_event_order() {
        let bytes = sample().to_bytes().unwrap();
        let mut recorder = Recorder::default();
        let consumed = scan(&bytes, &mut recorder).unwrap();

        assert_eq!(consumed, bytes.len());
        assert_eq!(
            recorder.events,
            [
                "0+root",
                "0@a:s32",
                "0@s:str",
                "1+child",
                "1@b:s32",
                "2+grandchild",
                "2@deep:bool",
                "2-grandchild",
                "1-child",
                "0-root",
            ]
        );
        assert_eq!(recorder.strings, ["xyz"]);
    }

    #[test]
    fn test_offsets_point_at_frames() {
        struct Offsets(Vec<usize>);
        impl<'a> ScanVisitor<'a> for Offsets {
            fn node_header(&mut self, _depth: usize, header: &NodeHeader<'a>) {
                self.0.push(header.offset);
            }
        }

        let root = sample();
        let bytes = root.to_bytes().unwrap();
        let mut offsets = Offsets(Vec::new());
        scan(&bytes, &mut offsets).unwrap();

        let child_offset = offsets.0[1];
        let child = Node::from_bytes(&bytes[child_offset..]).unwrap();
        assert_eq!(&child, &root.children()[0]);
        let grandchild = Node::from_bytes(&bytes[offsets.0[2]..]).unwrap();
        assert_eq!(grandchild.name(), "grandchild");
    }

    #[test]
    fn test_size_audit() {
        let mut root = sample();
        root.add_value(
            "future",
            Value::Unknown {
                tag: TypeTag::new("v9"),
                data: vec![0; 10],
            },
        );
        let bytes = root.to_bytes().unwrap();
        let audit = SizeAudit::of(&bytes).unwrap();

        assert_eq!(audit.nodes, 3);
        assert_eq!(audit.attributes, 5);
        assert_eq!(audit.max_depth, 2);
        assert_eq!(audit.total_bytes, bytes.len() as u64);
        assert_eq!(audit.by_tag[&registry::S32].count, 2);
        assert_eq!(audit.by_tag[&registry::S32].payload_bytes, 8);
        assert_eq!(audit.unknown_attributes(), 1);
        assert!(audit.to_string().contains("v9"));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = sample().to_bytes().unwrap();
        let mut audit = SizeAudit::default();
        assert!(matches!(
            scan(&bytes[..bytes.len() - 3], &mut audit),
            Err(Error::MalformedBinaryLength { .. })
        ));
    }

    #[test]
    fn test_deep_nesting_stops_the_walk() {
        let bytes = crate::binary::nested_chain(100_000);
        let mut audit = SizeAudit::default();
        assert!(matches!(
            scan(&bytes, &mut audit),
            Err(Error::NestingTooDeep { .. })
        ));
        assert_eq!(audit.max_depth, crate::MAX_NESTING_DEPTH);
    }
}
