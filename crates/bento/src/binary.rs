//! Binary wire format for node trees.
//!
//! ```text
//! Node      := DynLen S32(attrCount) S32(childCount) DynStr(name) Attribute* Node*
//! Attribute := DynLen Tag4 DynStr(name) Payload
//! ```
//!
//! `DynLen` is the length of the content that follows it. Every frame is
//! decoded through a bounded reader, so a malformed payload can never consume
//! bytes belonging to its siblings.

use std::io::Write;

use bento_common::length::length_size;
use bento_common::{dyn_str_size, BinaryReader, WriteExt};

use crate::{Attribute, Error, Node, Result};

/// Width of the attribute and child counts in a node header.
pub(crate) const COUNT_SIZE: u64 = 4;

/// Deepest node accepted by the decoders. The root is at depth 0.
pub const MAX_NESTING_DEPTH: usize = 1024;

pub(crate) fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }
    Ok(())
}

/// Read a dynamic length and split off a reader over exactly that many bytes.
pub(crate) fn framed<'a>(reader: &mut BinaryReader<'a>) -> Result<BinaryReader<'a>> {
    let declared = reader.read_length()?;
    let available = reader.remaining() as u64;
    if declared > available {
        return Err(Error::MalformedBinaryLength {
            declared,
            available,
        });
    }
    // declared <= remaining, so it fits in usize.
    Ok(reader.sub_reader(declared as usize)?)
}

/// Read a node header count, rejecting negative values.
pub(crate) fn read_count(reader: &mut BinaryReader<'_>, what: &'static str) -> Result<usize> {
    let count = reader.read_i32()?;
    usize::try_from(count).map_err(|_| Error::InvalidCount { what, count })
}

fn write_count<W: Write + ?Sized>(writer: &mut W, count: usize, what: &'static str) -> Result<()> {
    let count = i32::try_from(count).map_err(|_| Error::InvalidCount {
        what,
        count: i32::MAX,
    })?;
    Ok(writer.write_count(count)?)
}

impl Node {
    /// Size of everything after this node's length prefix.
    fn content_size(&self) -> u64 {
        2 * COUNT_SIZE
            + dyn_str_size(self.name())
            + self
                .attributes()
                .iter()
                .map(Attribute::binary_size)
                .sum::<u64>()
            + self.children().iter().map(Node::binary_size).sum::<u64>()
    }

    /// Encoded size of this subtree including its length prefix.
    pub fn binary_size(&self) -> u64 {
        let content = self.content_size();
        length_size(content) + content
    }

    /// Encode this subtree to a writer.
    pub fn write_binary<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_length(self.content_size())?;
        write_count(writer, self.attributes().len(), "attribute")?;
        write_count(writer, self.children().len(), "child")?;
        writer.write_dyn_str(self.name())?;
        for attribute in self.attributes() {
            attribute.write_binary(writer)?;
        }
        for child in self.children() {
            child.write_binary(writer)?;
        }
        Ok(())
    }

    /// Encode this subtree into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(self.binary_size() as usize);
        self.write_binary(&mut output)?;
        Ok(output)
    }

    /// Decode one node (and its subtree) from a reader.
    ///
    /// Bytes left inside the node's frame after its last child are skipped.
    /// Trees nested deeper than [`MAX_NESTING_DEPTH`] are rejected.
    pub fn read_binary(reader: &mut BinaryReader<'_>) -> Result<Self> {
        read_node(reader, 0)
    }

    /// Decode a node from a complete buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Node::read_binary(&mut reader)
    }
}

fn read_node(reader: &mut BinaryReader<'_>, depth: usize) -> Result<Node> {
    check_depth(depth)?;
    let mut content = framed(reader)?;
    let attribute_count = read_count(&mut content, "attribute")?;
    let child_count = read_count(&mut content, "child")?;
    let name = content.read_dyn_str()?;

    let mut node = Node::new(name);
    // Each entry takes at least one byte, so the frame bounds preallocation.
    node.reserve(
        attribute_count.min(content.remaining()),
        child_count.min(content.remaining()),
    );
    for _ in 0..attribute_count {
        node.add_attribute(Attribute::read_binary(&mut content)?);
    }
    for _ in 0..child_count {
        node.add_child(read_node(&mut content, depth + 1)?);
    }
    Ok(node)
}

/// A chain of `depth` single-child nodes named `n`, written without recursion.
#[cfg(test)]
pub(crate) fn nested_chain(depth: usize) -> Vec<u8> {
    let leaf = 2 * COUNT_SIZE + dyn_str_size("n");
    let mut sizes = vec![leaf];
    for _ in 1..depth {
        let inner = sizes[sizes.len() - 1];
        sizes.push(leaf + length_size(inner) + inner);
    }
    let mut out = Vec::new();
    for (level, &size) in sizes.iter().rev().enumerate() {
        out.write_length(size).unwrap();
        out.write_count(0).unwrap();
        out.write_count(i32::from(level + 1 < depth)).unwrap();
        out.write_dyn_str("n").unwrap();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use bento_common::{IPoint, Instant, TypeTag};
    use proptest::prelude::*;

    fn person() -> Node {
        let mut person = Node::new("person");
        person.add_s32("age", 30);
        person.add_new_child("address").add_string("city", "Oakland");
        person
    }

    #[test]
    fn test_person_scenario() {
        let person = person();
        let bytes = person.to_bytes().unwrap();
        assert_eq!(bytes.len() as u64, person.binary_size());

        let decoded = Node::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, person);
        assert_eq!(decoded.get_s32("age").unwrap(), 30);
        let address = decoded.find_node("ADDRESS").unwrap();
        assert_eq!(address.get_string("city").unwrap(), "Oakland");
    }

    #[test]
    fn test_node_header_layout() {
        let bytes = Node::new("n").to_bytes().unwrap();
        assert_eq!(bytes, [10, 0, 0, 0, 0, 0, 0, 0, 0, 1, b'n']);
    }

    #[test]
    fn test_unknown_attribute_survives_re_encode() {
        let mut node = Node::new("root");
        node.add_attribute(Attribute::new(
            "future",
            Value::Unknown {
                tag: TypeTag::new("v2x "),
                data: vec![9, 8, 7],
            },
        ));
        node.add_s32("after", 1);
        let bytes = node.to_bytes().unwrap();

        let decoded = Node::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.get_s32("after").unwrap(), 1);
        assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_declared_length_past_end() {
        let mut bytes = person().to_bytes().unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            Node::from_bytes(&bytes),
            Err(Error::MalformedBinaryLength { .. })
        ));
    }

    #[test]
    fn test_negative_count() {
        let bytes = [10, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 1, b'n'];
        assert!(matches!(
            Node::from_bytes(&bytes),
            Err(Error::InvalidCount { what: "attribute", count: -1 })
        ));
    }

    #[test]
    fn test_large_subtree_uses_wide_lengths() {
        let mut root = Node::new("root");
        for i in 0..100 {
            root.add_new_child(format!("child{i}"))
                .add_ipolygon("shape", vec![IPoint::new(i, i); 10]);
        }
        root.add_instant("when", Instant::from_micros(42));
        let bytes = root.to_bytes().unwrap();
        assert!(bytes.len() > u16::MAX as usize / 8);
        assert_eq!(Node::from_bytes(&bytes).unwrap(), root);
    }

    #[test]
    fn test_nesting_limit() {
        let root = Node::from_bytes(&nested_chain(MAX_NESTING_DEPTH + 1)).unwrap();
        let mut node = &root;
        let mut depth = 0;
        while let Some(child) = node.children().first() {
            node = child;
            depth += 1;
        }
        assert_eq!(depth, MAX_NESTING_DEPTH);

        assert!(matches!(
            Node::from_bytes(&nested_chain(MAX_NESTING_DEPTH + 2)),
            Err(Error::NestingTooDeep { limit: MAX_NESTING_DEPTH })
        ));
    }

    #[test]
    fn test_hostile_nesting_is_an_error() {
        let bytes = nested_chain(100_000);
        assert!(matches!(
            Node::from_bytes(&bytes),
            Err(Error::NestingTooDeep { .. })
        ));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i8>().prop_map(Value::S8),
            any::<u16>().prop_map(Value::U16),
            any::<i32>().prop_map(Value::S32),
            any::<u64>().prop_map(Value::U64),
            any::<bool>().prop_map(Value::Bool),
            any::<char>().prop_map(Value::Char),
            (-1.0e9f64..1.0e9).prop_map(Value::Double),
            ".*".prop_map(Value::string),
            prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Binary),
            prop::collection::vec(any::<i64>(), 0..16).prop_map(Value::S64Array),
            prop::collection::vec(".*", 0..8).prop_map(Value::StringArray),
        ]
    }

    fn arb_node() -> impl Strategy<Value = Node> {
        let leaf = (
            "[a-z]{0,8}",
            prop::collection::vec(("[a-zA-Z]{1,6}", arb_value()), 0..6),
        )
            .prop_map(|(name, attributes)| {
                let mut node = Node::new(name);
                for (attr_name, value) in attributes {
                    node.add_attribute(Attribute::new(attr_name, value));
                }
                node
            });
        leaf.prop_recursive(3, 24, 4, |inner| {
            (inner.clone(), prop::collection::vec(inner, 0..4)).prop_map(|(mut node, children)| {
                for child in children {
                    node.add_child(child);
                }
                node
            })
        })
    }

    proptest! {
        #[test]
        fn prop_binary_round_trip(node in arb_node()) {
            let bytes = node.to_bytes().unwrap();
            prop_assert_eq!(bytes.len() as u64, node.binary_size());
            prop_assert_eq!(Node::from_bytes(&bytes).unwrap(), node);
        }
    }
}
