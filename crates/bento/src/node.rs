//! The node tree.

use std::mem;

use bento_common::TypeTag;

use crate::{names_equal, Attribute};

/// A named tree element owning its attributes and children.
///
/// A node's parent is whichever node holds it in its child list; there is no
/// back pointer. Use [`crate::NodeCursor`] to walk back up a tree.
///
/// Equality is structural: names, attributes in order, then children
/// recursively. Names compare exactly here; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Node {
    /// Create an empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Attributes in insertion order.
    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut [Attribute] {
        &mut self.attributes
    }

    /// Children in insertion order.
    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Whether the node has neither attributes nor children.
    pub fn is_leaf(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    pub(crate) fn reserve(&mut self, attributes: usize, children: usize) {
        self.attributes.reserve(attributes);
        self.children.reserve(children);
    }

    /// Append an attribute. Duplicate names are allowed.
    pub fn add_attribute(&mut self, attribute: Attribute) -> &mut Attribute {
        self.attributes.push(attribute);
        let last = self.attributes.len() - 1;
        &mut self.attributes[last]
    }

    /// Append a child, taking ownership of it.
    pub fn add_child(&mut self, child: Node) -> &mut Node {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append a new empty child and return it for population.
    pub fn add_new_child(&mut self, name: impl Into<String>) -> &mut Node {
        self.add_child(Node::new(name))
    }

    /// Detach every attribute, handing ownership to the caller.
    pub fn orphan_attributes(&mut self) -> Vec<Attribute> {
        mem::take(&mut self.attributes)
    }

    /// Detach every child, handing ownership to the caller.
    pub fn orphan_children(&mut self) -> Vec<Node> {
        mem::take(&mut self.children)
    }

    /// Detach the child at `index`. Later children shift down.
    pub fn orphan_child(&mut self, index: usize) -> Option<Node> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Detach the first child whose name matches.
    pub fn orphan_child_named(&mut self, name: &str) -> Option<Node> {
        let index = self.child_index(name)?;
        Some(self.children.remove(index))
    }

    /// Replace this node's contents with `other`'s, leaving `other` empty.
    ///
    /// The current attributes and children of `self` are dropped. Nothing is
    /// cloned.
    pub fn adopt_from(&mut self, other: &mut Node) {
        *self = mem::take(other);
    }

    /// Merge `source` into this node.
    ///
    /// The name is copied when `source` has one. An attribute with the same
    /// name and type is overwritten in place; anything else is appended. Each
    /// source child updates the first same-named child here, or is appended.
    ///
    /// Several same-named source children all fold into the first match, so
    /// the result need not equal `source` even when starting from empty.
    pub fn update_from(&mut self, source: &Node) {
        if !source.name.is_empty() {
            self.name.clone_from(&source.name);
        }

        for attribute in &source.attributes {
            match self.find_attribute_mut(attribute.name(), attribute.tag()) {
                Some(existing) => existing.replace_value(attribute.value().clone()),
                None => self.attributes.push(attribute.clone()),
            }
        }

        for child in &source.children {
            match self.find_node_mut(&child.name) {
                Some(existing) => existing.update_from(child),
                None => self.children.push(child.clone()),
            }
        }
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| names_equal(&child.name, name))
    }

    /// First child named `name` (case-insensitive).
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| names_equal(&child.name, name))
    }

    pub fn find_node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|child| names_equal(&child.name, name))
    }

    /// First child named `name` that also carries an attribute `(attr_name, attr_tag)`.
    pub fn find_node_with(&self, name: &str, attr_name: &str, attr_tag: TypeTag) -> Option<&Node> {
        self.children.iter().find(|child| {
            names_equal(&child.name, name) && child.find_attribute(attr_name, attr_tag).is_some()
        })
    }

    pub fn find_node_with_mut(
        &mut self,
        name: &str,
        attr_name: &str,
        attr_tag: TypeTag,
    ) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| {
            names_equal(&child.name, name) && child.find_attribute(attr_name, attr_tag).is_some()
        })
    }

    /// Every child named `name`, in order.
    pub fn find_nodes<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children
            .iter()
            .filter(move |child| names_equal(&child.name, name))
    }

    /// Follow a `/`-separated path of child names from this node.
    pub fn find_path(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.find_node(segment))
    }

    /// First attribute with this name and type.
    pub fn find_attribute(&self, name: &str, tag: TypeTag) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.is(name, tag))
    }

    pub fn find_attribute_mut(&mut self, name: &str, tag: TypeTag) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|attr| attr.is(name, tag))
    }

    /// First attribute with this name, whatever its type.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attr| names_equal(attr.name(), name))
    }

    /// Detach the first attribute with this name and type.
    pub fn remove_attribute(&mut self, name: &str, tag: TypeTag) -> Option<Attribute> {
        let index = self.attributes.iter().position(|attr| attr.is(name, tag))?;
        Some(self.attributes.remove(index))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}
