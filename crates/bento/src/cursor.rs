//! Upward navigation over a borrowed tree.

use crate::Node;

/// A position in a tree that remembers how it got there.
///
/// Nodes do not point at their parents, so the cursor keeps the chain of
/// ancestors from the root it was created at down to the current node.
#[derive(Debug, Clone)]
pub struct NodeCursor<'a> {
    // Never empty; the last entry is the current node.
    chain: Vec<&'a Node>,
}

impl<'a> NodeCursor<'a> {
    /// Start at `root`, depth 0.
    pub fn new(root: &'a Node) -> Self {
        Self { chain: vec![root] }
    }

    /// The node under the cursor.
    pub fn node(&self) -> &'a Node {
        self.chain[self.chain.len() - 1]
    }

    /// The node that holds the current node, if the cursor has descended.
    pub fn parent(&self) -> Option<&'a Node> {
        self.chain.len().checked_sub(2).map(|i| self.chain[i])
    }

    /// Number of steps below the starting node.
    pub fn depth(&self) -> usize {
        self.chain.len() - 1
    }

    /// Ancestors from the parent up to the starting node.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.chain.iter().rev().skip(1).copied()
    }

    /// Node names from the starting node down, joined with `/`.
    pub fn path(&self) -> String {
        self.chain
            .iter()
            .map(|node| node.name())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Move to the child at `index`. Returns `false` and stays put if there
    /// is none.
    pub fn descend(&mut self, index: usize) -> bool {
        match self.node().children().get(index) {
            Some(child) => {
                self.chain.push(child);
                true
            }
            None => false,
        }
    }

    /// Move to the first child named `name` (case-insensitive).
    pub fn descend_named(&mut self, name: &str) -> bool {
        match self.node().find_node(name) {
            Some(child) => {
                self.chain.push(child);
                true
            }
            None => false,
        }
    }

    /// Move back to the parent. Returns `false` at the starting node.
    pub fn ascend(&mut self) -> bool {
        if self.chain.len() > 1 {
            self.chain.pop();
            true
        } else {
            false
        }
    }

    /// Visit every node of the subtree under the cursor in depth-first
    /// pre-order, with the cursor positioned on it.
    pub fn walk(&mut self, visit: &mut impl FnMut(&NodeCursor<'a>)) {
        visit(self);
        for index in 0..self.node().children().len() {
            self.descend(index);
            self.walk(visit);
            self.ascend();
        }
    }
}
