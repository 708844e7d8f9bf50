use super::avl::{AvlNode, LocationIndex};
use crate::models::Location;

/// Lazy in-order walk over an index, yielding locations by ascending id.
///
/// Holds at most one stack frame per tree level.
#[derive(Debug, Clone)]
pub struct Traverse<'a> {
    stack: Vec<&'a AvlNode>,
}

impl<'a> Traverse<'a> {
    fn new(root: Option<&'a AvlNode>) -> Self {
        let mut traverse = Self { stack: Vec::new() };
        traverse.push_left_spine(root);
        traverse
    }

    fn push_left_spine(&mut self, mut node: Option<&'a AvlNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a Location;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.location())
    }
}

impl LocationIndex {
    /// Start a fresh in-order traversal
    #[must_use]
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse::new(self.root())
    }
}

impl<'a> IntoIterator for &'a LocationIndex {
    type Item = &'a Location;
    type IntoIter = Traverse<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.traverse()
    }
}
