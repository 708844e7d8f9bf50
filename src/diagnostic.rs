//! Read-only description of the index shape, served for inspection

use serde::Serialize;

use crate::index::{AvlNode, LocationIndex};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeDescription {
    pub size: usize,
    pub height: u32,
    pub root: Option<NodeDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDescription {
    pub id: String,
    pub name: String,
    /// Distance from the root, which sits at depth 0
    pub depth: u32,
    pub height: u32,
    pub balance: i64,
    pub left: Option<Box<NodeDescription>>,
    pub right: Option<Box<NodeDescription>>,
}

#[must_use]
pub fn render(index: &LocationIndex) -> TreeDescription {
    TreeDescription {
        size: index.len(),
        height: index.height(),
        root: index.root().map(|root| describe(root, 0)),
    }
}

fn describe(node: &AvlNode, depth: u32) -> NodeDescription {
    NodeDescription {
        id: node.key().to_string(),
        name: node.location().name.clone(),
        depth,
        height: node.height(),
        balance: node.balance_factor(),
        left: node.left().map(|child| Box::new(describe(child, depth + 1))),
        right: node.right().map(|child| Box::new(describe(child, depth + 1))),
    }
}
