//! Height-balanced binary search tree of locations keyed by identifier

use std::cmp::Ordering;

use tracing::trace;

use super::error::{IndexError, InvariantViolation, Result};
use crate::models::Location;

type Link = Option<Box<AvlNode>>;

/// One tree node. Each node exclusively owns its children.
#[derive(Debug, Clone)]
pub struct AvlNode {
    location: Location,
    height: u32,
    left: Link,
    right: Link,
}

impl AvlNode {
    fn leaf(location: Location) -> Self {
        Self {
            location,
            height: 1,
            left: None,
            right: None,
        }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.location.id
    }

    /// Cached height of the subtree rooted here; a leaf has height 1
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn left(&self) -> Option<&AvlNode> {
        self.left.as_deref()
    }

    #[must_use]
    pub fn right(&self) -> Option<&AvlNode> {
        self.right.as_deref()
    }

    /// Left height minus right height
    #[must_use]
    pub fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance(link: &Link) -> i64 {
    link.as_ref().map_or(0, |node| node.balance_factor())
}

/// In-memory location index.
///
/// Lookups, inserts and deletes are `O(log n)`; every structural change
/// recomputes cached heights bottom-up and rotates wherever a balance
/// factor leaves `-1..=1`.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    root: Link,
    len: usize,
}

impl LocationIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, 0 when empty
    #[must_use]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    #[must_use]
    pub fn root(&self) -> Option<&AvlNode> {
        self.root.as_deref()
    }

    /// Insert a location under its identifier.
    ///
    /// An identifier that is already indexed is rejected with
    /// [`IndexError::DuplicateKey`] and the tree is left untouched.
    pub fn insert(&mut self, location: Location) -> Result<()> {
        insert_at(&mut self.root, location)?;
        self.len += 1;
        Ok(())
    }

    /// Exact-key lookup
    #[must_use]
    pub fn search(&self, id: &str) -> Option<&Location> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match id.cmp(node.key()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.location),
            };
        }
        None
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.search(id).is_some()
    }

    /// Remove a location and hand it back. Unknown identifiers leave the
    /// tree as it was.
    pub fn delete(&mut self, id: &str) -> Result<Location> {
        let removed = delete_at(&mut self.root, id).ok_or_else(|| IndexError::NotFound(id.to_string()))?;
        self.len -= 1;
        Ok(removed)
    }

    /// Check ordering, balance and cached heights of every node
    pub fn validate(&self) -> std::result::Result<(), InvariantViolation> {
        let mut count = 0;
        check(self.root.as_deref(), None, None, &mut count)?;
        if count != self.len {
            return Err(InvariantViolation::SizeMismatch {
                reported: self.len,
                actual: count,
            });
        }
        Ok(())
    }
}

fn insert_at(link: &mut Link, location: Location) -> Result<()> {
    match link {
        None => {
            *link = Some(Box::new(AvlNode::leaf(location)));
            return Ok(());
        }
        Some(node) => match location.id.cmp(&node.location.id) {
            Ordering::Less => insert_at(&mut node.left, location)?,
            Ordering::Greater => insert_at(&mut node.right, location)?,
            Ordering::Equal => return Err(IndexError::DuplicateKey(location.id)),
        },
    }
    rebalance(link);
    Ok(())
}

fn delete_at(link: &mut Link, id: &str) -> Option<Location> {
    let node = link.as_mut()?;
    let removed = match id.cmp(node.key()) {
        Ordering::Less => delete_at(&mut node.left, id),
        Ordering::Greater => delete_at(&mut node.right, id),
        Ordering::Equal => {
            let (removed, replacement) = detach(link.take()?);
            *link = replacement;
            Some(removed)
        }
    };
    if removed.is_some() {
        rebalance(link);
    }
    removed
}

/// Unlink `node`, returning its location and the subtree that takes its place
fn detach(mut node: Box<AvlNode>) -> (Location, Link) {
    match (node.left.take(), node.right.take()) {
        (None, None) => (node.location, None),
        (Some(child), None) | (None, Some(child)) => (node.location, Some(child)),
        (Some(left), Some(right)) => {
            let (successor, rest) = take_min(right);
            node.left = Some(left);
            node.right = rest;
            let removed = std::mem::replace(&mut node.location, successor);
            (removed, Some(node))
        }
    }
}

/// Remove the leftmost node of a subtree. Returns its location and the
/// rebalanced remainder.
fn take_min(mut node: Box<AvlNode>) -> (Location, Link) {
    match node.left.take() {
        None => {
            let right = node.right.take();
            (node.location, right)
        }
        Some(left) => {
            let (min, rest) = take_min(left);
            node.left = rest;
            let mut link = Some(node);
            rebalance(&mut link);
            (min, link)
        }
    }
}

/// Refresh the height at `link` and restore balance with at most two rotations
fn rebalance(link: &mut Link) {
    let Some(node) = link.as_mut() else {
        return;
    };
    node.update_height();
    let factor = node.balance_factor();
    assert!(
        (-2..=2).contains(&factor),
        "AVL invariant broken at {}: balance factor {factor}",
        node.key()
    );

    if factor > 1 {
        if balance(&node.left) < 0 {
            trace!(key = %node.key(), "left-right rotation");
            rotate_left(&mut node.left);
        } else {
            trace!(key = %node.key(), "left-left rotation");
        }
        rotate_right(link);
    } else if factor < -1 {
        if balance(&node.right) > 0 {
            trace!(key = %node.key(), "right-left rotation");
            rotate_right(&mut node.right);
        } else {
            trace!(key = %node.key(), "right-right rotation");
        }
        rotate_left(link);
    }
}

fn rotate_right(link: &mut Link) {
    let Some(mut root) = link.take() else {
        return;
    };
    let Some(mut pivot) = root.left.take() else {
        *link = Some(root);
        return;
    };
    root.left = pivot.right.take();
    root.update_height();
    pivot.right = Some(root);
    pivot.update_height();
    *link = Some(pivot);
}

fn rotate_left(link: &mut Link) {
    let Some(mut root) = link.take() else {
        return;
    };
    let Some(mut pivot) = root.right.take() else {
        *link = Some(root);
        return;
    };
    root.right = pivot.left.take();
    root.update_height();
    pivot.left = Some(root);
    pivot.update_height();
    *link = Some(pivot);
}

fn check<'a>(
    node: Option<&'a AvlNode>,
    lower: Option<&'a str>,
    upper: Option<&'a str>,
    count: &mut usize,
) -> std::result::Result<u32, InvariantViolation> {
    let Some(node) = node else {
        return Ok(0);
    };
    let key = node.key();
    if lower.is_some_and(|bound| key <= bound) || upper.is_some_and(|bound| key >= bound) {
        return Err(InvariantViolation::Unordered {
            key: key.to_string(),
        });
    }

    let left = check(node.left(), lower, Some(key), count)?;
    let right = check(node.right(), Some(key), upper, count)?;
    let actual = 1 + left.max(right);
    if node.height != actual {
        return Err(InvariantViolation::StaleHeight {
            key: key.to_string(),
            cached: node.height,
            actual,
        });
    }
    let balance = i64::from(left) - i64::from(right);
    if !(-1..=1).contains(&balance) {
        return Err(InvariantViolation::Unbalanced {
            key: key.to_string(),
            balance,
        });
    }

    *count += 1;
    Ok(actual)
}
