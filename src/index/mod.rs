//! Location index
//!
//! An AVL tree keyed by location identifier with:
//! - exact-key search, insert and delete with rebalancing
//! - lazy in-order traversal
//! - nearest-location scan over the traversal

pub mod avl;
pub mod error;
pub mod nearest;
pub mod traverse;

pub use avl::{AvlNode, LocationIndex};
pub use error::{IndexError, InvariantViolation};
pub use nearest::{DistanceMetric, Nearest};
pub use traverse::Traverse;
