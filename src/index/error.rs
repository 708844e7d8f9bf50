use thiserror::Error;

/// Recoverable outcomes of index operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Key not found: {0}")]
    NotFound(String),
}

/// A broken tree. Only produced by `LocationIndex::validate`; the tree
/// operations themselves abort instead of returning one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Key {key} is out of order under its ancestors")]
    Unordered { key: String },

    #[error("Node {key} has balance factor {balance}")]
    Unbalanced { key: String, balance: i64 },

    #[error("Node {key} caches height {cached}, actual height is {actual}")]
    StaleHeight { key: String, cached: u32, actual: u32 },

    #[error("Index reports {reported} entries but holds {actual}")]
    SizeMismatch { reported: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, IndexError>;
