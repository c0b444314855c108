use thiserror::Error;

pub type Result<T> = std::result::Result<T, MerkleError>;

/// Every failure the trees, configs and proofs can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// The tree has no leaves to commit to.
    #[error("leaves is empty")]
    EmptyTree,

    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    InvalidIndex { index: usize, leaf_count: usize },

    #[error("binary tree nodes must have 1 or 2 children, got {0}")]
    InvalidChildCount(usize),

    #[error("nested structure exceeds the maximum depth of {0}")]
    DepthLimitExceeded(usize),

    #[error("invalid proof shape: {0}")]
    InvalidProofShape(String),

    #[error("hash algorithm {0} is not supported")]
    UnsupportedHashAlgorithm(String),
}
