use thiserror::Error;

/// Invariant violations reported by [`RbTree::validate`](crate::RbTree::validate).
///
/// `depth` counts edges from the root, so the root sits at depth 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TreeError {
    /// The root is colored red.
    #[error("root node is red")]
    RedRoot,
    /// A red node has a red child.
    #[error("consecutive red nodes at depth {depth}")]
    ConsecutiveReds { depth: usize },
    /// The two subtrees of a node carry different black heights.
    #[error("unbalanced blacks at depth {depth}, left: {left} right: {right}")]
    UnbalancedBlacks {
        depth: usize,
        left: usize,
        right: usize,
    },
    /// A child key is not on the correct side of its parent key.
    #[error("keys out of order at depth {depth}")]
    Unordered { depth: usize },
    /// A child does not point back to the node that links to it.
    #[error("broken parent link at depth {depth}")]
    BrokenParentLink { depth: usize },
    /// The cached element count differs from the number of reachable nodes.
    #[error("length mismatch, expected {expected} found {found}")]
    LengthMismatch { expected: usize, found: usize },
}
