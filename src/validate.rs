use crate::error::TreeError;
use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::rbtree::RbTree;

/// Shape statistics of a valid tree, returned by [`RbTree::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Number of entries
    pub len: usize,
    /// Nodes on the longest root-to-leaf path
    pub height: usize,
    /// Black nodes on every root-to-leaf path, the root included
    pub black_height: usize,
}

impl<K, V, Ix> RbTree<K, V, Ix>
where
    K: Ord,
    Ix: IndexType,
{
    /// Validate the red-black tree and return its shape statistics.
    ///
    /// * The root is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Keys are in sorted order.
    /// * Every child links back to its parent, the root to none.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// for k in 0..100 {
    ///     tree.insert(k, ());
    /// }
    /// let stats = tree.validate().unwrap();
    /// assert_eq!(stats.len, 100);
    /// assert!(stats.height <= 2 * 7);
    /// ```
    pub fn validate(&self) -> Result<Stats, TreeError> {
        if self.node_ref(self.root, Node::is_red) {
            return Err(TreeError::RedRoot);
        }
        if !self.root.is_sentinel() && !self.parent_ref(self.root, Node::is_sentinel) {
            return Err(TreeError::BrokenParentLink { depth: 0 });
        }
        let mut found = 0;
        let (black_height, height) =
            self.validate_subtree(self.root, 0, (None, None), &mut found)?;
        if found != self.len {
            return Err(TreeError::LengthMismatch {
                expected: self.len,
                found,
            });
        }
        Ok(Stats {
            len: found,
            height,
            black_height,
        })
    }

    /// Returns the black height and the height of the subtree of `x`, whose keys
    /// must lie strictly between `lower` and `upper`.
    fn validate_subtree<'a>(
        &'a self,
        x: NodeIndex<Ix>,
        depth: usize,
        (lower, upper): (Option<&'a K>, Option<&'a K>),
        found: &mut usize,
    ) -> Result<(usize, usize), TreeError> {
        if x.is_sentinel() {
            return Ok((0, 0));
        }
        *found += 1;
        let (key, left, right, red) =
            self.node_ref(x, |xn| (xn.key(), xn.left(), xn.right(), xn.is_red()));
        if lower.is_some_and(|lo| lo >= key) || upper.is_some_and(|hi| hi <= key) {
            return Err(TreeError::Unordered { depth });
        }

        for child in [left, right] {
            if child.is_sentinel() {
                continue;
            }
            if self.node_ref(child, Node::parent) != x {
                return Err(TreeError::BrokenParentLink { depth: depth + 1 });
            }
            if red && self.node_ref(child, Node::is_red) {
                return Err(TreeError::ConsecutiveReds { depth: depth + 1 });
            }
        }

        let (lblacks, lheight) =
            self.validate_subtree(left, depth + 1, (lower, Some(key)), found)?;
        let (rblacks, rheight) =
            self.validate_subtree(right, depth + 1, (Some(key), upper), found)?;
        if lblacks != rblacks {
            return Err(TreeError::UnbalancedBlacks {
                depth,
                left: lblacks,
                right: rblacks,
            });
        }
        let blacks = if red { lblacks } else { lblacks + 1 };
        Ok((blacks, lheight.max(rheight) + 1))
    }
}
