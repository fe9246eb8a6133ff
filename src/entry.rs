use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::rbtree::RbTree;

/// A view into a single entry in a tree, which may either be vacant or occupied.
#[derive(Debug)]
pub enum Entry<'a, K, V, Ix> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, Ix>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, Ix>),
}

/// A view into an occupied entry in a `RbTree`.
/// It is part of the [`Entry`] enum.
#[derive(Debug)]
pub struct OccupiedEntry<'a, K, V, Ix> {
    /// Reference to the tree
    pub(crate) tree_ref: &'a mut RbTree<K, V, Ix>,
    /// The entry node
    pub(crate) node_idx: NodeIndex<Ix>,
}

/// A view into a vacant entry in a `RbTree`.
/// It is part of the [`Entry`] enum.
#[derive(Debug)]
pub struct VacantEntry<'a, K, V, Ix> {
    /// Mutable reference to the tree
    pub(crate) tree_ref: &'a mut RbTree<K, V, Ix>,
    /// The key of this entry
    pub(crate) key: K,
}

impl<'a, K, V, Ix> Entry<'a, K, V, Ix>
where
    K: Ord,
    Ix: IndexType,
{
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Entry, RbTree};
    ///
    /// let mut tree = RbTree::new();
    /// assert!(matches!(tree.entry(1), Entry::Vacant(_)));
    /// *tree.entry(1).or_insert(3) += 1;
    /// assert!(matches!(tree.entry(1), Entry::Occupied(_)));
    /// assert_eq!(tree.find(&1), Some(&4));
    /// ```
    #[inline]
    pub fn or_insert(self, default: V) -> &'a mut V {
        self.or_insert_with(|| default)
    }

    /// Ensures a value is in the entry by inserting the result of `default` if empty.
    #[inline]
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.tree_ref.node_mut(entry.node_idx, Node::value_mut),
            Entry::Vacant(entry) => {
                // a fresh node always lands at the end of the arena
                let entry_idx = NodeIndex::new(entry.tree_ref.nodes.len());
                let _ignore = entry.tree_ref.insert(entry.key, default());
                entry.tree_ref.node_mut(entry_idx, Node::value_mut)
            }
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the tree.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    ///
    /// tree.insert(6, 3);
    /// let _ = tree.entry(6).and_modify(|v| *v += 1);
    /// let _ = tree.entry(7).and_modify(|v| *v += 1);
    /// assert_eq!(tree.find(&6), Some(&4));
    /// assert_eq!(tree.find(&7), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(entry) => {
                f(entry.tree_ref.node_mut(entry.node_idx, Node::value_mut));
                Self::Occupied(entry)
            }
            Entry::Vacant(entry) => Self::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    #[inline]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.tree_ref.node_ref(entry.node_idx, Node::key),
            Entry::Vacant(entry) => &entry.key,
        }
    }
}
