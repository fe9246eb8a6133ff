use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::trace;

use crate::entry::{Entry, OccupiedEntry, VacantEntry};
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::{IntoIter, Iter, PostOrder, PreOrder, Values};
use crate::node::{Color, Node};

/// An ordered key-value map backed by a red-black tree.
///
/// Nodes are stored in a vector and linked by indices, slot 0 being the black
/// sentinel that stands in for every absent child and for the root's parent.
#[derive(Debug)]
pub struct RbTree<K, V, Ix = DefaultIx> {
    /// Vector that stores nodes
    pub(crate) nodes: Vec<Node<K, V, Ix>>,
    /// Root of the tree
    pub(crate) root: NodeIndex<Ix>,
    /// Number of elements in the tree
    pub(crate) len: usize,
}

impl<K, V, Ix> RbTree<K, V, Ix>
where
    K: Ord,
    Ix: IndexType,
{
    /// Creates a new `RbTree` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node::new_sentinel());
        RbTree {
            nodes,
            root: NodeIndex::sentinel(),
            len: 0,
        }
    }

    /// Insert a key-value pair into the tree.
    /// If the key exists, overwrite and return the previous value.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// assert_eq!(tree.insert(7, "a"), None);
    /// assert_eq!(tree.insert(7, "b"), Some("a"));
    /// assert_eq!(tree.find(&7), Some(&"b"));
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut y = NodeIndex::sentinel();
        let mut x = self.root;
        let mut to_left = false;
        while !self.node_ref(x, Node::is_sentinel) {
            y = x;
            match key.cmp(self.node_ref(x, Node::key)) {
                Ordering::Less => {
                    to_left = true;
                    x = self.node_ref(x, Node::left);
                }
                Ordering::Greater => {
                    to_left = false;
                    x = self.node_ref(x, Node::right);
                }
                Ordering::Equal => {
                    trace!(node = ?x, "insert overwrites existing key");
                    return Some(self.node_mut(x, Node::set_value(value)));
                }
            }
        }

        let z = NodeIndex::new(self.nodes.len());
        // check for max capacity, except if we use usize
        assert!(
            <Ix as IndexType>::max().index() == !0 || NodeIndex::end() != z,
            "Reached maximum number of nodes"
        );
        self.nodes.push(Node::new_leaf(key, value));
        self.node_mut(z, Node::set_parent(y));
        if self.node_ref(y, Node::is_sentinel) {
            self.root = z;
        } else if to_left {
            self.node_mut(y, Node::set_left(z));
        } else {
            self.node_mut(y, Node::set_right(z));
        }
        trace!(node = ?z, parent = ?y, "insert attaches new node");

        self.insert_fixup(z);
        self.len += 1;
        None
    }

    /// Return a reference to the value stored for the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(1, "one");
    /// tree.insert(7, "seven");
    /// assert_eq!(tree.find(&7), Some(&"seven"));
    /// assert_eq!(tree.find(&5), None);
    /// ```
    #[inline]
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).map(|idx| self.node_ref(idx, Node::value))
    }

    /// Return a mutable reference to the value stored for the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert("hits", 0);
    /// if let Some(v) = tree.find_mut("hits") {
    ///     *v += 1;
    /// }
    /// assert_eq!(tree.find("hits"), Some(&1));
    /// ```
    #[inline]
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key)
            .map(|idx| self.node_mut(idx, Node::value_mut))
    }

    /// Return `true` if the tree holds the key.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Remove a key from the tree, returning the value at the key if the key exists
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(1, 'a');
    /// tree.insert(2, 'b');
    /// assert_eq!(tree.remove(&3), None);
    /// assert_eq!(tree.remove(&2), Some('b'));
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(node_idx) = self.search(key) else {
            trace!("remove misses");
            return None;
        };
        let unlinked = self.remove_inner(node_idx);
        // Swap the node with the last node stored in the vector and update indices
        let mut node = self.nodes.swap_remove(unlinked.index());
        let old = NodeIndex::<Ix>::new(self.nodes.len());
        self.update_idx(old, unlinked);
        self.len -= 1;

        node.value.take()
    }

    /// Remove a key from the tree, returning `true` if a node was removed.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(40, "am");
    /// assert!(tree.delete(&40));
    /// assert!(!tree.delete(&40));
    /// ```
    #[inline]
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Return the entry with the smallest key.
    #[inline]
    pub fn first(&self) -> Option<(&K, &V)> {
        if self.is_empty() {
            return None;
        }
        let x = self.tree_minimum(self.root);
        Some(self.node_ref(x, Node::entry))
    }

    /// Return the entry with the largest key.
    #[inline]
    pub fn last(&self) -> Option<(&K, &V)> {
        if self.is_empty() {
            return None;
        }
        let x = self.tree_maximum(self.root);
        Some(self.node_ref(x, Node::entry))
    }

    /// Get the given key's corresponding entry in the tree for in-place manipulation.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Entry, RbTree};
    ///
    /// let mut tree = RbTree::new();
    ///
    /// assert!(matches!(tree.entry("k"), Entry::Vacant(_)));
    /// tree.entry("k").or_insert(0);
    /// assert!(matches!(tree.entry("k"), Entry::Occupied(_)));
    /// tree.entry("k").and_modify(|v| *v += 1);
    /// assert_eq!(tree.find("k"), Some(&1));
    /// ```
    #[inline]
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, Ix> {
        match self.search(&key) {
            Some(node_idx) => Entry::Occupied(OccupiedEntry {
                tree_ref: self,
                node_idx,
            }),
            None => Entry::Vacant(VacantEntry {
                tree_ref: self,
                key,
            }),
        }
    }
}

impl<K, V, Ix> RbTree<K, V, Ix>
where
    Ix: IndexType,
{
    /// Get an iterator over the entries of the tree, sorted by key.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, Ix> {
        Iter::new(self)
    }

    /// Get an iterator visiting each node before its left and right subtrees.
    #[inline]
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_, K, V, Ix> {
        PreOrder::new(self)
    }

    /// Get an iterator visiting each node after its left and right subtrees.
    #[inline]
    #[must_use]
    pub fn post_order(&self) -> PostOrder<'_, K, V, Ix> {
        PostOrder::new(self)
    }

    /// Values in ascending key order.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    /// let values: Vec<_> = tree.traverse_in_order().copied().collect();
    /// assert_eq!(values, ["a", "b", "c"]);
    /// ```
    #[inline]
    #[must_use]
    pub fn traverse_in_order(&self) -> Values<Iter<'_, K, V, Ix>> {
        Values::new(self.iter())
    }

    /// Values in pre-order.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    /// let values: Vec<_> = tree.traverse_pre_order().copied().collect();
    /// assert_eq!(values, ["b", "a", "c"]);
    /// ```
    #[inline]
    #[must_use]
    pub fn traverse_pre_order(&self) -> Values<PreOrder<'_, K, V, Ix>> {
        Values::new(self.pre_order())
    }

    /// Values in post-order.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    /// let values: Vec<_> = tree.traverse_post_order().copied().collect();
    /// assert_eq!(values, ["a", "c", "b"]);
    /// ```
    #[inline]
    #[must_use]
    pub fn traverse_post_order(&self) -> Values<PostOrder<'_, K, V, Ix>> {
        Values::new(self.post_order())
    }

    /// Number of nodes on the longest root-to-leaf path, 0 for an empty tree.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height_inner(self.root)
    }

    /// Remove all elements from the tree
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.root = NodeIndex::sentinel();
        self.len = 0;
    }

    /// Return the number of elements in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the tree contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn height_inner(&self, x: NodeIndex<Ix>) -> usize {
        if x.is_sentinel() {
            return 0;
        }
        let lh = self.height_inner(self.node_ref(x, Node::left));
        let rh = self.height_inner(self.node_ref(x, Node::right));
        lh.max(rh) + 1
    }

    /// Find the node with the minimum key in the subtree of `x`.
    pub(crate) fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.left_ref(x, Node::is_sentinel) {
            x = self.node_ref(x, Node::left);
        }
        x
    }

    /// Find the node with the maximum key in the subtree of `x`.
    fn tree_maximum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.right_ref(x, Node::is_sentinel) {
            x = self.node_ref(x, Node::right);
        }
        x
    }
}

impl<K, V> RbTree<K, V>
where
    K: Ord,
{
    /// Create an empty `RbTree`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new_sentinel()],
            root: NodeIndex::sentinel(),
            len: 0,
        }
    }
}

impl<K, V> Default for RbTree<K, V>
where
    K: Ord,
{
    #[inline]
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<K, V, Ix> IntoIterator for RbTree<K, V, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, K, V, Ix> IntoIterator for &'a RbTree<K, V, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, Ix> RbTree<K, V, Ix>
where
    K: Ord,
    Ix: IndexType,
{
    /// Search for the node holding exactly the given key
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<NodeIndex<Ix>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut x = self.root;
        while !self.node_ref(x, Node::is_sentinel) {
            match key.cmp(self.node_ref(x, Node::key).borrow()) {
                Ordering::Less => x = self.node_ref(x, Node::left),
                Ordering::Greater => x = self.node_ref(x, Node::right),
                Ordering::Equal => return Some(x),
            }
        }
        None
    }

    /// Unlink a node from the tree and return the arena slot that is now detached.
    ///
    /// A node with two children trades its entry with its in-order successor,
    /// which is unlinked in its place.
    fn remove_inner(&mut self, mut z: NodeIndex<Ix>) -> NodeIndex<Ix> {
        if !self.left_ref(z, Node::is_sentinel) && !self.right_ref(z, Node::is_sentinel) {
            let y = self.tree_minimum(self.node_ref(z, Node::right));
            self.swap_entries(z, y);
            z = y;
        }

        let x = if self.left_ref(z, Node::is_sentinel) {
            self.node_ref(z, Node::right)
        } else {
            self.node_ref(z, Node::left)
        };
        let p = self.node_ref(z, Node::parent);
        self.transplant(z, x);
        trace!(node = ?z, parent = ?p, "remove unlinks node");

        if self.node_ref(z, Node::is_black) {
            self.remove_fixup(x, p);
        }
        z
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        while self.parent_ref(z, Node::is_red) {
            if self.is_left_child(self.node_ref(z, Node::parent)) {
                let y = self.grand_parent_ref(z, Node::right);
                if self.node_ref(y, Node::is_red) {
                    trace!(node = ?z, "insert fixup: red uncle");
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_right_child(z) {
                        trace!(node = ?z, "insert fixup: inner child");
                        z = self.node_ref(z, Node::parent);
                        self.left_rotate(z);
                    }
                    trace!(node = ?z, "insert fixup: outer child");
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.right_rotate(self.parent_ref(z, Node::parent));
                }
            } else {
                let y = self.grand_parent_ref(z, Node::left);
                if self.node_ref(y, Node::is_red) {
                    trace!(node = ?z, "insert fixup: red uncle");
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_left_child(z) {
                        trace!(node = ?z, "insert fixup: inner child");
                        z = self.node_ref(z, Node::parent);
                        self.right_rotate(z);
                    }
                    trace!(node = ?z, "insert fixup: outer child");
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.left_rotate(self.parent_ref(z, Node::parent));
                }
            }
        }
        self.node_mut(self.root, Node::set_color(Color::Black));
    }

    /// Restore red-black tree properties after a black node was unlinked.
    ///
    /// `x` may be the sentinel, so its parent `p` is tracked separately.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>, mut p: NodeIndex<Ix>) {
        while x != self.root && self.node_ref(x, Node::is_black) {
            let mut w;
            if self.node_ref(p, Node::left) == x {
                w = self.node_ref(p, Node::right);
                debug_assert!(!w.is_sentinel(), "black deficit without a sibling");
                if self.node_ref(w, Node::is_red) {
                    trace!(node = ?x, "remove fixup: red sibling");
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.node_mut(p, Node::set_color(Color::Red));
                    self.left_rotate(p);
                    w = self.node_ref(p, Node::right);
                }
                if self.left_ref(w, Node::is_black) && self.right_ref(w, Node::is_black) {
                    trace!(node = ?x, "remove fixup: black nephews");
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = p;
                    p = self.node_ref(x, Node::parent);
                } else {
                    if self.right_ref(w, Node::is_black) {
                        trace!(node = ?x, "remove fixup: red near nephew");
                        self.left_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.right_rotate(w);
                        w = self.node_ref(p, Node::right);
                    }
                    trace!(node = ?x, "remove fixup: red far nephew");
                    self.node_mut(w, Node::set_color(self.node_ref(p, Node::color)));
                    self.node_mut(p, Node::set_color(Color::Black));
                    self.right_mut(w, Node::set_color(Color::Black));
                    self.left_rotate(p);
                    x = self.root;
                }
            } else {
                w = self.node_ref(p, Node::left);
                debug_assert!(!w.is_sentinel(), "black deficit without a sibling");
                if self.node_ref(w, Node::is_red) {
                    trace!(node = ?x, "remove fixup: red sibling");
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.node_mut(p, Node::set_color(Color::Red));
                    self.right_rotate(p);
                    w = self.node_ref(p, Node::left);
                }
                if self.right_ref(w, Node::is_black) && self.left_ref(w, Node::is_black) {
                    trace!(node = ?x, "remove fixup: black nephews");
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = p;
                    p = self.node_ref(x, Node::parent);
                } else {
                    if self.left_ref(w, Node::is_black) {
                        trace!(node = ?x, "remove fixup: red near nephew");
                        self.right_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.left_rotate(w);
                        w = self.node_ref(p, Node::left);
                    }
                    trace!(node = ?x, "remove fixup: red far nephew");
                    self.node_mut(w, Node::set_color(self.node_ref(p, Node::color)));
                    self.node_mut(p, Node::set_color(Color::Black));
                    self.left_mut(w, Node::set_color(Color::Black));
                    self.right_rotate(p);
                    x = self.root;
                }
            }
        }
        if !x.is_sentinel() {
            self.node_mut(x, Node::set_color(Color::Black));
        }
    }

    /// Binary tree left rotate.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.right_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::right);
        self.node_mut(x, Node::set_right(self.node_ref(y, Node::left)));
        if !self.left_ref(y, Node::is_sentinel) {
            self.left_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_left(x));
    }

    /// Binary tree right rotate.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.left_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::left);
        self.node_mut(x, Node::set_left(self.node_ref(y, Node::right)));
        if !self.right_ref(y, Node::is_sentinel) {
            self.right_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_right(x));
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        trace!(pivot = ?x, child = ?y, "rotate");
        self.node_mut(y, Node::set_parent(self.node_ref(x, Node::parent)));
        if self.parent_ref(x, Node::is_sentinel) {
            self.root = y;
        } else if self.is_left_child(x) {
            self.parent_mut(x, Node::set_left(y));
        } else {
            self.parent_mut(x, Node::set_right(y));
        }
        self.node_mut(x, Node::set_parent(y));
    }

    /// Replace one subtree as a child of its parent with another subtree.
    fn transplant(&mut self, u: NodeIndex<Ix>, v: NodeIndex<Ix>) {
        let p = self.node_ref(u, Node::parent);
        if self.node_ref(p, Node::is_sentinel) {
            self.root = v;
        } else if self.is_left_child(u) {
            self.node_mut(p, Node::set_left(v));
        } else {
            self.node_mut(p, Node::set_right(v));
        }
        if !self.node_ref(v, Node::is_sentinel) {
            self.node_mut(v, Node::set_parent(p));
        }
    }

    /// Exchange the keys and values of two distinct nodes, leaving links and colors.
    fn swap_entries(&mut self, a: NodeIndex<Ix>, b: NodeIndex<Ix>) {
        let (lo, hi) = (a.index().min(b.index()), a.index().max(b.index()));
        let (head, tail) = self.nodes.split_at_mut(hi);
        let (ln, hn) = (&mut head[lo], &mut tail[0]);
        std::mem::swap(&mut ln.key, &mut hn.key);
        std::mem::swap(&mut ln.value, &mut hn.value);
    }

    /// Check if a node is a left child of its parent.
    fn is_left_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::left) == node
    }

    /// Check if a node is a right child of its parent.
    fn is_right_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::right) == node
    }

    /// Re-point the links of the node moved from slot `old` to slot `new` by `swap_remove`.
    fn update_idx(&mut self, old: NodeIndex<Ix>, new: NodeIndex<Ix>) {
        if self.nodes.get(new.index()).is_none() {
            return;
        }
        if self.root == old {
            self.root = new;
        }
        if !self.parent_ref(new, Node::is_sentinel) {
            if self.parent_ref(new, Node::left) == old {
                self.parent_mut(new, Node::set_left(new));
            } else {
                self.parent_mut(new, Node::set_right(new));
            }
        }
        if !self.left_ref(new, Node::is_sentinel) {
            self.left_mut(new, Node::set_parent(new));
        }
        if !self.right_ref(new, Node::is_sentinel) {
            self.right_mut(new, Node::set_parent(new));
        }
    }
}

// Convenient methods for reference or mutate current/parent/left/right node
impl<'a, K, V, Ix> RbTree<K, V, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }

    pub(crate) fn left_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&self.nodes[idx])
    }

    pub(crate) fn right_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&self.nodes[idx])
    }

    pub(crate) fn parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&self.nodes[idx])
    }

    fn grand_parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&self.nodes[grand_parent_idx])
    }

    fn left_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&mut self.nodes[idx])
    }

    fn right_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&mut self.nodes[idx])
    }

    fn parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&mut self.nodes[idx])
    }

    fn grand_parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&mut self.nodes[grand_parent_idx])
    }
}
