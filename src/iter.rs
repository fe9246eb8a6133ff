use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::rbtree::RbTree;

/// Pushes a link of nodes on the left to stack.
fn left_link<K, V, Ix>(tree_ref: &RbTree<K, V, Ix>, mut x: NodeIndex<Ix>) -> Vec<NodeIndex<Ix>>
where
    Ix: IndexType,
{
    let mut nodes = vec![];
    while !tree_ref.node_ref(x, Node::is_sentinel) {
        nodes.push(x);
        x = tree_ref.node_ref(x, Node::left);
    }
    nodes
}

/// An iterator over the entries of a `RbTree`, sorted by key.
#[derive(Debug)]
pub struct Iter<'a, K, V, Ix> {
    /// Reference to the tree
    pub(crate) tree_ref: &'a RbTree<K, V, Ix>,
    /// Stack for iteration
    pub(crate) stack: Vec<NodeIndex<Ix>>,
}

impl<'a, K, V, Ix> Iter<'a, K, V, Ix>
where
    Ix: IndexType,
{
    pub fn new(tree_ref: &'a RbTree<K, V, Ix>) -> Self {
        Iter {
            tree_ref,
            stack: left_link(tree_ref, tree_ref.root),
        }
    }
}

impl<'a, K, V, Ix> Iterator for Iter<'a, K, V, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.stack.extend(left_link(
            self.tree_ref,
            self.tree_ref.node_ref(x, Node::right),
        ));
        Some(self.tree_ref.node_ref(x, Node::entry))
    }
}

/// An iterator visiting every node before its subtrees, left subtree first.
#[derive(Debug)]
pub struct PreOrder<'a, K, V, Ix> {
    tree_ref: &'a RbTree<K, V, Ix>,
    /// Roots of the subtrees still to visit
    stack: Vec<NodeIndex<Ix>>,
}

impl<'a, K, V, Ix> PreOrder<'a, K, V, Ix>
where
    Ix: IndexType,
{
    pub fn new(tree_ref: &'a RbTree<K, V, Ix>) -> Self {
        let mut stack = vec![];
        if !tree_ref.root.is_sentinel() {
            stack.push(tree_ref.root);
        }
        PreOrder { tree_ref, stack }
    }
}

impl<'a, K, V, Ix> Iterator for PreOrder<'a, K, V, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        let (left, right) = self.tree_ref.node_ref(x, |xn| (xn.left(), xn.right()));
        if !right.is_sentinel() {
            self.stack.push(right);
        }
        if !left.is_sentinel() {
            self.stack.push(left);
        }
        Some(self.tree_ref.node_ref(x, Node::entry))
    }
}

/// Descends to the first node of the post-order walk of the subtree of `x`.
fn deepest_first<K, V, Ix>(tree_ref: &RbTree<K, V, Ix>, mut x: NodeIndex<Ix>) -> NodeIndex<Ix>
where
    Ix: IndexType,
{
    while !x.is_sentinel() {
        let (left, right) = tree_ref.node_ref(x, |xn| (xn.left(), xn.right()));
        if !left.is_sentinel() {
            x = left;
        } else if !right.is_sentinel() {
            x = right;
        } else {
            break;
        }
    }
    x
}

/// An iterator visiting every node after its subtrees, left subtree first.
///
/// It keeps no stack and climbs back through the parent links instead.
#[derive(Debug)]
pub struct PostOrder<'a, K, V, Ix> {
    tree_ref: &'a RbTree<K, V, Ix>,
    /// Next node to yield, the sentinel once exhausted
    cur: NodeIndex<Ix>,
}

impl<'a, K, V, Ix> PostOrder<'a, K, V, Ix>
where
    Ix: IndexType,
{
    pub fn new(tree_ref: &'a RbTree<K, V, Ix>) -> Self {
        PostOrder {
            tree_ref,
            cur: deepest_first(tree_ref, tree_ref.root),
        }
    }
}

impl<'a, K, V, Ix> Iterator for PostOrder<'a, K, V, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.cur;
        if x.is_sentinel() {
            return None;
        }
        let p = self.tree_ref.node_ref(x, Node::parent);
        self.cur = if p.is_sentinel() {
            p
        } else {
            let (left, right) = self.tree_ref.node_ref(p, |pn| (pn.left(), pn.right()));
            if left == x && !right.is_sentinel() {
                deepest_first(self.tree_ref, right)
            } else {
                p
            }
        };
        Some(self.tree_ref.node_ref(x, Node::entry))
    }
}

/// Adapts an entry iterator to yield only the values.
#[derive(Debug)]
pub struct Values<I> {
    inner: I,
}

impl<I> Values<I> {
    pub(crate) fn new(inner: I) -> Self {
        Values { inner }
    }
}

impl<'a, K: 'a, V: 'a, I> Iterator for Values<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An into iterator over the entries of a `RbTree`, sorted by key.
#[derive(Debug)]
pub struct IntoIter<K, V, Ix> {
    tree: RbTree<K, V, Ix>,
    /// Stack for iteration
    stack: Vec<NodeIndex<Ix>>,
}

impl<K, V, Ix> IntoIter<K, V, Ix>
where
    Ix: IndexType,
{
    pub fn new(tree: RbTree<K, V, Ix>) -> Self {
        let stack = left_link(&tree, tree.root);
        IntoIter { tree, stack }
    }
}

impl<K, V, Ix> Iterator for IntoIter<K, V, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.stack.extend(left_link(
            &self.tree,
            self.tree.node_ref(x, Node::right),
        ));
        let res = &mut self.tree.nodes[x.index()];
        res.key.take().zip(res.value.take())
    }
}
