//! `rb_tree_map` is an ordered key-value map based on red-black tree.
//!
//! It fully implements the insertion and deletion functionality of a red-black tree,
//! ensuring that every lookup and modification requires at most O(logN) time.
//!
//! Nodes live in a vector and refer to their children and parent by index, so the
//! parent back-links never form ownership cycles. Slot 0 holds a black sentinel
//! standing for every absent child. `RbTree` is `Send` and `Sync` whenever its keys
//! and values are; all mutation goes through `&mut self`, so sharing a tree between
//! threads for writing needs an outer lock.
//!
//! # Example
//!
//! ```rust
//! use rb_tree_map::RbTree;
//!
//! let mut tree = RbTree::new();
//! tree.insert(50, "Hello");
//! tree.insert(30, "World");
//! assert_eq!(tree.find(&30), Some(&"World"));
//! assert!(tree.delete(&30));
//! assert_eq!(tree.find(&30), None);
//! ```
//!

mod entry;
mod error;
mod index;
mod iter;
mod node;
mod rbtree;
mod validate;

#[cfg(test)]
mod tests;

pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::TreeError;
pub use index::{DefaultIx, IndexType};
pub use iter::{IntoIter, Iter, PostOrder, PreOrder, Values};
pub use rbtree::RbTree;
pub use validate::Stats;
