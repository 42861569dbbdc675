//! This crate exposes a height-balanced Binary Search Tree (an AVL tree) with lazy,
//! tombstone-based removal, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! ## AVL Tree
//!
//! Searching takes `O(height)`. An AVL tree keeps the height at `O(lg N)` by adding a third
//! invariant:
//!
//! 3. For every `Node`, the heights of its left and right subtrees differ by at most one.
//!
//! Every insert walks back up the path it came down, fixing each node's cached height and
//! rotating wherever one side got two levels taller than the other.
//!
//! ## Lazy removal
//!
//! [`Tree::remove`] never detaches a node. It marks the node as removed so searches skip it,
//! which can't unbalance anything. Inserting the key again brings the node back. Removed nodes
//! are only reclaimed by rebuilding the tree with [`Tree::compact`].
//!
//! ```
//! use avl::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert(10, "ten");
//! tree.insert(20, "twenty");
//! tree.insert(30, "thirty");
//!
//! // Ascending inserts rotated 20 up to the root.
//! assert_eq!(tree.traverse().next().and_then(|v| v.key().copied()), Some(20));
//!
//! tree.remove(&20);
//! assert_eq!(tree.search(&20), None);
//! assert_eq!(tree.height(), 2);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod direction;
mod display;
pub mod error;
pub mod traverse;
pub mod tree;

pub use error::{Error, Result};
pub use traverse::Visit;
pub use tree::Tree;
