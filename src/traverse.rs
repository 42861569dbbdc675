//! Ways of walking a [`Tree`]. [`Tree::traverse`] visits every node (removed ones included) and
//! every gap where a child is missing, so the exact shape of the tree can be rebuilt from it.
//! [`Tree::iter`] and the owning iterator only yield live entries, in key order.

use crate::tree::{Link, Node, Tree};

/// One step of a pre-order walk over a [`Tree`].
#[derive(Debug, PartialEq, Eq)]
pub enum Visit<'a, K, V> {
    /// A node, live or removed.
    Node {
        /// The node's key.
        key: &'a K,
        /// The node's value. Removed nodes still hold on to their last value.
        value: &'a V,
        /// Distance from the root. The root is at depth 0.
        depth: usize,
        /// Height of the subtree rooted here.
        height: usize,
        /// Whether the node was removed.
        removed: bool,
    },
    /// A missing child (or the missing root of an empty tree).
    Empty {
        /// Distance from the root.
        depth: usize,
    },
}

impl<'a, K, V> Visit<'a, K, V> {
    /// Distance from the root.
    pub fn depth(&self) -> usize {
        match self {
            Self::Node { depth, .. } | Self::Empty { depth } => *depth,
        }
    }

    /// The key, unless this is a gap.
    pub fn key(&self) -> Option<&'a K> {
        match self {
            Self::Node { key, .. } => Some(*key),
            Self::Empty { .. } => None,
        }
    }

    /// Height of the subtree at this position. Gaps have a height of 0.
    pub fn height(&self) -> usize {
        match self {
            Self::Node { height, .. } => *height,
            Self::Empty { .. } => 0,
        }
    }

    /// Whether this is a removed node.
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Node { removed: true, .. })
    }
}

/// A lazy pre-order (node, left, right) walk over a [`Tree`]. Created by [`Tree::traverse`].
pub struct Traverse<'a, K, V> {
    stack: Vec<(Option<&'a Node<K, V>>, usize)>,
}

impl<K, V> Clone for Traverse<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Traverse<'a, K, V> {
    type Item = Visit<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        let Some(node) = node else {
            return Some(Visit::Empty { depth });
        };

        // Right goes on first so the left subtree comes out first.
        self.stack.push((node.right.as_deref(), depth + 1));
        self.stack.push((node.left.as_deref(), depth + 1));

        Some(Visit::Node {
            key: &node.key,
            value: &node.value,
            depth,
            height: node.height,
            removed: node.removed,
        })
    }
}

/// An in-order iterator over the live entries of a [`Tree`]. Created by [`Tree::iter`].
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.stack.pop()?;
            self.push_left_spine(node.right.as_deref());
            if !node.removed {
                return Some((&node.key, &node.value));
            }
        }
    }
}

/// An owning in-order iterator over the live entries of a [`Tree`]. Removed entries are dropped
/// along the way.
pub struct IntoIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
}

impl<K, V> IntoIter<K, V> {
    fn push_left_spine(&mut self, mut link: Link<K, V>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut node = self.stack.pop()?;
            self.push_left_spine(node.right.take());
            if !node.removed {
                let Node { key, value, .. } = *node;
                return Some((key, value));
            }
        }
    }
}

impl<K, V> Tree<K, V> {
    /// Walks the tree in pre-order, yielding every node (removed ones included) along with its
    /// depth, and a [`Visit::Empty`] wherever a child is missing. Calling this again starts a
    /// fresh walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{Tree, Visit};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(2, "two");
    /// tree.insert(1, "one");
    ///
    /// let mut walk = tree.traverse();
    /// assert_eq!(walk.next().and_then(|v| v.key().copied()), Some(2));
    /// assert_eq!(walk.next().and_then(|v| v.key().copied()), Some(1));
    /// assert_eq!(walk.next(), Some(Visit::Empty { depth: 2 }));
    /// assert_eq!(walk.next(), Some(Visit::Empty { depth: 2 }));
    /// assert_eq!(walk.next(), Some(Visit::Empty { depth: 1 }));
    /// assert_eq!(walk.next(), None);
    /// ```
    pub fn traverse(&self) -> Traverse<'_, K, V> {
        Traverse {
            stack: vec![(self.root(), 0)],
        }
    }

    /// Iterates over the live entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree: Tree<_, _> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
    /// tree.remove(&2);
    ///
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [(&1, &'a'), (&3, &'c')]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root());
        iter
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for Tree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut iter = IntoIter { stack: Vec::new() };
        iter.push_left_spine(self.into_root());
        iter
    }
}
