//! A self-balancing Binary Search Tree (specifically, an AVL tree) with lazy deletion. Removing
//! a key doesn't detach its node; the node is only marked as removed (a "tombstone") and stays
//! in the tree's shape until the whole tree is dropped or [`compact`][Tree::compact]ed.
//!
//! # Examples
//!
//! ```
//! use avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.search(&1), None);
//!
//! tree.insert(1, "one");
//! assert_eq!(tree.search(&1), Some(&"one"));
//!
//! // Inserting a new value for the same key overwrites the value.
//! tree.insert(1, "uno");
//! assert_eq!(tree.search(&1), Some(&"uno"));
//!
//! // Removing only hides the entry. The node is still there.
//! assert!(tree.remove(&1));
//! assert_eq!(tree.search(&1), None);
//! assert_eq!(tree.len(), 0);
//! assert_eq!(tree.node_count(), 1);
//!
//! // Inserting it again brings the same node back to life.
//! tree.insert(1, "eins");
//! assert_eq!(tree.search(&1), Some(&"eins"));
//! assert_eq!(tree.node_count(), 1);
//! ```

use tracing::{debug, trace};

use crate::direction::Direction;
use crate::error::{Error, Result};

/// An owned, possibly empty, subtree.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// The height of a possibly empty subtree. Empty subtrees have a height of 0.
fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

/// A self-balancing Binary Search Tree (specifically, an AVL tree). This can be used for
/// inserting, searching, and (lazily) removing keys and values.
#[derive(Clone, Debug)]
pub struct Tree<K, V> {
    root: Link<K, V>,
    /// Entries that aren't tombstoned.
    len: usize,
    /// All nodes, tombstoned or not.
    node_count: usize,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Tree<K, V> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: None,
            len: 0,
            node_count: 0,
        }
    }

    /// The number of live (not removed) entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live entries. A tree holding only removed entries is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of nodes in the tree, including removed ones.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// How many levels are in the tree. An empty tree has a height of 0.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Inserts the given value into the tree stored at the given key. Inserting a new value for an
    /// existing key overwites its value, and inserting a key that was removed makes it live again
    /// without allocating a new node.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// tree.insert(1, 2);
    /// assert_eq!(tree.search(&1), Some(&2));
    ///
    /// tree.insert(1, 3);
    /// assert_eq!(tree.search(&1), Some(&3));
    /// ```
    pub fn insert(&mut self, key: K, value: V)
    where
        K: Ord,
    {
        let (root, insertion) = Node::insert(self.root.take(), key, value);
        self.root = Some(root);

        match insertion {
            Insertion::Created => {
                self.len += 1;
                self.node_count += 1;
            }
            Insertion::Revived => self.len += 1,
            Insertion::Replaced => {}
        }
        debug!(?insertion, len = self.len, nodes = self.node_count, "insert");
    }

    /// Inserts `V::default()` at the given key. Handy when the tree is only used for its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree: Tree<i32, ()> = Tree::new();
    /// tree.insert_key(7);
    ///
    /// assert!(tree.contains_key(&7));
    /// ```
    pub fn insert_key(&mut self, key: K)
    where
        K: Ord,
        V: Default,
    {
        self.insert(key, V::default());
    }

    /// Inserts a key that may be missing or of another type. A missing key is silently ignored. A
    /// key that can't be converted into `K` is rejected with [`Error::InvalidKeyType`] before the
    /// tree is touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{Error, Tree};
    ///
    /// let mut tree: Tree<i8, &str> = Tree::new();
    ///
    /// assert_eq!(tree.try_insert(Some(5_i64), "five"), Ok(()));
    /// assert_eq!(tree.try_insert(None::<i64>, "nothing"), Ok(()));
    /// assert!(matches!(
    ///     tree.try_insert(Some(1_000_i64), "too big"),
    ///     Err(Error::InvalidKeyType { .. })
    /// ));
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.search(&5), Some(&"five"));
    /// ```
    pub fn try_insert<Q>(&mut self, key: Option<Q>, value: V) -> Result<()>
    where
        K: Ord,
        Q: TryInto<K>,
    {
        let Some(key) = key else {
            return Ok(());
        };
        let key = key.try_into().map_err(|_| Error::InvalidKeyType {
            expected: std::any::type_name::<K>(),
        })?;

        self.insert(key, value);
        Ok(())
    }

    /// Marks the entry with the given key as removed. The node stays where it is so the shape and
    /// heights of the tree don't change; it just can't be found anymore. Returns whether a live
    /// entry was removed.
    ///
    /// Removed nodes are never reclaimed by `remove`. See [`Tree::compact`] for that.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert!(tree.remove(&1));
    /// assert_eq!(tree.search(&1), None);
    ///
    /// // Already gone.
    /// assert!(!tree.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let Some(node) = self.root.as_deref_mut().and_then(|root| root.find_mut(key)) else {
            debug!("remove: key not found");
            return false;
        };
        if node.removed {
            debug!("remove: key already removed");
            return false;
        }

        node.removed = true;
        self.len -= 1;
        debug!(len = self.len, nodes = self.node_count, "remove");
        true
    }

    /// Potentially finds the value associated with the given key in this tree. If no live node has
    /// the corresponding key, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert_eq!(tree.search(&1), Some(&2));
    /// assert_eq!(tree.search(&42), None);
    /// ```
    pub fn search(&self, key: &K) -> Option<&V>
    where
        K: Ord,
    {
        self.root
            .as_deref()
            .and_then(|root| root.find(key))
            .filter(|n| !n.removed)
            .map(|n| &n.value)
    }

    /// Like [`Tree::search`] but hands out the value mutably.
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V>
    where
        K: Ord,
    {
        self.root
            .as_deref_mut()
            .and_then(|root| root.find_mut(key))
            .filter(|n| !n.removed)
            .map(|n| &mut n.value)
    }

    /// Like [`Tree::search`] but reports a missing key as [`Error::NotFound`].
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{Error, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert_eq!(tree.get(&1), Ok(&2));
    /// assert_eq!(tree.get(&42), Err(Error::NotFound));
    /// ```
    pub fn get(&self, key: &K) -> Result<&V>
    where
        K: Ord,
    {
        self.search(key).ok_or(Error::NotFound)
    }

    /// Whether a live entry exists for the key.
    pub fn contains_key(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.search(key).is_some()
    }

    /// Rebuilds the tree from its live entries, dropping every removed node.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree: Tree<_, _> = (0..8).map(|x| (x, x)).collect();
    /// for x in 0..4 {
    ///     tree.remove(&x);
    /// }
    /// assert_eq!(tree.node_count(), 8);
    ///
    /// let tree = tree.compact();
    /// assert_eq!(tree.node_count(), 4);
    /// assert_eq!(tree.len(), 4);
    /// ```
    pub fn compact(self) -> Self
    where
        K: Ord,
    {
        self.into_iter().collect()
    }

    pub(crate) fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    pub(crate) fn into_root(self) -> Link<K, V> {
        self.root
    }
}

impl<K, V> FromIterator<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V> Extend<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// What an insert did to the node with the inserted key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Insertion {
    /// There was no node for the key so a new leaf was created.
    Created,
    /// The node existed but was removed. It's live again with the new value.
    Revived,
    /// The node existed and was live. Its value was overwritten.
    Replaced,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    pub(crate) height: usize,

    /// Tombstone. Removed nodes keep their place in the tree but aren't found by searches.
    pub(crate) removed: bool,
}

impl<K, V> Node<K, V> {
    fn new_boxed(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
            removed: false,
        })
    }

    fn child(&self, direction: Direction) -> &Link<K, V> {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    fn child_mut(&mut self, direction: Direction) -> &mut Link<K, V> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Finds the node with the given key, removed or not.
    fn find(&self, key: &K) -> Option<&Self>
    where
        K: Ord,
    {
        match Direction::towards(key.cmp(&self.key)) {
            None => Some(self),
            Some(direction) => self.child(direction).as_deref().and_then(|n| n.find(key)),
        }
    }

    fn find_mut(&mut self, key: &K) -> Option<&mut Self>
    where
        K: Ord,
    {
        match Direction::towards(key.cmp(&self.key)) {
            None => Some(self),
            Some(direction) => self
                .child_mut(direction)
                .as_deref_mut()
                .and_then(|n| n.find_mut(key)),
        }
    }

    /// Inserts into the subtree at `link` and returns the subtree's new (balanced) root. Every
    /// node on the way back up is rebalanced before its parent gets it back.
    fn insert(link: Link<K, V>, key: K, value: V) -> (Box<Self>, Insertion)
    where
        K: Ord,
    {
        let Some(mut node) = link else {
            return (Self::new_boxed(key, value), Insertion::Created);
        };

        match Direction::towards(key.cmp(&node.key)) {
            None => {
                let insertion = if node.removed {
                    Insertion::Revived
                } else {
                    Insertion::Replaced
                };
                node.value = value;
                node.removed = false;
                (node, insertion)
            }
            Some(direction) => {
                let child = node.child_mut(direction).take();
                let (child, insertion) = Self::insert(child, key, value);
                *node.child_mut(direction) = Some(child);
                (node.rebalance(), insertion)
            }
        }
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// The difference in height between the left and right subtrees. Positive means left heavy.
    /// See [the Wikipedia page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    /// Fixes this node's height and, if one side is two levels taller than the other, rotates to
    /// restore the AVL invariant. Returns the root of the balanced subtree.
    ///
    /// The children must already be balanced with correct heights.
    fn rebalance(mut self: Box<Self>) -> Box<Self>
    where
        K: Ord,
    {
        // See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology.
        self.fix_height();
        let node = match self.balance_factor() {
            2 => self.lift(Direction::Left),
            -2 => self.lift(Direction::Right),
            _ => self,
        };

        if cfg!(debug_assertions) {
            let left_height = height(&node.left);
            let right_height = height(&node.right);
            assert_eq!(node.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
            if let Some(left) = node.left.as_deref() {
                assert!(left.key < node.key);
            }
            if let Some(right) = node.right.as_deref() {
                assert!(right.key > node.key);
            }
        }
        node
    }

    /// Rebalances a node whose `heavy` subtree is two levels taller than the other one by lifting
    /// the heavy child above it. If the heavy child leans the other way (its inner subtree is
    /// strictly taller than its outer one) it is rotated first, making this a double rotation.
    fn lift(mut self: Box<Self>, heavy: Direction) -> Box<Self> {
        if let Some(child) = self.child_mut(heavy).take() {
            let inner_height = height(child.child(heavy.mirror()));
            let outer_height = height(child.child(heavy));
            let child = if inner_height > outer_height {
                child.rotate(heavy)
            } else {
                child
            };
            *self.child_mut(heavy) = Some(child);
        }
        self.rotate(heavy.mirror())
    }

    /// Rotates `self` down towards `direction`, lifting the child on the opposite side up to
    /// become the subtree root. The rising child's inner subtree is handed over to `self`.
    /// Returns the new subtree root.
    ///
    /// Without a child to lift, `self` is returned unchanged.
    ///
    /// # Diagram
    ///
    /// Rotating to the right:
    ///
    /// ```text
    ///     old_root (i.e. "self")       new_root
    ///      /     \                     /     \
    ///   new_root  z     rotate ->     x    old_root
    ///    / \                                 /  \
    ///   x   y                               y    z
    /// ```
    fn rotate(mut self: Box<Self>, direction: Direction) -> Box<Self> {
        let rising = direction.mirror();
        let Some(mut new_root) = self.child_mut(rising).take() else {
            return self;
        };

        *self.child_mut(rising) = new_root.child_mut(direction).take();
        // The old root is now below the new root so its height has to be fixed first.
        self.fix_height();
        *new_root.child_mut(direction) = Some(self);
        new_root.fix_height();

        trace!(?direction, height = new_root.height, "rotate");
        new_root
    }
}

#[cfg(test)]
impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Walks the whole tree asserting ordering, balance, cached heights and the bookkeeping
    /// counters.
    pub(crate) fn assert_invariants(&self) {
        /// Returns the subtree's (height, nodes, live nodes).
        fn check<'a, K: Ord, V>(
            link: &'a Link<K, V>,
            lower: Option<&'a K>,
            upper: Option<&'a K>,
        ) -> (usize, usize, usize) {
            let Some(node) = link else {
                return (0, 0, 0);
            };
            if let Some(lower) = lower {
                assert!(node.key > *lower, "left subtree key out of order");
            }
            if let Some(upper) = upper {
                assert!(node.key < *upper, "right subtree key out of order");
            }

            let (left_height, left_nodes, left_live) = check(&node.left, lower, Some(&node.key));
            let (right_height, right_nodes, right_live) =
                check(&node.right, Some(&node.key), upper);

            assert!(left_height.abs_diff(right_height) <= 1, "unbalanced node");
            assert_eq!(node.height, left_height.max(right_height) + 1, "stale height");

            (
                node.height,
                left_nodes + right_nodes + 1,
                left_live + right_live + usize::from(!node.removed),
            )
        }

        let (_, nodes, live) = check(&self.root, None, None);
        assert_eq!(self.node_count, nodes);
        assert_eq!(self.len, live);
    }
}
