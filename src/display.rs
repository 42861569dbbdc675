use std::fmt;

use crate::tree::{Link, Node, Tree};

/// Stands in for a missing child next to a present one so left and right can be told apart.
const GAP: &str = "·";

fn outline<K, V>(node: &Node<K, V>) -> termtree::Tree<String>
where
    K: fmt::Display,
    V: fmt::Display,
{
    let mut label = format!("{}: {}", node.key, node.value);
    if node.removed {
        label.push_str(" (removed)");
    }

    let outline = termtree::Tree::new(label);
    if node.left.is_none() && node.right.is_none() {
        return outline;
    }
    outline.with_leaves([&node.left, &node.right].into_iter().map(child_outline))
}

fn child_outline<K, V>(link: &Link<K, V>) -> termtree::Tree<String>
where
    K: fmt::Display,
    V: fmt::Display,
{
    match link.as_deref() {
        Some(node) => outline(node),
        None => termtree::Tree::new(GAP.to_string()),
    }
}

/// Draws the tree sideways, one node per line, removed nodes included.
///
/// ```text
/// 20: b
/// ├── 10: a (removed)
/// │   ├── 5: c
/// │   └── ·
/// └── 30: d
/// ```
impl<K, V> fmt::Display for Tree<K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => write!(f, "{}", outline(root)),
            None => writeln!(f, "(empty)"),
        }
    }
}

impl<K, V> Tree<K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    /// Prints the tree to stdout. See the [`Display`][fmt::Display] implementation for the
    /// format.
    pub fn print(&self) {
        print!("{self}");
    }
}
