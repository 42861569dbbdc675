use avl::{Tree, Visit};
use quickcheck_macros::quickcheck;

use std::collections::{HashMap, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a hashmap.
/// This way we can ensure that after a random smattering of inserts
/// and removals we have the same set of live keys in the map.
fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut Tree<K, V>, map: &mut HashMap<K, V>)
where
    K: std::hash::Hash + Eq + Clone + Ord,
    V: Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                bst.insert(k.clone(), v.clone());
                map.insert(k.clone(), v.clone());
            }
            Op::Remove(k) => {
                bst.remove(k);
                map.remove(k);
            }
        }
    }
}

/// Rebuilds the subtree starting at the front of a pre-order walk, checking every cached height
/// against the recomputed one and the AVL balance of every node. Returns the recomputed height.
fn check_shape<'a, K, V>(visits: &mut impl Iterator<Item = Visit<'a, K, V>>) -> usize
where
    K: 'a,
    V: 'a,
{
    match visits.next().expect("a walk never ends in the middle of a subtree") {
        Visit::Empty { .. } => 0,
        Visit::Node { height, .. } => {
            let left = check_shape(visits);
            let right = check_shape(visits);
            assert!(left.abs_diff(right) <= 1, "unbalanced node");
            assert_eq!(height, left.max(right) + 1, "stale height");
            height
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
    let mut tree = Tree::new();
    let mut map = HashMap::new();

    do_ops(&ops, &mut tree, &mut map);
    tree.len() == map.len() && (i8::MIN..=i8::MAX).all(|key| tree.search(&key) == map.get(&key))
}

#[quickcheck]
fn in_order_keys_strictly_increase(ops: Vec<Op<i16, ()>>) -> bool {
    let mut tree = Tree::new();
    do_ops(&ops, &mut tree, &mut HashMap::new());

    let keys = tree.iter().map(|(k, _)| *k).collect::<Vec<_>>();
    keys.windows(2).all(|pair| pair[0] < pair[1])
}

#[quickcheck]
fn heights_are_cached_and_balanced(ops: Vec<Op<i16, ()>>) -> bool {
    let mut tree = Tree::new();
    do_ops(&ops, &mut tree, &mut HashMap::new());

    let mut walk = tree.traverse();
    let height = check_shape(&mut walk);
    height == tree.height() && walk.next().is_none()
}

#[quickcheck]
fn height_is_logarithmic(xs: Vec<u16>) -> bool {
    let tree: Tree<_, _> = xs.into_iter().map(|x| (x, ())).collect();

    // An AVL tree with n nodes is at most ~1.44 * lg(n + 2) tall.
    let bound = 1.45 * ((tree.node_count() + 2) as f64).log2();
    tree.height() as f64 <= bound
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }

    xs.iter().all(|x| tree.search(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn removal_only_flips_tombstones(xs: Vec<i8>, removals: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }
    let shape = |tree: &Tree<i8, i8>| {
        tree.traverse()
            .map(|v| (v.key().copied(), v.depth(), v.height()))
            .collect::<Vec<_>>()
    };
    let before = shape(&tree);
    let node_count = tree.node_count();

    for x in &removals {
        tree.remove(x);
    }

    let removed: HashSet<_> = removals.into_iter().collect();
    shape(&tree) == before
        && tree.node_count() == node_count
        && removed.iter().all(|x| tree.search(x).is_none())
        && xs
            .iter()
            .filter(|x| !removed.contains(x))
            .all(|x| tree.search(x) == Some(x))
}

#[quickcheck]
fn reinsert_revives_without_allocating(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, 0);
    }
    let node_count = tree.node_count();

    for x in &xs {
        tree.remove(x);
    }
    for x in &xs {
        tree.insert(*x, 1);
    }

    tree.node_count() == node_count && xs.iter().all(|x| tree.search(x) == Some(&1))
}
