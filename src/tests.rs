use std::collections::{BTreeMap, HashSet};

use index::NodeIndex;
use node::{Color, Node};
use proptest::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::*;

struct KeyGenerator {
    rng: StdRng,
    unique: HashSet<i32>,
    limit: i32,
}

impl KeyGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: i32 = 100_000;
        Self {
            rng: SeedableRng::from_seed(seed),
            unique: HashSet::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> i32 {
        self.rng.gen_range(0..self.limit)
    }

    fn next_unique(&mut self) -> i32 {
        let mut key = self.next();
        while self.unique.contains(&key) {
            key = self.next();
        }
        self.unique.insert(key);
        key
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl<V> RbTree<i32, V> {
    /// 1. Every node is either red or black.
    /// 2. The root is black.
    /// 3. Every leaf (NIL) is black.
    /// 4. If a node is red, then both its children are black.
    /// 5. For each node, all simple paths from the node to descendant leaves contain the
    /// same number of black nodes.
    fn check_rb_properties(&self) {
        assert!(matches!(
            self.node_ref(self.root, Node::color),
            Color::Black
        ));
        self.check_children_color(self.root);
        self.check_black_height(self.root);
        self.check_parent_links(self.root);
    }

    fn check_children_color(&self, x: NodeIndex<u32>) {
        if self.node_ref(x, Node::is_sentinel) {
            return;
        }
        self.check_children_color(self.node_ref(x, Node::left));
        self.check_children_color(self.node_ref(x, Node::right));
        if self.node_ref(x, Node::is_red) {
            assert!(matches!(self.left_ref(x, Node::color), Color::Black));
            assert!(matches!(self.right_ref(x, Node::color), Color::Black));
        }
    }

    fn check_black_height(&self, x: NodeIndex<u32>) -> usize {
        if self.node_ref(x, Node::is_sentinel) {
            return 0;
        }
        let lefth = self.check_black_height(self.node_ref(x, Node::left));
        let righth = self.check_black_height(self.node_ref(x, Node::right));
        assert_eq!(lefth, righth);
        if self.node_ref(x, Node::is_black) {
            return lefth + 1;
        }
        lefth
    }

    fn check_parent_links(&self, x: NodeIndex<u32>) {
        if self.node_ref(x, Node::is_sentinel) {
            return;
        }
        for child in [self.node_ref(x, Node::left), self.node_ref(x, Node::right)] {
            if !child.is_sentinel() {
                assert_eq!(self.node_ref(child, Node::parent), x);
                self.check_parent_links(child);
            }
        }
    }

    fn index_of(&self, key: i32) -> usize {
        self.search(&key).unwrap().index()
    }
}

fn with_tree_and_generator<V>(test_fn: impl Fn(RbTree<i32, V>, KeyGenerator)) {
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for seed in seeds {
        let gen = KeyGenerator::new(seed);
        let tree = RbTree::new();
        test_fn(tree, gen);
    }
}

/// The eight-entry tree used by the console demo.
fn sample_tree() -> RbTree<i32, &'static str> {
    let mut tree = RbTree::new();
    tree.insert(50, "Hello");
    tree.insert(30, "World");
    tree.insert(20, "I");
    tree.insert(40, "am");
    tree.insert(70, "a");
    tree.insert(60, "complex");
    tree.insert(80, "Red-Black");
    tree.insert(35, "Tree");
    tree
}

#[test]
fn red_black_tree_properties_is_satisfied() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in keys {
            let _ignore = tree.insert(k, ());
        }
        tree.check_rb_properties();
        assert!(tree.validate().is_ok());
    });
}

#[test]
fn red_black_tree_properties_hold_after_every_remove() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(500)
            .collect();
        for k in keys.clone() {
            let _ignore = tree.insert(k, k);
        }
        gen.shuffle(&mut keys);
        for k in keys {
            assert_eq!(tree.remove(&k), Some(k));
            tree.check_rb_properties();
            assert_eq!(tree.validate().map(|s| s.len), Ok(tree.len()));
        }
        assert!(tree.is_empty());
        assert_eq!(tree.nodes.len(), 1);
    });
}

#[test]
fn tree_len_will_update() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(100)
            .collect();
        for k in keys.clone() {
            let _ignore = tree.insert(k, ());
        }
        assert_eq!(tree.len(), 100);
        for k in keys {
            let _ignore = tree.remove(&k);
        }
        assert_eq!(tree.len(), 0);
    });
}

#[test]
fn remove_non_exist_key_will_do_nothing() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in keys {
            let _ignore = tree.insert(k, ());
        }
        assert_eq!(tree.len(), 1000);
        let to_remove: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for k in to_remove {
            assert!(!tree.delete(&k));
        }
        assert_eq!(tree.len(), 1000);
        tree.check_rb_properties();
    });
}

#[test]
fn iterate_through_tree_is_sorted() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .enumerate()
            .take(1000)
            .collect();
        for (v, k) in keys.clone() {
            let _ignore = tree.insert(k, v);
        }
        keys.sort_unstable_by(|a, b| a.1.cmp(&b.1));

        assert_eq!(tree.iter().count(), keys.len());
        for ((ek, ev), (v, k)) in tree.iter().zip(keys.iter()) {
            assert_eq!(ek, k);
            assert_eq!(ev, v);
        }
    });
}

#[test]
fn mixed_workload_matches_btreemap() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut model = BTreeMap::new();
        for round in 0..5000 {
            let k = gen.next() % 500;
            if gen.rng.gen_bool(0.6) {
                assert_eq!(tree.insert(k, round), model.insert(k, round));
            } else {
                assert_eq!(tree.remove(&k), model.remove(&k));
            }
        }
        tree.check_rb_properties();
        assert!(tree.iter().eq(model.iter()));
        for k in 0..500 {
            assert_eq!(tree.find(&k), model.get(&k));
        }
    });
}

#[test]
fn height_is_logarithmic() {
    let mut tree = RbTree::new();
    for k in 0..(1 << 14) {
        tree.insert(k, ());
        if k % 257 == 0 {
            let bound = 2.0 * ((tree.len() + 1) as f64).log2();
            assert!((tree.height() as f64) <= bound);
        }
    }
    let stats = tree.validate().unwrap();
    assert_eq!(stats.height, tree.height());
}

#[test]
fn upsert_keeps_one_node_with_latest_value() {
    let mut tree = RbTree::new();
    assert_eq!(tree.insert(1, "first"), None);
    assert_eq!(tree.insert(1, "second"), Some("first"));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.nodes.len(), 2);
    assert_eq!(tree.find(&1), Some(&"second"));
    assert_eq!(tree.iter().count(), 1);
}

#[test]
fn sample_tree_traversals() {
    let tree = sample_tree();
    tree.check_rb_properties();

    let in_order: Vec<_> = tree.traverse_in_order().copied().collect();
    assert_eq!(
        in_order,
        ["I", "World", "Tree", "am", "Hello", "complex", "a", "Red-Black"]
    );
    let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, [20, 30, 35, 40, 50, 60, 70, 80]);

    let pre_order: Vec<_> = tree.pre_order().map(|(k, _)| *k).collect();
    assert_eq!(pre_order, [30, 20, 50, 40, 35, 70, 60, 80]);
    let pre_order: Vec<_> = tree.traverse_pre_order().copied().collect();
    assert_eq!(
        pre_order,
        ["World", "I", "Hello", "am", "Tree", "a", "complex", "Red-Black"]
    );

    let post_order: Vec<_> = tree.post_order().map(|(k, _)| *k).collect();
    assert_eq!(post_order, [20, 35, 40, 60, 80, 70, 50, 30]);
    let post_order: Vec<_> = tree.traverse_post_order().copied().collect();
    assert_eq!(
        post_order,
        ["I", "Tree", "am", "complex", "Red-Black", "a", "Hello", "World"]
    );
}

#[test]
fn sample_tree_find_and_delete() {
    let mut tree = sample_tree();
    assert_eq!(tree.find(&40), Some(&"am"));
    assert!(tree.delete(&40));
    assert_eq!(tree.find(&40), None);
    assert!(!tree.delete(&40));
    tree.check_rb_properties();

    let in_order: Vec<_> = tree.traverse_in_order().copied().collect();
    assert_eq!(
        in_order,
        ["I", "World", "Tree", "Hello", "complex", "a", "Red-Black"]
    );
}

#[test]
fn delete_node_with_two_children() {
    let mut tree = sample_tree();
    assert_eq!(tree.remove(&30), Some("World"));
    tree.check_rb_properties();
    assert_eq!(tree.node_ref(tree.root, Node::key), &35);
    let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, [20, 35, 40, 50, 60, 70, 80]);
    assert_eq!(tree.find(&35), Some(&"Tree"));
}

#[test]
fn empty_tree_yields_nothing() {
    let mut tree: RbTree<i32, ()> = RbTree::default();
    assert!(tree.is_empty());
    assert_eq!(tree.find(&1), None);
    assert!(!tree.delete(&1));
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.iter().next(), None);
    assert_eq!(tree.pre_order().next(), None);
    assert_eq!(tree.post_order().next(), None);
    assert_eq!(
        tree.validate(),
        Ok(Stats {
            len: 0,
            height: 0,
            black_height: 0
        })
    );
}

#[test]
fn first_and_last_follow_removals() {
    let mut tree = sample_tree();
    assert_eq!(tree.first(), Some((&20, &"I")));
    assert_eq!(tree.last(), Some((&80, &"Red-Black")));
    tree.remove(&20);
    tree.remove(&80);
    assert_eq!(tree.first(), Some((&30, &"World")));
    assert_eq!(tree.last(), Some((&70, &"a")));
}

#[test]
fn lookup_by_borrowed_key() {
    let mut tree = RbTree::new();
    tree.insert(String::from("beta"), 2);
    tree.insert(String::from("alpha"), 1);
    assert_eq!(tree.find("alpha"), Some(&1));
    assert!(tree.contains_key("beta"));
    *tree.find_mut("beta").unwrap() += 10;
    assert_eq!(tree.remove("beta"), Some(12));
    assert!(!tree.contains_key("beta"));
}

#[test]
fn entry_or_insert_and_modify() {
    let mut tree = RbTree::new();
    for word in ["a", "b", "a", "c", "a", "b"] {
        *tree.entry(word).or_insert(0) += 1;
    }
    let counts: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(counts, [("a", 3), ("b", 2), ("c", 1)]);

    let entry = tree.entry("d").and_modify(|v| *v += 1);
    assert_eq!(entry.key(), &"d");
    assert_eq!(*entry.or_insert_with(|| 7), 7);
    assert_eq!(tree.find("d"), Some(&7));
    assert!(tree.validate().is_ok());
}

#[test]
fn into_iter_yields_owned_entries_in_order() {
    let tree = sample_tree();
    let borrowed: Vec<_> = (&tree).into_iter().map(|(k, v)| (*k, *v)).collect();
    let owned: Vec<_> = tree.into_iter().collect();
    assert_eq!(borrowed, owned);
    assert_eq!(owned.len(), 8);
}

#[test]
fn tree_clear_is_ok() {
    let mut tree = sample_tree();
    assert_eq!(tree.len(), 8);
    tree.clear();
    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert_eq!(tree.nodes.len(), 1);
    assert!(tree.nodes[0].is_sentinel());
    tree.insert(1, "again");
    assert_eq!(tree.find(&1), Some(&"again"));
}

#[test]
fn small_index_type_reuses_freed_slots() {
    let mut tree = RbTree::<u8, u8, u8>::with_capacity(254);
    for k in 0..254 {
        tree.insert(k, k);
    }
    for k in (0..254).step_by(2) {
        assert_eq!(tree.remove(&k), Some(k));
    }
    for k in (0..254).step_by(2) {
        tree.insert(k, k.wrapping_mul(3));
    }
    assert_eq!(tree.validate().map(|s| s.len), Ok(254));
    assert_eq!(tree.find(&10), Some(&30));
}

#[test]
#[should_panic(expected = "Reached maximum number of nodes")]
fn small_index_type_overflow_panics() {
    let mut tree = RbTree::<u8, (), u8>::with_capacity(0);
    for k in 0..=u8::MAX {
        tree.insert(k, ());
    }
}

#[test]
fn validate_reports_red_root() {
    let mut tree = sample_tree();
    let root = tree.root.index();
    tree.nodes[root].color = Color::Red;
    assert_eq!(tree.validate(), Err(TreeError::RedRoot));
}

#[test]
fn validate_reports_consecutive_reds() {
    let mut tree = sample_tree();
    let i = tree.index_of(40);
    tree.nodes[i].color = Color::Red;
    assert_eq!(
        tree.validate(),
        Err(TreeError::ConsecutiveReds { depth: 2 })
    );
}

#[test]
fn validate_reports_unbalanced_blacks() {
    let mut tree = sample_tree();
    let i = tree.index_of(20);
    tree.nodes[i].color = Color::Red;
    assert_eq!(
        tree.validate(),
        Err(TreeError::UnbalancedBlacks {
            depth: 0,
            left: 0,
            right: 1
        })
    );
}

#[test]
fn validate_reports_unordered_keys() {
    let mut tree = sample_tree();
    let i = tree.index_of(20);
    tree.nodes[i].key = Some(99);
    assert_eq!(tree.validate(), Err(TreeError::Unordered { depth: 1 }));
}

#[test]
fn validate_reports_broken_parent_link() {
    let mut tree = sample_tree();
    let i = tree.index_of(35);
    tree.nodes[i].parent = tree.root;
    assert_eq!(
        tree.validate(),
        Err(TreeError::BrokenParentLink { depth: 3 })
    );
}

#[test]
fn validate_reports_length_mismatch() {
    let mut tree = sample_tree();
    tree.len = 5;
    assert_eq!(
        tree.validate(),
        Err(TreeError::LengthMismatch {
            expected: 5,
            found: 8
        })
    );
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u32),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        any::<u8>().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn random_ops_keep_invariants_and_match_model(
        ops in prop::collection::vec(op_strategy(), 0..400)
    ) {
        let mut tree = RbTree::new();
        let mut model = BTreeMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(tree.insert(k, v), model.insert(k, v));
                }
                Op::Remove(k) => {
                    let removed = model.remove(&k);
                    prop_assert_eq!(tree.delete(&k), removed.is_some());
                    prop_assert_eq!(tree.find(&k), None);
                    prop_assert!(!tree.delete(&k));
                }
            }
            let stats = tree
                .validate()
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(stats.len, model.len());
            prop_assert!((stats.height as f64) <= 2.0 * ((stats.len + 1) as f64).log2());
        }
        prop_assert!(tree.iter().eq(model.iter()));
        for (k, v) in &model {
            prop_assert_eq!(tree.find(k), Some(v));
        }
    }

    #[test]
    fn traversals_visit_every_entry_once(keys in prop::collection::btree_set(any::<i16>(), 0..200)) {
        let mut tree = RbTree::new();
        for k in &keys {
            tree.insert(*k, ());
        }
        let in_order: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
        let expected: Vec<_> = keys.iter().copied().collect();
        prop_assert_eq!(&in_order, &expected);

        let mut pre: Vec<_> = tree.pre_order().map(|(k, _)| *k).collect();
        let mut post: Vec<_> = tree.post_order().map(|(k, _)| *k).collect();
        prop_assert_eq!(pre.first().copied(), tree.root_key());
        prop_assert_eq!(post.last().copied(), tree.root_key());
        pre.sort_unstable();
        post.sort_unstable();
        prop_assert_eq!(&pre, &expected);
        prop_assert_eq!(&post, &expected);
    }
}

impl RbTree<i16, ()> {
    fn root_key(&self) -> Option<i16> {
        (!self.root.is_sentinel()).then(|| *self.node_ref(self.root, Node::key))
    }
}
