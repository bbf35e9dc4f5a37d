use core::borrow::Borrow;

use log::trace;

use super::arena::{Arena, Handle};
use super::node::{Node, ParentLink, RootWrapper, SearchResult};
use crate::Params;

/// The core (a,b)-tree backing `ABTreeSet`.
#[derive(Clone)]
pub(crate) struct RawABTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Sentinel holding the top node; an empty tree still owns one empty leaf-layer node.
    wrapper: RootWrapper,
    /// Branching parameters, fixed at construction.
    params: Params,
    /// Total number of keys in the tree.
    len: usize,
}

impl<K> RawABTree<K> {
    /// Creates a new, empty tree.
    pub(crate) fn new(params: Params) -> Self {
        let mut nodes = Arena::new();
        let top = nodes.alloc(Node::new_leaf());
        Self {
            nodes,
            wrapper: RootWrapper::new(top),
            params,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn params(&self) -> Params {
        self.params
    }

    /// Clears all keys, leaving a single empty leaf-layer node under the wrapper.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        let top = self.nodes.alloc(Node::new_leaf());
        self.wrapper = RootWrapper::new(top);
        self.len = 0;
    }

    /// Handle of the node directly under the root wrapper.
    pub(crate) const fn top(&self) -> Handle {
        self.wrapper.child()
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Number of live nodes, the wrapper excluded.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of node layers below the wrapper.
    pub(crate) fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.top();
        while !self.nodes.get(current).is_leaf_layer() {
            current = self.nodes.get(current).child(0);
            height += 1;
        }
        height
    }

    fn leftmost_leaf(&self, mut current: Handle) -> Handle {
        while !self.nodes.get(current).is_leaf_layer() {
            current = self.nodes.get(current).child(0);
        }
        current
    }

    fn rightmost_leaf(&self, mut current: Handle) -> Handle {
        while !self.nodes.get(current).is_leaf_layer() {
            current = self.nodes.get(current).last_child();
        }
        current
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K> {
        self.nodes.get_mut(handle)
    }

    #[cfg(test)]
    pub(crate) fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Points every child of `handle` from `from` onwards back at its current slot.
    fn relink_children(&mut self, handle: Handle, from: usize) {
        for slot in from..self.nodes.get(handle).child_count() {
            let child = self.nodes.get(handle).child(slot);
            self.nodes.get_mut(child).set_parent(Some(ParentLink { node: handle, slot }));
        }
    }

    pub(crate) fn first(&self) -> Option<&K> {
        let leaf = self.leftmost_leaf(self.top());
        self.nodes.get(leaf).keys().first()
    }

    pub(crate) fn last(&self) -> Option<&K> {
        let leaf = self.rightmost_leaf(self.top());
        self.nodes.get(leaf).keys().last()
    }

    /// Removes and returns the smallest key.
    pub(crate) fn pop_first(&mut self) -> Option<K> {
        let leaf = self.leftmost_leaf(self.top());
        if self.nodes.get(leaf).key_count() == 0 {
            return None;
        }
        let key = self.nodes.get_mut(leaf).remove_key(0);
        self.finish_removal(leaf);
        Some(key)
    }

    /// Removes and returns the largest key.
    pub(crate) fn pop_last(&mut self) -> Option<K> {
        let leaf = self.rightmost_leaf(self.top());
        let count = self.nodes.get(leaf).key_count();
        if count == 0 {
            return None;
        }
        let key = self.nodes.get_mut(leaf).remove_key(count - 1);
        self.finish_removal(leaf);
        Some(key)
    }
}

impl<K: Ord> RawABTree<K> {
    /// Searches for a key, which may sit on any layer of the tree.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.top();
        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(idx) => return Some(node.key(idx)),
                SearchResult::GoDown(_) if node.is_leaf_layer() => return None,
                SearchResult::GoDown(idx) => current = node.child(idx),
            }
        }
    }

    /// Inserts a key into the tree.
    /// Returns `false`, leaving the tree untouched, if the key was already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let mut current = self.top();
        loop {
            let node = self.nodes.get(current);
            match node.search(&key) {
                SearchResult::Found(_) => return false,
                SearchResult::GoDown(idx) if node.is_leaf_layer() => {
                    self.nodes.get_mut(current).insert_key(idx, key);
                    self.len += 1;
                    self.split_upwards(current);
                    return true;
                }
                SearchResult::GoDown(idx) => current = node.child(idx),
            }
        }
    }

    /// Removes a key from the tree and returns it.
    ///
    /// A key found above the leaf layer is overwritten by its in-order successor, the smallest
    /// key of its right subtree, and the successor's leaf entry is removed instead.
    pub(crate) fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.top();
        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(idx) if node.is_leaf_layer() => {
                    let removed = self.nodes.get_mut(current).remove_key(idx);
                    self.finish_removal(current);
                    return Some(removed);
                }
                SearchResult::Found(idx) => {
                    let leaf = self.leftmost_leaf(node.child(idx + 1));
                    let successor = self.nodes.get_mut(leaf).remove_key(0);
                    let removed = self.nodes.get_mut(current).replace_key(idx, successor);
                    self.finish_removal(leaf);
                    return Some(removed);
                }
                SearchResult::GoDown(_) if node.is_leaf_layer() => return None,
                SearchResult::GoDown(idx) => current = node.child(idx),
            }
        }
    }
}

// Insertion path.
impl<K> RawABTree<K> {
    /// Splits `current` and each ancestor in turn while it holds more than `b` keys.
    fn split_upwards(&mut self, mut current: Handle) {
        while self.nodes.get(current).key_count() > self.params.max_fill() {
            current = self.split(current);
        }
    }

    /// Splits an overflowing node, promoting its middle key into the parent.
    /// Returns the parent, which has gained one key.
    fn split(&mut self, handle: Handle) -> Handle {
        let (separator, right) = self.nodes.get_mut(handle).split();
        let right = self.nodes.alloc(right);
        self.relink_children(right, 0);

        debug_assert!(
            self.nodes.get(handle).key_count() >= self.params.min_keys()
                && self.nodes.get(right).key_count() >= self.params.min_keys(),
            "split produced an underfull half"
        );

        if let Some(ParentLink { node: parent, slot }) = self.nodes.get(handle).parent() {
            self.nodes.get_mut(parent).insert_separator(slot, separator, right);
            self.relink_children(parent, slot + 1);
            trace!("split node {} into {}", handle.index(), right.index());
            parent
        } else {
            let root = self.nodes.alloc(Node::new_root(separator, handle, right));
            self.relink_children(root, 0);
            self.wrapper.replace_child(root);
            trace!("split top node {}; height grew to {}", handle.index(), self.height());
            root
        }
    }
}

// Deletion path.
impl<K> RawABTree<K> {
    fn finish_removal(&mut self, leaf: Handle) {
        self.len -= 1;
        self.join_upwards(leaf);
    }

    /// Repairs underflow at `current`, then at each ancestor that lost a key to a merge.
    fn join_upwards(&mut self, mut current: Handle) {
        loop {
            let node = self.nodes.get(current);
            let Some(link) = node.parent() else {
                // The top node may run below `a`; it only goes away once it has no keys left.
                if node.key_count() == 0 && !node.is_leaf_layer() {
                    self.collapse_top(current);
                }
                return;
            };
            if node.key_count() >= self.params.min_keys() {
                return;
            }
            match self.join(current, link) {
                Some(parent) => current = parent,
                None => return,
            }
        }
    }

    /// Replaces an empty internal top node with its only child.
    fn collapse_top(&mut self, top: Handle) {
        let child = self.nodes.take(top).into_only_child();
        self.nodes.get_mut(child).set_parent(None);
        self.wrapper.replace_child(child);
        trace!("collapsed top node {}; height shrank to {}", top.index(), self.height());
    }

    /// Resolves underflow at `handle` using its right sibling, or its left one when `handle` is
    /// the last child. Borrows an entry if the sibling can spare one, merges otherwise.
    ///
    /// Returns the parent when a merge took a separator out of it.
    fn join(&mut self, handle: Handle, link: ParentLink) -> Option<Handle> {
        let ParentLink { node: parent, slot } = link;
        let min = self.params.min_keys();
        let siblings = self.nodes.get(parent);

        if slot + 1 < siblings.child_count() {
            let right = siblings.child(slot + 1);
            if self.nodes.get(right).key_count() > min {
                self.borrow_from_right(handle, right, parent, slot);
                None
            } else {
                self.merge(handle, right, parent, slot);
                Some(parent)
            }
        } else {
            let left = siblings.child(slot - 1);
            if self.nodes.get(left).key_count() > min {
                self.borrow_from_left(handle, left, parent, slot);
                None
            } else {
                self.merge(left, handle, parent, slot - 1);
                Some(parent)
            }
        }
    }

    /// Rotates the right sibling's first entry through the parent separator into `handle`.
    fn borrow_from_right(&mut self, handle: Handle, right: Handle, parent: Handle, slot: usize) {
        let (key, child) = self.nodes.get_mut(right).pop_front();
        self.relink_children(right, 0);

        let separator = self.nodes.get_mut(parent).replace_key(slot, key);
        let node = self.nodes.get_mut(handle);
        node.push_back(separator, child);

        if let Some(child) = child {
            let slot = node.child_count() - 1;
            self.nodes.get_mut(child).set_parent(Some(ParentLink { node: handle, slot }));
        }
        trace!("node {} borrowed from right sibling {}", handle.index(), right.index());
    }

    /// Rotates the left sibling's last entry through the parent separator into `handle`.
    fn borrow_from_left(&mut self, handle: Handle, left: Handle, parent: Handle, slot: usize) {
        let (key, child) = self.nodes.get_mut(left).pop_back();
        let separator = self.nodes.get_mut(parent).replace_key(slot - 1, key);
        self.nodes.get_mut(handle).push_front(separator, child);
        self.relink_children(handle, 0);
        trace!("node {} borrowed from left sibling {}", handle.index(), left.index());
    }

    /// Merges `right` and the separator between them into `left`, then frees `right`.
    fn merge(&mut self, left: Handle, right: Handle, parent: Handle, separator_idx: usize) {
        let (separator, removed) = self.nodes.get_mut(parent).remove_separator(separator_idx);
        debug_assert_eq!(removed, right, "separator does not precede the merged sibling");
        self.relink_children(parent, separator_idx + 1);

        let right_node = self.nodes.take(right);
        let left_node = self.nodes.get_mut(left);
        let from = left_node.child_count();
        left_node.merge_with_right(separator, right_node);
        self.relink_children(left, from);

        debug_assert!(
            self.nodes.get(left).key_count() <= self.params.max_fill(),
            "merge produced an overfull node"
        );
        trace!("merged node {} into {}", right.index(), left.index());
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn tree(a: usize, b: usize) -> RawABTree<i32> {
        RawABTree::new(Params::new(a, b).unwrap())
    }

    fn keys_of(tree: &RawABTree<i32>, handle: Handle) -> Vec<i32> {
        tree.node(handle).keys().to_vec()
    }

    #[test]
    fn empty_tree_has_single_leaf() {
        let tree = tree(2, 4);
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.node(tree.top()).is_leaf_layer());
        assert_eq!(tree.first(), None);
        tree.validate().unwrap();
    }

    #[test]
    fn overflow_splits_top_and_grows_height() {
        let mut tree = tree(2, 4);
        for k in 1..=4 {
            assert!(tree.insert(k));
        }
        assert_eq!(tree.height(), 1);

        assert!(tree.insert(5));
        assert_eq!(tree.height(), 2);
        assert_eq!(keys_of(&tree, tree.top()), [3]);

        let top = tree.node(tree.top());
        assert_eq!(keys_of(&tree, top.child(0)), [1, 2]);
        assert_eq!(keys_of(&tree, top.child(1)), [4, 5]);
        tree.validate().unwrap();
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut tree = tree(2, 4);
        for k in 0..20 {
            tree.insert(k);
        }
        let nodes = tree.node_count();
        for k in 0..20 {
            assert!(!tree.insert(k));
        }
        assert_eq!(tree.len(), 20);
        assert_eq!(tree.node_count(), nodes);
        tree.validate().unwrap();
    }

    #[test]
    fn remove_of_internal_key_uses_successor() {
        let mut tree = tree(2, 4);
        for k in 1..=7 {
            tree.insert(k);
        }
        // top [3], children [1, 2] and [4, 5, 6, 7]
        let separator = *tree.node(tree.top()).key(0);
        assert_eq!(separator, 3);
        assert_eq!(tree.take(&separator), Some(separator));
        assert_eq!(tree.get(&separator), None);
        assert!(!tree.node(tree.top()).keys().contains(&separator));
        tree.validate().unwrap();
        for k in (1..=7).filter(|&k| k != separator) {
            assert_eq!(tree.get(&k), Some(&k));
        }
    }

    #[test]
    fn underflow_borrows_from_right_sibling() {
        let mut tree = tree(2, 4);
        // top [3], children [1, 2] and [4, 5, 6]
        for k in 1..=6 {
            tree.insert(k);
        }
        assert_eq!(keys_of(&tree, tree.top()), [3]);
        let nodes = tree.node_count();

        tree.take(&1);
        let top = tree.node(tree.top());
        assert_eq!(top.keys(), &[4]);
        assert_eq!(keys_of(&tree, top.child(0)), [2, 3]);
        assert_eq!(keys_of(&tree, top.child(1)), [5, 6]);
        assert_eq!(tree.node_count(), nodes);
        tree.validate().unwrap();
    }

    #[test]
    fn underflow_borrows_from_left_sibling() {
        let mut tree = tree(2, 4);
        // top [3], children [0, 1, 2] and [4, 5]
        for k in 1..=5 {
            tree.insert(k);
        }
        tree.insert(0);
        let nodes = tree.node_count();

        tree.take(&5);
        let top = tree.node(tree.top());
        assert_eq!(top.keys(), &[2]);
        assert_eq!(keys_of(&tree, top.child(0)), [0, 1]);
        assert_eq!(keys_of(&tree, top.child(1)), [3, 4]);
        assert_eq!(tree.node_count(), nodes);
        tree.validate().unwrap();
    }

    #[test]
    fn underflow_merges_and_collapses_top() {
        let mut tree = tree(2, 4);
        // top [3], children [1, 2] and [4, 5]
        for k in 1..=5 {
            tree.insert(k);
        }
        assert_eq!(tree.node_count(), 3);

        tree.take(&1);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(keys_of(&tree, tree.top()), [2, 3, 4, 5]);
        assert!(tree.node(tree.top()).parent().is_none());
        tree.validate().unwrap();
    }

    #[test]
    fn last_child_merges_into_left_sibling() {
        let mut tree = tree(2, 4);
        // top [3, 6], children [1, 2], [4, 5], [7, 8]
        for k in 1..=8 {
            tree.insert(k);
        }
        assert_eq!(keys_of(&tree, tree.top()), [3, 6]);

        tree.take(&8);
        let top = tree.node(tree.top());
        assert_eq!(top.keys(), &[3]);
        assert_eq!(keys_of(&tree, top.child(1)), [4, 5, 6, 7]);
        assert_eq!(tree.node_count(), 3);
        tree.validate().unwrap();
    }

    #[test]
    fn single_insert_then_remove_restores_empty_state() {
        let mut tree = tree(2, 4);
        tree.insert(42);
        assert_eq!(tree.take(&42), Some(42));
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node(tree.top()).key_count(), 0);
        assert!(tree.node(tree.top()).is_leaf_layer());
        tree.validate().unwrap();
    }

    #[test]
    fn pop_first_and_last_drain_in_order() {
        let mut tree = tree(2, 4);
        for k in 0..100 {
            tree.insert(k);
        }
        for k in 0..50 {
            assert_eq!(tree.pop_first(), Some(k));
            assert_eq!(tree.pop_last(), Some(99 - k));
            tree.validate().unwrap();
        }
        assert_eq!(tree.pop_first(), None);
        assert_eq!(tree.pop_last(), None);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn clear_resets_to_single_leaf() {
        let mut tree = tree(3, 6);
        for k in 0..500 {
            tree.insert(k);
        }
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        tree.validate().unwrap();
    }

    // Test operations enum for property testing
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..1000).prop_map(Op::Insert),
            4 => (0i32..1000).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }

    fn params_strategy() -> impl Strategy<Value = Params> {
        (2usize..6, 0usize..4).prop_map(|(a, extra)| Params::new(a, 2 * a - 1 + extra).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_operations(
            params in params_strategy(),
            ops in prop::collection::vec(op_strategy(), 0..500),
        ) {
            let mut tree: RawABTree<i32> = RawABTree::new(params);
            let mut model: BTreeSet<i32> = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(key) => prop_assert_eq!(tree.insert(key), model.insert(key)),
                    Op::Remove(key) => prop_assert_eq!(tree.take(&key), model.take(&key)),
                    Op::PopFirst => prop_assert_eq!(tree.pop_first(), model.pop_first()),
                    Op::PopLast => prop_assert_eq!(tree.pop_last(), model.pop_last()),
                }
                prop_assert_eq!(tree.validate(), Ok(()));
                prop_assert_eq!(tree.len(), model.len());
            }

            for key in 0..1000 {
                prop_assert_eq!(tree.get(&key).is_some(), model.contains(&key));
            }
        }

        #[test]
        fn height_is_logarithmic(params in params_strategy(), count in 1usize..2000) {
            let mut tree: RawABTree<i32> = RawABTree::new(params);
            for k in 0..count as i32 {
                tree.insert(k);
            }

            // Every non-top node holds at least `min_keys` keys, so every layer below the top
            // fans out by at least `min_keys + 1`.
            let fanout = (params.min_keys() + 1) as f64;
            let bound = ((count as f64 + 1.0).ln() / fanout.ln()).floor() as usize + 1;
            prop_assert!(tree.height() <= bound, "height {} > bound {}", tree.height(), bound);
        }
    }
}
