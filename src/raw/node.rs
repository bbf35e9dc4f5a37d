use core::borrow::Borrow;

use smallvec::SmallVec;

use super::arena::Handle;

// Inline capacity, in keys, before a node spills to the heap.
// Covers the transient b + 1 keys of a 2-4 or 3-6 tree.
const INLINE_KEYS: usize = 8;

pub(crate) type Keys<K> = SmallVec<[K; INLINE_KEYS]>;
pub(crate) type Children = SmallVec<[Handle; INLINE_KEYS + 1]>;

/// Position of a node inside its parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ParentLink {
    /// The parent node.
    pub(crate) node: Handle,
    /// Index of this node in the parent's child list.
    pub(crate) slot: usize,
}

/// The permanent sentinel above the top node.
///
/// It holds a single entry and is never split, merged or checked against the fill bounds.
/// Root growth and root collapse only ever swap its child.
#[derive(Clone, Debug)]
pub(crate) struct RootWrapper {
    child: Handle,
}

impl RootWrapper {
    pub(crate) const fn new(child: Handle) -> Self {
        Self { child }
    }

    #[inline]
    pub(crate) const fn child(&self) -> Handle {
        self.child
    }

    pub(crate) fn replace_child(&mut self, child: Handle) -> Handle {
        core::mem::replace(&mut self.child, child)
    }
}

/// A node of the (a,b)-tree.
///
/// `children[i]` holds the keys smaller than `keys[i]`; the trailing child holds the keys greater
/// than every key of the node. Leaf-layer nodes have no children at all.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    keys: Keys<K>,
    children: Children,
    leaf_layer: bool,
    // `None` means the node hangs directly under the root wrapper.
    parent: Option<ParentLink>,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is the child to descend into (or the insertion point on the
    /// leaf layer).
    GoDown(usize),
}

impl<K> Node<K> {
    /// Creates an empty leaf-layer node.
    pub(crate) fn new_leaf() -> Self {
        Self {
            keys: SmallVec::new(),
            children: SmallVec::new(),
            leaf_layer: true,
            parent: None,
        }
    }

    /// Creates a new top node with a single separator between two children.
    pub(crate) fn new_root(separator: K, left: Handle, right: Handle) -> Self {
        let mut keys = SmallVec::new();
        keys.push(separator);
        let mut children = SmallVec::new();
        children.push(left);
        children.push(right);
        Self {
            keys,
            children,
            leaf_layer: false,
            parent: None,
        }
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn is_leaf_layer(&self) -> bool {
        self.leaf_layer
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The terminator child, holding the keys greater than every key of this node.
    pub(crate) fn last_child(&self) -> Handle {
        self.children[self.children.len() - 1]
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<ParentLink> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ParentLink>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::GoDown(idx),
        }
    }

    /// Inserts a key into a leaf-layer node.
    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        debug_assert!(self.leaf_layer, "keys without children only live on the leaf layer");
        self.keys.insert(index, key);
    }

    /// Removes a key from a leaf-layer node.
    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        debug_assert!(self.leaf_layer, "keys without children only live on the leaf layer");
        self.keys.remove(index)
    }

    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    /// Inserts a separator and the child on its right, right after the child at `index`.
    pub(crate) fn insert_separator(&mut self, index: usize, separator: K, right: Handle) {
        self.keys.insert(index, separator);
        self.children.insert(index + 1, right);
    }

    /// Removes the separator at `index` together with the child on its right.
    pub(crate) fn remove_separator(&mut self, index: usize) -> (K, Handle) {
        let key = self.keys.remove(index);
        let child = self.children.remove(index + 1);
        (key, child)
    }

    /// Detaches the smallest entry: the first key and, off the leaf layer, the child left of it.
    pub(crate) fn pop_front(&mut self) -> (K, Option<Handle>) {
        let key = self.keys.remove(0);
        let child = (!self.leaf_layer).then(|| self.children.remove(0));
        (key, child)
    }

    /// Detaches the largest entry: the last key and, off the leaf layer, the terminator child.
    pub(crate) fn pop_back(&mut self) -> (K, Option<Handle>) {
        let key = self.keys.pop().expect("`Node::pop_back()` - node has no keys!");
        let child = if self.leaf_layer { None } else { self.children.pop() };
        (key, child)
    }

    /// Prepends an entry; `child` becomes the new leftmost child.
    pub(crate) fn push_front(&mut self, key: K, child: Option<Handle>) {
        self.keys.insert(0, key);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    /// Appends an entry; `child` becomes the new terminator child.
    pub(crate) fn push_back(&mut self, key: K, child: Option<Handle>) {
        self.keys.push(key);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Splits this node around the key at `⌊(key_count - 1) / 2⌋`.
    ///
    /// Keys left of the separator stay here, keys right of it move into the returned sibling
    /// together with their children. The sibling has no parent yet.
    pub(crate) fn split(&mut self) -> (K, Node<K>) {
        let mid = (self.keys.len() - 1) / 2;

        let right_keys: Keys<K> = self.keys.drain(mid + 1..).collect();
        let right_children: Children = if self.leaf_layer {
            SmallVec::new()
        } else {
            self.children.drain(mid + 1..).collect()
        };
        let separator = self.keys.pop().expect("`Node::split()` - node has no keys!");

        let right = Node {
            keys: right_keys,
            children: right_children,
            leaf_layer: self.leaf_layer,
            parent: None,
        };
        (separator, right)
    }

    /// Absorbs a right sibling, placing the parent separator between the two key runs.
    pub(crate) fn merge_with_right(&mut self, separator: K, mut right: Node<K>) {
        debug_assert_eq!(self.leaf_layer, right.leaf_layer, "merging nodes of different layers");
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }

    /// Takes the only child of an internal node that has lost its last key.
    pub(crate) fn into_only_child(self) -> Handle {
        debug_assert!(self.keys.is_empty() && self.children.len() == 1);
        self.children[0]
    }
}
