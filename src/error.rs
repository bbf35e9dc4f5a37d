//! # Error Types for the (a,b)-Tree
//!
//! The tree performs no I/O, so only two kinds of failure exist:
//!
//! - **Parameter rejection**: an `(a, b)` pair that cannot keep nodes balanced is refused when
//!   [`Params`](crate::Params) are built, before any node exists.
//! - **Structural corruption**: reported by [`ABTreeSet::validate`](crate::ABTreeSet::validate)
//!   when a node escapes its key-count bounds, keys fall out of order, or a link is broken.
//!   A set that reports corruption must not be used further.
//!
//! Duplicate inserts and missing removes are not errors; they are reported through the `bool`
//! returned by [`insert`](crate::ABTreeSet::insert) and [`remove`](crate::ABTreeSet::remove).

use thiserror::Error;

/// Errors produced while configuring or validating an (a,b)-tree.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The minimum fill `a` is below 2.
    #[error("minimum fill `a` must be at least 2, got {a}")]
    MinFillTooSmall {
        /// The rejected minimum fill.
        a: usize,
    },

    /// The maximum fill `b` is below `2a - 1`.
    ///
    /// Below this bound an overflowing node cannot be split into two valid halves and two
    /// minimal siblings cannot be merged without overflowing.
    #[error("maximum fill `b` must be at least 2a - 1 = {required} for a = {a}, got {b}")]
    MaxFillTooSmall {
        /// The accepted minimum fill.
        a: usize,
        /// The rejected maximum fill.
        b: usize,
        /// The smallest maximum fill that would have been accepted.
        required: usize,
    },

    /// A node holds a number of keys outside of its permitted range.
    #[error("node {node} holds {keys} keys, outside of [{min}, {max}]")]
    KeyCount {
        /// Arena index of the offending node.
        node: usize,
        /// Number of keys found.
        keys: usize,
        /// Smallest permitted key count.
        min: usize,
        /// Largest permitted key count.
        max: usize,
    },

    /// Two neighbouring keys of a node are not strictly ascending.
    #[error("keys of node {node} are not strictly ascending at index {index}")]
    Unordered {
        /// Arena index of the offending node.
        node: usize,
        /// Index of the first key that is not greater than its predecessor.
        index: usize,
    },

    /// A key lies outside of the range bounded by the separators around its subtree.
    #[error("node {node} holds a key outside of the range of its parent separators")]
    OutOfBounds {
        /// Arena index of the offending node.
        node: usize,
    },

    /// Leaf-layer nodes were found at different depths.
    #[error("leaf-layer node {node} sits at depth {depth}, expected {expected}")]
    UnevenDepth {
        /// Arena index of the offending node.
        node: usize,
        /// Depth at which the node was found.
        depth: usize,
        /// Depth of the first leaf-layer node encountered.
        expected: usize,
    },

    /// A node's child list does not match its key count or layer flag.
    #[error("node {node} has {children} children for {keys} keys")]
    Shape {
        /// Arena index of the offending node.
        node: usize,
        /// Number of keys found.
        keys: usize,
        /// Number of children found.
        children: usize,
    },

    /// A node's parent back-reference does not point at the slot that owns it.
    #[error("node {node} has a stale parent back-reference")]
    ParentLink {
        /// Arena index of the offending node.
        node: usize,
    },

    /// The stored element count disagrees with the keys reachable from the root.
    #[error("set reports {len} keys but holds {actual}")]
    LenMismatch {
        /// Count maintained by the set.
        len: usize,
        /// Count found by walking the tree.
        actual: usize,
    },

    /// The arena holds nodes that are not reachable from the root wrapper.
    #[error("{allocated} nodes allocated but only {reachable} reachable")]
    Leak {
        /// Live nodes in the arena.
        allocated: usize,
        /// Nodes reachable from the root wrapper.
        reachable: usize,
    },
}

/// A Result type alias using our custom Error type.
pub type Result<T> = core::result::Result<T, Error>;
