//! Generalized (a,b)-tree ordered sets for Rust.
//!
//! This crate provides [`ABTreeSet`], an in-memory sorted set backed by an (a,b)-tree: a
//! multiway balanced search tree in which every node except the top one holds between `a`
//! and `b` keys. The branching parameters are chosen at runtime through [`Params`], so the
//! same code serves a narrow 2-4 tree as well as a wide, cache-friendly one.
//!
//! # Example
//!
//! ```
//! use abtree::ABTreeSet;
//!
//! let mut set = ABTreeSet::new(2, 4);
//! for key in [5, 1, 4, 2, 3] {
//!     set.insert(key);
//! }
//!
//! assert!(set.contains(&3));
//! assert_eq!(set.len(), 5);
//!
//! // Duplicate inserts and missing removes are reported, not applied.
//! assert!(!set.insert(3));
//! assert!(!set.remove(&42));
//!
//! assert!(set.remove(&3));
//! assert_eq!(set.first(), Some(&1));
//! assert_eq!(set.last(), Some(&5));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Runtime branching factor** - Any `a >= 2`, `b >= 2a - 1`, validated at construction
//! - **Logarithmic height** - Guaranteed regardless of insertion order
//! - **Self-checking** - [`ABTreeSet::validate`] walks the structure and reports corruption
//!
//! # Implementation
//!
//! Keys are stored in every layer of the tree (not only in the leaves). Overflowing nodes are
//! split and promote their middle key; underflowing nodes borrow a key from a sibling through
//! the parent separator or merge with it. Nodes live in an arena and refer to their parent by
//! handle, so rebalancing climbs upward without keeping a path stack. A permanent root wrapper
//! sits above the top node; root growth and root collapse only ever replace its single child.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod params;
mod raw;

pub mod abtree_set;

pub use abtree_set::ABTreeSet;
pub use error::{Error, Result};
pub use params::Params;
