use super::arena::Handle;
use super::node::ParentLink;
use super::raw_abtree::RawABTree;
use crate::error::{Error, Result};

/// Totals gathered while walking the tree.
#[derive(Default)]
struct Walk {
    leaf_depth: Option<usize>,
    keys: usize,
    nodes: usize,
}

impl<K: Ord> RawABTree<K> {
    /// Checks every structural invariant and reports the first violation found.
    pub(crate) fn validate(&self) -> Result<()> {
        let top = self.top();
        if self.node(top).parent().is_some() {
            return Err(Error::ParentLink { node: top.index() });
        }

        let mut walk = Walk::default();
        self.validate_node(top, 0, None, None, &mut walk)?;

        if walk.keys != self.len() {
            return Err(Error::LenMismatch {
                len: self.len(),
                actual: walk.keys,
            });
        }
        if walk.nodes != self.node_count() {
            return Err(Error::Leak {
                allocated: self.node_count(),
                reachable: walk.nodes,
            });
        }
        Ok(())
    }

    fn validate_node(
        &self,
        handle: Handle,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        walk: &mut Walk,
    ) -> Result<()> {
        let node = self.node(handle);
        let count = node.key_count();
        walk.nodes += 1;
        walk.keys += count;

        // The top node is exempt from the lower bound but must not linger empty above a child.
        let min = match (depth, node.is_leaf_layer()) {
            (0, true) => 0,
            (0, false) => 1,
            _ => self.params().min_keys(),
        };
        let max = self.params().max_fill();
        if count < min || count > max {
            return Err(Error::KeyCount {
                node: handle.index(),
                keys: count,
                min,
                max,
            });
        }

        if let Some(index) = (1..count).find(|&i| node.key(i - 1) >= node.key(i)) {
            return Err(Error::Unordered {
                node: handle.index(),
                index,
            });
        }

        if let (Some(first), Some(last)) = (node.keys().first(), node.keys().last()) {
            let above_lower = lower.is_none_or(|bound| first > bound);
            let below_upper = upper.is_none_or(|bound| last < bound);
            if !above_lower || !below_upper {
                return Err(Error::OutOfBounds { node: handle.index() });
            }
        }

        if node.is_leaf_layer() {
            if node.child_count() != 0 {
                return Err(Error::Shape {
                    node: handle.index(),
                    keys: count,
                    children: node.child_count(),
                });
            }
            let expected = *walk.leaf_depth.get_or_insert(depth);
            if depth != expected {
                return Err(Error::UnevenDepth {
                    node: handle.index(),
                    depth,
                    expected,
                });
            }
            return Ok(());
        }

        if node.child_count() != count + 1 {
            return Err(Error::Shape {
                node: handle.index(),
                keys: count,
                children: node.child_count(),
            });
        }

        for (slot, &child) in node.children().iter().enumerate() {
            if self.node(child).parent() != Some(ParentLink { node: handle, slot }) {
                return Err(Error::ParentLink { node: child.index() });
            }
            let child_lower = if slot == 0 { lower } else { Some(node.key(slot - 1)) };
            let child_upper = if slot == count { upper } else { Some(node.key(slot)) };
            self.validate_node(child, depth + 1, child_lower, child_upper, walk)?;
        }
        Ok(())
    }
}
