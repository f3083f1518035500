//! The order-preserving symbol allocator.
//!
//! This module implements a binary search tree that assigns a `u64` symbol
//! to every string it stores, chosen so that the numeric order of any two
//! symbols matches the lexicographic byte order of their strings. The tree
//! is the mechanism behind [`OrdSymbol`] and [`OrdCanonSymbol`]; equality
//! flavors never touch it.
//!
//! # Value-space scheme
//!
//! A symbol is determined entirely by the path from the root to its node.
//! The root takes the midpoint of the 64-bit space, `2^63`. Each descent
//! halves the remaining increment: going left subtracts the current
//! increment from the parent's symbol, going right adds it, and either way
//! the increment for the next level is half the current one. The increment
//! at the root is `2^62`, so after 63 descents it reaches zero and that
//! branch cannot be subdivided further.
//!
//! Because a left descent strictly decreases the symbol and a right descent
//! strictly increases it, by disjoint and shrinking magnitudes, an in-order
//! traversal always yields strictly increasing symbols. That is the whole
//! ordering invariant.
//!
//! # Capacity
//!
//! A monotone sequence of single insertions builds a spine and burns one
//! increment bit per level: the 65th such insertion fails with
//! [`InternError::TableFull`]. This is a fundamental limit of single-insert
//! mode, not a defect. [`OrderTree::insert_balanced`] sidesteps it by
//! inserting a sorted batch middle-first, producing a balanced subtree of
//! depth `ceil(log2 n)` for the batch, so even very large pre-announced
//! workloads fit comfortably.
//!
//! [`OrdSymbol`]: crate::OrdSymbol
//! [`OrdCanonSymbol`]: crate::OrdCanonSymbol

use std::cmp::Ordering;

use crate::error::{InternError, InternResult};

/// Symbol assigned to the root node.
const ROOT_SYMBOL: u64 = 1 << 63;

/// Increment applied at the root's children; halved per level below.
const ROOT_INCREMENT: u64 = 1 << 62;

/// A node of the allocator tree.
struct Node {
    /// Canonical string stored at this node.
    key: String,
    /// Symbol assigned to `key`, fixed by the node's position.
    sym: u64,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn new(key: &str, sym: u64) -> Box<Self> {
        Box::new(Node {
            key: key.to_owned(),
            sym,
            left: None,
            right: None,
        })
    }
}

/// A binary search tree assigning order-preserving symbols to strings.
///
/// All mutation happens in place; callers serialize access through the
/// owning table's writer lock.
#[derive(Default)]
pub(crate) struct OrderTree {
    root: Option<Box<Node>>,
    /// Number of distinct strings stored.
    len: usize,
}

impl OrderTree {
    /// Create an empty tree.
    pub(crate) fn new() -> Self {
        OrderTree::default()
    }

    /// Number of distinct strings stored in the tree.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Insert a single string, returning its symbol.
    ///
    /// Re-inserting a string the tree already holds returns the existing
    /// symbol. Fails with [`InternError::TableFull`] when reaching the
    /// string's position would require subdividing an exhausted increment.
    pub(crate) fn insert(&mut self, key: &str) -> InternResult<u64> {
        let mut val = ROOT_SYMBOL;
        let mut incr = ROOT_INCREMENT;
        let mut slot = &mut self.root;
        loop {
            match slot {
                None => {
                    *slot = Some(Node::new(key, val));
                    self.len += 1;
                    return Ok(val);
                }
                Some(node) => match key.cmp(node.key.as_str()) {
                    Ordering::Equal => return Ok(node.sym),
                    Ordering::Less => {
                        if incr == 0 {
                            return Err(InternError::TableFull {
                                string: key.to_owned(),
                            });
                        }
                        val -= incr;
                        incr >>= 1;
                        slot = &mut node.left;
                    }
                    Ordering::Greater => {
                        if incr == 0 {
                            return Err(InternError::TableFull {
                                string: key.to_owned(),
                            });
                        }
                        val += incr;
                        incr >>= 1;
                        slot = &mut node.right;
                    }
                },
            }
        }
    }

    /// Insert a lexicographically sorted batch, keeping the batch balanced.
    ///
    /// Works middle-out: the midpoint of each range is inserted before
    /// either half, so the batch forms a balanced subtree wherever it lands.
    /// Duplicates in the batch are absorbed by the equal-key path of
    /// [`OrderTree::insert`]. Ranges are processed from an explicit work
    /// stack rather than by recursion, keeping stack usage flat for very
    /// large batches.
    ///
    /// On failure the error is returned immediately; strings inserted before
    /// the failure point remain in the tree.
    pub(crate) fn insert_balanced(&mut self, sorted: &[String]) -> InternResult<()> {
        debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        let mut ranges = vec![(0usize, sorted.len())];
        while let Some((lo, hi)) = ranges.pop() {
            if lo >= hi {
                continue;
            }
            let mid = lo + (hi - lo) / 2;
            self.insert(&sorted[mid])?;
            ranges.push((lo, mid));
            ranges.push((mid + 1, hi));
        }
        Ok(())
    }

    /// Look up the symbol previously assigned to `key`.
    pub(crate) fn find(&self, key: &str) -> Option<u64> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match key.cmp(node.key.as_str()) {
                Ordering::Equal => return Some(node.sym),
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
            }
        }
        None
    }

    /// Visit every `(key, symbol)` pair in ascending key order.
    ///
    /// Iterative in-order traversal with an explicit node stack.
    pub(crate) fn walk(&self, visit: &mut dyn FnMut(&str, u64)) {
        let mut stack: Vec<&Node> = Vec::new();
        let mut cur = self.root.as_deref();
        while cur.is_some() || !stack.is_empty() {
            while let Some(node) = cur {
                stack.push(node);
                cur = node.left.as_deref();
            }
            let node = stack.pop().expect("stack checked non-empty");
            visit(&node.key, node.sym);
            cur = node.right.as_deref();
        }
    }

    /// Drop every node, returning the tree to its empty state.
    pub(crate) fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}
