//! Node types for slab-based crit-bit storage.
//!
//! ## Design
//!
//! The trie keeps internal nodes and leaves in two separate slabs. Links
//! between them are slab keys (`usize`), never references, so the node graph
//! has no lifetimes or cycles to manage.
//!
//! A child slot holds a [`NodeRef`], which tags the key with the slab it
//! belongs to.
//!
//! ## Parent Links
//!
//! Every node stores its parent's slab key (`None` at the root). Parent links
//! make removal O(1) once the leaf is found, and let neighbour lookups walk
//! back up the path without a stack.

/// Tagged slab key for a child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// Key into the internal-node slab
    Inner(usize),
    /// Key into the leaf slab
    Leaf(usize),
}

/// Internal node: tests a single bit of the key.
///
/// ```text
/// InnerNode {
///     crit_bit: u8            (0 = least significant, 127 = most)
///     parent:   Option<usize> (internal-node slab key)
///     left:     NodeRef       (keys with crit_bit == 0)
///     right:    NodeRef       (keys with crit_bit == 1)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerNode {
    /// Highest bit at which the keys below this node differ
    pub crit_bit: u8,

    /// Parent internal node, `None` for the root
    pub parent: Option<usize>,

    /// Subtree whose keys have `crit_bit` clear
    pub left: NodeRef,

    /// Subtree whose keys have `crit_bit` set
    pub right: NodeRef,
}

impl InnerNode {
    /// Select the child a key descends into.
    #[inline]
    pub fn child_for(&self, key: u128) -> NodeRef {
        if bit_is_set(key, self.crit_bit) {
            self.right
        } else {
            self.left
        }
    }

    /// Replace whichever child slot currently holds `old`.
    ///
    /// Returns `false` if `old` is not a child of this node.
    #[inline]
    pub fn replace_child(&mut self, old: NodeRef, new: NodeRef) -> bool {
        if self.left == old {
            self.left = new;
            true
        } else if self.right == old {
            self.right = new;
            true
        } else {
            false
        }
    }

    /// The child that is not `child`.
    #[inline]
    pub fn sibling_of(&self, child: NodeRef) -> NodeRef {
        if self.left == child {
            self.right
        } else {
            self.left
        }
    }
}

/// Leaf: one key and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf<V> {
    pub key: u128,
    pub value: V,
    /// Parent internal node, `None` if this leaf is the root
    pub parent: Option<usize>,
}

impl<V> Leaf<V> {
    #[inline]
    pub fn new(key: u128, value: V, parent: Option<usize>) -> Self {
        Self { key, value, parent }
    }
}

/// Check whether bit `bit` of `key` is set (bit 0 = least significant).
#[inline]
pub fn bit_is_set(key: u128, bit: u8) -> bool {
    (key >> bit) & 1 == 1
}

/// Position of the highest bit at which `a` and `b` differ.
///
/// Returns `None` when the keys are equal.
#[inline]
pub fn critical_bit(a: u128, b: u128) -> Option<u8> {
    let diff = a ^ b;
    if diff == 0 {
        None
    } else {
        // leading_zeros is at most 127 here, so the result fits in 0..=127
        Some((127 - diff.leading_zeros()) as u8)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
