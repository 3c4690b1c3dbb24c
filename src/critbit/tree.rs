//! Crit-bit tree implementation.
//!
//! ## Architecture
//!
//! - **Two slabs**: one for internal nodes, one for leaves
//! - **Tagged links**: children are [`NodeRef`] values, parents are plain keys
//! - **No rebalancing**: shape is fully determined by the key set
//!
//! ## Ordering
//!
//! Left subtrees hold keys with the critical bit clear, right subtrees keys
//! with it set. Since critical bits strictly decrease on the way down, the
//! left-to-right order of the leaves is numeric key order:
//!
//! - **max key**: follow right children from the root
//! - **min key**: follow left children from the root
//!
//! ## Atomicity
//!
//! Every mutating operation locates and validates its target before the
//! first slab write, so a failed call leaves the tree untouched.
//!
//! ## Example
//!
//! ```
//! use virtual_block::critbit::CritBitTree;
//!
//! let mut tree = CritBitTree::new();
//! tree.insert(50, "fifty").unwrap();
//! tree.insert(75, "seventy-five").unwrap();
//! tree.insert(10, "ten").unwrap();
//!
//! assert_eq!(tree.max_key(), Ok(75));
//! assert_eq!(tree.min_key(), Ok(10));
//! assert_eq!(tree.pop(75), Ok("seventy-five"));
//! assert_eq!(tree.max_key(), Ok(50));
//! ```

use slab::Slab;

use crate::critbit::node::{bit_is_set, critical_bit, InnerNode, Leaf, NodeRef};
use crate::error::{CritBitError, NotEmpty};

/// Ordered index from `u128` keys to values, backed by a crit-bit trie.
#[derive(Debug, Clone)]
pub struct CritBitTree<V> {
    /// Root node, `None` when the tree is empty
    root: Option<NodeRef>,

    /// Internal node storage
    inner: Slab<InnerNode>,

    /// Leaf storage; one leaf per key
    leaves: Slab<Leaf<V>>,
}

impl<V> Default for CritBitTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CritBitTree<V> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            root: None,
            inner: Slab::new(),
            leaves: Slab::new(),
        }
    }

    /// Alias for [`CritBitTree::new`]
    pub fn empty() -> Self {
        Self::new()
    }

    /// Create a tree with room for `capacity` keys before reallocating
    ///
    /// # Example
    ///
    /// ```
    /// use virtual_block::critbit::CritBitTree;
    ///
    /// let tree: CritBitTree<u64> = CritBitTree::with_capacity(1_000);
    /// assert!(tree.capacity() >= 1_000);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root: None,
            inner: Slab::with_capacity(capacity.saturating_sub(1)),
            leaves: Slab::with_capacity(capacity),
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Number of keys the leaf slab can hold without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        self.leaves.capacity()
    }

    /// Number of keys in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Check whether `key` is present
    pub fn has_key(&self, key: u128) -> bool {
        self.find_leaf(key).is_some()
    }

    /// Borrow the value stored at `key`
    pub fn borrow(&self, key: u128) -> Result<&V, CritBitError> {
        let idx = self.find_leaf(key).ok_or(CritBitError::KeyNotFound(key))?;
        Ok(&self.leaves[idx].value)
    }

    /// Mutably borrow the value stored at `key`
    pub fn borrow_mut(&mut self, key: u128) -> Result<&mut V, CritBitError> {
        let idx = self.find_leaf(key).ok_or(CritBitError::KeyNotFound(key))?;
        Ok(&mut self.leaves[idx].value)
    }

    /// Largest key in the tree
    pub fn max_key(&self) -> Result<u128, CritBitError> {
        let root = self.root.ok_or(CritBitError::EmptyIndex)?;
        Ok(self.leaves[self.rightmost_leaf(root)].key)
    }

    /// Smallest key in the tree
    pub fn min_key(&self) -> Result<u128, CritBitError> {
        let root = self.root.ok_or(CritBitError::EmptyIndex)?;
        Ok(self.leaves[self.leftmost_leaf(root)].key)
    }

    /// Smallest key strictly greater than `key`.
    ///
    /// `key` must be present. Returns `Ok(None)` when `key` is the maximum.
    pub fn next_key(&self, key: u128) -> Result<Option<u128>, CritBitError> {
        let idx = self.find_leaf(key).ok_or(CritBitError::KeyNotFound(key))?;
        let mut node = NodeRef::Leaf(idx);
        let mut parent = self.leaves[idx].parent;

        // Climb until we arrive from a left child; the successor is the
        // leftmost leaf of that ancestor's right subtree.
        while let Some(p) = parent {
            let inner = &self.inner[p];
            if inner.left == node {
                return Ok(Some(self.leaves[self.leftmost_leaf(inner.right)].key));
            }
            node = NodeRef::Inner(p);
            parent = inner.parent;
        }
        Ok(None)
    }

    /// Largest key strictly smaller than `key`.
    ///
    /// `key` must be present. Returns `Ok(None)` when `key` is the minimum.
    pub fn previous_key(&self, key: u128) -> Result<Option<u128>, CritBitError> {
        let idx = self.find_leaf(key).ok_or(CritBitError::KeyNotFound(key))?;
        let mut node = NodeRef::Leaf(idx);
        let mut parent = self.leaves[idx].parent;

        while let Some(p) = parent {
            let inner = &self.inner[p];
            if inner.right == node {
                return Ok(Some(self.leaves[self.rightmost_leaf(inner.left)].key));
            }
            node = NodeRef::Inner(p);
            parent = inner.parent;
        }
        Ok(None)
    }

    /// Iterate `(key, &value)` pairs in ascending key order
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Iterate keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = u128> + '_ {
        self.iter().map(|(key, _)| key)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert `value` at `key`.
    ///
    /// Fails with [`CritBitError::DuplicateKey`] if `key` is present, in
    /// which case the tree and `value` are left as they were (the value is
    /// dropped).
    ///
    /// # Example
    ///
    /// ```
    /// use virtual_block::critbit::CritBitTree;
    /// use virtual_block::CritBitError;
    ///
    /// let mut tree = CritBitTree::new();
    /// tree.insert(7, ()).unwrap();
    /// assert_eq!(tree.insert(7, ()), Err(CritBitError::DuplicateKey(7)));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: u128, value: V) -> Result<(), CritBitError> {
        let Some(closest) = self.closest_leaf(key) else {
            let leaf = self.leaves.insert(Leaf::new(key, value, None));
            self.root = Some(NodeRef::Leaf(leaf));
            return Ok(());
        };

        let crit_bit = critical_bit(key, self.leaves[closest].key)
            .ok_or(CritBitError::DuplicateKey(key))?;

        // Walk up past every ancestor testing a lower bit; the new internal
        // node goes directly above the last node passed.
        let mut child = NodeRef::Leaf(closest);
        let mut parent = self.leaves[closest].parent;
        while let Some(p) = parent {
            if self.inner[p].crit_bit > crit_bit {
                break;
            }
            child = NodeRef::Inner(p);
            parent = self.inner[p].parent;
        }

        let inner_key = self.inner.vacant_key();
        let new_leaf = NodeRef::Leaf(self.leaves.insert(Leaf::new(key, value, Some(inner_key))));
        let (left, right) = if bit_is_set(key, crit_bit) {
            (child, new_leaf)
        } else {
            (new_leaf, child)
        };
        let inner = self.inner.insert(InnerNode {
            crit_bit,
            parent,
            left,
            right,
        });
        debug_assert_eq!(inner, inner_key);

        self.set_parent(child, Some(inner));
        self.replace_in_parent(parent, child, NodeRef::Inner(inner));
        Ok(())
    }

    /// Remove `key` and return its value.
    ///
    /// The removed leaf's parent is elided and the sibling subtree takes its
    /// place, so the trie never keeps an internal node with one child.
    pub fn pop(&mut self, key: u128) -> Result<V, CritBitError> {
        let idx = self.find_leaf(key).ok_or(CritBitError::KeyNotFound(key))?;
        let leaf = self.leaves.remove(idx);

        match leaf.parent {
            None => self.root = None,
            Some(p) => {
                let parent = self.inner.remove(p);
                let sibling = parent.sibling_of(NodeRef::Leaf(idx));
                self.set_parent(sibling, parent.parent);
                self.replace_in_parent(parent.parent, NodeRef::Inner(p), sibling);
            }
        }

        Ok(leaf.value)
    }

    /// Remove and return the largest entry, or `None` if the tree is empty
    pub fn pop_max(&mut self) -> Option<(u128, V)> {
        let key = self.max_key().ok()?;
        self.pop(key).ok().map(|value| (key, value))
    }

    /// Remove and return the smallest entry, or `None` if the tree is empty
    pub fn pop_min(&mut self) -> Option<(u128, V)> {
        let key = self.min_key().ok()?;
        self.pop(key).ok().map(|value| (key, value))
    }

    /// Consume an empty tree.
    ///
    /// A tree that still holds entries is handed back inside [`NotEmpty`],
    /// unchanged and still usable.
    pub fn destroy_empty(self) -> Result<(), NotEmpty<V>> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(NotEmpty(self))
        }
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Descend following `key`'s bits until a leaf is reached
    fn closest_leaf(&self, key: u128) -> Option<usize> {
        let mut node = self.root?;
        loop {
            match node {
                NodeRef::Leaf(idx) => return Some(idx),
                NodeRef::Inner(idx) => node = self.inner[idx].child_for(key),
            }
        }
    }

    fn find_leaf(&self, key: u128) -> Option<usize> {
        self.closest_leaf(key)
            .filter(|&idx| self.leaves[idx].key == key)
    }

    fn leftmost_leaf(&self, mut node: NodeRef) -> usize {
        loop {
            match node {
                NodeRef::Leaf(idx) => return idx,
                NodeRef::Inner(idx) => node = self.inner[idx].left,
            }
        }
    }

    fn rightmost_leaf(&self, mut node: NodeRef) -> usize {
        loop {
            match node {
                NodeRef::Leaf(idx) => return idx,
                NodeRef::Inner(idx) => node = self.inner[idx].right,
            }
        }
    }

    fn set_parent(&mut self, node: NodeRef, parent: Option<usize>) {
        match node {
            NodeRef::Inner(idx) => self.inner[idx].parent = parent,
            NodeRef::Leaf(idx) => self.leaves[idx].parent = parent,
        }
    }

    /// Point `parent`'s slot (or the root) that held `old` at `new`
    fn replace_in_parent(&mut self, parent: Option<usize>, old: NodeRef, new: NodeRef) {
        match parent {
            Some(p) => {
                let replaced = self.inner[p].replace_child(old, new);
                debug_assert!(replaced, "node is not a child of its recorded parent");
            }
            None => self.root = Some(new),
        }
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Ascending iterator over a [`CritBitTree`].
///
/// Walks the trie depth-first, left before right, so leaves come out in key
/// order.
pub struct Iter<'a, V> {
    tree: &'a CritBitTree<V>,
    stack: Vec<NodeRef>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u128, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                NodeRef::Leaf(idx) => {
                    let leaf = &self.tree.leaves[idx];
                    return Some((leaf.key, &leaf.value));
                }
                NodeRef::Inner(idx) => {
                    let inner = &self.tree.inner[idx];
                    self.stack.push(inner.right);
                    self.stack.push(inner.left);
                }
            }
        }
        None
    }
}

impl<'a, V> IntoIterator for &'a CritBitTree<V> {
    type Item = (u128, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
