//! Crit-bit (PATRICIA) trie keyed by `u128`.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: internal nodes and leaves live in two slabs and
//!   refer to each other by key
//! - **Critical bits**: each internal node tests the highest bit at which the
//!   keys below it differ
//! - **Inherent order**: an in-order walk yields keys in numeric order, so no
//!   sort step is ever needed
//!
//! ## Components
//!
//! - [`InnerNode`], [`Leaf`], [`NodeRef`]: node storage types
//! - [`CritBitTree`]: the ordered index
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert | O(w) |
//! | Has key / borrow | O(w) |
//! | Max / min key | O(w) |
//! | Pop | O(w) |
//! | Next / previous key | O(w) |
//!
//! w = key width (128 bits); in practice the depth is bounded by the number
//! of distinct bit prefixes actually present.

pub mod node;
pub mod tree;

pub use node::{InnerNode, Leaf, NodeRef};
pub use tree::{CritBitTree, Iter};
