//! Virtual block: entries grouped by bid.
//!
//! ## Queue Structure
//!
//! ```text
//! bid 75 -> [e3]
//! bid 50 -> [e1, e4]      (e1 arrived first)
//! bid 10 -> [e2]
//! ```
//!
//! - Entries are keyed by their bid in a [`CritBitTree`]
//! - Entries with identical bids share one list, in arrival order
//! - Consumption is highest bid first, FIFO within a bid

use std::collections::VecDeque;

use crate::critbit::CritBitTree;
use crate::types::receipt::compute_hash;

/// Entries collected between two block closes, ordered by bid.
#[derive(Debug, Clone)]
pub struct Block<E> {
    /// Bid amount -> entries that bid exactly that amount
    bids: CritBitTree<Vec<E>>,

    /// Total entries across all bid levels
    entry_count: usize,
}

impl<E> Default for Block<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Block<E> {
    pub fn new() -> Self {
        Self {
            bids: CritBitTree::new(),
            entry_count: 0,
        }
    }

    /// Append `entry` at `bid`, behind any earlier entry with the same bid
    pub(crate) fn push(&mut self, bid: u64, entry: E) {
        let key = u128::from(bid);
        match self.bids.borrow_mut(key) {
            Ok(entries) => entries.push(entry),
            Err(_) => {
                // Key is absent, so the insert cannot collide
                let inserted = self.bids.insert(key, vec![entry]);
                debug_assert!(inserted.is_ok());
            }
        }
        self.entry_count += 1;
    }

    /// Number of entries in the block
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Number of distinct bid amounts
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    /// Highest bid in the block
    pub fn highest_bid(&self) -> Option<u128> {
        self.bids.max_key().ok()
    }

    /// Entries that bid exactly `bid`, oldest first
    pub fn entries_at(&self, bid: u128) -> Option<&[E]> {
        self.bids.borrow(bid).ok().map(Vec::as_slice)
    }

    /// Remove the highest bid level and return it with its entries
    pub fn pop_highest(&mut self) -> Option<(u128, Vec<E>)> {
        let (bid, entries) = self.bids.pop_max()?;
        self.entry_count -= entries.len();
        Some((bid, entries))
    }

    /// Consume the block, yielding `(bid, entry)` highest bid first
    ///
    /// # Example
    ///
    /// ```
    /// use virtual_block::{Account, FeeAuctionBatcher, FeeRate, Supply};
    ///
    /// let mut supply = Supply::new();
    /// let mut batcher = FeeAuctionBatcher::new(FeeRate::ZERO, 1, 0);
    /// batcher.add_entry("low", supply.increase(5).unwrap()).unwrap();
    /// batcher.add_entry("high", supply.increase(9).unwrap()).unwrap();
    /// batcher.add_entry("high-later", supply.increase(9).unwrap()).unwrap();
    ///
    /// let block = batcher.mine(&mut Account::new(1), 1).unwrap();
    /// let order: Vec<_> = block.into_highest_first().collect();
    /// assert_eq!(order, vec![(9, "high"), (9, "high-later"), (5, "low")]);
    /// ```
    pub fn into_highest_first(self) -> IntoHighestFirst<E> {
        IntoHighestFirst {
            block: self,
            level: None,
        }
    }

    /// Commitment to the block's bid layout.
    ///
    /// SHA-256 over each bid level, highest first, as the big-endian bid
    /// followed by the big-endian entry count. Entries themselves are not
    /// read.
    pub fn commitment(&self) -> [u8; 32] {
        let levels: Vec<(u128, usize)> = self
            .bids
            .iter()
            .map(|(bid, entries)| (bid, entries.len()))
            .collect();

        let mut data = Vec::with_capacity(levels.len() * 24);
        for (bid, count) in levels.into_iter().rev() {
            data.extend_from_slice(&bid.to_be_bytes());
            data.extend_from_slice(&(count as u64).to_be_bytes());
        }
        compute_hash(&data)
    }

    /// Underlying bid index
    pub fn index(&self) -> &CritBitTree<Vec<E>> {
        &self.bids
    }

    /// Give up the wrapper and take the bid index
    pub fn into_index(self) -> CritBitTree<Vec<E>> {
        self.bids
    }
}

/// Owning iterator returned by [`Block::into_highest_first`].
pub struct IntoHighestFirst<E> {
    block: Block<E>,
    level: Option<(u128, VecDeque<E>)>,
}

impl<E> Iterator for IntoHighestFirst<E> {
    type Item = (u128, E);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((bid, entries)) = &mut self.level {
                if let Some(entry) = entries.pop_front() {
                    return Some((*bid, entry));
                }
            }
            let (bid, entries) = self.block.pop_highest()?;
            self.level = Some((bid, entries.into()));
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block<&'static str> {
        let mut block = Block::new();
        block.push(50, "a");
        block.push(10, "b");
        block.push(75, "c");
        block.push(50, "d");
        block.push(30, "e");
        block
    }

    #[test]
    fn test_block_new() {
        let block: Block<u32> = Block::new();

        assert!(block.is_empty());
        assert_eq!(block.entry_count(), 0);
        assert_eq!(block.bid_levels(), 0);
        assert!(block.highest_bid().is_none());
    }

    #[test]
    fn test_push_groups_ties() {
        let block = sample_block();

        assert_eq!(block.entry_count(), 5);
        assert_eq!(block.bid_levels(), 4);
        assert_eq!(block.highest_bid(), Some(75));
        assert_eq!(block.entries_at(50), Some(&["a", "d"][..]));
        assert!(block.entries_at(51).is_none());
    }

    #[test]
    fn test_pop_highest() {
        let mut block = sample_block();

        assert_eq!(block.pop_highest(), Some((75, vec!["c"])));
        assert_eq!(block.pop_highest(), Some((50, vec!["a", "d"])));
        assert_eq!(block.entry_count(), 2);
        assert_eq!(block.pop_highest(), Some((30, vec!["e"])));
        assert_eq!(block.pop_highest(), Some((10, vec!["b"])));
        assert_eq!(block.pop_highest(), None);
        assert_eq!(block.entry_count(), 0);
        assert!(block.into_index().destroy_empty().is_ok());
    }

    #[test]
    fn test_into_highest_first() {
        let order: Vec<_> = sample_block().into_highest_first().collect();
        assert_eq!(
            order,
            vec![(75, "c"), (50, "a"), (50, "d"), (30, "e"), (10, "b")]
        );
    }

    #[test]
    fn test_zero_bid() {
        let mut block = Block::new();
        block.push(0, 'z');
        block.push(u64::MAX, 'm');

        assert_eq!(block.highest_bid(), Some(u128::from(u64::MAX)));
        assert_eq!(block.entries_at(0), Some(&['z'][..]));
    }

    #[test]
    fn test_commitment() {
        let block = sample_block();
        assert_eq!(block.commitment(), sample_block().commitment());

        // Same layout, different entries: same commitment
        let mut relabeled = Block::new();
        for (bid, entry) in [(50, "v"), (10, "w"), (75, "x"), (50, "y"), (30, "z")] {
            relabeled.push(bid, entry);
        }
        assert_eq!(block.commitment(), relabeled.commitment());

        // Different layout: different commitment
        let mut shifted = sample_block();
        shifted.push(30, "f");
        assert_ne!(block.commitment(), shifted.commitment());

        let empty: Block<()> = Block::new();
        assert_eq!(empty.commitment(), compute_hash(&[]));
    }
}
