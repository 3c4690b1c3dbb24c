//! Mine receipt for a closed virtual block.
//!
//! The MineReceipt records how a block's bids were settled, plus a
//! commitment to the block's bid layout for later verification.

use ssz_rs::prelude::*;
use sha2::{Digest, Sha256};

/// Settlement summary written each time a block is mined.
///
/// ## Conservation
///
/// `miner_fee + protocol_fee == bid_total` for every receipt the batcher
/// produces.
///
/// ## Example
///
/// ```
/// use virtual_block::types::MineReceipt;
///
/// let receipt = MineReceipt {
///     height: 1,
///     close_time: 5,
///     bid_total: 1000,
///     miner_fee: 250,
///     protocol_fee: 750,
///     entry_count: 4,
///     bid_levels: 3,
///     block_commitment: [0u8; 32],
/// };
/// assert!(receipt.is_balanced());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct MineReceipt {
    /// Number of blocks closed so far, including this one
    pub height: u64,

    /// Logical time at which the block was closed
    pub close_time: u64,

    /// Sum of all bids in the block
    pub bid_total: u64,

    /// Portion of `bid_total` paid to the miner
    pub miner_fee: u64,

    /// Portion of `bid_total` moved to collected fees
    pub protocol_fee: u64,

    /// Number of entries in the block
    pub entry_count: u64,

    /// Number of distinct bid amounts in the block
    pub bid_levels: u64,

    /// SHA-256 commitment to the block's bid layout
    pub block_commitment: [u8; 32],
}

impl MineReceipt {
    /// Check that the fee split accounts for every unit of the bid total
    pub fn is_balanced(&self) -> bool {
        self.miner_fee.checked_add(self.protocol_fee) == Some(self.bid_total)
    }

    /// Check if the block held no entries
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// SSZ encoding of the receipt
    pub fn to_ssz(&self) -> Result<Vec<u8>, SerializeError> {
        ssz_rs::serialize(self)
    }

    /// SHA-256 of the SSZ encoding
    pub fn digest(&self) -> Result<[u8; 32], SerializeError> {
        Ok(compute_hash(&self.to_ssz()?))
    }

    /// Digest as a hex string
    pub fn digest_hex(&self) -> Result<String, SerializeError> {
        Ok(hex::encode(self.digest()?))
    }

    /// Block commitment as a hex string
    pub fn commitment_hex(&self) -> String {
        hex::encode(self.block_commitment)
    }
}

/// Compute SHA-256 of the given data
pub fn compute_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

// ============================================================================
// Unit Tests
// ============================================================================
