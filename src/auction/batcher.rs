//! Fee-auction batcher.
//!
//! Collects entries into the open [`Block`], each carrying a bid. Once the
//! block duration has elapsed, `mine` closes the block, pays the miner its
//! fee share and sweeps the rest of the bids into collected fees.
//!
//! ## Settlement
//!
//! ```text
//! miner_fee     = floor(current_block_bids * fee_rate)
//! protocol_fee  = current_block_bids - miner_fee
//! ```
//!
//! The batcher takes `&mut self` everywhere and holds no locks. Callers that
//! share it across threads wrap the whole batcher in one exclusive lock.

use std::mem;

use crate::auction::Block;
use crate::config::BatcherConfig;
use crate::error::{AuctionError, MineResult, Rejected};
use crate::types::{Balance, Clock, FeeRate, MineReceipt, Recipient};

/// Sealed-bid batcher over entries of type `E`.
#[derive(Debug)]
pub struct FeeAuctionBatcher<E> {
    /// Fraction of each closed block's bids paid to the miner
    fee_rate: FeeRate,

    /// Minimum logical time between two closes
    block_duration: u64,

    last_block_close_time: u64,

    /// Block currently accepting entries
    current: Block<E>,

    /// Sum of the bids in `current`
    current_block_bids: Balance,

    /// Protocol share of every block closed so far, until extracted
    collected_fees: Balance,

    /// Number of blocks closed so far
    height: u64,

    last_receipt: Option<MineReceipt>,
}

impl<E> FeeAuctionBatcher<E> {
    /// Create a batcher with one open, empty block.
    ///
    /// # Arguments
    ///
    /// * `fee_rate` - Miner share of each closed block
    /// * `block_duration` - Minimum time between closes
    /// * `now` - Time treated as the last close
    pub fn new(fee_rate: FeeRate, block_duration: u64, now: u64) -> Self {
        Self {
            fee_rate,
            block_duration,
            last_block_close_time: now,
            current: Block::new(),
            current_block_bids: Balance::zero(),
            collected_fees: Balance::zero(),
            height: 0,
            last_receipt: None,
        }
    }

    pub fn from_config(config: &BatcherConfig, now: u64) -> Self {
        Self::new(config.fee_rate, config.block_duration, now)
    }

    /// Queue `entry` in the open block behind `bid`.
    ///
    /// If the block's bid total would overflow, nothing changes and the entry
    /// and bid come back in [`Rejected`].
    pub fn add_entry(&mut self, entry: E, bid: Balance) -> Result<(), Rejected<E>> {
        let amount = bid.value();
        if let Err(bid) = self.current_block_bids.join(bid) {
            tracing::debug!("Rejected bid of {}: block total would overflow", amount);
            return Err(Rejected {
                entry,
                bid,
                error: AuctionError::ArithmeticOverflow,
            });
        }

        self.current.push(amount, entry);
        tracing::debug!(
            "Entry added: bid={}, pending={}, block_bids={}",
            amount,
            self.current.entry_count(),
            self.current_block_bids.value()
        );
        Ok(())
    }

    /// Close the open block and settle its bids.
    ///
    /// Pays `floor(bids * fee_rate)` to `miner`, moves the remainder into
    /// collected fees and returns the closed block for the caller to consume.
    ///
    /// # Errors
    ///
    /// * [`AuctionError::BlockNotReady`] before `block_duration` has elapsed
    ///   since the last close, or if `now` is earlier than the last close
    /// * [`AuctionError::ArithmeticOverflow`] if collected fees or the height
    ///   would overflow
    ///
    /// No state changes on error.
    pub fn mine<R>(&mut self, miner: &mut R, now: u64) -> MineResult<E>
    where
        R: Recipient + ?Sized,
    {
        if !self.is_ready(now) {
            let ready_at = self.ready_at();
            tracing::warn!("Mine rejected: now={}, ready_at={}", now, ready_at);
            return Err(AuctionError::BlockNotReady { now, ready_at });
        }

        let height = self
            .height
            .checked_add(1)
            .ok_or(AuctionError::ArithmeticOverflow)?;

        let bid_total = self.current_block_bids.value();
        let miner_fee = self.fee_rate.apply(bid_total);
        let miner_share = self
            .current_block_bids
            .settle(miner_fee, &mut self.collected_fees)?;

        let block = mem::take(&mut self.current);
        let receipt = MineReceipt {
            height,
            close_time: now,
            bid_total,
            miner_fee,
            protocol_fee: bid_total - miner_fee,
            entry_count: block.entry_count() as u64,
            bid_levels: block.bid_levels() as u64,
            block_commitment: block.commitment(),
        };

        self.last_block_close_time = now;
        self.height = height;
        miner_share.transfer_to(miner);

        tracing::info!(
            "Block {} mined at {}: entries={}, bids={}, miner_fee={}, protocol_fee={}",
            receipt.height,
            now,
            receipt.entry_count,
            bid_total,
            miner_fee,
            receipt.protocol_fee
        );
        self.last_receipt = Some(receipt);

        Ok(block)
    }

    /// [`mine`](Self::mine) at the time reported by `clock`
    pub fn mine_with_clock<R, C>(&mut self, miner: &mut R, clock: &C) -> MineResult<E>
    where
        R: Recipient + ?Sized,
        C: Clock + ?Sized,
    {
        self.mine(miner, clock.now())
    }

    /// Take everything in collected fees, leaving zero behind
    pub fn extract_fees(&mut self) -> Balance {
        let fees = self.collected_fees.withdraw_all();
        tracing::info!("Fees extracted: {}", fees.value());
        fees
    }

    /// Check whether `mine` would pass the timing gate at `now`
    pub fn is_ready(&self, now: u64) -> bool {
        now.checked_sub(self.last_block_close_time)
            .is_some_and(|elapsed| elapsed >= self.block_duration)
    }

    /// Earliest time at which the open block can be mined
    #[inline]
    pub fn ready_at(&self) -> u64 {
        self.last_block_close_time.saturating_add(self.block_duration)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn fee_rate(&self) -> FeeRate {
        self.fee_rate
    }

    #[inline]
    pub fn block_duration(&self) -> u64 {
        self.block_duration
    }

    #[inline]
    pub fn last_block_close_time(&self) -> u64 {
        self.last_block_close_time
    }

    /// Sum of the bids in the open block
    #[inline]
    pub fn current_block_bids(&self) -> u64 {
        self.current_block_bids.value()
    }

    /// Fees collected and not yet extracted
    #[inline]
    pub fn collected_fees(&self) -> u64 {
        self.collected_fees.value()
    }

    /// Number of blocks closed so far
    #[inline]
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Entries waiting in the open block
    #[inline]
    pub fn pending_entries(&self) -> usize {
        self.current.entry_count()
    }

    pub fn current_block(&self) -> &Block<E> {
        &self.current
    }

    /// Receipt of the most recent close, if any
    pub fn last_receipt(&self) -> Option<&MineReceipt> {
        self.last_receipt.as_ref()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
