//! Sealed-bid fee auction over virtual blocks.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: The same entries, bids and close times always produce
//!    the same blocks and receipts
//! 2. **Fixed-Point Math**: Fee shares use integer arithmetic only
//! 3. **Conservation**: Every unit bid ends up with the miner or in collected
//!    fees, never both and never neither
//! 4. **Bid-Time Priority**: Highest bid first, then FIFO
//!
//! ## Lifecycle
//!
//! - `add_entry` queues an entry and joins its bid into the block total
//! - `mine` closes the block once `block_duration` has elapsed
//! - The closed [`Block`] is handed back for the caller to consume
//! - `extract_fees` drains the protocol's share
//!
//! ## Example
//!
//! ```
//! use virtual_block::{Account, FeeAuctionBatcher, FeeRate, Supply};
//!
//! let mut supply = Supply::new();
//! let mut miner = Account::new(1);
//! let mut batcher = FeeAuctionBatcher::new(FeeRate::from_rational(1, 4).unwrap(), 5, 0);
//!
//! batcher.add_entry("tx-1", supply.increase(600).unwrap()).unwrap();
//! batcher.add_entry("tx-2", supply.increase(400).unwrap()).unwrap();
//!
//! // Too early
//! assert!(batcher.mine(&mut miner, 3).is_err());
//!
//! let block = batcher.mine(&mut miner, 5).unwrap();
//! assert_eq!(block.highest_bid(), Some(600));
//! assert_eq!(miner.total(), 250);
//! assert_eq!(batcher.extract_fees().value(), 750);
//! ```

pub mod batcher;
pub mod block;

pub use batcher::FeeAuctionBatcher;
pub use block::{Block, IntoHighestFirst};
