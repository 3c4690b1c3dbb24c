//! # Virtual Block
//!
//! Sealed-bid fee auction that batches entries into time-boxed virtual blocks.
//!
//! ## Architecture
//!
//! - **CritBit**: Ordered `u128`-keyed index on slab-allocated nodes
//! - **Types**: Move-only balances, fee rates, clocks and mine receipts
//! - **Auction**: Virtual blocks and the batcher that mines them
//! - **Config**: TOML-loaded batcher settings
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: Fee rates are fixed-point fractions over 2^32
//! 3. **Pre-allocated Memory**: Slab allocation for index nodes and leaves
//! 4. **Value Safety**: Balances move, they are never copied or silently dropped
//!    by a failed operation

// ============================================================================
// Module declarations
// ============================================================================

/// Ordered index: crit-bit tree over `u128` keys
pub mod critbit;

/// Core value types: Balance, FeeRate, Clock, MineReceipt
pub mod types;

/// Fee auction: Block and FeeAuctionBatcher
pub mod auction;

/// Batcher configuration
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use auction::{Block, FeeAuctionBatcher};
pub use config::BatcherConfig;
pub use critbit::CritBitTree;
pub use error::{AuctionError, BalanceError, ConfigError, CritBitError, NotEmpty, Rejected};
pub use types::{Account, Balance, Clock, FeeRate, ManualClock, MineReceipt, Recipient, Supply};
