//! Error types for the crit-bit index, balances, the auction batcher and
//! configuration loading.
//!
//! Every fallible operation validates its preconditions before touching
//! state, so an `Err` always means "nothing changed".

use std::fmt;

use thiserror::Error;

use crate::auction::Block;
use crate::critbit::CritBitTree;
use crate::types::Balance;

/// Errors raised by [`CritBitTree`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CritBitError {
    /// `insert` was called with a key that is already present
    #[error("key {0} is already present in the index")]
    DuplicateKey(u128),

    /// `borrow`/`pop`/neighbour lookup on a key that is not present
    #[error("key {0} not found in the index")]
    KeyNotFound(u128),

    /// `max_key`/`min_key` on an empty index
    #[error("index is empty")]
    EmptyIndex,

    /// `destroy_empty` on an index that still holds entries
    #[error("index still holds {len} entries")]
    NotEmpty { len: usize },
}

/// Errors raised by [`Balance`] arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("insufficient value: requested {requested}, available {available}")]
    InsufficientValue { requested: u64, available: u64 },

    #[error("balance arithmetic overflow")]
    Overflow,
}

/// Errors raised by the fee-auction batcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuctionError {
    /// `mine` was called before the block duration elapsed
    #[error("block not ready: now {now}, ready at {ready_at}")]
    BlockNotReady { now: u64, ready_at: u64 },

    /// An accumulator would exceed `u64::MAX`
    #[error("arithmetic overflow in bid accumulator")]
    ArithmeticOverflow,

    #[error(transparent)]
    Index(#[from] CritBitError),

    #[error(transparent)]
    Balance(BalanceError),
}

impl From<BalanceError> for AuctionError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::Overflow => AuctionError::ArithmeticOverflow,
            other => AuctionError::Balance(other),
        }
    }
}

/// Errors raised while loading a [`crate::config::BatcherConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid fee rate: {0}")]
    InvalidFeeRate(String),

    #[error("block duration must be greater than zero")]
    ZeroBlockDuration,

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Returned by [`CritBitTree::destroy_empty`] when entries remain.
///
/// The tree is handed back untouched so the caller can keep using it.
pub struct NotEmpty<V>(pub CritBitTree<V>);

impl<V> NotEmpty<V> {
    /// Recover the tree that could not be destroyed.
    pub fn into_inner(self) -> CritBitTree<V> {
        self.0
    }
}

impl<V> fmt::Debug for NotEmpty<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotEmpty").field("len", &self.0.len()).finish()
    }
}

impl<V> fmt::Display for NotEmpty<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index still holds {} entries", self.0.len())
    }
}

impl<V> std::error::Error for NotEmpty<V> {}

impl<V> From<NotEmpty<V>> for CritBitError {
    fn from(err: NotEmpty<V>) -> Self {
        CritBitError::NotEmpty { len: err.0.len() }
    }
}

/// Returned by [`crate::FeeAuctionBatcher::add_entry`] when the bid could not
/// be accepted. Carries the entry and bid back so no value is lost.
pub struct Rejected<E> {
    pub entry: E,
    pub bid: Balance,
    pub error: AuctionError,
}

impl<E> fmt::Debug for Rejected<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("bid", &self.bid.value())
            .field("error", &self.error)
            .finish()
    }
}

impl<E> fmt::Display for Rejected<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bid of {} rejected: {}", self.bid.value(), self.error)
    }
}

impl<E> std::error::Error for Rejected<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Convenience alias for closed blocks handed out by `mine`.
pub type MineResult<E> = Result<Block<E>, AuctionError>;
