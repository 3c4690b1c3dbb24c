//! Core value types for the fee auction.
//!
//! ## Types
//!
//! - [`Balance`]: Move-only fungible value, minted by a [`Supply`]
//! - [`Recipient`] / [`Account`]: Destinations for transferred value
//! - [`FeeRate`]: Miner share as a fraction over 2^32
//! - [`Clock`] / [`ManualClock`]: Logical time source
//! - [`MineReceipt`]: Settlement summary of a closed block
//!
//! ## Fixed-Point Arithmetic
//!
//! Bids are plain `u64` amounts. Fee rates are `u64` numerators over 2^32,
//! applied with a widening multiply, so settlement is exact and deterministic.

mod balance;
mod clock;
pub mod fee_rate;
pub mod receipt;

// Re-export all types at module level
pub use balance::{Account, Balance, Recipient, Supply};
pub use clock::{Clock, ManualClock};
pub use fee_rate::FeeRate;
pub use receipt::MineReceipt;
