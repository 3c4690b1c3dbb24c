//! Move-only fungible value.
//!
//! ## Design
//!
//! [`Balance`] is neither `Clone` nor `Copy`, and its amount can only change
//! through the operations in this module:
//!
//! - [`Supply::increase`] / [`Supply::decrease`]: mint and burn
//! - [`Balance::split`] / [`Balance::join`]: move value between balances
//! - [`Balance::settle`]: split a payee share and sweep the rest, atomically
//! - [`Balance::transfer_to`]: hand a balance to a [`Recipient`]
//! - [`Balance::destroy_zero`]: retire an empty balance
//!
//! Operations that cannot complete hand the input balance back in `Err`
//! instead of dropping it, so each unit of value is always held by exactly
//! one balance.
//!
//! ## Example
//!
//! ```
//! use virtual_block::types::{Account, Supply};
//!
//! let mut supply = Supply::new();
//! let mut coin = supply.increase(100).unwrap();
//!
//! let part = coin.split(30).unwrap();
//! assert_eq!(coin.value(), 70);
//!
//! let mut alice = Account::new(1);
//! part.transfer_to(&mut alice);
//! assert_eq!(alice.total(), 30);
//!
//! assert_eq!(supply.decrease(coin), 70);
//! assert_eq!(supply.outstanding(), 30);
//! ```

use std::mem;

use crate::error::BalanceError;

/// An amount of fungible value.
#[must_use = "a balance must be joined, transferred or destroyed"]
#[derive(Debug, PartialEq, Eq, Default)]
pub struct Balance {
    value: u64,
}

impl Balance {
    /// An empty balance
    #[inline]
    pub fn zero() -> Self {
        Self { value: 0 }
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Move `amount` out of this balance into a new one
    pub fn split(&mut self, amount: u64) -> Result<Balance, BalanceError> {
        if amount > self.value {
            return Err(BalanceError::InsufficientValue {
                requested: amount,
                available: self.value,
            });
        }
        self.value -= amount;
        Ok(Balance { value: amount })
    }

    /// Move everything out of this balance, leaving it at zero
    pub fn withdraw_all(&mut self) -> Balance {
        Balance {
            value: mem::take(&mut self.value),
        }
    }

    /// Absorb `other` and return the new total.
    ///
    /// If the total would exceed `u64::MAX`, `other` is handed back unchanged.
    pub fn join(&mut self, other: Balance) -> Result<u64, Balance> {
        match self.value.checked_add(other.value) {
            Some(total) => {
                self.value = total;
                Ok(total)
            }
            None => Err(other),
        }
    }

    /// Check whether `amount` could be added without overflow
    #[inline]
    pub fn can_absorb(&self, amount: u64) -> bool {
        self.value.checked_add(amount).is_some()
    }

    /// Empty this balance in one step: `payee_amount` is returned as a new
    /// balance and the rest is joined into `sink`.
    ///
    /// Both the split and the join are checked before either balance
    /// changes, so on error nothing has moved.
    pub fn settle(&mut self, payee_amount: u64, sink: &mut Balance) -> Result<Balance, BalanceError> {
        let rest = self
            .value
            .checked_sub(payee_amount)
            .ok_or(BalanceError::InsufficientValue {
                requested: payee_amount,
                available: self.value,
            })?;
        let sink_total = sink.value.checked_add(rest).ok_or(BalanceError::Overflow)?;

        sink.value = sink_total;
        self.value = 0;
        Ok(Balance {
            value: payee_amount,
        })
    }

    /// Retire a balance that holds nothing.
    ///
    /// A non-zero balance is handed back.
    pub fn destroy_zero(self) -> Result<(), Balance> {
        if self.value == 0 {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Hand this balance to `recipient`
    pub fn transfer_to<R: Recipient + ?Sized>(self, recipient: &mut R) {
        recipient.receive(self);
    }
}

/// Destination for transferred value.
pub trait Recipient {
    /// Take ownership of `value`
    fn receive(&mut self, value: Balance);
}

/// A simple holder of received balances.
///
/// Each transfer is kept as a separate balance, the way an account would
/// own separate coins, so receiving can never overflow.
#[derive(Debug, Default)]
pub struct Account {
    /// Opaque identity
    pub id: u64,

    coins: Vec<Balance>,
}

impl Account {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            coins: Vec::new(),
        }
    }

    /// Sum of all balances held
    pub fn total(&self) -> u128 {
        self.coins.iter().map(|coin| u128::from(coin.value())).sum()
    }

    /// Number of separate balances received
    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// Take every held balance
    pub fn take_all(&mut self) -> Vec<Balance> {
        mem::take(&mut self.coins)
    }
}

impl Recipient for Account {
    fn receive(&mut self, value: Balance) {
        self.coins.push(value);
    }
}

/// Issuer of balances.
///
/// Tracks how much value it has minted and not yet burned.
#[derive(Debug, Default)]
pub struct Supply {
    outstanding: u64,
}

impl Supply {
    pub fn new() -> Self {
        Self { outstanding: 0 }
    }

    /// Value minted and not yet burned
    #[inline]
    pub fn outstanding(&self) -> u64 {
        self.outstanding
    }

    /// Mint a new balance of `amount`
    pub fn increase(&mut self, amount: u64) -> Result<Balance, BalanceError> {
        self.outstanding = self
            .outstanding
            .checked_add(amount)
            .ok_or(BalanceError::Overflow)?;
        Ok(Balance { value: amount })
    }

    /// Burn `balance`, returning the amount removed from circulation
    pub fn decrease(&mut self, balance: Balance) -> u64 {
        let amount = balance.value;
        debug_assert!(amount <= self.outstanding, "burning value this supply never minted");
        self.outstanding = self.outstanding.saturating_sub(amount);
        amount
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
