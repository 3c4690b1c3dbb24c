//! Fixed-point fee rate.
//!
//! ## Overview
//!
//! A fee rate is a fraction in [0, 1] stored as a `u64` numerator over a
//! power-of-two denominator of 2^32. Applying a rate is a single widening
//! multiply and shift, so settlement never touches floating point.
//!
//! ## Decimal Conversion
//!
//! Rates are written as decimal strings in configuration ("0.25") and
//! converted with `rust_decimal`, truncating toward zero.
//!
//! ## Examples
//!
//! ```
//! use virtual_block::types::FeeRate;
//!
//! let rate: FeeRate = "0.25".parse().unwrap();
//! assert_eq!(rate, FeeRate::from_rational(1, 4).unwrap());
//! assert_eq!(rate.apply(1000), 250);
//! assert_eq!(rate.to_string(), "0.25");
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// Number of fractional bits in a [`FeeRate`]
pub const FEE_RATE_BITS: u32 = 32;

/// Denominator of a [`FeeRate`]: 2^32
pub const FEE_RATE_SCALE: u64 = 1 << FEE_RATE_BITS;

/// Fraction of a closed block's bids paid to the miner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct FeeRate(u64);

impl FeeRate {
    /// Miner receives nothing
    pub const ZERO: FeeRate = FeeRate(0);

    /// Miner receives the whole block
    pub const ONE: FeeRate = FeeRate(FEE_RATE_SCALE);

    /// Build from a raw numerator over 2^32.
    ///
    /// Returns `None` if the rate would exceed 1.
    pub fn from_raw(raw: u64) -> Option<Self> {
        (raw <= FEE_RATE_SCALE).then_some(FeeRate(raw))
    }

    /// Build from a raw numerator over 2^32, clamping at 1
    pub const fn saturating_from_raw(raw: u64) -> Self {
        if raw > FEE_RATE_SCALE {
            Self::ONE
        } else {
            FeeRate(raw)
        }
    }

    /// Build from `numerator / denominator`, truncating toward zero.
    ///
    /// Returns `None` if the denominator is zero or the rate exceeds 1.
    ///
    /// # Example
    ///
    /// ```
    /// use virtual_block::types::FeeRate;
    ///
    /// assert_eq!(FeeRate::from_rational(1, 2).unwrap().raw(), 1 << 31);
    /// assert!(FeeRate::from_rational(3, 2).is_none());
    /// assert!(FeeRate::from_rational(1, 0).is_none());
    /// ```
    pub fn from_rational(numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 || numerator > denominator {
            return None;
        }
        let raw = (u128::from(numerator) << FEE_RATE_BITS) / u128::from(denominator);
        // numerator <= denominator keeps raw <= 2^32
        u64::try_from(raw).ok().and_then(Self::from_raw)
    }

    /// Build from a decimal in [0, 1], truncating toward zero
    pub fn from_decimal(d: Decimal) -> Option<Self> {
        if d.is_sign_negative() || d > Decimal::ONE {
            return None;
        }
        let scaled = d.checked_mul(Decimal::from(FEE_RATE_SCALE))?;
        scaled.trunc().to_u64().and_then(Self::from_raw)
    }

    /// Raw numerator over 2^32
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Fee owed on `amount`, rounded toward zero.
    ///
    /// Never exceeds `amount`.
    #[inline]
    pub fn apply(self, amount: u64) -> u64 {
        let fee = (u128::from(amount) * u128::from(self.0)) >> FEE_RATE_BITS;
        // self.0 <= 2^32, so fee <= amount
        fee as u64
    }

    /// Exact decimal value of the rate
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(FEE_RATE_SCALE)
    }
}

impl FromStr for FeeRate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| ConfigError::InvalidFeeRate(format!("{s:?}: {e}")))?;
        Self::from_decimal(decimal)
            .ok_or_else(|| ConfigError::InvalidFeeRate(format!("{s:?} is outside [0, 1]")))
    }
}

impl TryFrom<String> for FeeRate {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal().normalize())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
