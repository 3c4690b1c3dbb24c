//! Batcher configuration.
//!
//! Loaded from TOML. The fee rate is written as a decimal string so it can be
//! reviewed by eye:
//!
//! ```toml
//! fee_rate = "0.25"
//! block_duration = 5
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::FeeRate;

/// Default miner share: one quarter of each block's bids
pub const DEFAULT_FEE_RATE: FeeRate = FeeRate::saturating_from_raw(1 << 30);

/// Default minimum ticks between block closes
pub const DEFAULT_BLOCK_DURATION: u64 = 5;

/// Settings for a [`crate::FeeAuctionBatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatcherConfig {
    /// Fraction of each closed block's bids paid to the miner
    pub fee_rate: FeeRate,

    /// Minimum logical time between two block closes
    pub block_duration: u64,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            fee_rate: DEFAULT_FEE_RATE,
            block_duration: DEFAULT_BLOCK_DURATION,
        }
    }
}

impl BatcherConfig {
    /// Build a validated config
    pub fn new(fee_rate: FeeRate, block_duration: u64) -> Result<Self, ConfigError> {
        let config = Self {
            fee_rate,
            block_duration,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every block mineable immediately
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_duration == 0 {
            return Err(ConfigError::ZeroBlockDuration);
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: BatcherConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BatcherConfig::default();
        assert_eq!(config.fee_rate, FeeRate::from_rational(1, 4).unwrap());
        assert_eq!(config.block_duration, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_str() {
        let config = BatcherConfig::from_toml_str(
            r#"
            fee_rate = "0.1"
            block_duration = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.fee_rate, "0.1".parse::<FeeRate>().unwrap());
        assert_eq!(config.block_duration, 12);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = BatcherConfig::from_toml_str("block_duration = 9").unwrap();
        assert_eq!(config.fee_rate, DEFAULT_FEE_RATE);
        assert_eq!(config.block_duration, 9);
    }

    #[test]
    fn test_rejects_bad_fee_rate() {
        let err = BatcherConfig::from_toml_str(r#"fee_rate = "1.5""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
        assert!(err.to_string().contains("fee rate"));
    }

    #[test]
    fn test_rejects_zero_duration() {
        let err = BatcherConfig::from_toml_str("block_duration = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroBlockDuration));

        assert!(matches!(
            BatcherConfig::new(FeeRate::ONE, 0),
            Err(ConfigError::ZeroBlockDuration)
        ));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = BatcherConfig::from_toml_str("block_time = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_missing_file() {
        let err = BatcherConfig::from_file("/nonexistent/virtual-block.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
