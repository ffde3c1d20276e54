//! Revenue Split Configuration
//!
//! Loaded once at process start and injected into the calculator and the
//! webhook dispatcher. Never mutated at runtime.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How a paid invoice is divided between the platform, the fixed
/// beneficiary account, and the resolved connected account.
///
/// The percentages need not sum to 1.0; whatever is not transferred stays
/// in the platform balance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevenueSplitConfig {
    /// Platform's cut (e.g., 0.40 for 40%); retained, never transferred
    pub platform_fee_pct: f64,

    /// Fixed account's cut (e.g., 0.30 for 30%)
    pub fixed_account_pct: f64,

    /// Connected account's cut (e.g., 0.30 for 30%)
    pub connected_account_pct: f64,

    /// Per-destination floor in minor currency units
    pub minimum_transfer_amount: i64,

    /// Destination account that always receives the fixed share
    pub fixed_account_id: String,
}

impl RevenueSplitConfig {
    /// Default percentages: 40% platform, 30% fixed, 30% connected,
    /// 50-cent transfer floor.
    pub fn new(fixed_account_id: impl Into<String>) -> Self {
        Self {
            platform_fee_pct: 0.40,
            fixed_account_pct: 0.30,
            connected_account_pct: 0.30,
            minimum_transfer_amount: 50,
            fixed_account_id: fixed_account_id.into(),
        }
    }

    /// Load from environment variables.
    ///
    /// Reads:
    /// - `FIXED_ACCOUNT_ID` (required)
    /// - `PLATFORM_FEE_PCT`, `FIXED_ACCOUNT_PCT`, `CONNECTED_ACCOUNT_PCT`
    ///   (optional, default 0.40 / 0.30 / 0.30)
    /// - `MINIMUM_TRANSFER_AMOUNT` (optional, default 50 minor units)
    pub fn from_env() -> Result<Self> {
        let fixed_account_id = std::env::var("FIXED_ACCOUNT_ID")
            .map_err(|_| ConfigError::MissingVar("FIXED_ACCOUNT_ID"))?;

        let mut config = Self::new(fixed_account_id);
        config.platform_fee_pct = read_f64("PLATFORM_FEE_PCT", config.platform_fee_pct)?;
        config.fixed_account_pct = read_f64("FIXED_ACCOUNT_PCT", config.fixed_account_pct)?;
        config.connected_account_pct =
            read_f64("CONNECTED_ACCOUNT_PCT", config.connected_account_pct)?;
        config.minimum_transfer_amount =
            read_i64("MINIMUM_TRANSFER_AMOUNT", config.minimum_transfer_amount)?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot be applied to an invoice amount.
    pub fn validate(&self) -> Result<()> {
        for (name, pct) in [
            ("platform_fee_pct", self.platform_fee_pct),
            ("fixed_account_pct", self.fixed_account_pct),
            ("connected_account_pct", self.connected_account_pct),
        ] {
            if !(0.0..=1.0).contains(&pct) {
                return Err(ConfigError::InvalidSplit(format!(
                    "{name} must be within [0.0, 1.0], got {pct}"
                )));
            }
        }

        if self.minimum_transfer_amount < 0 {
            return Err(ConfigError::InvalidSplit(format!(
                "minimum_transfer_amount must be non-negative, got {}",
                self.minimum_transfer_amount
            )));
        }

        if self.fixed_account_id.is_empty() {
            return Err(ConfigError::InvalidSplit(
                "fixed_account_id must not be empty".into(),
            ));
        }

        Ok(())
    }
}

fn read_f64(name: &'static str, default: f64) -> Result<f64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn read_i64(name: &'static str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RevenueSplitConfig::new("acct_fixed");
        assert_eq!(config.platform_fee_pct, 0.40);
        assert_eq!(config.fixed_account_pct, 0.30);
        assert_eq!(config.connected_account_pct, 0.30);
        assert_eq!(config.minimum_transfer_amount, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_percentage() {
        let mut config = RevenueSplitConfig::new("acct_fixed");
        config.platform_fee_pct = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_fixed_account() {
        let config = RevenueSplitConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_minimum() {
        let mut config = RevenueSplitConfig::new("acct_fixed");
        config.minimum_transfer_amount = -1;
        assert!(config.validate().is_err());
    }
}
