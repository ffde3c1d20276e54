//! Revenue Split Calculator
//!
//! Pure computation of how a paid invoice amount is divided. No I/O, no
//! side effects; the same input always produces the same output.

use serde::{Deserialize, Serialize};

use crate::config::RevenueSplitConfig;

/// Result of splitting a paid invoice amount.
///
/// All amounts are integer minor currency units (cents for USD).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSplit {
    /// Platform's share; retained in the platform balance, never transferred
    pub platform_fee: i64,

    /// Amount destined for the fixed beneficiary account
    pub fixed_account_amount: i64,

    /// Amount destined for the resolved connected account
    pub connected_account_amount: i64,

    /// The paid amount the split was computed from
    pub total_amount: i64,
}

/// Compute the revenue split for a paid amount.
///
/// Each percentage is applied to the total independently, rounding half
/// away from zero. The fixed and connected amounts are floored at
/// `config.minimum_transfer_amount`; the platform fee is not. Because the
/// floors apply per destination, the two transfer amounts can together
/// exceed `total_amount` for small invoices.
#[must_use]
pub fn compute_split(total_amount: i64, config: &RevenueSplitConfig) -> RevenueSplit {
    let platform_fee = share(total_amount, config.platform_fee_pct);
    let fixed_account_amount =
        share(total_amount, config.fixed_account_pct).max(config.minimum_transfer_amount);
    let connected_account_amount =
        share(total_amount, config.connected_account_pct).max(config.minimum_transfer_amount);

    RevenueSplit {
        platform_fee,
        fixed_account_amount,
        connected_account_amount,
        total_amount,
    }
}

/// Round half away from zero on the minor-unit scale.
///
/// Invoice amounts are far below 2^53 minor units, so the f64 round trip
/// is exact.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn share(total: i64, pct: f64) -> i64 {
    (total as f64 * pct).round() as i64
}
