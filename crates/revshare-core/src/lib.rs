//! # revshare-core
//!
//! Pure domain logic for the revshare platform: the revenue-split
//! configuration and the split calculator.
//!
//! ## Revenue Split Model
//!
//! ```text
//! invoice.amount_paid
//!        │
//!        ▼
//! ┌──────────────────┐     platform fee (retained, never transferred)
//! │  compute_split   │────▶ fixed account amount  ──▶ transfer
//! └──────────────────┘     connected account amount ─▶ transfer
//! ```
//!
//! The three percentages are applied independently to the paid total; they
//! are not renormalized, and the per-destination minimum can push the sum of
//! the two transfer amounts above the total for small invoices. Both are
//! accepted platform economics and covered by tests.
//!
//! ## Usage
//!
//! ```rust
//! use revshare_core::{compute_split, RevenueSplitConfig};
//!
//! let config = RevenueSplitConfig::new("acct_fixed");
//! let split = compute_split(10_000, &config);
//! assert_eq!(split.platform_fee, 4_000);
//! ```

pub mod config;
pub mod error;
pub mod split;

pub use config::RevenueSplitConfig;
pub use error::{ConfigError, Result};
pub use split::{compute_split, RevenueSplit};
