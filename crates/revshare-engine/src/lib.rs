//! # revshare-engine
//!
//! Business logic of the revshare platform: the product lifecycle manager
//! and the revenue-distribution path.
//!
//! ## Architecture
//!
//! ```text
//! webhook event ──▶ WebhookDispatcher ──▶ resolve_connected_account
//!                        │                        │ (reads metadata written
//!                        │                        │  by CatalogManager)
//!                        ▼                        ▼
//!                 DistributionLedger       compute_split (revshare-core)
//!                  (dedup by invoice)             │
//!                        │                        ▼
//!                        └──────────▶ TransferExecutor ──▶ Stripe
//! ```
//!
//! The catalog manager operates independently, invoked when provider
//! catalogs change; its only contract with the distribution path is the
//! `connected_account_id` metadata it stamps on every product.

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod ledger;
pub mod resolver;
pub mod transfer;

pub use catalog::{
    ArchivedProduct, CatalogManager, CatalogRow, ConnectedAccountOverview, Offering,
    OfferingRequest, PriceReplacement,
};
pub use dispatcher::{DispatchOutcome, DistributionOutcome, TransferOutcome, WebhookDispatcher};
pub use error::{EngineError, Result};
pub use ledger::{DistributionLedger, LedgerEntry, MemoryLedger};
pub use resolver::resolve_connected_account;
pub use transfer::{BeneficiaryKind, TransferContext, TransferExecutor};
