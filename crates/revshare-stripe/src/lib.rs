//! # revshare-stripe
//!
//! Thin typed wrapper around the Stripe HTTP API for the revshare platform.
//!
//! Covers exactly the resources the platform touches: products, prices,
//! subscriptions, invoices, transfers, and connected accounts. No business
//! logic lives here — the gateway surfaces typed requests/responses and
//! raises typed failures, nothing more.
//!
//! Requests are form-encoded the way the Stripe API expects, with metadata
//! maps flattened to `metadata[key]=value` fields. Non-success responses
//! are parsed into [`ApiErrorDetail`] (Stripe's `type`/`code`/`param`)
//! while preserving the raw body for operator diagnosis.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use revshare_stripe::{NewProduct, StripeGateway};
//!
//! let gateway = StripeGateway::from_env()?;
//! let product = gateway.create_product(&NewProduct {
//!     name: "Fiber 500".into(),
//!     description: None,
//!     metadata: [("connected_account_id".into(), "acct_123".into())].into(),
//! }).await?;
//! ```

mod client;
mod error;
mod types;

pub use client::{PriceListParams, StripeGateway};
pub use error::{ApiErrorDetail, Result, StripeError};
pub use types::{
    Account, EventData, EventEnvelope, Expandable, Invoice, InvoiceParent, List, NewPrice,
    NewProduct, NewTransfer, Price, Product, ProductUpdate, Recurring, RecurringParams,
    Subscription, SubscriptionDetails, SubscriptionItem, Transfer,
};
