//! Stripe Resource Types
//!
//! Typed request/response shapes for the resources the platform touches.
//! Response structs keep only the fields the engine reads; Stripe's extra
//! fields are ignored on deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A field that Stripe returns either as a bare id or as the expanded
/// object, depending on the request's `expand[]` parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    /// The expanded object
    Object(Box<T>),

    /// Just the id
    Id(String),
}

impl<T> Expandable<T> {
    /// The expanded object, if the field was expanded
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Object(obj) => Some(obj),
            Expandable::Id(_) => None,
        }
    }
}

/// Paginated list envelope (`{"object": "list", "data": [...], ...}`)
#[derive(Clone, Debug, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

// ============================================================================
// Products & Prices
// ============================================================================

/// A sellable offering. Created active; mutated only via archive or
/// metadata patch, never hard-deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Request payload for creating a product
#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// Partial update for a product
#[derive(Clone, Debug, Default)]
pub struct ProductUpdate {
    pub active: Option<bool>,
    pub metadata: Option<HashMap<String, String>>,
}

/// Recurring terms on a price
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recurring {
    pub interval: String,
    #[serde(default)]
    pub usage_type: Option<String>,
}

/// A monetary term attached to a product
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Price {
    pub id: String,
    #[serde(default)]
    pub product: Option<Expandable<Product>>,
    #[serde(default)]
    pub unit_amount: Option<i64>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub recurring: Option<Recurring>,
}

/// Recurring terms for price creation
#[derive(Clone, Debug)]
pub struct RecurringParams {
    pub interval: &'static str,
    pub usage_type: Option<&'static str>,
}

impl RecurringParams {
    /// Standard monthly subscription billing
    pub fn monthly() -> Self {
        Self {
            interval: "month",
            usage_type: None,
        }
    }

    /// Monthly licensed usage — the closest available proxy for metered
    /// billing, which would require a platform-side meter resource this
    /// system does not provision.
    pub fn monthly_licensed() -> Self {
        Self {
            interval: "month",
            usage_type: Some("licensed"),
        }
    }
}

/// Request payload for creating a price
#[derive(Clone, Debug)]
pub struct NewPrice {
    pub product: String,
    pub unit_amount: i64,
    pub currency: String,
    pub recurring: Option<RecurringParams>,
}

// ============================================================================
// Subscriptions & Invoices
// ============================================================================

/// One line item of a subscription
#[derive(Clone, Debug, Deserialize)]
pub struct SubscriptionItem {
    pub id: String,
    pub price: Price,
}

/// A customer's subscription; read-only from this platform's perspective
#[derive(Clone, Debug, Deserialize)]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub status: String,
    pub items: List<SubscriptionItem>,
}

/// Nested subscription reference on newer invoice payloads
#[derive(Clone, Debug, Deserialize)]
pub struct SubscriptionDetails {
    #[serde(default)]
    pub subscription: Option<String>,
}

/// `invoice.parent` sub-structure
#[derive(Clone, Debug, Deserialize)]
pub struct InvoiceParent {
    #[serde(default)]
    pub subscription_details: Option<SubscriptionDetails>,
}

/// A billed, paid amount
#[derive(Clone, Debug, Deserialize)]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub parent: Option<InvoiceParent>,
}

impl Invoice {
    /// The owning subscription, checking the direct field first and then
    /// the nested `parent.subscription_details` location. `None` means a
    /// one-time payment invoice.
    pub fn subscription_id(&self) -> Option<&str> {
        if let Some(id) = self.subscription.as_deref() {
            if !id.is_empty() {
                return Some(id);
            }
        }

        self.parent
            .as_ref()
            .and_then(|p| p.subscription_details.as_ref())
            .and_then(|d| d.subscription.as_deref())
            .filter(|id| !id.is_empty())
    }
}

// ============================================================================
// Transfers & Accounts
// ============================================================================

/// Funds moved from the platform balance to a destination account
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transfer {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Request payload for creating a transfer
#[derive(Clone, Debug)]
pub struct NewTransfer {
    pub amount: i64,
    pub currency: String,
    pub destination: String,
    pub description: String,
    pub metadata: HashMap<String, String>,
}

/// A platform or connected account
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub details_submitted: bool,
    #[serde(default)]
    pub email: Option<String>,
}

// ============================================================================
// Webhook Events
// ============================================================================

/// The webhook event envelope: `{type, id, created, data: {object}}`
#[derive(Clone, Debug, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    pub data: EventData,
}

/// The event payload; `object` is decoded per event type by the consumer
#[derive(Clone, Debug, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}
