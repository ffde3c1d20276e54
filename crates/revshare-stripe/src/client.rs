//! Stripe HTTP Gateway
//!
//! Form-encoded requests against the Stripe REST API with a bearer
//! credential. The base URL is overridable so tests can point the gateway
//! at a local mock server.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiErrorDetail, Result, StripeError};
use crate::types::{
    Account, Invoice, List, NewPrice, NewProduct, NewTransfer, Price, Product, ProductUpdate,
    Subscription, Transfer,
};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// Error response envelope (`{"error": {...}}`)
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorDetail,
}

/// Typed client for the Stripe API
#[derive(Clone)]
pub struct StripeGateway {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Parameters for listing prices
#[derive(Clone, Debug, Default)]
pub struct PriceListParams<'a> {
    /// Restrict to prices of one product
    pub product: Option<&'a str>,

    /// Filter on the active flag
    pub active: Option<bool>,

    /// Page size, capped by Stripe at 100
    pub limit: Option<u32>,

    /// Cursor: the last price id of the previous page
    pub starting_after: Option<&'a str>,

    /// Expand `data.product` on each returned price
    pub expand_product: bool,
}

impl StripeGateway {
    /// Create a new gateway with the given secret key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variables.
    ///
    /// The `STRIPE_SECRET_KEY` credential is required; its absence is a
    /// fatal configuration error surfaced before any request is attempted.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| StripeError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(api_key))
    }

    /// Point the gateway at a different API host (for testing)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Create a product, active by default. Metadata keys are flattened to
    /// `metadata[key]` form fields before submission.
    pub async fn create_product(&self, req: &NewProduct) -> Result<Product> {
        let mut params: Vec<(String, String)> = vec![
            ("name".into(), req.name.clone()),
            ("active".into(), "true".into()),
        ];

        if let Some(description) = &req.description {
            params.push(("description".into(), description.clone()));
        }

        flatten_metadata(&mut params, &req.metadata);

        self.post_form("/v1/products", &params, "product").await
    }

    /// Retrieve a product by id; a 404 surfaces as [`StripeError::NotFound`]
    pub async fn retrieve_product(&self, product_id: &str) -> Result<Product> {
        let path = format!("/v1/products/{product_id}");
        self.get(&path, &[], "product").await
    }

    /// Apply a partial update (active flag and/or metadata replacement)
    pub async fn update_product(&self, product_id: &str, update: &ProductUpdate) -> Result<Product> {
        let mut params: Vec<(String, String)> = Vec::new();

        if let Some(active) = update.active {
            params.push(("active".into(), active.to_string()));
        }

        if let Some(metadata) = &update.metadata {
            flatten_metadata(&mut params, metadata);
        }

        let path = format!("/v1/products/{product_id}");
        self.post_form(&path, &params, "product").await
    }

    // ========================================================================
    // Prices
    // ========================================================================

    /// Create a price, active by default
    pub async fn create_price(&self, req: &NewPrice) -> Result<Price> {
        let mut params: Vec<(String, String)> = vec![
            ("product".into(), req.product.clone()),
            ("unit_amount".into(), req.unit_amount.to_string()),
            ("currency".into(), req.currency.clone()),
            ("active".into(), "true".into()),
        ];

        if let Some(recurring) = &req.recurring {
            params.push(("recurring[interval]".into(), recurring.interval.into()));
            if let Some(usage_type) = recurring.usage_type {
                params.push(("recurring[usage_type]".into(), usage_type.into()));
            }
        }

        self.post_form("/v1/prices", &params, "price").await
    }

    /// List prices, optionally filtered and paginated
    pub async fn list_prices(&self, params: &PriceListParams<'_>) -> Result<List<Price>> {
        let mut query: Vec<(&str, String)> = Vec::new();

        if let Some(product) = params.product {
            query.push(("product", product.into()));
        }
        if let Some(active) = params.active {
            query.push(("active", active.to_string()));
        }
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = params.starting_after {
            query.push(("starting_after", cursor.into()));
        }
        if params.expand_product {
            query.push(("expand[]", "data.product".into()));
        }

        self.get("/v1/prices", &query, "price list").await
    }

    /// Flip a price's active flag
    pub async fn update_price(&self, price_id: &str, active: bool) -> Result<Price> {
        let params: Vec<(String, String)> = vec![("active".into(), active.to_string())];
        let path = format!("/v1/prices/{price_id}");
        self.post_form(&path, &params, "price").await
    }

    // ========================================================================
    // Subscriptions & Invoices
    // ========================================================================

    /// Retrieve a subscription with its line items' products expanded,
    /// so callers can read product metadata without extra round trips.
    pub async fn retrieve_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        let path = format!("/v1/subscriptions/{subscription_id}");
        let query = [("expand[]", "items.data.price.product".to_string())];
        self.get(&path, &query[..], "subscription").await
    }

    /// Retrieve an invoice by id
    pub async fn retrieve_invoice(&self, invoice_id: &str) -> Result<Invoice> {
        let path = format!("/v1/invoices/{invoice_id}");
        self.get(&path, &[], "invoice").await
    }

    // ========================================================================
    // Transfers & Accounts
    // ========================================================================

    /// Move funds from the platform balance to a destination account
    pub async fn create_transfer(&self, req: &NewTransfer) -> Result<Transfer> {
        let mut params: Vec<(String, String)> = vec![
            ("amount".into(), req.amount.to_string()),
            ("currency".into(), req.currency.clone()),
            ("destination".into(), req.destination.clone()),
            ("description".into(), req.description.clone()),
        ];

        flatten_metadata(&mut params, &req.metadata);

        self.post_form("/v1/transfers", &params, "transfer").await
    }

    /// Retrieve the platform's own account
    pub async fn retrieve_platform_account(&self) -> Result<Account> {
        self.get("/v1/account", &[], "account").await
    }

    /// List connected accounts
    pub async fn list_accounts(&self, limit: u32) -> Result<List<Account>> {
        let query = [("limit", limit.to_string())];
        self.get("/v1/accounts", &query[..], "account list").await
    }

    // ========================================================================
    // Transport
    // ========================================================================

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        resource: &'static str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .form(params)
            .send()
            .await?;

        Self::handle(response, resource).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        resource: &'static str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        Self::handle(response, resource).await
    }

    async fn handle<T: DeserializeOwned>(
        response: reqwest::Response,
        resource: &'static str,
    ) -> Result<T> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StripeError::NotFound(resource.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error)
                .unwrap_or_default();

            tracing::warn!(
                status = status.as_u16(),
                %detail,
                resource,
                "Stripe API call failed"
            );

            return Err(StripeError::Api {
                status: status.as_u16(),
                detail,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| StripeError::Decode { resource, source })
    }
}

/// Flatten a metadata map into `metadata[key]` form fields. Stripe's form
/// encoding has no nested objects; every value is submitted as a string.
fn flatten_metadata(params: &mut Vec<(String, String)>, metadata: &std::collections::HashMap<String, String>) {
    for (key, value) in metadata {
        params.push((format!("metadata[{key}]"), value.clone()));
    }
}
