//! Product Lifecycle Manager
//!
//! Creates, archives, and re-prices sellable offerings on the payment
//! platform, stamping every product with the routing metadata the
//! distribution path reads later. Products are only ever archived, never
//! deleted — historical invoices reference their ids.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use revshare_stripe::{
    Account, NewPrice, NewProduct, Price, PriceListParams, Product, ProductUpdate,
    RecurringParams, StripeError, StripeGateway,
};

use crate::error::{EngineError, Result};
use crate::resolver::CONNECTED_ACCOUNT_KEY;

/// Request to create a sellable offering
#[derive(Clone, Debug)]
pub struct OfferingRequest {
    pub name: String,
    pub description: Option<String>,

    /// Price in major currency units (e.g. dollars); converted to minor
    /// units on submission
    pub price: f64,
    pub currency: String,

    /// Connected account that receives this offering's revenue share
    pub connected_account_id: Option<String>,
    pub account_name: Option<String>,

    /// Caller-supplied metadata, merged under the routing keys
    pub metadata: HashMap<String, String>,

    /// Also provision a companion usage-based product/price pair
    pub include_dynamic_charge: bool,
    pub dynamic_charge_description: Option<String>,
}

/// Everything created for one offering
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    pub product: Product,
    pub price: Price,
    pub dynamic_product: Option<Product>,
    pub dynamic_price: Option<Price>,
}

/// Result of archiving a product and its prices
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedProduct {
    pub product: Product,
    pub archived_prices: Vec<Price>,
}

/// Result of replacing a product's active price
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceReplacement {
    pub price: Price,
    pub archived_prices: Vec<Price>,
}

/// One row of the active catalog listing
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    pub product_id: String,
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_metadata: HashMap<String, String>,
    pub price_id: String,
    pub unit_amount: Option<i64>,
    pub currency: String,
    pub recurring: Option<revshare_stripe::Recurring>,
    pub connected_account_id: Option<String>,
}

/// Connected accounts grouped by onboarding state
#[derive(Clone, Debug, Serialize)]
pub struct AccountSummary {
    pub total_accounts: usize,
    pub active_accounts: usize,
    pub pending_accounts: usize,
    pub incomplete_accounts: usize,
}

/// Platform account plus its connected accounts
#[derive(Clone, Debug, Serialize)]
pub struct ConnectedAccountOverview {
    pub platform_account: Account,
    pub connected_accounts: Vec<Account>,
    pub summary: AccountSummary,
}

/// Manages the product/price catalog on the payment platform
pub struct CatalogManager {
    gateway: Arc<StripeGateway>,
}

impl CatalogManager {
    pub fn new(gateway: Arc<StripeGateway>) -> Self {
        Self { gateway }
    }

    /// Create an offering: optionally a dynamic companion product/price
    /// first, then the main product and its monthly price.
    ///
    /// The platform performs no rollback on partial failure. When a step
    /// fails after the dynamic companion product exists, the error names
    /// the orphaned product id so an operator can clean up or retry.
    pub async fn create_offering(&self, req: &OfferingRequest) -> Result<Offering> {
        let mut dynamic_product: Option<Product> = None;
        let mut dynamic_price: Option<Price> = None;

        if req.include_dynamic_charge {
            let product = self
                .create_dynamic_product(req)
                .await
                .map_err(|source| EngineError::OfferingFailed {
                    step: "dynamic_product",
                    source,
                })?;

            tracing::info!(product_id = %product.id, "Dynamic product created");

            // Metered usage requires a platform-side meter resource this
            // system does not provision; licensed monthly recurring is the
            // closest available proxy.
            let price = self
                .gateway
                .create_price(&NewPrice {
                    product: product.id.clone(),
                    unit_amount: 1,
                    currency: "usd".into(),
                    recurring: Some(RecurringParams::monthly_licensed()),
                })
                .await
                .map_err(|source| EngineError::OfferingIncomplete {
                    step: "dynamic_price",
                    dynamic_product_id: product.id.clone(),
                    source,
                })?;

            tracing::info!(price_id = %price.id, "Dynamic price created");
            dynamic_product = Some(product);
            dynamic_price = Some(price);
        }

        let metadata = main_product_metadata(req, dynamic_product.as_ref(), dynamic_price.as_ref());

        let product = self
            .gateway
            .create_product(&NewProduct {
                name: req.name.clone(),
                description: req.description.clone(),
                metadata,
            })
            .await
            .map_err(|source| offering_step_error("product", dynamic_product.as_ref(), source))?;

        tracing::info!(product_id = %product.id, "Product created");

        let price = self
            .gateway
            .create_price(&NewPrice {
                product: product.id.clone(),
                unit_amount: to_minor_units(req.price),
                currency: req.currency.to_lowercase(),
                recurring: Some(RecurringParams::monthly()),
            })
            .await
            .map_err(|source| offering_step_error("price", dynamic_product.as_ref(), source))?;

        tracing::info!(price_id = %price.id, "Price created");

        Ok(Offering {
            product,
            price,
            dynamic_product,
            dynamic_price,
        })
    }

    async fn create_dynamic_product(
        &self,
        req: &OfferingRequest,
    ) -> std::result::Result<Product, StripeError> {
        let mut metadata = req.metadata.clone();
        if let Some(account_id) = &req.connected_account_id {
            metadata.insert(CONNECTED_ACCOUNT_KEY.into(), account_id.clone());
        }
        metadata.insert("type".into(), "dynamic_charge".into());
        metadata.insert("parent_product_name".into(), req.name.clone());

        self.gateway
            .create_product(&NewProduct {
                name: format!("{} - Dynamic", req.name),
                description: Some(
                    req.dynamic_charge_description
                        .clone()
                        .unwrap_or_else(|| "Dynamic usage-based pricing".into()),
                ),
                metadata,
            })
            .await
    }

    /// Archive a product and, by default, every active price attached to
    /// it. Archiving sets `active=false`; nothing is deleted, so the ids
    /// stay resolvable for historical invoices.
    pub async fn archive_product(
        &self,
        product_id: &str,
        archive_prices: bool,
    ) -> Result<ArchivedProduct> {
        let product = self
            .gateway
            .update_product(
                product_id,
                &ProductUpdate {
                    active: Some(false),
                    metadata: None,
                },
            )
            .await
            .map_err(|e| not_found_context(e, "product", product_id))?;

        tracing::info!(product_id = %product.id, "Product archived");

        let mut archived_prices = Vec::new();
        if archive_prices {
            archived_prices = self.archive_active_prices(product_id).await?;
        }

        Ok(ArchivedProduct {
            product,
            archived_prices,
        })
    }

    /// Merge a patch into a product's metadata. Keys absent from the patch
    /// are preserved; used for forward-looking price scheduling without
    /// touching the currently billed amount.
    pub async fn update_product_metadata(
        &self,
        product_id: &str,
        patch: &HashMap<String, String>,
    ) -> Result<Product> {
        let current = self
            .gateway
            .retrieve_product(product_id)
            .await
            .map_err(|e| not_found_context(e, "product", product_id))?;

        let mut metadata = current.metadata;
        for (key, value) in patch {
            metadata.insert(key.clone(), value.clone());
        }

        let updated = self
            .gateway
            .update_product(
                product_id,
                &ProductUpdate {
                    active: None,
                    metadata: Some(metadata),
                },
            )
            .await?;

        Ok(updated)
    }

    /// Record the amount to bill from next month onward
    pub async fn schedule_next_month_amount(
        &self,
        product_id: &str,
        amount: f64,
    ) -> Result<Product> {
        let patch = HashMap::from([("amount_next_month".to_string(), amount.to_string())]);
        self.update_product_metadata(product_id, &patch).await
    }

    /// Replace a product's active price with a new monthly amount.
    ///
    /// The previously active prices are archived first, keeping the
    /// invariant that at most one price per billing frequency is active.
    pub async fn replace_price(
        &self,
        product_id: &str,
        new_amount: f64,
        currency: &str,
    ) -> Result<PriceReplacement> {
        self.gateway
            .retrieve_product(product_id)
            .await
            .map_err(|e| not_found_context(e, "product", product_id))?;

        let archived_prices = self.archive_active_prices(product_id).await?;

        let price = self
            .gateway
            .create_price(&NewPrice {
                product: product_id.to_string(),
                unit_amount: to_minor_units(new_amount),
                currency: currency.to_lowercase(),
                recurring: Some(RecurringParams::monthly()),
            })
            .await?;

        tracing::info!(
            product_id,
            price_id = %price.id,
            archived = archived_prices.len(),
            "Price replaced"
        );

        Ok(PriceReplacement {
            price,
            archived_prices,
        })
    }

    /// Flatten the active catalog: active prices whose product is active,
    /// with the routing account id pulled out of product metadata.
    pub async fn list_offerings(&self) -> Result<Vec<CatalogRow>> {
        let page = self
            .gateway
            .list_prices(&PriceListParams {
                product: None,
                active: Some(true),
                limit: Some(100),
                starting_after: None,
                expand_product: true,
            })
            .await?;

        let rows = page
            .data
            .into_iter()
            .filter(|price| price.active)
            .filter_map(|price| {
                let product = price.product.as_ref().and_then(|p| p.as_object())?.clone();
                if !product.active {
                    return None;
                }

                let connected_account_id = product.metadata.get(CONNECTED_ACCOUNT_KEY).cloned();
                Some(CatalogRow {
                    product_id: product.id,
                    product_name: product.name,
                    product_description: product.description,
                    product_metadata: product.metadata,
                    price_id: price.id,
                    unit_amount: price.unit_amount,
                    currency: price.currency,
                    recurring: price.recurring,
                    connected_account_id,
                })
            })
            .collect();

        Ok(rows)
    }

    /// Platform account, connected accounts, and onboarding summary
    pub async fn connected_account_overview(&self) -> Result<ConnectedAccountOverview> {
        let platform_account = self.gateway.retrieve_platform_account().await?;
        let accounts = self.gateway.list_accounts(100).await?;

        let summary = AccountSummary {
            total_accounts: accounts.data.len(),
            active_accounts: accounts.data.iter().filter(|a| a.charges_enabled).count(),
            pending_accounts: accounts
                .data
                .iter()
                .filter(|a| !a.charges_enabled && a.details_submitted)
                .count(),
            incomplete_accounts: accounts
                .data
                .iter()
                .filter(|a| !a.details_submitted)
                .count(),
        };

        Ok(ConnectedAccountOverview {
            platform_account,
            connected_accounts: accounts.data,
            summary,
        })
    }

    /// Archive every active price of a product, re-listing until the
    /// platform reports no more. Pages are capped at 100 by the platform.
    async fn archive_active_prices(&self, product_id: &str) -> Result<Vec<Price>> {
        let mut archived = Vec::new();

        loop {
            let page = self
                .gateway
                .list_prices(&PriceListParams {
                    product: Some(product_id),
                    active: Some(true),
                    limit: Some(100),
                    starting_after: None,
                    expand_product: false,
                })
                .await?;

            if page.data.is_empty() {
                break;
            }

            for price in &page.data {
                let archived_price = self.gateway.update_price(&price.id, false).await?;
                tracing::info!(price_id = %archived_price.id, "Price archived");
                archived.push(archived_price);
            }

            if !page.has_more {
                break;
            }
        }

        Ok(archived)
    }
}

/// Metadata stamped onto the main product: caller metadata merged under
/// the routing keys and dynamic cross-references.
fn main_product_metadata(
    req: &OfferingRequest,
    dynamic_product: Option<&Product>,
    dynamic_price: Option<&Price>,
) -> HashMap<String, String> {
    let mut metadata = req.metadata.clone();

    if let Some(account_id) = &req.connected_account_id {
        metadata.insert(CONNECTED_ACCOUNT_KEY.into(), account_id.clone());
    }
    if let Some(account_name) = &req.account_name {
        metadata.insert("account_name".into(), account_name.clone());
    }
    if let Some(product) = dynamic_product {
        metadata.insert("dynamic_product_id".into(), product.id.clone());
    }
    if let Some(price) = dynamic_price {
        metadata.insert("dynamic_price_id".into(), price.id.clone());
    }

    let frequency = if req.metadata.get("type").map(String::as_str) == Some("one-time") {
        "one-time"
    } else {
        "monthly"
    };
    metadata.insert("frequency".into(), frequency.into());

    metadata
}

fn offering_step_error(
    step: &'static str,
    dynamic_product: Option<&Product>,
    source: StripeError,
) -> EngineError {
    match dynamic_product {
        Some(product) => EngineError::OfferingIncomplete {
            step,
            dynamic_product_id: product.id.clone(),
            source,
        },
        None => EngineError::OfferingFailed { step, source },
    }
}

fn not_found_context(err: StripeError, resource: &str, id: &str) -> EngineError {
    match err {
        StripeError::NotFound(_) => EngineError::NotFound(format!("{resource} {id}")),
        other => EngineError::Upstream(other),
    }
}

/// Major units to integer minor units, rounding half away from zero
#[allow(clippy::cast_possible_truncation)]
fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn manager(server: &MockServer) -> CatalogManager {
        CatalogManager::new(Arc::new(
            StripeGateway::new("sk_test").with_base_url(server.uri()),
        ))
    }

    fn offering_request() -> OfferingRequest {
        OfferingRequest {
            name: "Fiber 500".into(),
            description: Some("500 Mbit fiber plan".into()),
            price: 29.99,
            currency: "USD".into(),
            connected_account_id: Some("acct_net".into()),
            account_name: Some("Metro Net".into()),
            metadata: HashMap::new(),
            include_dynamic_charge: false,
            dynamic_charge_description: None,
        }
    }

    fn product_body(id: &str, active: bool, metadata: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "Fiber 500",
            "active": active,
            "metadata": metadata
        })
    }

    fn price_body(id: &str, amount: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "currency": "usd",
            "active": true,
            "unit_amount": amount,
            "recurring": { "interval": "month" }
        })
    }

    #[test]
    fn test_minor_unit_conversion_rounds() {
        assert_eq!(to_minor_units(29.99), 2_999);
        assert_eq!(to_minor_units(10.0), 1_000);
        assert_eq!(to_minor_units(0.005), 1);
    }

    #[test]
    fn test_frequency_derived_from_type_metadata() {
        let mut req = offering_request();
        let metadata = main_product_metadata(&req, None, None);
        assert_eq!(metadata.get("frequency").map(String::as_str), Some("monthly"));

        req.metadata.insert("type".into(), "one-time".into());
        let metadata = main_product_metadata(&req, None, None);
        assert_eq!(metadata.get("frequency").map(String::as_str), Some("one-time"));
    }

    #[tokio::test]
    async fn test_create_offering_without_dynamic_charge() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/products"))
            .and(body_string_contains("name=Fiber+500"))
            .and(body_string_contains("metadata%5Bconnected_account_id%5D=acct_net"))
            .and(body_string_contains("metadata%5Baccount_name%5D=Metro+Net"))
            .and(body_string_contains("metadata%5Bfrequency%5D=monthly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_1",
                true,
                serde_json::json!({"connected_account_id": "acct_net"}),
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/prices"))
            .and(body_string_contains("product=prod_1"))
            .and(body_string_contains("unit_amount=2999"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("recurring%5Binterval%5D=month"))
            .respond_with(ResponseTemplate::new(200).set_body_json(price_body("price_1", 2_999)))
            .expect(1)
            .mount(&server)
            .await;

        let offering = manager(&server)
            .create_offering(&offering_request())
            .await
            .unwrap();

        assert_eq!(offering.product.id, "prod_1");
        assert_eq!(offering.price.id, "price_1");
        assert!(offering.dynamic_product.is_none());
        assert!(offering.dynamic_price.is_none());
    }

    #[tokio::test]
    async fn test_create_offering_with_dynamic_charge() {
        let server = MockServer::start().await;

        // Dynamic companion comes first, tagged with its parent's name.
        Mock::given(method("POST"))
            .and(path("/v1/products"))
            .and(body_string_contains("name=Fiber+500+-+Dynamic"))
            .and(body_string_contains("metadata%5Btype%5D=dynamic_charge"))
            .and(body_string_contains("metadata%5Bparent_product_name%5D=Fiber+500"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_dyn",
                true,
                serde_json::json!({"type": "dynamic_charge"}),
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/prices"))
            .and(body_string_contains("product=prod_dyn"))
            .and(body_string_contains("unit_amount=1"))
            .and(body_string_contains("recurring%5Busage_type%5D=licensed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(price_body("price_dyn", 1)))
            .expect(1)
            .mount(&server)
            .await;

        // Main product carries cross-references to the dynamic pair.
        Mock::given(method("POST"))
            .and(path("/v1/products"))
            .and(body_string_contains("metadata%5Bdynamic_product_id%5D=prod_dyn"))
            .and(body_string_contains("metadata%5Bdynamic_price_id%5D=price_dyn"))
            .and(body_string_contains("metadata%5Bfrequency%5D=monthly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_main",
                true,
                serde_json::json!({}),
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/prices"))
            .and(body_string_contains("product=prod_main"))
            .and(body_string_contains("unit_amount=2999"))
            .respond_with(ResponseTemplate::new(200).set_body_json(price_body("price_main", 2_999)))
            .expect(1)
            .mount(&server)
            .await;

        let mut req = offering_request();
        req.include_dynamic_charge = true;

        let offering = manager(&server).create_offering(&req).await.unwrap();

        assert_eq!(offering.product.id, "prod_main");
        assert_eq!(offering.dynamic_product.unwrap().id, "prod_dyn");
        assert_eq!(offering.dynamic_price.unwrap().id, "price_dyn");
    }

    #[tokio::test]
    async fn test_dynamic_price_failure_names_orphaned_product() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_dyn",
                true,
                serde_json::json!({}),
            )))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/prices"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "type": "invalid_request_error", "message": "bad recurring" }
            })))
            .mount(&server)
            .await;

        let mut req = offering_request();
        req.include_dynamic_charge = true;

        let err = manager(&server).create_offering(&req).await.unwrap_err();

        match &err {
            EngineError::OfferingIncomplete {
                step,
                dynamic_product_id,
                ..
            } => {
                assert_eq!(*step, "dynamic_price");
                assert_eq!(dynamic_product_id, "prod_dyn");
            }
            other => panic!("expected OfferingIncomplete, got {other:?}"),
        }
        assert!(err.to_string().contains("prod_dyn"));
    }

    #[tokio::test]
    async fn test_archive_product_archives_active_prices() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/products/prod_1"))
            .and(body_string_contains("active=false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_1",
                false,
                serde_json::json!({}),
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/prices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [price_body("price_1", 2_999), price_body("price_2", 1_999)],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        for price_id in ["price_1", "price_2"] {
            Mock::given(method("POST"))
                .and(path(format!("/v1/prices/{price_id}")))
                .and(body_string_contains("active=false"))
                .respond_with(ResponseTemplate::new(200).set_body_json(price_body(price_id, 2_999)))
                .expect(1)
                .mount(&server)
                .await;
        }

        // After archiving, the id stays resolvable and reads back inactive.
        Mock::given(method("GET"))
            .and(path("/v1/products/prod_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_1",
                false,
                serde_json::json!({}),
            )))
            .mount(&server)
            .await;

        let gateway = Arc::new(StripeGateway::new("sk_test").with_base_url(server.uri()));
        let catalog = CatalogManager::new(gateway.clone());
        let archived = catalog.archive_product("prod_1", true).await.unwrap();

        assert!(!archived.product.active);
        assert_eq!(archived.archived_prices.len(), 2);

        let reread = gateway.retrieve_product("prod_1").await.unwrap();
        assert!(!reread.active);

        // Archive is non-destructive: everything goes through updates,
        // nothing is deleted.
        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| r.method != wiremock::http::Method::DELETE));
    }

    #[tokio::test]
    async fn test_archive_missing_product_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/products/prod_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": { "code": "resource_missing" }
            })))
            .mount(&server)
            .await;

        let err = manager(&server)
            .archive_product("prod_missing", false)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::NotFound(_)));
        assert!(err.to_string().contains("prod_missing"));
    }

    #[tokio::test]
    async fn test_metadata_patch_preserves_existing_keys() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/products/prod_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_1",
                true,
                serde_json::json!({"connected_account_id": "acct_net", "frequency": "monthly"}),
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/products/prod_1"))
            .and(body_string_contains("metadata%5Bconnected_account_id%5D=acct_net"))
            .and(body_string_contains("metadata%5Bfrequency%5D=monthly"))
            .and(body_string_contains("metadata%5Bamount_next_month%5D=35"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_1",
                true,
                serde_json::json!({
                    "connected_account_id": "acct_net",
                    "frequency": "monthly",
                    "amount_next_month": "35"
                }),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let product = manager(&server)
            .schedule_next_month_amount("prod_1", 35.0)
            .await
            .unwrap();

        assert_eq!(
            product.metadata.get("amount_next_month").map(String::as_str),
            Some("35")
        );
    }

    #[tokio::test]
    async fn test_replace_price_archives_previous_active_price() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/products/prod_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_body(
                "prod_1",
                true,
                serde_json::json!({}),
            )))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/prices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [price_body("price_old", 2_999)],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/prices/price_old"))
            .and(body_string_contains("active=false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(price_body("price_old", 2_999)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/prices"))
            .and(body_string_contains("unit_amount=3499"))
            .respond_with(ResponseTemplate::new(200).set_body_json(price_body("price_new", 3_499)))
            .expect(1)
            .mount(&server)
            .await;

        let replacement = manager(&server)
            .replace_price("prod_1", 34.99, "usd")
            .await
            .unwrap();

        assert_eq!(replacement.price.id, "price_new");
        assert_eq!(replacement.archived_prices.len(), 1);
        assert_eq!(replacement.archived_prices[0].id, "price_old");
    }
}
