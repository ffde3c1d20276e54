//! HTTP Handlers
//!
//! Catalog management endpoints, the inbound webhook, and the CORS
//! middleware. Validation happens here, before any upstream call; the
//! handlers translate engine errors into status codes per the error
//! taxonomy (validation 400, not-found 404, upstream 500 — except on the
//! webhook path, which acknowledges everything it managed to parse).

use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use revshare_engine::{EngineError, OfferingRequest};
use revshare_stripe::EventEnvelope;

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Body for webhook parse failures: `{error, details}`
#[derive(Debug, Serialize)]
pub struct WebhookErrorResponse {
    pub error: String,
    pub details: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    /// Older callers send `amount` instead of `price`
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub include_dynamic_charge: bool,
    #[serde(default)]
    pub dynamic_charge_description: Option<String>,
}

fn default_currency() -> String {
    "usd".into()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveProductRequest {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default = "default_true")]
    pub archive_prices: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMonthAmountRequest {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub amount_next_month: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacePriceRequest {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatedProductResponse {
    pub success: bool,
    pub product: revshare_stripe::Product,
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhooks/stripe", post(stripe_webhook))
        .route("/catalog/offerings", post(create_offering).get(list_offerings))
        .route("/catalog/products/archive", post(archive_product))
        .route(
            "/catalog/products/next-month-amount",
            post(schedule_next_month_amount),
        )
        .route("/catalog/products/replace-price", post(replace_price))
        .route("/accounts/connected", get(connected_accounts))
        .layer(middleware::from_fn(cors))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive CORS on the whole endpoint family: preflights are answered
/// with 204, every other response carries the allow headers.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(&mut response);
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(&mut response);
    response
}

fn apply_cors_headers(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization, apikey, X-Client-Info"),
    );
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Inbound platform webhook.
///
/// Unparseable bodies get a 400; everything that parses is acknowledged
/// with `200 {"received": true}` regardless of downstream business
/// outcome, because any non-2xx triggers redelivery and redelivering a
/// partially distributed invoice would double-transfer funds.
pub async fn stripe_webhook(State(state): State<AppState>, body: String) -> Response {
    let event: EventEnvelope = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting unparseable webhook body");
            return (
                StatusCode::BAD_REQUEST,
                Json(WebhookErrorResponse {
                    error: "invalid event payload".into(),
                    details: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.dispatcher.dispatch(&event).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Webhook processed");
            (StatusCode::OK, Json(WebhookAck { received: true })).into_response()
        }
        Err(e @ EngineError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(WebhookErrorResponse {
                error: "invalid event payload".into(),
                details: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            // Post-parse failures are surfaced through logging only; an
            // error status here would trigger redelivery.
            tracing::error!(error = %e, "Webhook processing failed after parse; acknowledging");
            (StatusCode::OK, Json(WebhookAck { received: true })).into_response()
        }
    }
}

/// Create an offering (product + price, optional dynamic companion pair)
pub async fn create_offering(
    State(state): State<AppState>,
    Json(payload): Json<CreateOfferingRequest>,
) -> Result<Json<revshare_engine::Offering>, (StatusCode, Json<ErrorResponse>)> {
    let name = payload.name.filter(|n| !n.is_empty());
    let price = payload.price.or(payload.amount);

    let (Some(name), Some(price)) = (name, price) else {
        return Err(validation_error("Name and price/amount are required"));
    };

    let request = OfferingRequest {
        name,
        description: payload.description,
        price,
        currency: payload.currency,
        connected_account_id: payload.account_id,
        account_name: payload.account_name,
        metadata: payload.metadata,
        include_dynamic_charge: payload.include_dynamic_charge,
        dynamic_charge_description: payload.dynamic_charge_description,
    };

    let offering = state
        .catalog
        .create_offering(&request)
        .await
        .map_err(engine_error)?;

    Ok(Json(offering))
}

/// Archive a product and (by default) its active prices
pub async fn archive_product(
    State(state): State<AppState>,
    Json(payload): Json<ArchiveProductRequest>,
) -> Result<Json<revshare_engine::ArchivedProduct>, (StatusCode, Json<ErrorResponse>)> {
    let Some(product_id) = payload.product_id.filter(|id| !id.is_empty()) else {
        return Err(validation_error("Product ID is required"));
    };

    let archived = state
        .catalog
        .archive_product(&product_id, payload.archive_prices)
        .await
        .map_err(engine_error)?;

    Ok(Json(archived))
}

/// Schedule the amount to bill from next month onward
pub async fn schedule_next_month_amount(
    State(state): State<AppState>,
    Json(payload): Json<NextMonthAmountRequest>,
) -> Result<Json<UpdatedProductResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(product_id) = payload.product_id.filter(|id| !id.is_empty()) else {
        return Err(validation_error("Product ID is required"));
    };

    let Some(amount) = payload.amount_next_month.as_ref().and_then(parse_amount) else {
        return Err(validation_error(
            "Amount for next month is required and must be a number",
        ));
    };

    let product = state
        .catalog
        .schedule_next_month_amount(&product_id, amount)
        .await
        .map_err(engine_error)?;

    Ok(Json(UpdatedProductResponse {
        success: true,
        product,
    }))
}

/// Replace a product's active price with a new monthly amount
pub async fn replace_price(
    State(state): State<AppState>,
    Json(payload): Json<ReplacePriceRequest>,
) -> Result<Json<revshare_engine::PriceReplacement>, (StatusCode, Json<ErrorResponse>)> {
    let Some(product_id) = payload.product_id.filter(|id| !id.is_empty()) else {
        return Err(validation_error("Product ID is required"));
    };
    let Some(price) = payload.price else {
        return Err(validation_error("Price is required"));
    };

    let replacement = state
        .catalog
        .replace_price(&product_id, price, &payload.currency)
        .await
        .map_err(engine_error)?;

    Ok(Json(replacement))
}

/// Active catalog listing
pub async fn list_offerings(
    State(state): State<AppState>,
) -> Result<Json<Vec<revshare_engine::CatalogRow>>, (StatusCode, Json<ErrorResponse>)> {
    let rows = state.catalog.list_offerings().await.map_err(engine_error)?;
    Ok(Json(rows))
}

/// Connected accounts with onboarding summary
pub async fn connected_accounts(
    State(state): State<AppState>,
) -> Result<Json<revshare_engine::ConnectedAccountOverview>, (StatusCode, Json<ErrorResponse>)> {
    let overview = state
        .catalog
        .connected_account_overview()
        .await
        .map_err(engine_error)?;
    Ok(Json(overview))
}

// ============================================================================
// Error Mapping
// ============================================================================

fn validation_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
            code: "INVALID_REQUEST".into(),
        }),
    )
}

fn engine_error(err: EngineError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        EngineError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        EngineError::OfferingIncomplete { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "OFFERING_INCOMPLETE")
        }
        EngineError::OfferingFailed { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "OFFERING_FAILED")
        }
        EngineError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
    };

    tracing::error!(error = %err, code, "Catalog operation failed");

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.into(),
        }),
    )
}

fn parse_amount(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
