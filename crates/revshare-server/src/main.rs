//! revshare HTTP Server
//!
//! Axum-based server exposing the catalog management endpoints and the
//! inbound payment-platform webhook that drives revenue distribution.

mod handlers;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revshare_core::RevenueSplitConfig;
use revshare_engine::{CatalogManager, MemoryLedger, WebhookDispatcher};
use revshare_stripe::StripeGateway;

use crate::handlers::router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Both the platform credential and the split configuration are fatal
    // when missing: the process refuses to serve rather than accept
    // webhooks it cannot act on.
    let gateway = Arc::new(StripeGateway::from_env()?);
    tracing::info!("✓ Stripe credential loaded");

    let split_config = RevenueSplitConfig::from_env()?;
    tracing::info!(
        platform_fee_pct = split_config.platform_fee_pct,
        fixed_account_pct = split_config.fixed_account_pct,
        connected_account_pct = split_config.connected_account_pct,
        minimum_transfer_amount = split_config.minimum_transfer_amount,
        fixed_account_id = %split_config.fixed_account_id,
        "✓ Revenue split configured"
    );

    // Build application state
    let ledger = Arc::new(MemoryLedger::new());
    let state = AppState {
        catalog: Arc::new(CatalogManager::new(gateway.clone())),
        dispatcher: Arc::new(WebhookDispatcher::new(gateway, ledger, split_config)),
    };

    let app = router(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("revshare server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                             - Health check");
    tracing::info!("  POST /webhooks/stripe                    - Payment platform events");
    tracing::info!("  POST /catalog/offerings                  - Create offering");
    tracing::info!("  GET  /catalog/offerings                  - List active catalog");
    tracing::info!("  POST /catalog/products/archive           - Archive product + prices");
    tracing::info!("  POST /catalog/products/next-month-amount - Schedule price change");
    tracing::info!("  POST /catalog/products/replace-price     - Replace active price");
    tracing::info!("  GET  /accounts/connected                 - Connected account overview");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
