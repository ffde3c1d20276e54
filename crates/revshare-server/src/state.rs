//! Application State

use std::sync::Arc;

use revshare_engine::{CatalogManager, WebhookDispatcher};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product/price lifecycle manager
    pub catalog: Arc<CatalogManager>,

    /// Webhook-driven revenue distribution
    pub dispatcher: Arc<WebhookDispatcher>,
}
