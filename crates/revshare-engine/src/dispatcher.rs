//! Webhook Event Dispatcher
//!
//! Drives one platform event end-to-end: filter, subscription lookup,
//! account resolution, split computation, transfer execution. The platform
//! delivers events at-least-once and redelivers on any non-2xx response,
//! so everything after successful parsing resolves to an outcome the HTTP
//! layer acknowledges with 200 — a redelivered, partially distributed
//! event must never be able to move money twice.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use revshare_core::{compute_split, RevenueSplit, RevenueSplitConfig};
use revshare_stripe::{EventEnvelope, Invoice, StripeGateway};

use crate::error::{EngineError, Result};
use crate::ledger::DistributionLedger;
use crate::resolver::resolve_connected_account;
use crate::transfer::{BeneficiaryKind, TransferContext, TransferExecutor};

/// Webhook event kinds this platform reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A subscription invoice was paid; triggers distribution
    InvoicePaymentSucceeded,

    /// Anything else; acknowledged and ignored
    Other(String),
}

impl EventKind {
    fn from_type(event_type: &str) -> Self {
        match event_type {
            "invoice.payment_succeeded" => EventKind::InvoicePaymentSucceeded,
            other => EventKind::Other(other.to_string()),
        }
    }
}

/// Result of one transfer attempt
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    /// The platform accepted the transfer
    Completed { transfer_id: String, amount: i64 },

    /// The platform rejected the transfer; logged, never retried blindly
    Failed { amount: i64, error: String },

    /// Computed amount was not positive; nothing to move
    Skipped { amount: i64 },
}

impl TransferOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, TransferOutcome::Failed { .. })
    }
}

/// Per-destination results of a distribution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistributionOutcome {
    pub fixed: TransferOutcome,
    pub connected: TransferOutcome,
}

impl DistributionOutcome {
    pub fn fully_succeeded(&self) -> bool {
        !self.fixed.is_failed() && !self.connected.is_failed()
    }
}

/// How one webhook delivery ended
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Event type is not one this platform reacts to
    Ignored { event_type: String },

    /// Invoice carries no subscription reference; one-time payments are
    /// outside the distribution path
    OneTimePayment { invoice_id: String },

    /// This invoice was already claimed by an earlier delivery
    Duplicate { invoice_id: String },

    /// No line item carried a connected account; likely a catalog
    /// metadata gap, surfaced via logging
    NoConnectedAccount {
        invoice_id: String,
        subscription_id: String,
    },

    /// An upstream lookup failed before any money moved
    LookupFailed {
        invoice_id: String,
        stage: &'static str,
        detail: String,
    },

    /// Transfers were attempted; per-destination results attached
    Distributed {
        invoice_id: String,
        subscription_id: String,
        split: RevenueSplit,
        transfers: DistributionOutcome,
    },
}

/// Drives revenue distribution from webhook events
pub struct WebhookDispatcher {
    gateway: Arc<StripeGateway>,
    executor: TransferExecutor,
    ledger: Arc<dyn DistributionLedger>,
    config: RevenueSplitConfig,
}

impl WebhookDispatcher {
    pub fn new(
        gateway: Arc<StripeGateway>,
        ledger: Arc<dyn DistributionLedger>,
        config: RevenueSplitConfig,
    ) -> Self {
        Self {
            executor: TransferExecutor::new(gateway.clone()),
            gateway,
            ledger,
            config,
        }
    }

    /// Process one event.
    ///
    /// `Err` is returned only when the event payload itself is malformed
    /// (the HTTP layer answers 400). Every downstream failure resolves to
    /// a [`DispatchOutcome`] so the delivery is acknowledged — failures
    /// are surfaced through logs, not response codes.
    pub async fn dispatch(&self, event: &EventEnvelope) -> Result<DispatchOutcome> {
        match EventKind::from_type(&event.event_type) {
            EventKind::InvoicePaymentSucceeded => self.handle_payment_succeeded(event).await,
            EventKind::Other(event_type) => {
                tracing::debug!(%event_type, "Ignoring webhook event type");
                Ok(DispatchOutcome::Ignored { event_type })
            }
        }
    }

    async fn handle_payment_succeeded(&self, event: &EventEnvelope) -> Result<DispatchOutcome> {
        let invoice: Invoice = serde_json::from_value(event.data.object.clone())
            .map_err(|e| EngineError::Validation(format!("malformed invoice payload: {e}")))?;

        tracing::info!(
            invoice_id = %invoice.id,
            amount_paid = invoice.amount_paid,
            currency = %invoice.currency,
            "Processing paid invoice"
        );

        let Some(subscription_id) = invoice.subscription_id().map(str::to_string) else {
            tracing::info!(invoice_id = %invoice.id, "No subscription reference; one-time payment");
            return Ok(DispatchOutcome::OneTimePayment {
                invoice_id: invoice.id,
            });
        };

        let subscription = match self.gateway.retrieve_subscription(&subscription_id).await {
            Ok(subscription) => subscription,
            Err(e) => {
                tracing::error!(
                    invoice_id = %invoice.id,
                    subscription_id = %subscription_id,
                    error = %e,
                    "Subscription lookup failed; acknowledging without distribution"
                );
                return Ok(DispatchOutcome::LookupFailed {
                    invoice_id: invoice.id,
                    stage: "subscription_lookup",
                    detail: e.to_string(),
                });
            }
        };

        let Some(connected_account_id) = resolve_connected_account(&subscription) else {
            tracing::warn!(
                invoice_id = %invoice.id,
                subscription_id = %subscription.id,
                "No connected account on any line item; skipping distribution"
            );
            return Ok(DispatchOutcome::NoConnectedAccount {
                invoice_id: invoice.id,
                subscription_id: subscription.id,
            });
        };

        let split = compute_split(invoice.amount_paid, &self.config);

        // The platform fee is retained in the platform balance; it is
        // computed for the audit trail and never transferred.
        tracing::info!(
            invoice_id = %invoice.id,
            total_amount = split.total_amount,
            platform_fee = split.platform_fee,
            fixed_account_amount = split.fixed_account_amount,
            connected_account_amount = split.connected_account_amount,
            "Revenue split computed"
        );

        // Claim immediately before moving money: of two redelivered copies
        // racing each other, exactly one reaches the transfer calls. The
        // claim is kept even when a transfer fails, because redelivering a
        // partially distributed invoice would double-pay the destination
        // that already succeeded.
        if !self.ledger.claim(&invoice.id) {
            tracing::warn!(
                invoice_id = %invoice.id,
                "Invoice already claimed; duplicate delivery ignored"
            );
            return Ok(DispatchOutcome::Duplicate {
                invoice_id: invoice.id,
            });
        }

        let distribution_id = uuid::Uuid::new_v4();
        let currency = if invoice.currency.is_empty() {
            "usd"
        } else {
            invoice.currency.as_str()
        };
        let ctx = TransferContext {
            invoice_id: &invoice.id,
            subscription_id: &subscription.id,
            total_amount: split.total_amount,
            currency,
        };

        // Sequential, fixed first. The attempts are independent: a failed
        // fixed-account transfer must not prevent the connected-account
        // attempt, and both outcomes are reported.
        let fixed = self
            .attempt(
                split.fixed_account_amount,
                &self.config.fixed_account_id,
                BeneficiaryKind::Fixed,
                &ctx,
                distribution_id,
            )
            .await;
        let connected = self
            .attempt(
                split.connected_account_amount,
                &connected_account_id,
                BeneficiaryKind::Connected,
                &ctx,
                distribution_id,
            )
            .await;

        let transfers = DistributionOutcome { fixed, connected };
        self.ledger.record_outcome(&invoice.id, &transfers);

        if transfers.fully_succeeded() {
            tracing::info!(
                invoice_id = %invoice.id,
                %distribution_id,
                "Revenue distribution completed"
            );
        } else {
            tracing::error!(
                invoice_id = %invoice.id,
                %distribution_id,
                "Distribution completed with failures; manual reconciliation required"
            );
        }

        Ok(DispatchOutcome::Distributed {
            invoice_id: invoice.id,
            subscription_id: subscription.id,
            split,
            transfers,
        })
    }

    async fn attempt(
        &self,
        amount: i64,
        destination: &str,
        kind: BeneficiaryKind,
        ctx: &TransferContext<'_>,
        distribution_id: uuid::Uuid,
    ) -> TransferOutcome {
        if amount <= 0 {
            tracing::info!(
                account_type = kind.as_str(),
                amount,
                invoice_id = ctx.invoice_id,
                "Skipping transfer of non-positive amount"
            );
            return TransferOutcome::Skipped { amount };
        }

        match self.executor.execute(amount, destination, kind, ctx).await {
            Ok(transfer) => TransferOutcome::Completed {
                transfer_id: transfer.id,
                amount,
            },
            Err(e) => {
                tracing::error!(
                    account_type = kind.as_str(),
                    destination,
                    amount,
                    invoice_id = ctx.invoice_id,
                    %distribution_id,
                    error = %e,
                    "Transfer failed"
                );
                TransferOutcome::Failed {
                    amount,
                    error: e.to_string(),
                }
            }
        }
    }
}
