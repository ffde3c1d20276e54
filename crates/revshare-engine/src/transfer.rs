//! Transfer Executor
//!
//! Issues fund transfers to destination accounts with the audit metadata
//! operators rely on. One platform call per transfer; no automatic retry,
//! since the platform's transfer API carries no idempotency protection and
//! a blind retry could move money twice.

use std::collections::HashMap;
use std::sync::Arc;

use revshare_stripe::{NewTransfer, StripeGateway, Transfer};

use crate::error::Result;

/// Which configured beneficiary a transfer is for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeneficiaryKind {
    /// The statically configured fixed account
    Fixed,

    /// The connected account resolved from product metadata
    Connected,
}

impl BeneficiaryKind {
    /// Metadata value for the `account_type` key
    pub fn as_str(self) -> &'static str {
        match self {
            BeneficiaryKind::Fixed => "fixed",
            BeneficiaryKind::Connected => "connected",
        }
    }

    fn description(self) -> &'static str {
        match self {
            BeneficiaryKind::Fixed => "Fixed account revenue share from subscription payment",
            BeneficiaryKind::Connected => {
                "Connected account revenue share from subscription payment"
            }
        }
    }
}

/// Invoice context stamped onto every transfer for auditability
#[derive(Clone, Debug)]
pub struct TransferContext<'a> {
    pub invoice_id: &'a str,
    pub subscription_id: &'a str,
    pub total_amount: i64,
    pub currency: &'a str,
}

/// Creates revenue-share transfers against the platform
pub struct TransferExecutor {
    gateway: Arc<StripeGateway>,
}

impl TransferExecutor {
    pub fn new(gateway: Arc<StripeGateway>) -> Self {
        Self { gateway }
    }

    /// Create one transfer. Failures carry the platform's error `type`,
    /// `code`, and `param` for operator diagnosis.
    pub async fn execute(
        &self,
        amount: i64,
        destination: &str,
        kind: BeneficiaryKind,
        ctx: &TransferContext<'_>,
    ) -> Result<Transfer> {
        let metadata: HashMap<String, String> = HashMap::from([
            ("type".into(), "revenue_share".into()),
            ("source".into(), "subscription_payment".into()),
            ("account_type".into(), kind.as_str().into()),
            ("total_amount".into(), ctx.total_amount.to_string()),
            ("invoice_id".into(), ctx.invoice_id.into()),
            ("subscription_id".into(), ctx.subscription_id.into()),
        ]);

        let request = NewTransfer {
            amount,
            currency: ctx.currency.to_string(),
            destination: destination.to_string(),
            description: kind.description().to_string(),
            metadata,
        };

        let transfer = self.gateway.create_transfer(&request).await?;

        tracing::info!(
            transfer_id = %transfer.id,
            amount,
            destination,
            account_type = kind.as_str(),
            invoice_id = ctx.invoice_id,
            "Transfer created"
        );

        Ok(transfer)
    }
}
