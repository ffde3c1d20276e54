//! Distribution Ledger
//!
//! Dedup store for webhook deliveries. The platform delivers events
//! at-least-once, and its transfer API does not deduplicate, so the
//! dispatcher claims an invoice id here before moving any money; a
//! redelivered copy of the same event finds the claim and performs zero
//! platform calls.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dispatcher::DistributionOutcome;

/// One processed (or in-flight) invoice distribution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Invoice the claim is keyed by
    pub invoice_id: String,

    /// When the claim was taken
    pub claimed_at: DateTime<Utc>,

    /// Per-destination results, recorded after transfer execution
    pub outcome: Option<DistributionOutcome>,
}

/// Idempotency store for invoice distributions.
///
/// `claim` must be atomic with respect to concurrent callers: of two
/// redelivered copies of the same event racing each other, exactly one
/// may win the claim.
pub trait DistributionLedger: Send + Sync {
    /// Claim an invoice for processing. Returns `true` if this call took
    /// the claim, `false` if the invoice was already claimed.
    fn claim(&self, invoice_id: &str) -> bool;

    /// Attach transfer outcomes to an existing claim
    fn record_outcome(&self, invoice_id: &str, outcome: &DistributionOutcome);

    /// Look up a processed invoice
    fn get(&self, invoice_id: &str) -> Option<LedgerEntry>;
}

/// In-memory ledger (for development and tests)
#[derive(Default)]
pub struct MemoryLedger {
    entries: Mutex<HashMap<String, LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DistributionLedger for MemoryLedger {
    fn claim(&self, invoice_id: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();

        if entries.contains_key(invoice_id) {
            return false;
        }

        entries.insert(
            invoice_id.to_string(),
            LedgerEntry {
                invoice_id: invoice_id.to_string(),
                claimed_at: Utc::now(),
                outcome: None,
            },
        );
        true
    }

    fn record_outcome(&self, invoice_id: &str, outcome: &DistributionOutcome) {
        let mut entries = self.entries.lock().unwrap();

        if let Some(entry) = entries.get_mut(invoice_id) {
            entry.outcome = Some(outcome.clone());
        }
    }

    fn get(&self, invoice_id: &str) -> Option<LedgerEntry> {
        self.entries.lock().unwrap().get(invoice_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::TransferOutcome;

    #[test]
    fn test_claim_is_taken_once() {
        let ledger = MemoryLedger::new();

        assert!(ledger.claim("in_1"));
        assert!(!ledger.claim("in_1"));
        assert!(ledger.claim("in_2"));
    }

    #[test]
    fn test_outcome_is_recorded_on_claim() {
        let ledger = MemoryLedger::new();
        ledger.claim("in_1");

        let outcome = DistributionOutcome {
            fixed: TransferOutcome::Skipped { amount: 0 },
            connected: TransferOutcome::Completed {
                transfer_id: "tr_1".into(),
                amount: 3_000,
            },
        };
        ledger.record_outcome("in_1", &outcome);

        let entry = ledger.get("in_1").unwrap();
        assert!(entry.outcome.is_some());
    }

    #[test]
    fn test_outcome_without_claim_is_ignored() {
        let ledger = MemoryLedger::new();
        let outcome = DistributionOutcome {
            fixed: TransferOutcome::Skipped { amount: 0 },
            connected: TransferOutcome::Skipped { amount: 0 },
        };

        ledger.record_outcome("in_unknown", &outcome);
        assert!(ledger.get("in_unknown").is_none());
    }
}
