//! Sandbox clearinghouse adapter
//!
//! Answers every call from canned or pre-loaded payloads without touching
//! the network. Selected when no live credential is configured; also the
//! workhorse for tests, which pre-load transaction feeds and remittance
//! payloads through the builder methods.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use edi_kernel::{ClearinghouseApi, PortError, TransactionEnvelope};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory clearinghouse standing in for the live API
#[derive(Default)]
pub struct SandboxClearinghouse {
    envelopes: Mutex<Vec<TransactionEnvelope>>,
    remittances: Mutex<HashMap<String, Value>>,
}

impl SandboxClearinghouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-loads a transaction envelope into the feed
    pub fn with_envelope(self, envelope: TransactionEnvelope) -> Self {
        self.envelopes
            .lock()
            .expect("sandbox envelope lock")
            .push(envelope);
        self
    }

    /// Pre-loads a remittance payload for a transaction id
    pub fn with_remittance(self, transaction_id: impl Into<String>, payload: Value) -> Self {
        self.remittances
            .lock()
            .expect("sandbox remittance lock")
            .insert(transaction_id.into(), payload);
        self
    }

    /// Canned benefit payload with typical plan values
    pub fn canned_eligibility() -> Value {
        json!({
            "isEligible": true,
            "annualMaximum": 1500.00,
            "annualUsed": 0.00,
            "annualRemaining": 1500.00,
            "deductible": 50.00,
            "deductibleMet": 0.00,
            "coverage": {
                "preventive": 100,
                "basic": 80,
                "major": 50
            }
        })
    }
}

#[async_trait]
impl ClearinghouseApi for SandboxClearinghouse {
    async fn check_eligibility(&self, _payload: Value) -> Result<Value, PortError> {
        Ok(Self::canned_eligibility())
    }

    async fn list_transactions(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransactionEnvelope>, PortError> {
        Ok(self
            .envelopes
            .lock()
            .expect("sandbox envelope lock")
            .iter()
            .filter(|e| e.received_at >= since)
            .cloned()
            .collect())
    }

    async fn fetch_remittance(&self, transaction_id: &str) -> Result<Value, PortError> {
        self.remittances
            .lock()
            .expect("sandbox remittance lock")
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("RemittanceTransaction", transaction_id))
    }

    async fn claim_status(
        &self,
        claim_control_number: &str,
        _payer_id: &str,
    ) -> Result<Value, PortError> {
        Ok(json!({
            "claimControlNumber": claim_control_number,
            "statusCode": "1",
            "statusDescription": "Processed as primary"
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edi_kernel::TransactionDirection;

    #[tokio::test]
    async fn test_canned_eligibility() {
        let sandbox = SandboxClearinghouse::new();
        let response = sandbox.check_eligibility(json!({})).await.unwrap();
        assert_eq!(response["isEligible"], json!(true));
        assert_eq!(response["annualMaximum"], json!(1500.00));
    }

    #[tokio::test]
    async fn test_preloaded_feed_filters_by_watermark() {
        let old = Utc::now() - chrono::Duration::days(30);
        let sandbox = SandboxClearinghouse::new()
            .with_envelope(TransactionEnvelope {
                transaction_id: "txn-old".to_string(),
                direction: TransactionDirection::Inbound,
                transaction_class: "835".to_string(),
                received_at: old,
            })
            .with_envelope(TransactionEnvelope {
                transaction_id: "txn-new".to_string(),
                direction: TransactionDirection::Inbound,
                transaction_class: "835".to_string(),
                received_at: Utc::now(),
            });

        let since = Utc::now() - chrono::Duration::days(1);
        let envelopes = sandbox.list_transactions(since).await.unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].transaction_id, "txn-new");
    }

    #[tokio::test]
    async fn test_missing_remittance_is_not_found() {
        let sandbox = SandboxClearinghouse::new();
        let error = sandbox.fetch_remittance("nope").await.unwrap_err();
        assert!(error.is_not_found());
    }
}
