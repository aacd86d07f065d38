//! End-to-end tests for the eligibility round-trip

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde_json::Value;

use edi_kernel::{
    ClearinghouseApi, ClearinghouseMode, PortError, TenantId, TransactionEnvelope,
};
use infra_clearinghouse::SandboxClearinghouse;

use domain_eligibility::{
    sandbox_benefits, DegradedReason, EligibilityClient, EligibilityOutcome, EligibilityRequest,
};

fn inquiry() -> EligibilityRequest {
    EligibilityRequest {
        tenant_id: TenantId::new(),
        payer_id: "DD001".to_string(),
        member_id: "MBR-777".to_string(),
        subscriber_first_name: "Jordan".to_string(),
        subscriber_last_name: "Lee".to_string(),
        subscriber_date_of_birth: "1984-06-02".to_string(),
        provider_npi: "1098765432".to_string(),
        group_number: Some("GRP-42".to_string()),
    }
}

/// Adapter that fails every call, standing in for a dead clearinghouse
struct UnreachableClearinghouse;

#[async_trait]
impl ClearinghouseApi for UnreachableClearinghouse {
    async fn check_eligibility(&self, _payload: Value) -> Result<Value, PortError> {
        Err(PortError::connection("connection refused"))
    }

    async fn list_transactions(
        &self,
        _since: DateTime<Utc>,
    ) -> Result<Vec<TransactionEnvelope>, PortError> {
        Err(PortError::connection("connection refused"))
    }

    async fn fetch_remittance(&self, _transaction_id: &str) -> Result<Value, PortError> {
        Err(PortError::connection("connection refused"))
    }

    async fn claim_status(
        &self,
        _claim_control_number: &str,
        _payer_id: &str,
    ) -> Result<Value, PortError> {
        Err(PortError::connection("connection refused"))
    }
}

#[tokio::test]
async fn test_sandbox_mode_never_calls_out() {
    // Even an unreachable adapter is fine: the sandbox client answers locally
    let client = EligibilityClient::new(UnreachableClearinghouse, ClearinghouseMode::Sandbox);
    assert_eq!(client.mode(), ClearinghouseMode::Sandbox);

    let outcome = client.check(&inquiry()).await;
    assert!(outcome.is_degraded());
    let EligibilityOutcome::Degraded { benefits, reason } = outcome else {
        panic!("sandbox mode must degrade");
    };
    assert_eq!(reason, DegradedReason::SandboxMode);
    assert!(benefits.is_eligible);
    assert_eq!(benefits.annual_maximum.unwrap().amount(), dec!(1500));
    assert_eq!(benefits.deductible.unwrap().amount(), dec!(50));
}

#[tokio::test]
async fn test_live_mode_returns_verified_benefits() {
    let client = EligibilityClient::new(SandboxClearinghouse::new(), ClearinghouseMode::Live);

    let outcome = client.check(&inquiry()).await;
    assert!(!outcome.is_degraded());
    let EligibilityOutcome::Verified { benefits } = outcome else {
        panic!("a successful live call must verify");
    };
    assert!(benefits.is_eligible);
    assert_eq!(benefits.annual_maximum.unwrap().amount(), dec!(1500.00));
    assert_eq!(benefits.annual_remaining.unwrap().amount(), dec!(1500.00));
    assert_eq!(benefits.coverage.preventive_percent, dec!(100));
    assert_eq!(benefits.coverage.basic_percent, dec!(80));
    assert_eq!(benefits.coverage.major_percent, dec!(50));
}

#[tokio::test]
async fn test_transport_failure_degrades_with_fallback_benefits() {
    let client = EligibilityClient::new(UnreachableClearinghouse, ClearinghouseMode::Live);

    let outcome = client.check(&inquiry()).await;
    let EligibilityOutcome::Degraded { benefits, reason } = outcome else {
        panic!("a failed live call must degrade");
    };
    let DegradedReason::TransportFailure { message } = reason else {
        panic!("a failed live call must carry the transport error");
    };
    assert!(message.contains("connection refused"));

    // The fallback values match the sandbox answer; only the reason differs
    let fallback = sandbox_benefits();
    assert_eq!(benefits.is_eligible, fallback.is_eligible);
    assert_eq!(benefits.annual_maximum, fallback.annual_maximum);
    assert_eq!(benefits.coverage, fallback.coverage);
}

#[tokio::test]
async fn test_degraded_outcome_still_exposes_benefits() {
    let client = EligibilityClient::new(UnreachableClearinghouse, ClearinghouseMode::Sandbox);

    let outcome = client.check(&inquiry()).await;
    let benefits = outcome.benefits();
    assert!(benefits.annual_remaining.is_some());
}
