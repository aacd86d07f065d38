//! Eligibility round-trip client
//!
//! Sends a benefit inquiry to the clearinghouse and parses the answer. The
//! operating mode is fixed at construction: a sandbox client never calls out
//! and always answers from canned benefits, and a live client that hits a
//! transport failure falls back to the same canned benefits. Both paths are
//! reported as [`EligibilityOutcome::Degraded`] so a caller can always tell
//! a plausible placeholder from a verified payer answer.

use edi_kernel::{ClearinghouseApi, ClearinghouseMode, Currency, Money};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::benefits::{
    CoverageLevels, DentalBenefits, EligibilityRequest, DENTAL_SERVICE_TYPE_CODE,
};
use crate::parser::parse_eligibility_response;

/// Why an eligibility answer is degraded rather than verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DegradedReason {
    /// The client was constructed in sandbox mode and never called out
    SandboxMode,
    /// The live call failed; the message carries the transport error
    TransportFailure { message: String },
}

/// The outcome of an eligibility check
///
/// Both variants carry benefits, so callers that only need *an* answer can
/// proceed either way; callers that care about correctness branch on the
/// variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EligibilityOutcome {
    /// A real payer answer, parsed from the clearinghouse response
    Verified { benefits: DentalBenefits },
    /// Canned benefits standing in for a real answer
    Degraded {
        benefits: DentalBenefits,
        reason: DegradedReason,
    },
}

impl EligibilityOutcome {
    /// Returns the benefits regardless of provenance
    pub fn benefits(&self) -> &DentalBenefits {
        match self {
            EligibilityOutcome::Verified { benefits } => benefits,
            EligibilityOutcome::Degraded { benefits, .. } => benefits,
        }
    }

    /// Returns true when the answer is canned rather than payer-verified
    pub fn is_degraded(&self) -> bool {
        matches!(self, EligibilityOutcome::Degraded { .. })
    }
}

/// Client for the eligibility round-trip
pub struct EligibilityClient<C> {
    api: C,
    mode: ClearinghouseMode,
}

impl<C: ClearinghouseApi> EligibilityClient<C> {
    /// Creates a client with an explicit operating mode
    pub fn new(api: C, mode: ClearinghouseMode) -> Self {
        Self { api, mode }
    }

    /// Returns the mode the client was constructed with
    pub fn mode(&self) -> ClearinghouseMode {
        self.mode
    }

    /// Checks eligibility for one subscriber
    pub async fn check(&self, request: &EligibilityRequest) -> EligibilityOutcome {
        if self.mode == ClearinghouseMode::Sandbox {
            info!(
                tenant = %request.tenant_id,
                member_id = %request.member_id,
                "eligibility check answered from sandbox benefits"
            );
            return EligibilityOutcome::Degraded {
                benefits: sandbox_benefits(),
                reason: DegradedReason::SandboxMode,
            };
        }

        let payload = build_inquiry_payload(request);
        match self.api.check_eligibility(payload).await {
            Ok(raw) => EligibilityOutcome::Verified {
                benefits: parse_eligibility_response(&raw),
            },
            Err(error) => {
                warn!(
                    tenant = %request.tenant_id,
                    member_id = %request.member_id,
                    %error,
                    "eligibility check failed, answering with sandbox benefits"
                );
                EligibilityOutcome::Degraded {
                    benefits: sandbox_benefits(),
                    reason: DegradedReason::TransportFailure {
                        message: error.to_string(),
                    },
                }
            }
        }
    }
}

/// Builds the clearinghouse inquiry payload for a request
fn build_inquiry_payload(request: &EligibilityRequest) -> serde_json::Value {
    json!({
        "payerId": request.payer_id,
        "memberId": request.member_id,
        "firstName": request.subscriber_first_name,
        "lastName": request.subscriber_last_name,
        "dateOfBirth": request.subscriber_date_of_birth,
        "providerNpi": request.provider_npi,
        "groupNumber": request.group_number,
        "serviceTypeCode": DENTAL_SERVICE_TYPE_CODE,
    })
}

/// Fixed benefit values used by every degraded answer
///
/// Identical for the sandbox and transport-failure paths; the outcome
/// variant, not the benefit values, is what distinguishes them.
pub fn sandbox_benefits() -> DentalBenefits {
    let usd = |amount| Money::new(amount, Currency::Usd);
    DentalBenefits {
        is_eligible: true,
        effective_date: None,
        termination_date: None,
        annual_maximum: Some(usd(dec!(1500))),
        annual_used: Some(usd(dec!(0))),
        annual_remaining: Some(usd(dec!(1500))),
        deductible: Some(usd(dec!(50))),
        deductible_met: Some(usd(dec!(0))),
        out_of_pocket_max: None,
        out_of_pocket_met: None,
        coverage: CoverageLevels::default(),
        copay: None,
        coinsurance_percent: None,
        waiting_periods: BTreeMap::new(),
        frequency_limitations: BTreeMap::new(),
    }
}
