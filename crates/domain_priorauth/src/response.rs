//! Prior-authorization response parsing
//!
//! Clearinghouses relay payer decisions in a handful of JSON shapes; the
//! parser probes known field aliases and leaves anything absent unset. It
//! never fails: an empty object parses to a response with every field `None`
//! and a derived status of `Pending`.

use chrono::NaiveDate;
use edi_kernel::json;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codes::{map_action_to_status, PriorAuthStatus};

/// Date qualifier for the certification effective date
const QUALIFIER_EFFECTIVE: &str = "607";
/// Date qualifier for the certification expiration date
const QUALIFIER_EXPIRATION: &str = "609";

/// A normalized prior-authorization decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorAuthorizationResponse {
    /// Raw payer action code, when present
    pub action_code: Option<String>,
    /// Derived platform status; `Pending` when the action code is absent or unknown
    pub status: PriorAuthStatus,
    /// Payer-assigned authorization number
    pub authorization_number: Option<String>,
    /// Certification effective date (qualifier 607)
    pub certification_start: Option<NaiveDate>,
    /// Certification expiration date (qualifier 609)
    pub certification_end: Option<NaiveDate>,
    /// Quantity of services certified
    pub quantity_certified: Option<u32>,
    /// Reject reason, for denied or rejected requests
    pub reject_reason: Option<String>,
}

/// Parses a raw clearinghouse payload into a decision
pub fn parse_prior_auth_response(raw: &Value) -> PriorAuthorizationResponse {
    let action_code = json::string_at(
        raw,
        &["actionCode", "action_code", "certificationAction", "hcr01"],
    );
    let status = action_code
        .as_deref()
        .map(map_action_to_status)
        .unwrap_or(PriorAuthStatus::Pending);

    let authorization_number = json::string_at(
        raw,
        &[
            "authorizationNumber",
            "authorization_number",
            "certificationNumber",
            "referenceNumber",
        ],
    );

    let (certification_start, certification_end) = certification_dates(raw);

    let quantity_certified = json::decimal_at(raw, &["quantityCertified", "quantity_certified"])
        .and_then(|d| d.to_u32());

    let reject_reason = json::string_at(
        raw,
        &["rejectReason", "reject_reason", "rejectReasonCode", "rejectReasonMessage"],
    );

    PriorAuthorizationResponse {
        action_code,
        status,
        authorization_number,
        certification_start,
        certification_end,
        quantity_certified,
        reject_reason,
    }
}

/// Selects the effective/expiration dates from the response's dated entries
///
/// Entries look like `{"qualifier": "607", "date": "2026-03-01"}` with the
/// usual field-name aliases; some payers instead send flat
/// `effectiveDate`/`expirationDate` fields, which win if present.
fn certification_dates(raw: &Value) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let mut start = json::date_at(raw, &["effectiveDate", "effective_date"]);
    let mut end = json::date_at(raw, &["expirationDate", "expiration_date"]);

    if let Some(entries) = json::array_at(raw, &["dates", "dateInformation", "date_information"]) {
        for entry in entries {
            let qualifier = json::str_at(
                entry,
                &["qualifier", "dateTimeQualifier", "date_time_qualifier"],
            );
            let date = json::date_at(entry, &["date", "dateTimePeriod", "date_time_period"]);
            match qualifier {
                Some(QUALIFIER_EFFECTIVE) => start = start.or(date),
                Some(QUALIFIER_EXPIRATION) => end = end.or(date),
                _ => {}
            }
        }
    }

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_approved_response() {
        let raw = json!({
            "actionCode": "A1",
            "authorizationNumber": "AUTH-90210",
            "dates": [
                {"qualifier": "607", "date": "2026-03-01"},
                {"qualifier": "609", "date": "2026-09-01"}
            ],
            "quantityCertified": 2
        });

        let response = parse_prior_auth_response(&raw);
        assert_eq!(response.status, PriorAuthStatus::Approved);
        assert_eq!(response.authorization_number.as_deref(), Some("AUTH-90210"));
        assert_eq!(
            response.certification_start,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(
            response.certification_end,
            NaiveDate::from_ymd_opt(2026, 9, 1)
        );
        assert_eq!(response.quantity_certified, Some(2));
    }

    #[test]
    fn test_parse_aliased_shape() {
        let raw = json!({
            "certificationAction": "A3",
            "certificationNumber": "R-1",
            "rejectReasonCode": "Missing radiographs"
        });

        let response = parse_prior_auth_response(&raw);
        assert_eq!(response.status, PriorAuthStatus::Denied);
        assert_eq!(response.authorization_number.as_deref(), Some("R-1"));
        assert_eq!(
            response.reject_reason.as_deref(),
            Some("Missing radiographs")
        );
    }

    #[test]
    fn test_parse_empty_object_is_pending() {
        let response = parse_prior_auth_response(&json!({}));
        assert_eq!(response.status, PriorAuthStatus::Pending);
        assert!(response.action_code.is_none());
        assert!(response.authorization_number.is_none());
        assert!(response.certification_start.is_none());
        assert!(response.reject_reason.is_none());
    }
}
