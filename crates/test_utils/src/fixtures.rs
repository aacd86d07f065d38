//! Fixture builders for EDI engine tests

use chrono::{NaiveDate, Utc};
use edi_kernel::{ClaimId, Currency, InvoiceId, Money, PatientId, TenantId};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use domain_priorauth::request::{
    AuthorizationDetail, Payer, PriorAuthorizationRequest, ProcedureLine, RequestingProvider,
    ServiceDate, Submitter, Subscriber,
};
use domain_remittance::codes::ClaimStatus;
use domain_remittance::ledger::{Claim, Invoice, InvoiceStatus};

/// A stored claim awaiting remittance, keyed by its external claim number
pub fn stored_claim(tenant_id: TenantId, patient_id: PatientId, claim_number: &str) -> Claim {
    Claim {
        id: ClaimId::new_v7(),
        tenant_id,
        patient_id,
        claim_number: claim_number.to_string(),
        status: ClaimStatus::Submitted,
        allowed_amount: None,
        paid_amount: None,
        patient_responsibility: None,
        check_number: None,
        payment_date: None,
        era_transaction_id: None,
        updated_at: Utc::now(),
    }
}

/// An open (sent) invoice for a patient
pub fn open_invoice(tenant_id: TenantId, patient_id: PatientId, total: Decimal) -> Invoice {
    let currency = Currency::Usd;
    Invoice {
        id: InvoiceId::new_v7(),
        tenant_id,
        patient_id,
        invoice_number: "INV-1001".to_string(),
        total_amount: Money::new(total, currency),
        amount_paid: Money::zero(currency),
        amount_due: Money::new(total, currency),
        status: InvoiceStatus::Sent,
        updated_at: Utc::now(),
    }
}

/// A remittance payload with the given trace number and claim entries
pub fn remittance_payload(trace_number: &str, claims: Vec<Value>) -> Value {
    json!({
        "traceNumber": trace_number,
        "payerName": "Delta Dental",
        "payerId": "DD001",
        "paymentMethod": "ACH",
        "paymentDate": "2026-03-15",
        "totalPayment": 450.00,
        "claims": claims,
    })
}

/// One claim entry for [`remittance_payload`]
pub fn remittance_claim_payload(
    patient_control_number: &str,
    status_code: &str,
    charge: Decimal,
    payment: Decimal,
) -> Value {
    json!({
        "patientControlNumber": patient_control_number,
        "statusCode": status_code,
        "chargeAmount": charge,
        "paymentAmount": payment,
        "patientResponsibility": charge - payment,
    })
}

/// A prior-authorization request that passes every validation rule
pub fn valid_prior_auth_request() -> PriorAuthorizationRequest {
    PriorAuthorizationRequest {
        submitter: Submitter {
            organization_name: "Bright Smiles Dental".to_string(),
            npi: Some("1234567890".to_string()),
            tax_id: None,
            contact_name: Some("Front Office".to_string()),
            contact_phone: Some("555-0100".to_string()),
        },
        payer: Payer {
            payer_id: "DD001".to_string(),
            name: "Delta Dental".to_string(),
        },
        requesting_provider: RequestingProvider {
            npi: "1098765432".to_string(),
            organization_name: None,
            first_name: Some("Maya".to_string()),
            last_name: Some("Okafor".to_string()),
            taxonomy_code: Some("1223G0001X".to_string()),
        },
        subscriber: Subscriber {
            member_id: "MBR-777".to_string(),
            first_name: "Jordan".to_string(),
            last_name: "Lee".to_string(),
            date_of_birth: "1984-06-02".to_string(),
            gender_code: None,
            group_number: Some("GRP-42".to_string()),
        },
        dependent: None,
        authorization: AuthorizationDetail {
            request_type_code: "HS".to_string(),
            certification_type_code: "I".to_string(),
            service_type_code: "35".to_string(),
            level_of_service_code: None,
            service_date: ServiceDate::Single {
                date: NaiveDate::from_ymd_opt(2026, 9, 10).expect("valid date"),
            },
            diagnosis_codes: vec!["K02.9".to_string()],
        },
        procedure_lines: vec![ProcedureLine {
            cdt_code: "D2740".to_string(),
            fee: Money::new(Decimal::new(120000, 2), Currency::Usd),
            quantity: 1,
            tooth_numbers: vec!["14".to_string()],
            surfaces: vec![],
            oral_cavity_code: None,
        }],
        attachments: vec![],
        narrative: Some("Cracked cusp, crown required".to_string()),
    }
}
