//! Remittance payload parsing
//!
//! Normalizes the clearinghouse's 835-equivalent JSON into a
//! [`RemittanceTransaction`]. Field names vary across payer gateways, so
//! scalar access goes through the alias-probing helpers. A payload without
//! a trace number is rejected: without the idempotency key the transaction
//! cannot be processed safely.

use edi_kernel::json;
use edi_kernel::{Currency, Money};
use serde_json::Value;

use crate::error::RemittanceError;
use crate::transaction::{
    Adjustment, PaymentMethod, RemittanceClaim, RemittanceTransaction, ServiceLine,
};

/// Parses a raw remittance payload
pub fn parse_remittance(
    transaction_id: &str,
    raw: &Value,
) -> Result<RemittanceTransaction, RemittanceError> {
    let currency = Currency::Usd;

    let trace_number = json::string_at(
        raw,
        &["traceNumber", "trace_number", "checkNumber", "checkEftTraceNumber"],
    )
    .ok_or_else(|| {
        RemittanceError::MalformedPayload("remittance has no check/EFT trace number".to_string())
    })?;

    let payer_name = json::string_at(raw, &["payerName", "payer_name", "payer"])
        .unwrap_or_else(|| "Unknown payer".to_string());
    let payer_id = json::string_at(raw, &["payerId", "payer_id"]);

    let payment_method = json::string_at(raw, &["paymentMethod", "payment_method", "paymentMethodCode"])
        .map(|code| PaymentMethod::from_code(&code))
        .unwrap_or(PaymentMethod::Check);

    let payment_date = json::date_at(raw, &["paymentDate", "payment_date", "checkIssueDate"]);

    let total_payment = json::decimal_at(raw, &["totalPayment", "total_payment", "totalPaymentAmount", "paymentAmount"])
        .map(|d| Money::new(d, currency))
        .unwrap_or_else(|| Money::zero(currency));

    let claims = json::array_at(raw, &["claims", "claimPayments", "claim_payments"])
        .map(|entries| entries.iter().map(|c| parse_claim(c, currency)).collect())
        .unwrap_or_default();

    Ok(RemittanceTransaction {
        transaction_id: transaction_id.to_string(),
        payer_name,
        payer_id,
        trace_number,
        payment_method,
        payment_date,
        total_payment,
        claims,
    })
}

fn parse_claim(raw: &Value, currency: Currency) -> RemittanceClaim {
    let money = |keys: &[&str]| {
        json::decimal_at(raw, keys)
            .map(|d| Money::new(d, currency))
            .unwrap_or_else(|| Money::zero(currency))
    };

    RemittanceClaim {
        patient_control_number: json::string_at(
            raw,
            &["patientControlNumber", "patient_control_number", "claimNumber"],
        )
        .unwrap_or_default(),
        status_code: json::string_at(raw, &["statusCode", "status_code", "claimStatusCode"])
            .unwrap_or_default(),
        total_charge: money(&["totalCharge", "total_charge", "chargeAmount", "totalChargeAmount"]),
        payment: money(&["payment", "paymentAmount", "payment_amount", "claimPaymentAmount"]),
        patient_responsibility: money(&[
            "patientResponsibility",
            "patient_responsibility",
            "patientResponsibilityAmount",
        ]),
        adjustments: parse_adjustments(raw, currency),
        service_lines: json::array_at(raw, &["serviceLines", "service_lines", "servicePayments"])
            .map(|lines| lines.iter().map(|l| parse_service_line(l, currency)).collect())
            .unwrap_or_default(),
    }
}

fn parse_service_line(raw: &Value, currency: Currency) -> ServiceLine {
    let money = |keys: &[&str]| {
        json::decimal_at(raw, keys)
            .map(|d| Money::new(d, currency))
            .unwrap_or_else(|| Money::zero(currency))
    };

    ServiceLine {
        procedure_code: json::string_at(raw, &["procedureCode", "procedure_code", "cdtCode"])
            .unwrap_or_default(),
        charge: money(&["charge", "chargeAmount", "charge_amount"]),
        paid: money(&["paid", "paidAmount", "paid_amount", "paymentAmount"]),
        adjustments: parse_adjustments(raw, currency),
    }
}

fn parse_adjustments(raw: &Value, currency: Currency) -> Vec<Adjustment> {
    json::array_at(raw, &["adjustments", "claimAdjustments", "claim_adjustments"])
        .map(|entries| {
            entries
                .iter()
                .map(|a| Adjustment {
                    group_code: json::string_at(a, &["groupCode", "group_code"])
                        .unwrap_or_default(),
                    reason_code: json::string_at(a, &["reasonCode", "reason_code"])
                        .unwrap_or_default(),
                    amount: json::decimal_at(a, &["amount", "adjustmentAmount"])
                        .map(|d| Money::new(d, currency))
                        .unwrap_or_else(|| Money::zero(currency)),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_remittance() {
        let raw = json!({
            "traceNumber": "CHK123",
            "payerName": "Delta Dental",
            "payerId": "DD001",
            "paymentMethod": "ACH",
            "paymentDate": "2026-03-15",
            "totalPayment": 450.00,
            "claims": [{
                "patientControlNumber": "CLM-001",
                "statusCode": "1",
                "chargeAmount": 500.00,
                "paymentAmount": 450.00,
                "patientResponsibility": 50.00,
                "adjustments": [
                    {"groupCode": "CO", "reasonCode": "45", "amount": 30.00}
                ],
                "serviceLines": [
                    {"procedureCode": "D2391", "charge": 500.00, "paid": 450.00}
                ]
            }]
        });

        let transaction = parse_remittance("txn-1", &raw).unwrap();
        assert_eq!(transaction.trace_number, "CHK123");
        assert_eq!(transaction.payment_method, PaymentMethod::Eft);
        assert_eq!(transaction.total_payment.amount(), dec!(450.00));
        assert_eq!(transaction.claims.len(), 1);

        let claim = &transaction.claims[0];
        assert_eq!(claim.patient_control_number, "CLM-001");
        assert_eq!(claim.payment.amount(), dec!(450.00));
        assert_eq!(claim.adjustments[0].group_code, "CO");
        assert_eq!(claim.service_lines[0].procedure_code, "D2391");
    }

    #[test]
    fn test_missing_trace_number_is_rejected() {
        let raw = json!({"payerName": "Delta Dental", "claims": []});
        let result = parse_remittance("txn-1", &raw);
        assert!(matches!(result, Err(RemittanceError::MalformedPayload(_))));
    }

    #[test]
    fn test_amounts_from_strings() {
        let raw = json!({
            "trace_number": "EFT-9",
            "claim_payments": [{
                "claimNumber": "CLM-002",
                "claimStatusCode": "4",
                "totalChargeAmount": "120.00",
                "claimPaymentAmount": "0"
            }]
        });

        let transaction = parse_remittance("txn-2", &raw).unwrap();
        let claim = &transaction.claims[0];
        assert_eq!(claim.total_charge.amount(), dec!(120.00));
        assert!(claim.payment.is_zero());
        assert_eq!(claim.status_code, "4");
    }
}
