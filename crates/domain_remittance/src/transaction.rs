//! Electronic remittance advice model

use chrono::NaiveDate;
use edi_kernel::Money;
use serde::{Deserialize, Serialize};

/// How the payer moved the money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paper check (CHK)
    Check,
    /// Electronic funds transfer (ACH)
    Eft,
    /// Remittance without payment (NON), e.g. a full denial
    NonPayment,
}

impl PaymentMethod {
    /// Looks up a method by its wire code, defaulting to check
    pub fn from_code(code: &str) -> Self {
        match code {
            "ACH" | "EFT" => PaymentMethod::Eft,
            "NON" => PaymentMethod::NonPayment,
            _ => PaymentMethod::Check,
        }
    }
}

/// A coded explanation for the difference between charged and paid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjustment {
    /// Group code: CO (contractual), PR (patient responsibility),
    /// OA (other), PI (payer initiated)
    pub group_code: String,
    /// Claim adjustment reason code
    pub reason_code: String,
    pub amount: Money,
}

/// One adjudicated service line within a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceLine {
    /// CDT procedure code
    pub procedure_code: String,
    pub charge: Money,
    pub paid: Money,
    pub adjustments: Vec<Adjustment>,
}

/// One adjudicated claim within a remittance transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceClaim {
    /// Provider-assigned claim identifier echoed back by the payer;
    /// matched against the stored claim's external claim number
    pub patient_control_number: String,
    /// Claim status code from the payer (e.g. "1" primary, "4" denied)
    pub status_code: String,
    pub total_charge: Money,
    pub payment: Money,
    pub patient_responsibility: Money,
    pub adjustments: Vec<Adjustment>,
    pub service_lines: Vec<ServiceLine>,
}

impl RemittanceClaim {
    /// Sum of claim-level adjustment amounts
    pub fn adjustment_total(&self) -> Money {
        self.adjustments
            .iter()
            .fold(Money::zero(self.payment.currency()), |acc, a| {
                acc + a.amount
            })
    }

    /// Sum of service-line paid amounts
    pub fn service_line_paid_total(&self) -> Money {
        self.service_lines
            .iter()
            .fold(Money::zero(self.payment.currency()), |acc, l| acc + l.paid)
    }
}

/// A full electronic remittance advice transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceTransaction {
    /// Clearinghouse-assigned transaction identifier
    pub transaction_id: String,
    pub payer_name: String,
    pub payer_id: Option<String>,
    /// Check or EFT trace number; the idempotency key per tenant
    pub trace_number: String,
    pub payment_method: PaymentMethod,
    pub payment_date: Option<NaiveDate>,
    /// Total payment across all claims
    pub total_payment: Money,
    /// Claims in payer order; processed strictly in sequence
    pub claims: Vec<RemittanceClaim>,
}
