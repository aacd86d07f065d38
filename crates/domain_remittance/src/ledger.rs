//! Ledger views of claims, invoices, and payments
//!
//! These entities are owned by the billing side of the platform; the
//! remittance processor reads and mutates them only through the repository
//! ports. The invariant maintained here is that an invoice's paid and due
//! amounts are always recomputed from the full payment history, never
//! incremented, so the balance stays correct under postings made elsewhere.

use chrono::{DateTime, NaiveDate, Utc};
use edi_kernel::{ClaimId, InvoiceId, Money, PatientId, PaymentId, TenantId};
use serde::{Deserialize, Serialize};

use crate::codes::ClaimStatus;

/// A stored insurance claim, as the processor sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub tenant_id: TenantId,
    pub patient_id: PatientId,
    /// External claim number; matched against the ERA patient control number
    pub claim_number: String,
    pub status: ClaimStatus,
    /// Amount the payer allowed (payment plus adjustments)
    pub allowed_amount: Option<Money>,
    /// Amount the payer paid
    pub paid_amount: Option<Money>,
    /// Amount shifted to the patient
    pub patient_responsibility: Option<Money>,
    /// Check/EFT trace number of the remittance that paid this claim
    pub check_number: Option<String>,
    pub payment_date: Option<NaiveDate>,
    /// Transaction id of the remittance that adjudicated this claim
    pub era_transaction_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Partial,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Returns true for statuses a payment can still be posted against
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            InvoiceStatus::Sent | InvoiceStatus::Partial | InvoiceStatus::Overdue
        )
    }
}

/// A patient invoice, as the processor sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub tenant_id: TenantId,
    pub patient_id: PatientId,
    pub invoice_number: String,
    pub total_amount: Money,
    pub amount_paid: Money,
    pub amount_due: Money,
    pub status: InvoiceStatus,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Returns true when payments can still be posted against this invoice
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Re-derives paid/due amounts and status from the full payment total
    ///
    /// `total_paid` must be the sum over every payment on this invoice, not
    /// a delta; recomputing keeps `amount_paid + amount_due == total_amount`
    /// even when other writers have posted in between.
    pub fn apply_payment_total(&mut self, total_paid: Money) {
        self.amount_paid = total_paid;
        self.amount_due = self.total_amount - total_paid;
        self.updated_at = Utc::now();

        if !self.amount_due.is_positive() {
            self.status = InvoiceStatus::Paid;
        } else if total_paid.is_positive() {
            self.status = InvoiceStatus::Partial;
        }
        // No payment yet: the status stays whatever it was
    }
}

/// A posted payment against an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub tenant_id: TenantId,
    pub invoice_id: InvoiceId,
    pub amount: Money,
    /// Reference tying the payment to its source, e.g. `ERA-{trace}-{claim}`
    pub reference: String,
    /// User on whose behalf the posting ran
    pub posted_by: String,
    pub posted_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Creates a payment posting for an invoice
    pub fn new(
        tenant_id: TenantId,
        invoice_id: InvoiceId,
        amount: Money,
        reference: impl Into<String>,
        posted_by: impl Into<String>,
    ) -> Self {
        Self {
            id: PaymentId::new_v7(),
            tenant_id,
            invoice_id,
            amount,
            reference: reference.into(),
            posted_by: posted_by.into(),
            posted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edi_kernel::Currency;
    use rust_decimal_macros::dec;

    fn open_invoice(total: rust_decimal::Decimal) -> Invoice {
        let currency = Currency::Usd;
        Invoice {
            id: InvoiceId::new_v7(),
            tenant_id: TenantId::new(),
            patient_id: PatientId::new(),
            invoice_number: "INV-1001".to_string(),
            total_amount: Money::new(total, currency),
            amount_paid: Money::zero(currency),
            amount_due: Money::new(total, currency),
            status: InvoiceStatus::Sent,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_partial_payment_keeps_balance_invariant() {
        let mut invoice = open_invoice(dec!(500.00));
        invoice.apply_payment_total(Money::new(dec!(450.00), Currency::Usd));

        assert_eq!(invoice.amount_paid.amount(), dec!(450.00));
        assert_eq!(invoice.amount_due.amount(), dec!(50.00));
        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert_eq!(
            invoice.amount_paid + invoice.amount_due,
            invoice.total_amount
        );
    }

    #[test]
    fn test_full_payment_closes_invoice() {
        let mut invoice = open_invoice(dec!(500.00));
        invoice.apply_payment_total(Money::new(dec!(500.00), Currency::Usd));

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(invoice.amount_due.is_zero());
    }

    #[test]
    fn test_overpayment_still_closes_invoice() {
        let mut invoice = open_invoice(dec!(500.00));
        invoice.apply_payment_total(Money::new(dec!(520.00), Currency::Usd));

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(invoice.amount_due.is_negative());
    }

    #[test]
    fn test_zero_total_leaves_status_unchanged() {
        let mut invoice = open_invoice(dec!(500.00));
        invoice.apply_payment_total(Money::zero(Currency::Usd));

        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.amount_due.amount(), dec!(500.00));
    }

    #[test]
    fn test_open_statuses() {
        assert!(InvoiceStatus::Sent.is_open());
        assert!(InvoiceStatus::Partial.is_open());
        assert!(InvoiceStatus::Overdue.is_open());
        assert!(!InvoiceStatus::Paid.is_open());
        assert!(!InvoiceStatus::Draft.is_open());
        assert!(!InvoiceStatus::Cancelled.is_open());
    }
}
