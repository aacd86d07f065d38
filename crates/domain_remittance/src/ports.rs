//! Repository and audit ports for remittance processing
//!
//! The processor drives reads and writes against the claim and invoice
//! ledgers exclusively through these traits; adapters live outside the
//! domain. All ports return [`PortError`] so transport faults are
//! classifiable at the processing loop.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use edi_kernel::{DomainPort, InvoiceId, Money, PatientId, PortError, TenantId};
use serde::{Deserialize, Serialize};

use crate::ledger::{Claim, Invoice, PaymentRecord};

/// Read/write access to the claim ledger
#[async_trait]
pub trait ClaimRepository: DomainPort {
    /// Finds a claim by its external claim number within a tenant
    async fn find_by_claim_number(
        &self,
        tenant_id: TenantId,
        claim_number: &str,
    ) -> Result<Option<Claim>, PortError>;

    /// Persists updated claim status and amounts
    async fn update(&self, claim: &Claim) -> Result<(), PortError>;
}

/// Read/write access to the invoice and payment ledger
#[async_trait]
pub trait InvoiceRepository: DomainPort {
    /// Finds the most recent open invoice (sent, partial, or overdue)
    /// for a patient
    async fn find_open_for_patient(
        &self,
        tenant_id: TenantId,
        patient_id: PatientId,
    ) -> Result<Option<Invoice>, PortError>;

    /// Returns true if any payment in the tenant carries a reference
    /// starting with the given prefix
    async fn any_payment_with_reference_prefix(
        &self,
        tenant_id: TenantId,
        reference_prefix: &str,
    ) -> Result<bool, PortError>;

    /// Inserts a payment record
    async fn create_payment(&self, payment: &PaymentRecord) -> Result<(), PortError>;

    /// Sums all payments posted against an invoice
    async fn payment_total_for_invoice(&self, invoice_id: InvoiceId) -> Result<Money, PortError>;

    /// Persists recomputed invoice amounts and status
    async fn update_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;
}

/// One append-only audit record per processed remittance transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceAuditEvent {
    pub tenant_id: TenantId,
    /// User on whose behalf processing ran
    pub user_id: String,
    pub transaction_id: String,
    pub trace_number: String,
    pub payer_name: String,
    pub total_payment: Money,
    pub claims_processed: u32,
    pub payments_posted: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only sink for remittance audit records
#[async_trait]
pub trait RemittanceAuditSink: DomainPort {
    async fn record(&self, event: RemittanceAuditEvent) -> Result<(), PortError>;
}
