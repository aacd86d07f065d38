//! In-memory repository adapters
//!
//! Clone-able handles over shared state, so a test can hand a clone to the
//! processor and keep one for assertions.

use async_trait::async_trait;
use edi_kernel::{Currency, DomainPort, InvoiceId, Money, PatientId, PortError, TenantId};
use std::sync::{Arc, Mutex};

use domain_remittance::ledger::{Claim, Invoice, PaymentRecord};
use domain_remittance::ports::{
    ClaimRepository, InvoiceRepository, RemittanceAuditEvent, RemittanceAuditSink,
};

/// In-memory claim ledger
#[derive(Clone, Default)]
pub struct InMemoryClaimRepository {
    claims: Arc<Mutex<Vec<Claim>>>,
}

impl InMemoryClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored claim
    pub fn insert(&self, claim: Claim) {
        self.claims.lock().expect("claim lock").push(claim);
    }

    /// Returns a snapshot of the stored claims
    pub fn all(&self) -> Vec<Claim> {
        self.claims.lock().expect("claim lock").clone()
    }
}

impl DomainPort for InMemoryClaimRepository {}

#[async_trait]
impl ClaimRepository for InMemoryClaimRepository {
    async fn find_by_claim_number(
        &self,
        tenant_id: TenantId,
        claim_number: &str,
    ) -> Result<Option<Claim>, PortError> {
        Ok(self
            .claims
            .lock()
            .expect("claim lock")
            .iter()
            .find(|c| c.tenant_id == tenant_id && c.claim_number == claim_number)
            .cloned())
    }

    async fn update(&self, claim: &Claim) -> Result<(), PortError> {
        let mut claims = self.claims.lock().expect("claim lock");
        match claims.iter_mut().find(|c| c.id == claim.id) {
            Some(stored) => {
                *stored = claim.clone();
                Ok(())
            }
            None => Err(PortError::not_found("Claim", claim.id)),
        }
    }
}

/// In-memory invoice and payment ledger
#[derive(Clone, Default)]
pub struct InMemoryInvoiceRepository {
    invoices: Arc<Mutex<Vec<Invoice>>>,
    payments: Arc<Mutex<Vec<PaymentRecord>>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an invoice
    pub fn insert(&self, invoice: Invoice) {
        self.invoices.lock().expect("invoice lock").push(invoice);
    }

    /// Returns a snapshot of the stored invoices
    pub fn all_invoices(&self) -> Vec<Invoice> {
        self.invoices.lock().expect("invoice lock").clone()
    }

    /// Returns a snapshot of the posted payments
    pub fn all_payments(&self) -> Vec<PaymentRecord> {
        self.payments.lock().expect("payment lock").clone()
    }
}

impl DomainPort for InMemoryInvoiceRepository {}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_open_for_patient(
        &self,
        tenant_id: TenantId,
        patient_id: PatientId,
    ) -> Result<Option<Invoice>, PortError> {
        Ok(self
            .invoices
            .lock()
            .expect("invoice lock")
            .iter()
            .filter(|i| i.tenant_id == tenant_id && i.patient_id == patient_id && i.is_open())
            .max_by_key(|i| i.updated_at)
            .cloned())
    }

    async fn any_payment_with_reference_prefix(
        &self,
        tenant_id: TenantId,
        reference_prefix: &str,
    ) -> Result<bool, PortError> {
        Ok(self
            .payments
            .lock()
            .expect("payment lock")
            .iter()
            .any(|p| p.tenant_id == tenant_id && p.reference.starts_with(reference_prefix)))
    }

    async fn create_payment(&self, payment: &PaymentRecord) -> Result<(), PortError> {
        self.payments
            .lock()
            .expect("payment lock")
            .push(payment.clone());
        Ok(())
    }

    async fn payment_total_for_invoice(&self, invoice_id: InvoiceId) -> Result<Money, PortError> {
        Ok(self
            .payments
            .lock()
            .expect("payment lock")
            .iter()
            .filter(|p| p.invoice_id == invoice_id)
            .fold(Money::zero(Currency::Usd), |acc, p| acc + p.amount))
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        let mut invoices = self.invoices.lock().expect("invoice lock");
        match invoices.iter_mut().find(|i| i.id == invoice.id) {
            Some(stored) => {
                *stored = invoice.clone();
                Ok(())
            }
            None => Err(PortError::not_found("Invoice", invoice.id)),
        }
    }
}

/// In-memory append-only audit sink
#[derive(Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<RemittanceAuditEvent>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events
    pub fn events(&self) -> Vec<RemittanceAuditEvent> {
        self.events.lock().expect("audit lock").clone()
    }
}

impl DomainPort for MemoryAuditSink {}

#[async_trait]
impl RemittanceAuditSink for MemoryAuditSink {
    async fn record(&self, event: RemittanceAuditEvent) -> Result<(), PortError> {
        self.events.lock().expect("audit lock").push(event);
        Ok(())
    }
}
