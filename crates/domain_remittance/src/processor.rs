//! Remittance processing
//!
//! The processor reconciles electronic remittance advice against the claim
//! and invoice ledgers. Claims within one transaction are handled strictly
//! in sequence: each posting recomputes its invoice's balance from the full
//! payment history, so concurrent postings to the same invoice inside one
//! transaction would race.
//!
//! Idempotency: a transaction is processed at most once per check/EFT trace
//! number per tenant. The gate is a read-then-act check against the payment
//! ledger; it is not atomic under concurrent invocation of the same
//! transaction id, which the platform closes with a storage-level uniqueness
//! constraint on (tenant, reference).

use chrono::{DateTime, Utc};
use edi_kernel::{ClaimId, ClearinghouseApi, Money, PortError, TenantId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codes::{adjustment_group_description, derive_claim_status, status_description};
use crate::error::RemittanceError;
use crate::ledger::PaymentRecord;
use crate::parser::parse_remittance;
use crate::ports::{ClaimRepository, InvoiceRepository, RemittanceAuditEvent, RemittanceAuditSink};
use crate::transaction::{RemittanceClaim, RemittanceTransaction};

/// Outcome of reconciling one remittance claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOutcome {
    /// Payment posted against an open invoice
    Posted,
    /// Payment received but not fully reconciled; needs manual follow-up
    Partial,
    /// Nothing to post
    Skipped,
    /// Reconciliation of this claim failed
    Error,
}

/// Per-claim reconciliation detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDetail {
    /// Stored claim id, when one matched
    pub claim_id: Option<ClaimId>,
    pub patient_control_number: String,
    pub outcome: ClaimOutcome,
    pub payment_amount: Money,
    /// Human-readable reason for anything other than a clean posting
    pub reason: Option<String>,
}

/// Per-transaction processing summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub transaction_id: String,
    pub trace_number: String,
    pub claims_processed: u32,
    pub payments_posted: u32,
    pub errors: Vec<String>,
    pub details: Vec<ClaimDetail>,
}

/// Reconciles remittance transactions against the claim and invoice ledgers
pub struct RemittanceProcessor<A, C, I, S> {
    api: A,
    claims: C,
    invoices: I,
    audit: S,
}

impl<A, C, I, S> RemittanceProcessor<A, C, I, S>
where
    A: ClearinghouseApi,
    C: ClaimRepository,
    I: InvoiceRepository,
    S: RemittanceAuditSink,
{
    pub fn new(api: A, claims: C, invoices: I, audit: S) -> Self {
        Self {
            api,
            claims,
            invoices,
            audit,
        }
    }

    /// Polls the clearinghouse feed for inbound remittance transactions
    ///
    /// Individual fetch or parse failures are logged and skipped; they do
    /// not abort the poll.
    pub async fn poll_for_new(
        &self,
        tenant_id: TenantId,
        since: DateTime<Utc>,
    ) -> Result<Vec<RemittanceTransaction>, RemittanceError> {
        let envelopes = self.api.list_transactions(since).await?;
        let mut transactions = Vec::new();

        for envelope in envelopes
            .iter()
            .filter(|e| e.is_inbound_remittance())
        {
            match self.api.fetch_remittance(&envelope.transaction_id).await {
                Ok(raw) => match parse_remittance(&envelope.transaction_id, &raw) {
                    Ok(transaction) => transactions.push(transaction),
                    Err(error) => {
                        warn!(
                            tenant = %tenant_id,
                            transaction_id = %envelope.transaction_id,
                            %error,
                            "skipping unparseable remittance"
                        );
                    }
                },
                Err(error) => {
                    warn!(
                        tenant = %tenant_id,
                        transaction_id = %envelope.transaction_id,
                        %error,
                        "skipping remittance that failed to fetch"
                    );
                }
            }
        }

        info!(
            tenant = %tenant_id,
            count = transactions.len(),
            "polled clearinghouse for new remittances"
        );
        Ok(transactions)
    }

    /// Fetches and processes one remittance transaction
    pub async fn process(
        &self,
        tenant_id: TenantId,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<ProcessingResult, RemittanceError> {
        let raw = self.api.fetch_remittance(transaction_id).await?;
        let transaction = parse_remittance(transaction_id, &raw)?;
        self.process_transaction(tenant_id, user_id, &transaction)
            .await
    }

    /// Processes an already-fetched remittance transaction
    pub async fn process_transaction(
        &self,
        tenant_id: TenantId,
        user_id: &str,
        transaction: &RemittanceTransaction,
    ) -> Result<ProcessingResult, RemittanceError> {
        // Trailing separator keeps the gate exact: references are
        // ERA-{trace}-{claim}, and one trace must never match another that
        // merely starts with it
        let trace_reference = format!("ERA-{}-", transaction.trace_number);

        // Idempotency gate: a payment referencing this trace number means
        // the transaction was already posted. Read-then-act; see module docs.
        if self
            .invoices
            .any_payment_with_reference_prefix(tenant_id, &trace_reference)
            .await?
        {
            info!(
                tenant = %tenant_id,
                trace_number = %transaction.trace_number,
                "remittance already processed, skipping"
            );
            return Ok(ProcessingResult {
                transaction_id: transaction.transaction_id.clone(),
                trace_number: transaction.trace_number.clone(),
                claims_processed: 0,
                payments_posted: 0,
                errors: vec![format!(
                    "Remittance with trace number {} was already processed",
                    transaction.trace_number
                )],
                details: Vec::new(),
            });
        }

        let mut result = ProcessingResult {
            transaction_id: transaction.transaction_id.clone(),
            trace_number: transaction.trace_number.clone(),
            claims_processed: 0,
            payments_posted: 0,
            errors: Vec::new(),
            details: Vec::new(),
        };

        // Sequential on purpose: each posting recomputes its invoice from
        // the full payment history
        for claim in &transaction.claims {
            result.claims_processed += 1;
            match self
                .reconcile_claim(tenant_id, user_id, transaction, claim)
                .await
            {
                Ok(detail) => {
                    if detail.outcome == ClaimOutcome::Posted {
                        result.payments_posted += 1;
                    }
                    result.details.push(detail);
                }
                Err(error) => {
                    warn!(
                        tenant = %tenant_id,
                        patient_control_number = %claim.patient_control_number,
                        %error,
                        "claim reconciliation failed"
                    );
                    result.errors.push(format!(
                        "Claim {}: {}",
                        claim.patient_control_number, error
                    ));
                    result.details.push(ClaimDetail {
                        claim_id: None,
                        patient_control_number: claim.patient_control_number.clone(),
                        outcome: ClaimOutcome::Error,
                        payment_amount: claim.payment,
                        reason: Some(error.to_string()),
                    });
                }
            }
        }

        let event = RemittanceAuditEvent {
            tenant_id,
            user_id: user_id.to_string(),
            transaction_id: transaction.transaction_id.clone(),
            trace_number: transaction.trace_number.clone(),
            payer_name: transaction.payer_name.clone(),
            total_payment: transaction.total_payment,
            claims_processed: result.claims_processed,
            payments_posted: result.payments_posted,
            recorded_at: Utc::now(),
        };
        if let Err(error) = self.audit.record(event).await {
            warn!(tenant = %tenant_id, %error, "failed to append remittance audit record");
        }

        info!(
            tenant = %tenant_id,
            trace_number = %transaction.trace_number,
            claims_processed = result.claims_processed,
            payments_posted = result.payments_posted,
            errors = result.errors.len(),
            "processed remittance transaction"
        );
        Ok(result)
    }

    /// Reconciles one remittance claim against the ledgers
    async fn reconcile_claim(
        &self,
        tenant_id: TenantId,
        user_id: &str,
        transaction: &RemittanceTransaction,
        remit: &RemittanceClaim,
    ) -> Result<ClaimDetail, PortError> {
        let Some(mut claim) = self
            .claims
            .find_by_claim_number(tenant_id, &remit.patient_control_number)
            .await?
        else {
            return Ok(ClaimDetail {
                claim_id: None,
                patient_control_number: remit.patient_control_number.clone(),
                outcome: ClaimOutcome::Skipped,
                payment_amount: remit.payment,
                reason: Some("Claim not found in system".to_string()),
            });
        };

        let invoice = self
            .invoices
            .find_open_for_patient(tenant_id, claim.patient_id)
            .await?;

        // Update the claim from the adjudication regardless of whether a
        // payment gets posted
        claim.status = derive_claim_status(&remit.status_code, remit.total_charge, remit.payment);
        claim.allowed_amount = Some(remit.payment + remit.adjustment_total());
        claim.paid_amount = Some(remit.payment);
        claim.patient_responsibility = Some(remit.patient_responsibility);
        claim.check_number = Some(transaction.trace_number.clone());
        claim.payment_date = transaction.payment_date;
        claim.era_transaction_id = Some(transaction.transaction_id.clone());
        claim.updated_at = Utc::now();
        self.claims.update(&claim).await?;

        for adjustment in &remit.adjustments {
            debug!(
                tenant = %tenant_id,
                claim_number = %claim.claim_number,
                group = %adjustment.group_code,
                group_description = adjustment_group_description(&adjustment.group_code),
                reason_code = %adjustment.reason_code,
                amount = %adjustment.amount,
                "claim adjustment"
            );
        }

        // Line totals are reported by the payer but not enforced; log the
        // reconciliation gap and move on
        if !remit.service_lines.is_empty()
            && remit.service_line_paid_total() != remit.payment
        {
            warn!(
                tenant = %tenant_id,
                claim_number = %claim.claim_number,
                line_total = %remit.service_line_paid_total(),
                claim_payment = %remit.payment,
                "service line paid total does not match claim payment"
            );
        }

        if remit.payment.is_positive() {
            let Some(mut invoice) = invoice else {
                // A real payment with nowhere to post must stay visible for
                // manual follow-up
                return Ok(ClaimDetail {
                    claim_id: Some(claim.id),
                    patient_control_number: remit.patient_control_number.clone(),
                    outcome: ClaimOutcome::Partial,
                    payment_amount: remit.payment,
                    reason: Some("No matching invoice found".to_string()),
                });
            };

            let payment = PaymentRecord::new(
                tenant_id,
                invoice.id,
                remit.payment,
                format!(
                    "ERA-{}-{}",
                    transaction.trace_number, remit.patient_control_number
                ),
                user_id,
            );
            self.invoices.create_payment(&payment).await?;

            // Recompute from the full payment history, not incrementally
            let total_paid = self.invoices.payment_total_for_invoice(invoice.id).await?;
            invoice.apply_payment_total(total_paid);
            self.invoices.update_invoice(&invoice).await?;

            Ok(ClaimDetail {
                claim_id: Some(claim.id),
                patient_control_number: remit.patient_control_number.clone(),
                outcome: ClaimOutcome::Posted,
                payment_amount: remit.payment,
                reason: None,
            })
        } else {
            Ok(ClaimDetail {
                claim_id: Some(claim.id),
                patient_control_number: remit.patient_control_number.clone(),
                outcome: ClaimOutcome::Skipped,
                payment_amount: remit.payment,
                reason: Some(status_description(&remit.status_code).to_string()),
            })
        }
    }
}
