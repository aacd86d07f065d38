//! Shared test utilities for the EDI engine test suite
//!
//! In-memory implementations of the remittance repository ports, plus
//! fixture builders for requests, ledgers, and remittance payloads.

pub mod fixtures;
pub mod repositories;

pub use fixtures::{
    open_invoice, remittance_claim_payload, remittance_payload, stored_claim,
    valid_prior_auth_request,
};
pub use repositories::{InMemoryClaimRepository, InMemoryInvoiceRepository, MemoryAuditSink};
