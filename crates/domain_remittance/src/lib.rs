//! Remittance Domain
//!
//! Implements the inbound half of the EDI engine: parsing electronic
//! remittance advice (835-equivalent payloads) from the clearinghouse and
//! reconciling it against the practice's claim and invoice ledgers with
//! idempotent payment posting.
//!
//! The processor never owns the ledgers; it reads and writes them through
//! the repository ports in [`ports`], and every transaction it touches ends
//! in an audit record whatever the per-claim outcome mix.

pub mod codes;
pub mod error;
pub mod ledger;
pub mod parser;
pub mod ports;
pub mod processor;
pub mod transaction;

pub use codes::{
    adjustment_group_description, derive_claim_status, status_description, ClaimStatus,
};
pub use error::RemittanceError;
pub use ledger::{Claim, Invoice, InvoiceStatus, PaymentRecord};
pub use parser::parse_remittance;
pub use ports::{ClaimRepository, InvoiceRepository, RemittanceAuditEvent, RemittanceAuditSink};
pub use processor::{ClaimDetail, ClaimOutcome, ProcessingResult, RemittanceProcessor};
pub use transaction::{Adjustment, PaymentMethod, RemittanceClaim, RemittanceTransaction, ServiceLine};
