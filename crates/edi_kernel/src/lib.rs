//! Shared kernel for the dental EDI transaction engine
//!
//! Provides the foundational types used across the EDI domain crates:
//! precise monetary arithmetic, strongly-typed identifiers, dental code
//! vocabularies, and the port abstractions through which the engine talks
//! to clearinghouses and ledgers.

pub mod dental;
pub mod identifiers;
pub mod json;
pub mod money;
pub mod ports;

pub use dental::{CdtCode, CdtCodeError, OralCavityArea, ProcedureClass, SurfaceCode, ToothNumber};
pub use identifiers::{
    AuditEventId, ClaimId, InvoiceId, PatientId, PaymentId, ProviderId, TenantId, TransactionId,
};
pub use money::{Currency, Money, MoneyError};
pub use ports::{
    ClearinghouseApi, ClearinghouseMode, DomainPort, PortError, TransactionDirection,
    TransactionEnvelope,
};
