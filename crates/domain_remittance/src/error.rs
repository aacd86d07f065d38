//! Remittance domain errors

use edi_kernel::PortError;
use thiserror::Error;

/// Errors surfaced by remittance parsing and processing
///
/// Per-claim reconciliation outcomes (claim not found, no open invoice) are
/// business results, not errors; they appear as details in the processing
/// result. This type covers the failures that stop a transaction from being
/// processed at all.
#[derive(Debug, Error)]
pub enum RemittanceError {
    /// The remittance payload could not be parsed into a transaction
    #[error("Malformed remittance payload: {0}")]
    MalformedPayload(String),

    /// A collaborator call failed outside the per-claim loop
    #[error(transparent)]
    Port(#[from] PortError),
}
