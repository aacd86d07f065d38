//! Eligibility Domain
//!
//! Models dental benefit inquiries and answers, parses the clearinghouse's
//! benefit payloads, and drives the eligibility round-trip through the
//! [`EligibilityClient`]. The client is constructed with an explicit
//! operating mode; a sandbox client or a failed live call both produce a
//! degraded outcome that is visibly distinct from a verified answer.

pub mod benefits;
pub mod client;
pub mod parser;

pub use benefits::{CoverageLevels, DentalBenefits, EligibilityRequest};
pub use client::{sandbox_benefits, DegradedReason, EligibilityClient, EligibilityOutcome};
pub use parser::parse_eligibility_response;
