//! Prior-authorization request model
//!
//! The request mirrors what a practice-management workflow collects before
//! asking a payer to authorize treatment. Code fields arrive as strings from
//! the form layer and are checked by [`crate::validation::validate`], which
//! keeps rule violations reportable instead of unrepresentable.

use chrono::NaiveDate;
use edi_kernel::Money;
use serde::{Deserialize, Serialize};

/// Request type codes accepted on a dental prior authorization
pub const REQUEST_TYPE_CODES: &[&str] = &["HS", "AR", "SC"];

/// Certification type codes: initial, renewal, revised, appeal
pub const CERTIFICATION_TYPE_CODES: &[&str] = &["I", "R", "E", "A"];

/// Service type codes for dental care categories
pub const SERVICE_TYPE_CODES: &[&str] = &["35", "36", "37", "38"];

/// The organization submitting the transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submitter {
    /// Organization name
    pub organization_name: String,
    /// National Provider Identifier
    pub npi: Option<String>,
    /// Federal tax id, used when the submitter has no NPI
    pub tax_id: Option<String>,
    /// Contact name for payer follow-up
    pub contact_name: Option<String>,
    /// Contact phone
    pub contact_phone: Option<String>,
}

/// The payer the authorization is requested from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payer {
    /// Payer identifier as registered with the clearinghouse
    pub payer_id: String,
    /// Payer name
    pub name: String,
}

/// The provider requesting authorization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestingProvider {
    /// National Provider Identifier
    pub npi: String,
    /// Organization name, for group practices
    pub organization_name: Option<String>,
    /// Individual first name
    pub first_name: Option<String>,
    /// Individual last name
    pub last_name: Option<String>,
    /// Taxonomy code describing the provider specialty
    pub taxonomy_code: Option<String>,
}

/// The subscriber holding the policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    /// Member id on the insurance card
    pub member_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,
    /// Gender code, if captured
    pub gender_code: Option<String>,
    /// Group number, if the plan is employer-sponsored
    pub group_number: Option<String>,
}

/// A dependent patient, when the patient is not the subscriber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentPatient {
    pub first_name: String,
    pub last_name: String,
    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,
    /// Relationship to the subscriber (e.g. "01" spouse, "19" child)
    pub relationship_code: String,
    pub gender_code: Option<String>,
}

/// Date or date range the requested services fall in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceDate {
    Single { date: NaiveDate },
    Range { start: NaiveDate, end: NaiveDate },
}

/// Authorization metadata for the patient event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationDetail {
    /// Request type code, one of [`REQUEST_TYPE_CODES`]
    pub request_type_code: String,
    /// Certification type code, one of [`CERTIFICATION_TYPE_CODES`]
    pub certification_type_code: String,
    /// Service type code, one of [`SERVICE_TYPE_CODES`]
    pub service_type_code: String,
    /// Level of service code, when expedited handling is requested
    pub level_of_service_code: Option<String>,
    /// Date or range the services are planned for
    pub service_date: ServiceDate,
    /// ICD-10 diagnosis codes supporting the request
    pub diagnosis_codes: Vec<String>,
}

/// One requested procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureLine {
    /// CDT procedure code, format `D####`
    pub cdt_code: String,
    /// Billed fee for the line
    pub fee: Money,
    /// Units requested
    pub quantity: u32,
    /// Tooth designations, 1-32 or A-T
    pub tooth_numbers: Vec<String>,
    /// Tooth surface codes (M, O, D, B, L, I, F)
    pub surfaces: Vec<String>,
    /// Oral cavity area code for arch/quadrant procedures
    pub oral_cavity_code: Option<String>,
}

/// Reference to a clinical attachment sent alongside the request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Report type code (e.g. "DA" dental models, "RR" radiology report)
    pub report_type_code: String,
    /// Transmission code describing how the attachment is delivered
    pub transmission_code: String,
    /// Attachment control number echoed by the payer
    pub control_number: String,
}

/// A complete prior-authorization request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorAuthorizationRequest {
    pub submitter: Submitter,
    pub payer: Payer,
    pub requesting_provider: RequestingProvider,
    pub subscriber: Subscriber,
    /// Present when the patient is a dependent rather than the subscriber
    pub dependent: Option<DependentPatient>,
    pub authorization: AuthorizationDetail,
    /// At least one line is required
    pub procedure_lines: Vec<ProcedureLine>,
    pub attachments: Vec<Attachment>,
    /// Free-text clinical narrative
    pub narrative: Option<String>,
}
