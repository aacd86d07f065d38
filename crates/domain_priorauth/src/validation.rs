//! Prior-authorization request validation
//!
//! Rules are reported as data, never as errors, so an upstream form can show
//! every problem at once. [`crate::builder::build`] does not re-validate;
//! callers are expected to check the list is empty first.

use chrono::NaiveDate;
use edi_kernel::dental::{CdtCode, SurfaceCode, ToothNumber};

use crate::request::{
    PriorAuthorizationRequest, CERTIFICATION_TYPE_CODES, REQUEST_TYPE_CODES, SERVICE_TYPE_CODES,
};

/// A single rule violation, addressed to a request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `procedure_lines[0].cdt_code`
    pub field: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates a prior-authorization request against submission rules
///
/// Returns an empty list when the request is ready to build.
pub fn validate(request: &PriorAuthorizationRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_submitter(request, &mut errors);
    validate_payer(request, &mut errors);
    validate_provider(request, &mut errors);
    validate_subscriber(request, &mut errors);
    validate_dependent(request, &mut errors);
    validate_authorization(request, &mut errors);
    validate_procedure_lines(request, &mut errors);

    errors
}

fn validate_submitter(request: &PriorAuthorizationRequest, errors: &mut Vec<ValidationError>) {
    let submitter = &request.submitter;
    if submitter.organization_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "submitter.organization_name",
            "Submitter organization name is required",
        ));
    }
    if submitter.npi.as_deref().map_or(true, str::is_empty)
        && submitter.tax_id.as_deref().map_or(true, str::is_empty)
    {
        errors.push(ValidationError::new(
            "submitter",
            "Submitter requires an NPI or a tax id",
        ));
    }
}

fn validate_payer(request: &PriorAuthorizationRequest, errors: &mut Vec<ValidationError>) {
    if request.payer.payer_id.trim().is_empty() {
        errors.push(ValidationError::new(
            "payer.payer_id",
            "Payer id is required",
        ));
    }
    if request.payer.name.trim().is_empty() {
        errors.push(ValidationError::new("payer.name", "Payer name is required"));
    }
}

fn validate_provider(request: &PriorAuthorizationRequest, errors: &mut Vec<ValidationError>) {
    let provider = &request.requesting_provider;
    if provider.npi.trim().is_empty() {
        errors.push(ValidationError::new(
            "requesting_provider.npi",
            "Requesting provider NPI is required",
        ));
    }
    let has_org = provider
        .organization_name
        .as_deref()
        .is_some_and(|n| !n.trim().is_empty());
    let has_last = provider
        .last_name
        .as_deref()
        .is_some_and(|n| !n.trim().is_empty());
    if !has_org && !has_last {
        errors.push(ValidationError::new(
            "requesting_provider",
            "Requesting provider requires an organization name or a last name",
        ));
    }
}

fn validate_subscriber(request: &PriorAuthorizationRequest, errors: &mut Vec<ValidationError>) {
    let subscriber = &request.subscriber;
    if subscriber.member_id.trim().is_empty() {
        errors.push(ValidationError::new(
            "subscriber.member_id",
            "Subscriber member id is required",
        ));
    }
    if subscriber.first_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "subscriber.first_name",
            "Subscriber first name is required",
        ));
    }
    if subscriber.last_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "subscriber.last_name",
            "Subscriber last name is required",
        ));
    }
    if !is_iso_date(&subscriber.date_of_birth) {
        errors.push(ValidationError::new(
            "subscriber.date_of_birth",
            "Subscriber date of birth is required in YYYY-MM-DD format",
        ));
    }
}

fn validate_dependent(request: &PriorAuthorizationRequest, errors: &mut Vec<ValidationError>) {
    let Some(dependent) = &request.dependent else {
        return;
    };
    if dependent.first_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "dependent.first_name",
            "Dependent first name is required",
        ));
    }
    if dependent.last_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "dependent.last_name",
            "Dependent last name is required",
        ));
    }
    if !is_iso_date(&dependent.date_of_birth) {
        errors.push(ValidationError::new(
            "dependent.date_of_birth",
            "Dependent date of birth is required in YYYY-MM-DD format",
        ));
    }
    if dependent.relationship_code.trim().is_empty() {
        errors.push(ValidationError::new(
            "dependent.relationship_code",
            "Dependent relationship code is required",
        ));
    }
}

fn validate_authorization(request: &PriorAuthorizationRequest, errors: &mut Vec<ValidationError>) {
    let auth = &request.authorization;
    if !REQUEST_TYPE_CODES.contains(&auth.request_type_code.as_str()) {
        errors.push(ValidationError::new(
            "authorization.request_type_code",
            format!(
                "Request type code {:?} is not one of {}",
                auth.request_type_code,
                REQUEST_TYPE_CODES.join(", ")
            ),
        ));
    }
    if !CERTIFICATION_TYPE_CODES.contains(&auth.certification_type_code.as_str()) {
        errors.push(ValidationError::new(
            "authorization.certification_type_code",
            format!(
                "Certification type code {:?} is not one of {}",
                auth.certification_type_code,
                CERTIFICATION_TYPE_CODES.join(", ")
            ),
        ));
    }
    if !SERVICE_TYPE_CODES.contains(&auth.service_type_code.as_str()) {
        errors.push(ValidationError::new(
            "authorization.service_type_code",
            format!(
                "Service type code {:?} is not a dental service type ({})",
                auth.service_type_code,
                SERVICE_TYPE_CODES.join(", ")
            ),
        ));
    }
    if let crate::request::ServiceDate::Range { start, end } = &auth.service_date {
        if end < start {
            errors.push(ValidationError::new(
                "authorization.service_date",
                "Service date range ends before it starts",
            ));
        }
    }
}

fn validate_procedure_lines(request: &PriorAuthorizationRequest, errors: &mut Vec<ValidationError>) {
    if request.procedure_lines.is_empty() {
        errors.push(ValidationError::new(
            "procedure_lines",
            "At least one procedure line is required",
        ));
        return;
    }

    for (i, line) in request.procedure_lines.iter().enumerate() {
        let field = |name: &str| format!("procedure_lines[{i}].{name}");

        if !CdtCode::is_valid(&line.cdt_code) {
            errors.push(ValidationError::new(
                field("cdt_code"),
                format!("CDT code {:?} does not match format D####", line.cdt_code),
            ));
        }
        if !line.fee.is_positive() {
            errors.push(ValidationError::new(
                field("fee"),
                "Procedure fee must be greater than zero",
            ));
        }
        if line.quantity == 0 {
            errors.push(ValidationError::new(
                field("quantity"),
                "Procedure quantity must be greater than zero",
            ));
        }
        for tooth in &line.tooth_numbers {
            if !ToothNumber::is_valid(tooth) {
                errors.push(ValidationError::new(
                    field("tooth_numbers"),
                    format!("Tooth number {tooth:?} must be 1-32 or A-T"),
                ));
            }
        }
        for surface in &line.surfaces {
            if surface.parse::<SurfaceCode>().is_err() {
                errors.push(ValidationError::new(
                    field("surfaces"),
                    format!("Surface code {surface:?} must be one of M, O, D, B, L, I, F"),
                ));
            }
        }
    }
}

fn is_iso_date(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}
