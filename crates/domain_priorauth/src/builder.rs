//! Transaction document assembly
//!
//! Builds the hierarchical document a clearinghouse expects for a dental
//! prior-authorization request: payer, requesting provider, subscriber,
//! optional dependent, a patient event carrying the authorization metadata,
//! and one service level per procedure line. Each level carries a locally
//! unique sequence id and a parent link.
//!
//! `build` assumes the request already passed [`crate::validation::validate`];
//! it does not re-check the rules.

use chrono::{DateTime, NaiveDate, Utc};
use edi_kernel::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::{PriorAuthorizationRequest, ServiceDate};

/// The kind of hierarchical level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelType {
    Payer,
    Provider,
    Subscriber,
    Dependent,
    PatientEvent,
    Service,
}

/// Payload carried by a hierarchical level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum LevelContent {
    Payer {
        payer_id: String,
        name: String,
    },
    Provider {
        npi: String,
        organization_name: Option<String>,
        last_name: Option<String>,
        first_name: Option<String>,
        taxonomy_code: Option<String>,
    },
    Subscriber {
        member_id: String,
        last_name: String,
        first_name: String,
        date_of_birth: String,
        group_number: Option<String>,
    },
    Dependent {
        last_name: String,
        first_name: String,
        date_of_birth: String,
        relationship_code: String,
    },
    PatientEvent {
        request_type_code: String,
        certification_type_code: String,
        service_type_code: String,
        level_of_service_code: Option<String>,
        service_date_start: NaiveDate,
        service_date_end: Option<NaiveDate>,
        diagnosis_codes: Vec<String>,
        narrative: Option<String>,
    },
    Service {
        cdt_code: String,
        fee: Money,
        quantity: u32,
        tooth_numbers: Vec<String>,
        surfaces: Vec<String>,
        oral_cavity_code: Option<String>,
        attachment_control_numbers: Vec<String>,
    },
}

/// One level in the hierarchical document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchicalLevel {
    /// Sequence id, unique within the document, assigned in build order
    pub id: u32,
    /// Parent level id; the payer level has no parent
    pub parent_id: Option<u32>,
    pub level_type: LevelType,
    pub content: LevelContent,
}

/// A built prior-authorization transaction, ready for wire serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDocument {
    /// Submitter control number, unique per build
    pub control_number: String,
    /// Submitter organization name
    pub submitter_name: String,
    /// Submitter NPI or tax id
    pub submitter_identifier: String,
    /// Build timestamp
    pub created_at: DateTime<Utc>,
    /// Approximate segment count for the trailer; the exact count depends
    /// on wire serialization, which is not modeled here
    pub segment_estimate: u32,
    pub levels: Vec<HierarchicalLevel>,
}

impl TransactionDocument {
    /// Returns the levels of a given type, in document order
    pub fn levels_of(&self, level_type: LevelType) -> impl Iterator<Item = &HierarchicalLevel> {
        self.levels.iter().filter(move |l| l.level_type == level_type)
    }
}

/// Assembles the hierarchical transaction document
pub fn build(request: &PriorAuthorizationRequest) -> TransactionDocument {
    let now = Utc::now();
    let mut levels = Vec::new();
    let mut next_id = 0u32;
    let mut push = |parent_id: Option<u32>,
                    level_type: LevelType,
                    content: LevelContent,
                    levels: &mut Vec<HierarchicalLevel>| {
        next_id += 1;
        levels.push(HierarchicalLevel {
            id: next_id,
            parent_id,
            level_type,
            content,
        });
        next_id
    };

    let payer_id = push(
        None,
        LevelType::Payer,
        LevelContent::Payer {
            payer_id: request.payer.payer_id.clone(),
            name: request.payer.name.clone(),
        },
        &mut levels,
    );

    let provider = &request.requesting_provider;
    let provider_id = push(
        Some(payer_id),
        LevelType::Provider,
        LevelContent::Provider {
            npi: provider.npi.clone(),
            organization_name: provider.organization_name.clone(),
            last_name: provider.last_name.clone(),
            first_name: provider.first_name.clone(),
            taxonomy_code: provider.taxonomy_code.clone(),
        },
        &mut levels,
    );

    let subscriber = &request.subscriber;
    let subscriber_id = push(
        Some(provider_id),
        LevelType::Subscriber,
        LevelContent::Subscriber {
            member_id: subscriber.member_id.clone(),
            last_name: subscriber.last_name.clone(),
            first_name: subscriber.first_name.clone(),
            date_of_birth: subscriber.date_of_birth.clone(),
            group_number: subscriber.group_number.clone(),
        },
        &mut levels,
    );

    // The patient event hangs off the dependent when one is present,
    // otherwise off the subscriber
    let patient_parent = match &request.dependent {
        Some(dependent) => push(
            Some(subscriber_id),
            LevelType::Dependent,
            LevelContent::Dependent {
                last_name: dependent.last_name.clone(),
                first_name: dependent.first_name.clone(),
                date_of_birth: dependent.date_of_birth.clone(),
                relationship_code: dependent.relationship_code.clone(),
            },
            &mut levels,
        ),
        None => subscriber_id,
    };

    let auth = &request.authorization;
    let (service_date_start, service_date_end) = match auth.service_date {
        ServiceDate::Single { date } => (date, None),
        ServiceDate::Range { start, end } => (start, Some(end)),
    };
    let event_id = push(
        Some(patient_parent),
        LevelType::PatientEvent,
        LevelContent::PatientEvent {
            request_type_code: auth.request_type_code.clone(),
            certification_type_code: auth.certification_type_code.clone(),
            service_type_code: auth.service_type_code.clone(),
            level_of_service_code: auth.level_of_service_code.clone(),
            service_date_start,
            service_date_end,
            diagnosis_codes: auth.diagnosis_codes.clone(),
            narrative: request.narrative.clone(),
        },
        &mut levels,
    );

    let attachment_control_numbers: Vec<String> = request
        .attachments
        .iter()
        .map(|a| a.control_number.clone())
        .collect();
    for line in &request.procedure_lines {
        push(
            Some(event_id),
            LevelType::Service,
            LevelContent::Service {
                cdt_code: line.cdt_code.clone(),
                fee: line.fee,
                quantity: line.quantity,
                tooth_numbers: line.tooth_numbers.clone(),
                surfaces: line.surfaces.clone(),
                oral_cavity_code: line.oral_cavity_code.clone(),
                attachment_control_numbers: attachment_control_numbers.clone(),
            },
            &mut levels,
        );
    }

    TransactionDocument {
        control_number: generate_control_number(now),
        submitter_name: request.submitter.organization_name.clone(),
        submitter_identifier: request
            .submitter
            .npi
            .clone()
            .or_else(|| request.submitter.tax_id.clone())
            .unwrap_or_default(),
        created_at: now,
        segment_estimate: estimate_segments(request),
        levels,
    }
}

/// Generates a control number from the build time plus a random suffix
///
/// The suffix guards against collisions when two documents build within the
/// same second.
fn generate_control_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().as_u128() % 10_000;
    format!("{}{:04}", now.format("%Y%m%d%H%M%S"), suffix)
}

/// Approximates the wire segment count for the trailer
///
/// Counts the segments each level contributes once serialized: envelope
/// header/trailer pairs, one HL-equivalent per level, name/reference
/// segments, and per-line tooth and attachment detail.
fn estimate_segments(request: &PriorAuthorizationRequest) -> u32 {
    // Envelope, submitter, and receiver segments
    let mut count = 6u32;
    // Payer, provider, subscriber: level marker + name segment each
    count += 6;
    if request.dependent.is_some() {
        count += 2;
    }
    // Patient event: level marker, authorization detail, service date
    count += 3;
    count += request.authorization.diagnosis_codes.len() as u32;
    for line in &request.procedure_lines {
        // Service line marker plus procedure segment
        count += 2;
        if !line.tooth_numbers.is_empty() {
            count += 1;
        }
        if !line.surfaces.is_empty() {
            count += 1;
        }
    }
    count += request.attachments.len() as u32;
    if request.narrative.is_some() {
        count += 1;
    }
    count
}
