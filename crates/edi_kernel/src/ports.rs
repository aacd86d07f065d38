//! Ports for external collaborators
//!
//! The EDI engine never owns persistence or transport. Domain crates define
//! port traits over this module's error taxonomy; adapters (clearinghouse
//! HTTP client, ledger repositories, audit sinks) implement them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// A unified error for collaborator faults so callers can classify
/// transport failures without knowing which adapter is behind the port.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// Authentication or authorization failed
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Rate limit exceeded for external API
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The external system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    /// A payload could not be transformed into domain data
    #[error("Transformation error: {message}")]
    Transformation { message: String },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker to ensure they are thread-safe
/// and usable in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Operating mode for clearinghouse-facing clients
///
/// Derived once at construction from configuration; a client never flips
/// mode mid-call. Sandbox clients answer from canned data and say so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearinghouseMode {
    Live,
    Sandbox,
}

/// Direction of a clearinghouse transaction relative to the practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    Inbound,
    Outbound,
}

/// Envelope metadata for a transaction in the clearinghouse feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// Clearinghouse-assigned transaction identifier
    pub transaction_id: String,
    /// Direction relative to the practice
    pub direction: TransactionDirection,
    /// Transaction class, e.g. "835" for remittance or "271" for eligibility
    pub transaction_class: String,
    /// When the clearinghouse received the transaction
    pub received_at: DateTime<Utc>,
}

impl TransactionEnvelope {
    /// Returns true for an inbound electronic remittance advice
    pub fn is_inbound_remittance(&self) -> bool {
        self.direction == TransactionDirection::Inbound && self.transaction_class == "835"
    }
}

/// Port over the clearinghouse HTTP surface
///
/// Payloads cross this boundary as JSON values; the domain parsers own the
/// normalization into typed structs.
#[async_trait]
pub trait ClearinghouseApi: Send + Sync {
    /// Submits an eligibility inquiry and returns the raw benefit payload
    async fn check_eligibility(&self, payload: Value) -> Result<Value, PortError>;

    /// Lists transaction envelopes received since the given watermark
    async fn list_transactions(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransactionEnvelope>, PortError>;

    /// Fetches the full remittance payload for a transaction
    async fn fetch_remittance(&self, transaction_id: &str) -> Result<Value, PortError>;

    /// Queries adjudication status for a submitted claim
    async fn claim_status(
        &self,
        claim_control_number: &str,
        payer_id: &str,
    ) -> Result<Value, PortError>;
}
