//! Prior-Authorization Domain
//!
//! This crate covers the outbound half of dental prior authorization:
//! validating a domain request, assembling it into the hierarchical
//! transaction document the clearinghouse expects, and normalizing the
//! payer's decision back into a domain response.
//!
//! Validation never raises: rule violations come back as a list of
//! [`ValidationError`] values so an upstream form can surface them field by
//! field. [`build`] assumes a request that already validated clean.

pub mod builder;
pub mod codes;
pub mod request;
pub mod response;
pub mod validation;

pub use builder::{build, HierarchicalLevel, LevelContent, LevelType, TransactionDocument};
pub use codes::{map_action_to_status, ActionCode, PriorAuthStatus};
pub use request::{
    AuthorizationDetail, DependentPatient, Payer, PriorAuthorizationRequest, ProcedureLine,
    RequestingProvider, ServiceDate, Submitter, Subscriber,
};
pub use response::{parse_prior_auth_response, PriorAuthorizationResponse};
pub use validation::{validate, ValidationError};
