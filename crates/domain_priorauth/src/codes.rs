//! Action-code tables for prior-authorization decisions
//!
//! Payers answer with an action code; the platform tracks its own status
//! vocabulary. The mapping is total: unrecognized codes land on `Pending`
//! rather than failing, because a pended request is the safe assumption.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal prior-authorization status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorAuthStatus {
    Approved,
    PartiallyApproved,
    Denied,
    PendingInfo,
    Cancelled,
    Pending,
    Submitted,
    NotRequired,
}

impl fmt::Display for PriorAuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriorAuthStatus::Approved => "approved",
            PriorAuthStatus::PartiallyApproved => "partially_approved",
            PriorAuthStatus::Denied => "denied",
            PriorAuthStatus::PendingInfo => "pending_info",
            PriorAuthStatus::Cancelled => "cancelled",
            PriorAuthStatus::Pending => "pending",
            PriorAuthStatus::Submitted => "submitted",
            PriorAuthStatus::NotRequired => "not_required",
        };
        write!(f, "{label}")
    }
}

/// Known payer action codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCode {
    /// A1 - certified in total
    CertifiedInTotal,
    /// A2 - certified, partial
    CertifiedPartial,
    /// A3 - not certified
    NotCertified,
    /// A4 - pended
    Pended,
    /// A6 - modified
    Modified,
    /// C - cancelled
    Cancelled,
    /// CT - contact payer for additional information
    ContactPayer,
    /// NA - no action required
    NoActionRequired,
    /// S - submitted, awaiting adjudication
    Submitted,
    /// P - pending
    Pending,
    /// D - denied
    Denied,
}

impl ActionCode {
    /// Looks up a known action code; `None` for anything unrecognized
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A1" => Some(ActionCode::CertifiedInTotal),
            "A2" => Some(ActionCode::CertifiedPartial),
            "A3" => Some(ActionCode::NotCertified),
            "A4" => Some(ActionCode::Pended),
            "A6" => Some(ActionCode::Modified),
            "C" => Some(ActionCode::Cancelled),
            "CT" => Some(ActionCode::ContactPayer),
            "NA" => Some(ActionCode::NoActionRequired),
            "S" => Some(ActionCode::Submitted),
            "P" => Some(ActionCode::Pending),
            "D" => Some(ActionCode::Denied),
            _ => None,
        }
    }

    /// Returns the platform status this action code resolves to
    pub fn status(&self) -> PriorAuthStatus {
        match self {
            ActionCode::CertifiedInTotal => PriorAuthStatus::Approved,
            ActionCode::CertifiedPartial => PriorAuthStatus::PartiallyApproved,
            ActionCode::Modified => PriorAuthStatus::PartiallyApproved,
            ActionCode::NotCertified => PriorAuthStatus::Denied,
            ActionCode::Denied => PriorAuthStatus::Denied,
            ActionCode::Pended => PriorAuthStatus::Pending,
            ActionCode::Pending => PriorAuthStatus::Pending,
            ActionCode::ContactPayer => PriorAuthStatus::PendingInfo,
            ActionCode::Cancelled => PriorAuthStatus::Cancelled,
            ActionCode::Submitted => PriorAuthStatus::Submitted,
            ActionCode::NoActionRequired => PriorAuthStatus::NotRequired,
        }
    }
}

/// Maps a raw action code to a platform status
///
/// Total over all inputs: unknown codes map to [`PriorAuthStatus::Pending`].
pub fn map_action_to_status(code: &str) -> PriorAuthStatus {
    ActionCode::from_code(code)
        .map(|c| c.status())
        .unwrap_or(PriorAuthStatus::Pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_known_codes_map() {
        let table = [
            ("A1", PriorAuthStatus::Approved),
            ("A2", PriorAuthStatus::PartiallyApproved),
            ("A3", PriorAuthStatus::Denied),
            ("A4", PriorAuthStatus::Pending),
            ("A6", PriorAuthStatus::PartiallyApproved),
            ("C", PriorAuthStatus::Cancelled),
            ("CT", PriorAuthStatus::PendingInfo),
            ("NA", PriorAuthStatus::NotRequired),
            ("S", PriorAuthStatus::Submitted),
            ("P", PriorAuthStatus::Pending),
            ("D", PriorAuthStatus::Denied),
        ];
        for (code, expected) in table {
            assert_eq!(map_action_to_status(code), expected, "code {code}");
        }
    }

    #[test]
    fn test_unknown_code_defaults_to_pending() {
        assert_eq!(map_action_to_status("ZZ"), PriorAuthStatus::Pending);
        assert_eq!(map_action_to_status(""), PriorAuthStatus::Pending);
    }
}
