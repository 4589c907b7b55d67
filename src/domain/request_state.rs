//! Lifecycle of a loan request.
//!
//! ```text
//! Pending --decide(approve)--> Approved
//!         --decide(reject)---> Rejected
//!         --cancel-----------> Cancelled
//! ```
//! All three outcomes are terminal.

use serde::{Deserialize, Serialize};

use super::DomainError;
use super::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestState {
    /// Derive the state from the persisted columns.
    pub fn from_fields(decision: Option<bool>, cancelled: bool) -> Self {
        match (decision, cancelled) {
            (Some(true), _) => RequestState::Approved,
            (Some(false), _) => RequestState::Rejected,
            (None, true) => RequestState::Cancelled,
            (None, false) => RequestState::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestState::Pending)
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            RequestState::Pending => "submitted",
            RequestState::Approved => "approved",
            RequestState::Rejected => "rejected",
            RequestState::Cancelled => "cancelled",
        }
    }

    /// Only pending requests may be decided or cancelled.
    pub fn ensure_pending(self) -> Result<(), DomainError> {
        if self.is_terminal() {
            Err(DomainError::RequestClosed(self))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum RejectReason {
    #[serde(rename = "Book no longer owned")]
    NoLongerOwned,
    #[serde(rename = "Book already loaned")]
    AlreadyLoaned,
    #[serde(rename = "I am currently unavailable")]
    Unavailable,
    #[serde(rename = "Other")]
    Other,
}

impl RejectReason {
    pub const ALL: [RejectReason; 4] = [
        RejectReason::NoLongerOwned,
        RejectReason::AlreadyLoaned,
        RejectReason::Unavailable,
        RejectReason::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NoLongerOwned => "Book no longer owned",
            RejectReason::AlreadyLoaned => "Book already loaned",
            RejectReason::Unavailable => "I am currently unavailable",
            RejectReason::Other => "Other",
        }
    }
}

impl TryFrom<&str> for RejectReason {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        RejectReason::ALL
            .into_iter()
            .find(|r| r.as_str() == value)
            .ok_or(ValidationError::UnknownRejectReason)
    }
}

/// Owner's answer to a pending request. A rejection always carries a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject(RejectReason),
}

impl Decision {
    /// Build a decision from raw form input.
    pub fn parse(approve: bool, reason: Option<&str>) -> Result<Self, ValidationError> {
        if approve {
            return Ok(Decision::Approve);
        }
        match reason.map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => Ok(Decision::Reject(RejectReason::try_from(r)?)),
            None => Err(ValidationError::MissingRejectReason),
        }
    }

    pub fn approved(&self) -> bool {
        matches!(self, Decision::Approve)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Decision::Approve => None,
            Decision::Reject(r) => Some(*r),
        }
    }

    pub fn resulting_state(&self) -> RequestState {
        match self {
            Decision::Approve => RequestState::Approved,
            Decision::Reject(_) => RequestState::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_derived_from_columns() {
        assert_eq!(RequestState::from_fields(None, false), RequestState::Pending);
        assert_eq!(RequestState::from_fields(Some(true), false), RequestState::Approved);
        assert_eq!(RequestState::from_fields(Some(false), false), RequestState::Rejected);
        assert_eq!(RequestState::from_fields(None, true), RequestState::Cancelled);
    }

    #[test]
    fn only_pending_is_open() {
        assert!(RequestState::Pending.ensure_pending().is_ok());
        for state in [
            RequestState::Approved,
            RequestState::Rejected,
            RequestState::Cancelled,
        ] {
            assert!(matches!(
                state.ensure_pending(),
                Err(DomainError::RequestClosed(s)) if s == state
            ));
        }
    }

    #[test]
    fn reject_requires_a_known_reason() {
        assert_eq!(
            Decision::parse(false, None),
            Err(ValidationError::MissingRejectReason)
        );
        assert_eq!(
            Decision::parse(false, Some("  ")),
            Err(ValidationError::MissingRejectReason)
        );
        assert_eq!(
            Decision::parse(false, Some("Too busy")),
            Err(ValidationError::UnknownRejectReason)
        );
        assert_eq!(
            Decision::parse(false, Some("Book already loaned")),
            Ok(Decision::Reject(RejectReason::AlreadyLoaned))
        );
    }

    #[test]
    fn approval_ignores_reason() {
        let decision = Decision::parse(true, Some("Other")).unwrap();
        assert_eq!(decision, Decision::Approve);
        assert_eq!(decision.reason(), None);
        assert_eq!(decision.resulting_state(), RequestState::Approved);
    }

    #[test]
    fn reject_reason_serializes_as_label() {
        let json = serde_json::to_string(&RejectReason::Unavailable).unwrap();
        assert_eq!(json, "\"I am currently unavailable\"");
    }
}
