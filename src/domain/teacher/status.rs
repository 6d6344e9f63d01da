//! Registration status and its transition table

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::DomainError;

/// Status of a teacher registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeacherStatus {
    /// Awaiting review
    #[default]
    Pending,
    /// Approved and visible to donors
    Approved,
    /// Rejected by an admin
    Rejected,
}

/// Events that drive the status machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusEvent {
    Approve,
    Reject,
}

/// Errors raised by an illegal transition
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Registration is already approved")]
    AlreadyApproved,

    #[error("Registration is already rejected")]
    AlreadyRejected,

    #[error("Cannot approve a rejected registration")]
    ApproveRejected,

    #[error("Cannot reject an approved registration")]
    RejectApproved,

    #[error("Registration must have a wishlist URL to be approved")]
    MissingWishlist,
}

impl From<TransitionError> for DomainError {
    fn from(err: TransitionError) -> Self {
        DomainError::validation(err.to_string())
    }
}

impl TeacherStatus {
    pub const ALL: [TeacherStatus; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Transition table: `(status, event) -> status | error`
    ///
    /// `has_wishlist` guards `Pending --Approve--> Approved`.
    pub fn transition(
        self,
        event: StatusEvent,
        has_wishlist: bool,
    ) -> Result<TeacherStatus, TransitionError> {
        use StatusEvent::*;
        use TeacherStatus::*;

        match (self, event) {
            (Pending, Approve) if has_wishlist => Ok(Approved),
            (Pending, Approve) => Err(TransitionError::MissingWishlist),
            (Pending, Reject) => Ok(Rejected),
            (Approved, Approve) => Err(TransitionError::AlreadyApproved),
            (Approved, Reject) => Err(TransitionError::RejectApproved),
            (Rejected, Approve) => Err(TransitionError::ApproveRejected),
            (Rejected, Reject) => Err(TransitionError::AlreadyRejected),
        }
    }
}

impl FromStr for TeacherStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(DomainError::validation(format!(
                "Invalid teacher status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TeacherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [StatusEvent; 2] = [StatusEvent::Approve, StatusEvent::Reject];

    #[test]
    fn test_pending_transitions() {
        assert_eq!(
            TeacherStatus::Pending.transition(StatusEvent::Approve, true),
            Ok(TeacherStatus::Approved)
        );
        assert_eq!(
            TeacherStatus::Pending.transition(StatusEvent::Approve, false),
            Err(TransitionError::MissingWishlist)
        );
        assert_eq!(
            TeacherStatus::Pending.transition(StatusEvent::Reject, false),
            Ok(TeacherStatus::Rejected)
        );
    }

    #[test]
    fn test_terminal_states_reject_every_event() {
        for status in TeacherStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for event in EVENTS {
                for has_wishlist in [true, false] {
                    assert!(
                        status.transition(event, has_wishlist).is_err(),
                        "{status} accepted {event:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_terminal_error_messages() {
        assert_eq!(
            TeacherStatus::Approved.transition(StatusEvent::Approve, true),
            Err(TransitionError::AlreadyApproved)
        );
        assert_eq!(
            TeacherStatus::Approved.transition(StatusEvent::Reject, true),
            Err(TransitionError::RejectApproved)
        );
        assert_eq!(
            TeacherStatus::Rejected.transition(StatusEvent::Approve, true),
            Err(TransitionError::ApproveRejected)
        );
        assert_eq!(
            TeacherStatus::Rejected.transition(StatusEvent::Reject, true),
            Err(TransitionError::AlreadyRejected)
        );
    }

    #[test]
    fn test_only_pending_is_not_terminal() {
        assert!(!TeacherStatus::Pending.is_terminal());
        assert!(TeacherStatus::Approved.is_terminal());
        assert!(TeacherStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_string_round_trip() {
        for status in TeacherStatus::ALL {
            assert_eq!(status.as_str().parse::<TeacherStatus>().unwrap(), status);
        }
        assert!("archived".parse::<TeacherStatus>().is_err());
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(TeacherStatus::default(), TeacherStatus::Pending);
    }
}
