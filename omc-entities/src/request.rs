use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::*;
use strum::{Display, EnumCount, EnumIter, EnumString};
use thiserror::Error;

use crate::{id::*, time::*};

pub type RequestKindPrimitive = i16;
pub type RequestStatusPrimitive = i16;

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, EnumIter, EnumCount, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RequestKind {
    New    = 0,
    Edit   = 1,
    Remove = 2,
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, EnumIter, EnumCount, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RequestStatus {
    Pending     = 0,
    Implemented = 1,
    Dismissed   = 2,
    Reverted    = 3,
}

impl RequestStatus {
    /// pending → implemented | dismissed, implemented → reverted.
    /// All other states are terminal.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Implemented)
                | (Self::Pending, Self::Dismissed)
                | (Self::Implemented, Self::Reverted)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dismissed | Self::Reverted)
    }
}

#[derive(Debug, Error)]
#[error("Invalid request kind primitive: {0}")]
pub struct InvalidRequestKindPrimitive(RequestKindPrimitive);

impl TryFrom<RequestKindPrimitive> for RequestKind {
    type Error = InvalidRequestKindPrimitive;
    fn try_from(from: RequestKindPrimitive) -> Result<Self, Self::Error> {
        Self::from_i16(from).ok_or(InvalidRequestKindPrimitive(from))
    }
}

impl From<RequestKind> for RequestKindPrimitive {
    fn from(from: RequestKind) -> Self {
        from.to_i16().expect("Request kind primitive")
    }
}

#[derive(Debug, Error)]
#[error("Invalid request status primitive: {0}")]
pub struct InvalidRequestStatusPrimitive(RequestStatusPrimitive);

impl TryFrom<RequestStatusPrimitive> for RequestStatus {
    type Error = InvalidRequestStatusPrimitive;
    fn try_from(from: RequestStatusPrimitive) -> Result<Self, Self::Error> {
        Self::from_i16(from).ok_or(InvalidRequestStatusPrimitive(from))
    }
}

impl From<RequestStatus> for RequestStatusPrimitive {
    fn from(from: RequestStatus) -> Self {
        from.to_i16().expect("Request status primitive")
    }
}

/// A community-submitted proposal to create, edit or remove a location.
///
/// Both snapshots are kept as raw JSON and only parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub id: Id,
    pub message_id: MessageId,
    pub requester_id: UserId,
    pub kind: RequestKind,
    pub reason: Option<String>,
    pub current_data: Option<String>,
    pub new_data: Option<String>,
    pub status: RequestStatus,
    pub approver_id: Option<UserId>,
    pub approved_at: Option<Timestamp>,
    pub review_comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChangeRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn status_transitions() {
        use RequestStatus::*;
        assert!(Pending.can_transition_to(Implemented));
        assert!(Pending.can_transition_to(Dismissed));
        assert!(Implemented.can_transition_to(Reverted));
        assert!(!Pending.can_transition_to(Reverted));
        assert!(!Implemented.can_transition_to(Dismissed));
        for next in RequestStatus::iter() {
            assert!(!Dismissed.can_transition_to(next));
            assert!(!Reverted.can_transition_to(next));
        }
    }

    #[test]
    fn status_primitives() {
        for status in RequestStatus::iter() {
            let primitive = <RequestStatusPrimitive as From<RequestStatus>>::from(status);
            assert_eq!(status, RequestStatus::try_from(primitive).unwrap());
        }
        assert!(RequestStatus::try_from(42).is_err());
        assert!(RequestKind::try_from(-1).is_err());
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(RequestStatus::Implemented.to_string(), "implemented");
        assert_eq!("EDIT".parse::<RequestKind>().unwrap(), RequestKind::Edit);
    }
}
