use crate::{
    repositories,
    snapshot::{FieldValueError, SnapshotError},
    util::coordinates::ParseError,
};
use omc_entities::{coordinates::PointOutOfRange, request::RequestStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The name must not be empty")]
    EmptyName,
    #[error("Invalid coordinates: {0}")]
    Coordinates(#[from] ParseError),
    #[error(transparent)]
    FieldValue(FieldValueError),
    #[error("A justification is required")]
    MissingJustification,
    #[error("Nothing has been changed")]
    NoChanges,
    #[error("Please pick a single point or the whole location, not all points")]
    WildcardRemoval,
    #[error(transparent)]
    PointOutOfRange(#[from] PointOutOfRange),
    #[error("This is not allowed")]
    Forbidden,
    #[error("The request is {0}")]
    InvalidStatus(RequestStatus),
    #[error("The request contains no snapshot to restore")]
    MissingSnapshot,
    #[error("The snapshot does not refer to any location")]
    UntargetedSnapshot,
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl From<FieldValueError> for Error {
    fn from(err: FieldValueError) -> Self {
        match err {
            FieldValueError::EmptyName => Self::EmptyName,
            FieldValueError::Coordinates(err) => Self::Coordinates(err),
            FieldValueError::PointOutOfRange(err) => Self::PointOutOfRange(err),
            err @ FieldValueError::SinglePointExpected => Self::FieldValue(err),
        }
    }
}
