use omc_core::{repositories::Error as RepoError, usecases::Error as ParameterError};
use omc_entities::{id::*, request::RequestStatus};
use thiserror::Error;

pub use omc_core::repositories;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> AppError {
        AppError::Business(BError::Repo(err))
    }
}

impl From<ParameterError> for AppError {
    fn from(err: ParameterError) -> AppError {
        AppError::Business(err.into())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Business(#[from] BError),
    /// The location store has been modified but the
    /// request could not be updated accordingly.
    #[error(
        "Location {} was modified but request {request_id} (message {message_id}) could not be marked as {status}: {source}",
        .location_id.as_ref().map(Id::as_str).unwrap_or("-")
    )]
    PartialFailure {
        request_id: Id,
        message_id: MessageId,
        location_id: Option<Id>,
        status: RequestStatus,
        source: ParameterError,
    },
    #[error("External service failed: {0}")]
    Gateway(anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum BError {
    #[error(transparent)]
    Parameter(ParameterError),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl From<ParameterError> for BError {
    fn from(err: ParameterError) -> Self {
        // Unwrap repository errors to treat them uniformly
        match err {
            ParameterError::Repo(err) => Self::Repo(err),
            err => Self::Parameter(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_repository_errors() {
        let err = AppError::from(ParameterError::Repo(RepoError::NotFound));
        assert!(matches!(
            err,
            AppError::Business(BError::Repo(RepoError::NotFound))
        ));
        let err = AppError::from(ParameterError::NoChanges);
        assert!(matches!(
            err,
            AppError::Business(BError::Parameter(ParameterError::NoChanges))
        ));
    }

    #[test]
    fn partial_failure_names_all_ids() {
        let err = AppError::PartialFailure {
            request_id: "r1".into(),
            message_id: "m1".into(),
            location_id: Some("l1".into()),
            status: RequestStatus::Implemented,
            source: ParameterError::Repo(RepoError::NotFound),
        };
        let msg = err.to_string();
        assert!(msg.contains("l1"));
        assert!(msg.contains("r1"));
        assert!(msg.contains("m1"));
        assert!(msg.contains("implemented"));
    }
}
