use omc_application::error::{AppError, BError};
use omc_boundary::Message;
pub use omc_core::{repositories::Error as RepoError, usecases::Error as ParameterError};
use thiserror::Error;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Error)]
#[allow(clippy::large_enum_variant)]
pub enum Error {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    /// The custom id could not be decoded, e.g. because the
    /// control has been created by a previous version.
    #[error("Unknown action '{0}'")]
    UnknownAction(String),
    #[error("Missing option '{0}'")]
    MissingOption(&'static str),
    #[error("Missing form field")]
    MissingField,
    #[error("Missing choice")]
    MissingChoice,
    #[error("Missing message of the moderation control")]
    MissingMessage,
    #[error("The control belongs to another user")]
    NotYourControl,
}

impl From<ParameterError> for Error {
    fn from(err: ParameterError) -> Self {
        Self::App(err.into())
    }
}

impl Error {
    /// The text that is shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(AppError::Business(err)) => match err {
                BError::Parameter(err) => match err {
                    ParameterError::Forbidden => "You are not allowed to do that.".into(),
                    ParameterError::InvalidStatus(status) => {
                        format!("This request has already been {status}.")
                    }
                    ParameterError::NoChanges => "Nothing has been changed yet.".into(),
                    ParameterError::MissingJustification => {
                        "Please give a short justification.".into()
                    }
                    ParameterError::Snapshot(_)
                    | ParameterError::MissingSnapshot
                    | ParameterError::UntargetedSnapshot => {
                        format!("The stored request data cannot be used: {err}")
                    }
                    _ => err.to_string(),
                },
                BError::Repo(RepoError::NotFound) => {
                    "Not found. It may have been removed or the session has expired.".into()
                }
                BError::Repo(RepoError::AlreadyExists) => "This already exists.".into(),
                BError::Repo(_) => GENERIC_FAILURE.into(),
            },
            Self::App(err @ AppError::PartialFailure { .. }) => {
                format!("Partially failed, please check manually: {err}")
            }
            Self::App(AppError::Gateway(_)) => {
                "An external service is not available. Please try again later.".into()
            }
            Self::App(AppError::Other(_)) => GENERIC_FAILURE.into(),
            Self::UnknownCommand(_) | Self::UnknownAction(_) => {
                "This control is outdated. Please start over.".into()
            }
            Self::NotYourControl => "This control belongs to someone else.".into(),
            Self::MissingOption(_)
            | Self::MissingField
            | Self::MissingChoice
            | Self::MissingMessage => format!("Incomplete input: {self}."),
        }
    }

    fn log(&self) {
        match self {
            Self::App(AppError::Business(BError::Parameter(_) | BError::Repo(RepoError::NotFound))) => {
                debug!("Rejected interaction: {self}");
            }
            Self::App(AppError::PartialFailure { .. }) => {
                // Already reported by the flow
            }
            Self::App(_) => {
                error!("Failed to handle interaction: {self}");
            }
            _ => {
                warn!("Invalid interaction: {self}");
            }
        }
    }
}

impl From<Error> for Message {
    fn from(err: Error) -> Self {
        err.log();
        Message::ephemeral(err.user_message())
    }
}
