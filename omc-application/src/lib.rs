#[macro_use]
extern crate log;

mod amend;
mod approve;
mod deny;
mod reconcile;
mod resolve;
mod sessions;
mod submit_edit;
mod submit_new;
mod submit_remove;
mod undo;

pub mod prelude {
    pub use super::{
        amend::*, approve::*, deny::*, reconcile::*, resolve::*, sessions::*, submit_edit::*,
        submit_new::*, submit_remove::*, undo::*,
    };
}

pub mod error;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use omc_core::{
    entities::*,
    gateways::{chat::ModerationChannel, notify::NotificationGateway},
    repositories::{Error as RepoError, *},
    sessions::SessionStore,
    snapshot::LocationSnapshot,
    usecases,
};

#[cfg(test)]
pub(crate) mod tests;

pub(crate) mod sqlite {
    pub use omc_db_sqlite::Connections;
}

/// Posts the moderation message and stores the request under its id.
fn post_and_store(
    connections: &sqlite::Connections,
    channel: &dyn ModerationChannel,
    request: usecases::NewChangeRequest,
) -> Result<ChangeRequest> {
    let message = usecases::request_message(&request);
    let message_id = channel
        .post_request(&message)
        .map_err(error::AppError::Gateway)?;
    let kind = request.kind;
    let requester_id = request.requester_id.clone();
    connections
        .exclusive()?
        .transaction(|conn| {
            usecases::store_change_request(conn, request, message_id.clone(), Timestamp::now())
        })
        .inspect(|stored| {
            info!(
                "Stored {kind} request {} of {requester_id} (message {})",
                stored.id, stored.message_id
            );
        })
        .map_err(|err| {
            error!("Failed to store {kind} request of {requester_id} posted as message {message_id}: {err}");
            error::AppError::from(err)
        })
}
