use super::*;

use error::AppError;
use omc_core::gateways::notify::NotificationEvent;

/// Reverts an implemented request.
///
/// The request is referenced by its message id or its own id.
pub fn undo_request(
    connections: &sqlite::Connections,
    notify: &dyn NotificationGateway,
    admin: &Actor,
    reference: &str,
) -> Result<ChangeRequest> {
    usecases::authorize_admin(admin)?;
    let now = Timestamp::now();

    let usecases::Undo { request, restored } = connections
        .exclusive()?
        .transaction(|conn| usecases::undo_change_request(conn, admin, reference, now))
        .map_err(|err| {
            warn!("Failed to undo request {reference}: {err}");
            err
        })?;

    notify.notify(NotificationEvent::LocationUpdated {
        location: &restored,
    });

    let request_id = request.id.clone();
    let message_id = request.message_id.clone();
    let marked = connections
        .exclusive()
        .map_err(|err| usecases::Error::Repo(RepoError::Other(err)))
        .and_then(|mut db| {
            db.transaction(|conn| usecases::mark_request_reverted(conn, request, admin, now))
        });
    marked.map_err(|source| {
        error!(
            "Request {request_id} (message {message_id}) is still implemented although location {} has already been restored: {source}",
            restored.id
        );
        AppError::PartialFailure {
            request_id,
            message_id,
            location_id: Some(restored.id.clone()),
            status: RequestStatus::Reverted,
            source,
        }
    })
}
