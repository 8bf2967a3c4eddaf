use super::*;

use error::AppError;
use omc_core::gateways::notify::NotificationEvent;
use usecases::Approval;

#[derive(Debug, Clone, PartialEq)]
pub struct Approved {
    pub request: ChangeRequest,
    pub approval: Approval,
}

pub fn approve_request(
    connections: &sqlite::Connections,
    notify: &dyn NotificationGateway,
    moderator: &Actor,
    message_id: &MessageId,
) -> Result<Approved> {
    usecases::authorize_moderator(moderator)?;
    let now = Timestamp::now();

    // Apply the changes to the location store
    let (request, approval) = connections
        .exclusive()?
        .transaction(|conn| {
            let request = usecases::get_pending_request(conn, message_id)?;
            let approval = usecases::apply_approved_request(conn, moderator, &request, now)?;
            Ok::<_, usecases::Error>((request, approval))
        })
        .map_err(|err| {
            warn!("Failed to approve request of message {message_id}: {err}");
            err
        })?;

    notify_approval(notify, &approval);

    // Update the request in a separate transaction
    let request_id = request.id.clone();
    let marked = connections
        .exclusive()
        .map_err(|err| usecases::Error::Repo(RepoError::Other(err)))
        .and_then(|mut db| {
            db.transaction(|conn| {
                usecases::mark_request_implemented(conn, request, moderator, &approval, now)
            })
        });
    match marked {
        Ok(request) => Ok(Approved { request, approval }),
        Err(source) => {
            let location_id = approval.location_id().cloned();
            error!(
                "Request {request_id} (message {message_id}) is still pending although location {} has already been modified: {source}",
                location_id.as_ref().map(Id::as_str).unwrap_or("-")
            );
            Err(AppError::PartialFailure {
                request_id,
                message_id: message_id.clone(),
                location_id,
                status: RequestStatus::Implemented,
                source,
            })
        }
    }
}

fn notify_approval(notify: &dyn NotificationGateway, approval: &Approval) {
    use NotificationEvent as E;
    let event = match approval {
        Approval::Created(location) => E::LocationCreated { location },
        Approval::Merged { location, .. } | Approval::Updated { location, .. } => {
            E::LocationUpdated { location }
        }
        Approval::Removed(id) => E::LocationRemoved { id },
        Approval::Unchanged => return,
    };
    notify.notify(event);
}
