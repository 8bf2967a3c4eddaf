use super::{prelude::*, *};

#[derive(Debug, Clone, PartialEq)]
pub struct Undo {
    pub request: ChangeRequest,
    pub restored: Location,
}

/// Restores the location store to the state before an implemented request.
///
/// The request is looked up by its message id or its own id. The status
/// of the request is not modified, see [`mark_request_reverted`].
pub fn undo_change_request<R>(
    repo: &R,
    admin: &Actor,
    reference: &str,
    now: Timestamp,
) -> Result<Undo>
where
    R: ChangeRequestRepo + LocationRepo,
{
    authorize_admin(admin)?;
    let request = find_change_request(repo, reference)?;
    if request.status != RequestStatus::Implemented {
        return Err(Error::InvalidStatus(request.status));
    }
    let json = request
        .current_data
        .as_deref()
        .ok_or(Error::MissingSnapshot)?;
    let snapshot = LocationSnapshot::parse(json)?;
    let id = snapshot.target_id().ok_or(Error::UntargetedSnapshot)?;
    let restored = snapshot.into_location(id, Some(admin.id.clone()), now);
    repo.restore_location(&restored)?;
    log::info!(
        "Restored location {} by undoing request {}",
        restored.id,
        request.id
    );
    Ok(Undo { request, restored })
}

pub fn mark_request_reverted<R>(
    repo: &R,
    mut request: ChangeRequest,
    admin: &Actor,
    now: Timestamp,
) -> Result<ChangeRequest>
where
    R: ChangeRequestRepo,
{
    transition(&mut request, RequestStatus::Reverted, admin, now)?;
    request.review_comment = Some(format!("Reverted by {}", admin.id));
    repo.update_change_request(&request)?;
    Ok(request)
}
