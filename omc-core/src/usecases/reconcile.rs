use super::prelude::*;

/// Requests whose moderation messages are checked periodically.
pub fn open_change_requests<R>(repo: &R) -> Result<Vec<ChangeRequest>>
where
    R: ChangeRequestRepo,
{
    Ok(repo.change_requests_by_status(RequestStatus::Pending)?)
}

/// Deletes a request whose moderation message is gone.
pub fn purge_orphaned_request<R>(repo: &R, message_id: &MessageId) -> Result<()>
where
    R: ChangeRequestRepo,
{
    let request = repo.get_change_request_by_message_id(message_id)?;
    if !request.is_pending() {
        return Err(Error::InvalidStatus(request.status));
    }
    repo.delete_change_request_by_message_id(message_id)?;
    log::info!(
        "Purged {} request {} of deleted message {}",
        request.kind,
        request.id,
        message_id
    );
    Ok(())
}
