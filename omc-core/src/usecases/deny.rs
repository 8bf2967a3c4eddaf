use super::{prelude::*, *};

/// Dismisses a pending request without touching the location store.
pub fn deny_request<R>(
    repo: &R,
    moderator: &Actor,
    message_id: &MessageId,
    justification: &str,
    now: Timestamp,
) -> Result<ChangeRequest>
where
    R: ChangeRequestRepo,
{
    authorize_moderator(moderator)?;
    let comment = non_blank(justification).ok_or(Error::MissingJustification)?;
    let mut request = get_pending_request(repo, message_id)?;
    transition(&mut request, RequestStatus::Dismissed, moderator, now)?;
    request.review_comment = Some(comment.to_owned());
    repo.update_change_request(&request)?;
    log::info!(
        "Dismissed {} request {} by {}",
        request.kind,
        request.id,
        moderator.id
    );
    Ok(request)
}
