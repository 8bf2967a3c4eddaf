use super::{prelude::*, *};
use crate::gateways::chat::RequestMessage;

/// A change request that is about to be posted for moderation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChangeRequest {
    pub kind: RequestKind,
    pub requester_id: UserId,
    pub reason: Option<String>,
    pub selection: PointSelection,
    pub current: Option<LocationSnapshot>,
    pub new: Option<LocationSnapshot>,
}

impl NewChangeRequest {
    fn subject(&self) -> String {
        let name = self
            .current
            .as_ref()
            .or(self.new.as_ref())
            .map(|snapshot| snapshot.name.as_str())
            .unwrap_or_default();
        match self.selection.ordinal() {
            Some(ordinal) => format!("{name} #{ordinal}"),
            None => name.to_owned(),
        }
    }
}

fn field_line(field: EditField, value: &str) -> String {
    format!("{}: {value}", field.label())
}

/// Renders the message that moderators review.
///
/// Changes are listed as `field: value` or `field: old -> new` lines.
pub fn request_message(request: &NewChangeRequest) -> RequestMessage {
    use strum::IntoEnumIterator as _;
    let subject = request.subject();
    let mut lines = vec![];
    let title = match request.kind {
        RequestKind::New => {
            if let Some(new) = &request.new {
                lines.extend(
                    EditField::iter()
                        .map(|field| (field, new.field_value(field, PointSelection::Entity)))
                        .filter(|(_, value)| !value.is_empty())
                        .map(|(field, value)| field_line(field, &value)),
                );
            }
            format!("New location: {subject}")
        }
        RequestKind::Edit => {
            if let (Some(current), Some(new)) = (&request.current, &request.new) {
                lines.extend(current.changed_fields(new).into_iter().map(|field| {
                    let old = current.field_value(field, request.selection);
                    let new = new.field_value(field, request.selection);
                    field_line(field, &format!("{old} -> {new}"))
                }));
            }
            format!("Edit: {subject}")
        }
        RequestKind::Remove => format!("Remove: {subject}"),
    };
    if let Some(reason) = &request.reason {
        lines.push(format!("Reason: {reason}"));
    }
    lines.push(format!("Requested by: {}", request.requester_id));
    RequestMessage {
        title,
        body: lines.join("\n"),
    }
}

/// Persists a change request that has been posted as `message_id`.
pub fn store_change_request<R>(
    repo: &R,
    request: NewChangeRequest,
    message_id: MessageId,
    now: Timestamp,
) -> Result<ChangeRequest>
where
    R: ChangeRequestRepo,
{
    let NewChangeRequest {
        kind,
        requester_id,
        reason,
        current,
        new,
        ..
    } = request;
    let request = ChangeRequest {
        id: Id::new(),
        message_id,
        requester_id,
        kind,
        reason,
        current_data: current.as_ref().map(LocationSnapshot::to_json).transpose()?,
        new_data: new.as_ref().map(LocationSnapshot::to_json).transpose()?,
        status: RequestStatus::Pending,
        approver_id: None,
        approved_at: None,
        review_comment: None,
        created_at: now,
        updated_at: now,
    };
    repo.create_change_request(&request)?;
    log::info!(
        "Stored {} request {} for message {}",
        request.kind,
        request.id,
        request.message_id
    );
    Ok(request)
}

/// Looks up a request by its message id or, if that fails, by its own id.
pub fn find_change_request<R>(repo: &R, reference: &str) -> Result<ChangeRequest>
where
    R: ChangeRequestRepo,
{
    let reference = non_blank(reference).ok_or(RepoError::NotFound)?;
    match repo.get_change_request_by_message_id(&reference.into()) {
        Err(RepoError::NotFound) => Ok(repo.get_change_request(reference)?),
        res => Ok(res?),
    }
}

pub fn get_pending_request<R>(repo: &R, message_id: &MessageId) -> Result<ChangeRequest>
where
    R: ChangeRequestRepo,
{
    let request = repo.get_change_request_by_message_id(message_id)?;
    if !request.is_pending() {
        return Err(Error::InvalidStatus(request.status));
    }
    Ok(request)
}

pub fn count_pending_requests<R>(repo: &R) -> Result<usize>
where
    R: ChangeRequestRepo,
{
    Ok(repo.count_change_requests_by_status(RequestStatus::Pending)?)
}

// Applies a status transition, stamping the moderator.
pub(crate) fn transition(
    request: &mut ChangeRequest,
    next: RequestStatus,
    moderator: &Actor,
    now: Timestamp,
) -> Result<()> {
    if !request.status.can_transition_to(next) {
        return Err(Error::InvalidStatus(request.status));
    }
    request.status = next;
    request.approver_id = Some(moderator.id.clone());
    request.approved_at = Some(now);
    request.updated_at = now;
    Ok(())
}
