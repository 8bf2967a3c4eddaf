use super::{prelude::*, *};

/// Prepares a request to edit a location.
///
/// The proposed state is the current state of the location with all
/// session edits applied. Fields without an effective change are dropped.
pub fn edit_location_request<R>(
    repo: &R,
    requester_id: UserId,
    location_id: &Id,
    selection: PointSelection,
    session: &EditSession,
    justification: &str,
) -> Result<NewChangeRequest>
where
    R: LocationRepo,
{
    let reason = non_blank(justification).ok_or(Error::MissingJustification)?;
    let location = repo.get_location(location_id.as_str())?;
    let current = LocationSnapshot::from_location(&location);
    let mut new = current.clone();
    for (field, edit) in &session.field_edits {
        new.set_field_value(*field, &edit.new_value, selection)?;
    }
    let changed = current.changed_fields(&new);
    if changed.is_empty() {
        return Err(Error::NoChanges);
    }
    log::debug!(
        "Edit of location {} changes {} of {} edited fields",
        location.id,
        changed.len(),
        session.field_edits.len()
    );
    Ok(NewChangeRequest {
        kind: RequestKind::Edit,
        requester_id,
        reason: Some(reason.to_owned()),
        selection,
        current: Some(current),
        new: Some(new),
    })
}
