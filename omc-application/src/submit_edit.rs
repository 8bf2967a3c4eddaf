use super::*;

fn edit_base(connections: &sqlite::Connections, location_id: &Id) -> Result<LocationSnapshot> {
    let location = connections.shared()?.get_location(location_id.as_str())?;
    Ok(LocationSnapshot::from_location(&location))
}

/// The value that the form of a field is pre-populated with.
pub fn location_field_value(
    connections: &sqlite::Connections,
    sessions: &dyn SessionStore,
    user_id: &UserId,
    target: &EditTarget,
    field: EditField,
) -> Result<String> {
    let base = match target {
        EditTarget::Location { id, .. } => edit_base(connections, id)?,
        EditTarget::Request(message_id) => {
            usecases::amendment_base(&connections.shared()?, message_id)?
        }
        EditTarget::Draft(_) => return Err(RepoError::NotFound.into()),
    };
    let session = sessions.get(user_id, target);
    Ok(usecases::pending_field_value(&session, &base, field))
}

pub fn record_location_edit(
    connections: &sqlite::Connections,
    sessions: &dyn SessionStore,
    user_id: &UserId,
    location_id: &Id,
    selection: PointSelection,
    field: EditField,
    value: &str,
) -> Result<EditSession> {
    let base = edit_base(connections, location_id)?;
    let target = EditTarget::location(location_id.clone(), selection);
    Ok(usecases::record_field_edit(
        sessions,
        user_id,
        &target,
        &base,
        field,
        value,
        Timestamp::now(),
    )?)
}

/// Submits all recorded edits of a location for review.
///
/// The edit session is discarded after the request has been stored.
pub fn submit_location_edit(
    connections: &sqlite::Connections,
    channel: &dyn ModerationChannel,
    sessions: &dyn SessionStore,
    requester_id: &UserId,
    location_id: &Id,
    selection: PointSelection,
    justification: &str,
) -> Result<ChangeRequest> {
    let target = EditTarget::location(location_id.clone(), selection);
    let session = sessions.get(requester_id, &target);
    let request = usecases::edit_location_request(
        &connections.shared()?,
        requester_id.clone(),
        location_id,
        selection,
        &session,
        justification,
    )?;
    let stored = post_and_store(connections, channel, request)?;
    sessions.delete(requester_id, &target);
    Ok(stored)
}

pub fn discard_location_edit(
    sessions: &dyn SessionStore,
    user_id: &UserId,
    location_id: &Id,
    selection: PointSelection,
) {
    let target = EditTarget::location(location_id.clone(), selection);
    sessions.delete(user_id, &target);
    debug!("Discarded edits of {user_id} for location {location_id}");
}
