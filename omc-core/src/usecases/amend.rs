use super::{prelude::*, *};
use crate::sessions::{bootstrap_from_request, SessionStore};

/// The snapshot that amendments of a pending request are based on.
pub fn amendment_base<R>(repo: &R, message_id: &MessageId) -> Result<LocationSnapshot>
where
    R: ChangeRequestRepo,
{
    let request = get_pending_request(repo, message_id)?;
    let json = request.new_data.as_deref().ok_or(Error::MissingSnapshot)?;
    Ok(LocationSnapshot::parse(json)?)
}

/// Opens an edit session for a moderator that is prefilled
/// with the changes of a pending request.
pub fn start_amendment<R>(
    repo: &R,
    sessions: &dyn SessionStore,
    moderator: &Actor,
    message_id: &MessageId,
    now: Timestamp,
) -> Result<EditSession>
where
    R: ChangeRequestRepo,
{
    authorize_moderator(moderator)?;
    let request = get_pending_request(repo, message_id)?;
    let (strategy, field_edits) = bootstrap_from_request(&request, now);
    log::debug!(
        "Bootstrapped {} field edit(s) of request {} ({strategy:?})",
        field_edits.len(),
        request.id
    );
    let display_name = field_edits
        .get(&EditField::Name)
        .map(|edit| edit.new_value.clone())
        .unwrap_or_else(|| format!("{} request", request.kind));
    let target = EditTarget::Request(message_id.clone());
    Ok(sessions.save(&moderator.id, &target, &display_name, field_edits))
}

/// Writes the amendments of a moderator back into the pending request.
pub fn amend_request<R>(
    repo: &R,
    sessions: &dyn SessionStore,
    moderator: &Actor,
    message_id: &MessageId,
    now: Timestamp,
) -> Result<ChangeRequest>
where
    R: ChangeRequestRepo,
{
    authorize_moderator(moderator)?;
    let mut request = get_pending_request(repo, message_id)?;
    let target = EditTarget::Request(message_id.clone());
    let session = sessions.get(&moderator.id, &target);
    if session.is_empty() {
        return Err(Error::NoChanges);
    }
    let json = request.new_data.as_deref().ok_or(Error::MissingSnapshot)?;
    let mut new = LocationSnapshot::parse(json)?;
    for (field, edit) in &session.field_edits {
        new.set_field_value(*field, &edit.new_value, PointSelection::Entity)?;
    }
    request.new_data = Some(new.to_json()?);
    request.updated_at = now;
    repo.update_change_request(&request)?;
    sessions.delete(&moderator.id, &target);
    log::info!("Amended request {} by {}", request.id, moderator.id);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::MockDb, *};
    use crate::sessions::InMemorySessionStore;
    use omc_entities::builders::Builder as _;

    fn setup() -> (MockDb, InMemorySessionStore, ChangeRequest) {
        let db = MockDb::default();
        let sessions = InMemorySessionStore::new(time::Duration::minutes(30));
        let request = ChangeRequest::build()
            .kind(RequestKind::Edit)
            .current_data(Some(r#"{"id":"x","name":"Mill","coordinates":[1,1]}"#))
            .new_data(Some(r#"{"id":"x","name":"Old Mill","coordinates":[1,1]}"#))
            .finish();
        db.create_change_request(&request).unwrap();
        (db, sessions, request)
    }

    #[test]
    fn amend_a_pending_request() {
        let (db, sessions, request) = setup();
        let moderator = Actor::new("mod", Role::Moderator);
        let session =
            start_amendment(&db, &sessions, &moderator, &request.message_id, Timestamp::now())
                .unwrap();
        assert_eq!(session.display_name, "Old Mill");
        assert_eq!(session.field_edits[&EditField::Name].old_value, "Mill");

        let base = amendment_base(&db, &request.message_id).unwrap();
        record_field_edit(
            &sessions,
            &moderator.id,
            &session.target,
            &base,
            EditField::Name,
            "The Old Mill",
            Timestamp::now(),
        )
        .unwrap();
        let amended =
            amend_request(&db, &sessions, &moderator, &request.message_id, Timestamp::now()).unwrap();
        let new = LocationSnapshot::parse(amended.new_data.as_deref().unwrap()).unwrap();
        assert_eq!(new.name, "The Old Mill");
        assert_eq!(new.target_id(), Some(Id::from("x")));
        assert!(amended.is_pending());
        assert!(sessions.get(&moderator.id, &session.target).is_empty());
    }

    #[test]
    fn members_cannot_amend() {
        let (db, sessions, request) = setup();
        assert!(matches!(
            start_amendment(&db, &sessions, &Actor::member("bob"), &request.message_id, Timestamp::now()),
            Err(Error::Forbidden)
        ));
        assert!(sessions.is_empty());
    }

    #[test]
    fn amending_without_session_changes_nothing() {
        let (db, sessions, request) = setup();
        let moderator = Actor::new("mod", Role::Moderator);
        assert!(matches!(
            amend_request(&db, &sessions, &moderator, &request.message_id, Timestamp::now()),
            Err(Error::NoChanges)
        ));
    }
}
