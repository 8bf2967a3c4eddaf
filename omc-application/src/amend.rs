use super::*;

/// Opens an amendment session for a pending request.
pub fn start_amendment(
    connections: &sqlite::Connections,
    sessions: &dyn SessionStore,
    moderator: &Actor,
    message_id: &MessageId,
) -> Result<EditSession> {
    Ok(usecases::start_amendment(
        &connections.shared()?,
        sessions,
        moderator,
        message_id,
        Timestamp::now(),
    )?)
}

pub fn record_amendment(
    connections: &sqlite::Connections,
    sessions: &dyn SessionStore,
    moderator: &Actor,
    message_id: &MessageId,
    field: EditField,
    value: &str,
) -> Result<EditSession> {
    usecases::authorize_moderator(moderator)?;
    let base = usecases::amendment_base(&connections.shared()?, message_id)?;
    let target = EditTarget::Request(message_id.clone());
    Ok(usecases::record_field_edit(
        sessions,
        &moderator.id,
        &target,
        &base,
        field,
        value,
        Timestamp::now(),
    )?)
}

/// Saves the amendments into the pending request.
pub fn save_amendment(
    connections: &sqlite::Connections,
    sessions: &dyn SessionStore,
    moderator: &Actor,
    message_id: &MessageId,
) -> Result<ChangeRequest> {
    Ok(connections.exclusive()?.transaction(|conn| {
        usecases::amend_request(conn, sessions, moderator, message_id, Timestamp::now())
    })?)
}

pub fn discard_amendment(sessions: &dyn SessionStore, moderator: &Actor, message_id: &MessageId) {
    sessions.delete(&moderator.id, &EditTarget::Request(message_id.clone()));
}

#[cfg(test)]
mod tests {
    use super::super::tests::prelude::*;

    #[test]
    fn amend_before_approval() {
        let fixture = BackendFixture::new();
        let request = fixture.submit_new(
            "alice",
            usecases::NewLocationProposal {
                name: "Old Mil".into(),
                coordinates: "[10,20]".into(),
                description: "Ruins".into(),
            },
            None,
        );
        let message_id = &request.message_id;
        let session = flows::start_amendment(
            &fixture.db_connections,
            &fixture.sessions,
            &moderator(),
            message_id,
        )
        .unwrap();
        assert_eq!(session.new_value(EditField::Name), Some("Old Mil"));

        flows::record_amendment(
            &fixture.db_connections,
            &fixture.sessions,
            &moderator(),
            message_id,
            EditField::Name,
            "Old Mill",
        )
        .unwrap();
        let amended = flows::save_amendment(
            &fixture.db_connections,
            &fixture.sessions,
            &moderator(),
            message_id,
        )
        .unwrap();
        assert!(amended.is_pending());
        let snapshot = LocationSnapshot::parse(amended.new_data.as_deref().unwrap()).unwrap();
        assert_eq!(snapshot.name, "Old Mill");
        assert_eq!(snapshot.description, "Ruins");

        flows::approve_request(
            &fixture.db_connections,
            &fixture.notify,
            &moderator(),
            message_id,
        )
        .unwrap();
        assert_eq!(fixture.all_locations()[0].name, "Old Mill");
    }

    #[test]
    fn members_cannot_amend() {
        let fixture = BackendFixture::new();
        let request = ChangeRequest::build().kind(RequestKind::New).finish();
        fixture.store_request(&request);
        assert!(flows::start_amendment(
            &fixture.db_connections,
            &fixture.sessions,
            &Actor::member("alice"),
            &request.message_id,
        )
        .is_err());
        assert!(fixture.sessions.is_empty());
    }
}
