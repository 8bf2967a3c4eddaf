use super::*;

pub fn submit_removal(
    connections: &sqlite::Connections,
    channel: &dyn ModerationChannel,
    requester_id: UserId,
    location_id: &Id,
    selection: PointSelection,
    justification: &str,
) -> Result<ChangeRequest> {
    let request = usecases::remove_location_request(
        &connections.shared()?,
        requester_id,
        location_id,
        selection,
        justification,
    )?;
    post_and_store(connections, channel, request)
}

#[cfg(test)]
mod tests {
    use super::super::tests::prelude::*;

    #[test]
    fn submit_point_removal() {
        let fixture = BackendFixture::new();
        let location = fixture.create_location(
            Location::build()
                .name("Wall")
                .points(&[(1.0, 1.0), (2.0, 2.0)])
                .finish(),
        );
        let request = flows::submit_removal(
            &fixture.db_connections,
            &fixture.channel,
            "alice".into(),
            &location.id,
            PointSelection::Point(1),
            "Demolished",
        )
        .unwrap();
        assert_eq!(request.kind, RequestKind::Remove);
        let new = LocationSnapshot::parse(request.new_data.as_deref().unwrap()).unwrap();
        assert_eq!(new.coordinates.len(), 1);
        assert!(fixture.channel.last_posted().unwrap().title.contains("#2"));
    }

    #[test]
    fn wildcard_removal_is_rejected() {
        let fixture = BackendFixture::new();
        let location = fixture.create_location(
            Location::build()
                .name("Wall")
                .points(&[(1.0, 1.0), (2.0, 2.0)])
                .finish(),
        );
        let err = flows::submit_removal(
            &fixture.db_connections,
            &fixture.channel,
            "alice".into(),
            &location.id,
            PointSelection::AllPoints,
            "Demolished",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Business(BError::Parameter(usecases::Error::WildcardRemoval))
        ));
        assert_eq!(fixture.channel.posted_count(), 0);
    }
}
