use super::*;

pub fn deny_request(
    connections: &sqlite::Connections,
    moderator: &Actor,
    message_id: &MessageId,
    justification: &str,
) -> Result<ChangeRequest> {
    Ok(connections.exclusive()?.transaction(|conn| {
        usecases::deny_request(conn, moderator, message_id, justification, Timestamp::now())
    })?)
}

#[cfg(test)]
mod tests {
    use super::super::tests::prelude::*;

    #[test]
    fn deny_with_justification() {
        let fixture = BackendFixture::new();
        let request = ChangeRequest::build().kind(RequestKind::Remove).finish();
        fixture.store_request(&request);
        assert!(flows::deny_request(
            &fixture.db_connections,
            &moderator(),
            &request.message_id,
            ""
        )
        .is_err());
        let denied = flows::deny_request(
            &fixture.db_connections,
            &moderator(),
            &request.message_id,
            "Still there",
        )
        .unwrap();
        assert_eq!(denied.status, RequestStatus::Dismissed);
        assert_eq!(
            fixture.get_request(&request.message_id).review_comment.as_deref(),
            Some("Still there")
        );
    }
}
