use super::*;

fn into_new_change_request(r: &ChangeRequest) -> models::NewChangeRequest<'_> {
    let ChangeRequest {
        id,
        message_id,
        requester_id,
        kind,
        reason,
        current_data,
        new_data,
        status,
        approver_id,
        approved_at,
        review_comment,
        created_at,
        updated_at,
    } = r;
    models::NewChangeRequest {
        id: id.as_str(),
        message_id: message_id.as_str(),
        requester_id: requester_id.as_str(),
        kind: RequestKindPrimitive::from(*kind),
        reason: reason.as_deref(),
        current_data: current_data.as_deref(),
        new_data: new_data.as_deref(),
        status: RequestStatusPrimitive::from(*status),
        approver_id: approver_id.as_ref().map(UserId::as_str),
        approved_at: approved_at.map(Timestamp::into_millis),
        review_comment: review_comment.as_deref(),
        created_at: created_at.into_millis(),
        updated_at: updated_at.into_millis(),
    }
}

fn load_change_request(entity: models::ChangeRequestEntity) -> Result<ChangeRequest> {
    let models::ChangeRequestEntity {
        rowid: _,
        id,
        message_id,
        requester_id,
        kind,
        reason,
        current_data,
        new_data,
        status,
        approver_id,
        approved_at,
        review_comment,
        created_at,
        updated_at,
    } = entity;
    let kind = RequestKind::try_from(kind).map_err(anyhow::Error::from)?;
    let status = RequestStatus::try_from(status).map_err(anyhow::Error::from)?;
    Ok(ChangeRequest {
        id: id.into(),
        message_id: message_id.into(),
        requester_id: requester_id.into(),
        kind,
        reason,
        current_data,
        new_data,
        status,
        approver_id: approver_id.map(Into::into),
        approved_at: approved_at.map(Timestamp::from_millis),
        review_comment,
        created_at: Timestamp::from_millis(created_at),
        updated_at: Timestamp::from_millis(updated_at),
    })
}

pub fn create_change_request(conn: &mut SqliteConnection, r: &ChangeRequest) -> Result<()> {
    diesel::insert_into(schema::change_requests::table)
        .values(&into_new_change_request(r))
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

pub fn get_change_request(conn: &mut SqliteConnection, id: &str) -> Result<ChangeRequest> {
    use schema::change_requests::dsl;
    let entity = dsl::change_requests
        .filter(dsl::id.eq(id))
        .first::<models::ChangeRequestEntity>(conn)
        .map_err(from_diesel_err)?;
    load_change_request(entity)
}

pub fn get_change_request_by_message_id(
    conn: &mut SqliteConnection,
    message_id: &MessageId,
) -> Result<ChangeRequest> {
    use schema::change_requests::dsl;
    let entity = dsl::change_requests
        .filter(dsl::message_id.eq(message_id.as_str()))
        .first::<models::ChangeRequestEntity>(conn)
        .map_err(from_diesel_err)?;
    load_change_request(entity)
}

pub fn update_change_request(conn: &mut SqliteConnection, r: &ChangeRequest) -> Result<()> {
    use schema::change_requests::dsl;
    let count = diesel::update(dsl::change_requests.filter(dsl::id.eq(r.id.as_str())))
        .set(&into_new_change_request(r))
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    Ok(())
}

pub fn delete_change_request_by_message_id(
    conn: &mut SqliteConnection,
    message_id: &MessageId,
) -> Result<()> {
    use schema::change_requests::dsl;
    let count =
        diesel::delete(dsl::change_requests.filter(dsl::message_id.eq(message_id.as_str())))
            .execute(conn)
            .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    Ok(())
}

pub fn change_requests_by_status(
    conn: &mut SqliteConnection,
    status: RequestStatus,
) -> Result<Vec<ChangeRequest>> {
    use schema::change_requests::dsl;
    dsl::change_requests
        .filter(dsl::status.eq(RequestStatusPrimitive::from(status)))
        .order_by((dsl::created_at, dsl::rowid))
        .load::<models::ChangeRequestEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_change_request)
        .collect()
}

pub fn count_change_requests_by_status(
    conn: &mut SqliteConnection,
    status: RequestStatus,
) -> Result<usize> {
    use schema::change_requests::dsl;
    let count = dsl::change_requests
        .filter(dsl::status.eq(RequestStatusPrimitive::from(status)))
        .count()
        .get_result::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(count as usize)
}
