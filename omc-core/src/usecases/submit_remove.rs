use super::{prelude::*, *};

/// Prepares a request to remove a location or one of its points.
///
/// The proposed state is empty if the whole location is removed.
pub fn remove_location_request<R>(
    repo: &R,
    requester_id: UserId,
    location_id: &Id,
    selection: PointSelection,
    justification: &str,
) -> Result<NewChangeRequest>
where
    R: LocationRepo,
{
    let reason = non_blank(justification).ok_or(Error::MissingJustification)?;
    let location = repo.get_location(location_id.as_str())?;
    let current = LocationSnapshot::from_location(&location);
    let new = match selection {
        PointSelection::AllPoints => return Err(Error::WildcardRemoval),
        PointSelection::Entity => None,
        PointSelection::Point(index) => {
            location
                .coordinates
                .without_point(index)?
                .map(|coordinates| LocationSnapshot {
                    coordinates,
                    ..current.clone()
                })
        }
    };
    Ok(NewChangeRequest {
        kind: RequestKind::Remove,
        requester_id,
        reason: Some(reason.to_owned()),
        selection,
        current: Some(current),
        new,
    })
}

#[cfg(test)]
mod tests {
    use super::{super::tests::MockDb, *};
    use omc_entities::builders::Builder as _;

    fn db_with_wall() -> (MockDb, Location) {
        let db = MockDb::default();
        let location = Location::build()
            .name("Wall")
            .points(&[(1.0, 1.0), (2.0, 2.0)])
            .finish();
        db.add_location(location.clone());
        (db, location)
    }

    #[test]
    fn wildcard_is_rejected() {
        let (db, location) = db_with_wall();
        assert!(matches!(
            remove_location_request(&db, "a".into(), &location.id, PointSelection::AllPoints, "gone"),
            Err(Error::WildcardRemoval)
        ));
    }

    #[test]
    fn justification_is_required() {
        let (db, location) = db_with_wall();
        assert!(matches!(
            remove_location_request(&db, "a".into(), &location.id, PointSelection::Entity, ""),
            Err(Error::MissingJustification)
        ));
    }

    #[test]
    fn remove_single_point() {
        let (db, location) = db_with_wall();
        let request =
            remove_location_request(&db, "a".into(), &location.id, PointSelection::Point(0), "gone")
                .unwrap();
        assert_eq!(request.kind, RequestKind::Remove);
        assert_eq!(
            request.new.unwrap().coordinates.points(),
            &[Point::new(2.0, 2.0)]
        );
        assert!(matches!(
            remove_location_request(&db, "a".into(), &location.id, PointSelection::Point(2), "gone"),
            Err(Error::PointOutOfRange(_))
        ));
    }

    #[test]
    fn remove_whole_location() {
        let (db, location) = db_with_wall();
        let request =
            remove_location_request(&db, "a".into(), &location.id, PointSelection::Entity, "gone")
                .unwrap();
        assert!(request.new.is_none());
        assert_eq!(request.current.unwrap().target_id(), Some(location.id));
    }
}
