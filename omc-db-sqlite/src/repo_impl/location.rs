use super::*;
use omc_core::{
    snapshot::{coordinates_from_json, coordinates_to_json},
    util::query::name_key,
};

fn into_new_location(l: &Location) -> Result<models::NewLocation<'_>> {
    let Location {
        id,
        name,
        coordinates,
        category,
        description,
        media_urls,
        icon,
        approved_by,
        last_modified,
    } = l;
    Ok(models::NewLocation {
        id: id.as_str(),
        name,
        name_key: name_key(name),
        coordinates: coordinates_to_json(coordinates).map_err(anyhow::Error::from)?,
        category,
        description,
        media_urls: serde_json::to_string(media_urls).map_err(anyhow::Error::from)?,
        icon: icon.as_deref(),
        approved_by: approved_by.as_ref().map(UserId::as_str),
        last_modified_at: last_modified.into_millis(),
    })
}

fn load_location(entity: models::LocationEntity) -> Result<Location> {
    let models::LocationEntity {
        rowid: _,
        id,
        name,
        name_key: _,
        coordinates,
        category,
        description,
        media_urls,
        icon,
        approved_by,
        last_modified_at,
    } = entity;
    let coordinates = coordinates_from_json(&coordinates)
        .map_err(|err| anyhow!("Invalid coordinates of location {id}: {err}"))?;
    let media_urls = serde_json::from_str(&media_urls).unwrap_or_else(|err| {
        log::warn!("Ignoring invalid media URLs of location {id}: {err}");
        vec![]
    });
    Ok(Location {
        id: id.into(),
        name,
        coordinates,
        category,
        description,
        media_urls,
        icon,
        approved_by: approved_by.map(Into::into),
        last_modified: Timestamp::from_millis(last_modified_at),
    })
}

fn load_locations(entities: Vec<models::LocationEntity>) -> Result<Vec<Location>> {
    entities.into_iter().map(load_location).collect()
}

pub fn get_location(conn: &mut SqliteConnection, id: &str) -> Result<Location> {
    use schema::locations::dsl;
    let entity = dsl::locations
        .filter(dsl::id.eq(id))
        .first::<models::LocationEntity>(conn)
        .map_err(from_diesel_err)?;
    load_location(entity)
}

pub fn find_locations_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Vec<Location>> {
    use schema::locations::dsl;
    let entities = dsl::locations
        .filter(dsl::name_key.eq(name_key(name)))
        .order_by(dsl::rowid)
        .load::<models::LocationEntity>(conn)
        .map_err(from_diesel_err)?;
    load_locations(entities)
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub fn search_locations(
    conn: &mut SqliteConnection,
    text: &str,
    limit: usize,
) -> Result<Vec<Location>> {
    use schema::locations::dsl;
    let entities = dsl::locations
        .filter(dsl::name_key.like(escape_like(&name_key(text))).escape('\\'))
        .order_by(dsl::name_key)
        .limit(i64::try_from(limit).unwrap_or(i64::MAX))
        .load::<models::LocationEntity>(conn)
        .map_err(from_diesel_err)?;
    load_locations(entities)
}

pub fn all_locations(conn: &mut SqliteConnection) -> Result<Vec<Location>> {
    use schema::locations::dsl;
    let entities = dsl::locations
        .order_by(dsl::rowid)
        .load::<models::LocationEntity>(conn)
        .map_err(from_diesel_err)?;
    load_locations(entities)
}

pub fn create_location(conn: &mut SqliteConnection, l: &Location) -> Result<()> {
    let new_location = into_new_location(l)?;
    diesel::insert_into(schema::locations::table)
        .values(&new_location)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

pub fn update_location(conn: &mut SqliteConnection, l: &Location) -> Result<()> {
    use schema::locations::dsl;
    let new_location = into_new_location(l)?;
    let count = diesel::update(dsl::locations.filter(dsl::id.eq(l.id.as_str())))
        .set(&new_location)
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    debug_assert_eq!(1, count);
    Ok(())
}

pub fn delete_location(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    use schema::locations::dsl;
    let count = diesel::delete(dsl::locations.filter(dsl::id.eq(id)))
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{super::tests::connections, *};
    use omc_entities::builders::Builder as _;

    #[test]
    fn create_update_delete_location() {
        let connections = connections();
        let db = connections.exclusive().unwrap();
        let mut location = Location::build()
            .name("Old Mill")
            .points(&[(1.0, 2.0)])
            .media_urls(vec!["https://a.png"])
            .icon(Some("mill"))
            .finish();
        db.create_location(&location).unwrap();
        assert!(matches!(
            db.create_location(&location),
            Err(repo::Error::AlreadyExists)
        ));
        let stored = db.get_location(location.id.as_str()).unwrap();
        assert_eq!(stored, location);
        // A list with a single point keeps its shape
        assert!(matches!(stored.coordinates, Coordinates::Multi(_)));

        location.description = "Ruins".into();
        location.icon = None;
        db.update_location(&location).unwrap();
        assert_eq!(db.get_location(location.id.as_str()).unwrap(), location);

        db.delete_location(location.id.as_str()).unwrap();
        assert!(matches!(
            db.delete_location(location.id.as_str()),
            Err(repo::Error::NotFound)
        ));
        assert!(matches!(
            db.update_location(&location),
            Err(repo::Error::NotFound)
        ));
    }

    #[test]
    fn find_by_name_ignores_case() {
        let connections = connections();
        let db = connections.exclusive().unwrap();
        db.create_location(&Location::build().name("Old Mill").finish())
            .unwrap();
        db.create_location(&Location::build().name("Old Mill Pond").finish())
            .unwrap();
        assert_eq!(db.find_locations_by_name("old MILL").unwrap().len(), 1);
        assert!(db.find_locations_by_name("old").unwrap().is_empty());
    }

    #[test]
    fn name_lookups_fold_non_ascii_case() {
        let connections = connections();
        let db = connections.exclusive().unwrap();
        db.create_location(&Location::build().name("Ölmühle").finish())
            .unwrap();
        db.create_location(&Location::build().name("Große Ölmühle").finish())
            .unwrap();
        let found = db.find_locations_by_name("ÖLMÜHLE").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ölmühle");
        assert_eq!(db.search_locations("ÖLMÜH", 10).unwrap().len(), 2);
    }

    #[test]
    fn search_by_substring() {
        let connections = connections();
        let db = connections.exclusive().unwrap();
        for name in ["Windmill", "Old Mill", "Harbour", "100% Mill"] {
            db.create_location(&Location::build().name(name).finish())
                .unwrap();
        }
        let names: Vec<_> = db
            .search_locations("mill", 10)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["100% Mill", "Old Mill", "Windmill"]);
        assert_eq!(db.search_locations("0%", 10).unwrap().len(), 1);
        assert_eq!(db.search_locations("mill", 1).unwrap().len(), 1);
    }

    #[test]
    fn restore_creates_or_replaces() {
        let connections = connections();
        let db = connections.exclusive().unwrap();
        let mut location = Location::build().name("Mill").finish();
        db.restore_location(&location).unwrap();
        location.name = "Old Mill".into();
        db.restore_location(&location).unwrap();
        let all = db.all_locations().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Old Mill");
    }
}
