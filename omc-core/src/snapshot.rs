//! Structured snapshots of locations as stored within change requests.
//!
//! Snapshots are JSON objects. Only the editable fields and the id of
//! the target location are recorded, all other metadata is omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    entities::*,
    util::coordinates::{format_coordinates, format_point, parse_coordinates, ParseError},
};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldValueError {
    #[error("The name must not be empty")]
    EmptyName,
    #[error("Invalid coordinates: {0}")]
    Coordinates(#[from] ParseError),
    #[error("Exactly one point is expected when editing a single point")]
    SinglePointExpected,
    #[error(transparent)]
    PointOutOfRange(#[from] PointOutOfRange),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(with = "coordinates_json")]
    pub coordinates: Coordinates,
    #[serde(default, rename = "type", alias = "category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "media")]
    pub media_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl LocationSnapshot {
    pub fn from_location(location: &Location) -> Self {
        let Location {
            id,
            name,
            coordinates,
            category,
            description,
            media_urls,
            icon,
            ..
        } = location;
        Self {
            id: Some(id.to_string()),
            name: name.clone(),
            coordinates: coordinates.clone(),
            category: category.clone(),
            description: description.clone(),
            media_urls: media_urls.clone(),
            icon: icon.clone(),
        }
    }

    pub fn parse(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The id of the location this snapshot refers to.
    pub fn target_id(&self) -> Option<Id> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(Id::from)
    }

    pub fn into_location(self, id: Id, approved_by: Option<UserId>, now: Timestamp) -> Location {
        let Self {
            name,
            coordinates,
            category,
            description,
            media_urls,
            icon,
            ..
        } = self;
        Location {
            id,
            name,
            coordinates,
            category,
            description,
            media_urls,
            icon,
            approved_by,
            last_modified: now,
        }
    }

    /// Textual value of a field as presented in forms.
    pub fn field_value(&self, field: EditField, selection: PointSelection) -> String {
        match field {
            EditField::Name => self.name.clone(),
            EditField::Description => self.description.clone(),
            EditField::Category => self.category.clone(),
            EditField::Icon => self.icon.clone().unwrap_or_default(),
            EditField::Media => self.media_urls.join("\n"),
            EditField::Coordinates => match selection {
                PointSelection::Point(index) => self
                    .coordinates
                    .point(index)
                    .map(format_point)
                    .unwrap_or_default(),
                PointSelection::Entity | PointSelection::AllPoints => {
                    format_coordinates(&self.coordinates)
                }
            },
        }
    }

    /// Replaces a field with a textual value.
    pub fn set_field_value(
        &mut self,
        field: EditField,
        value: &str,
        selection: PointSelection,
    ) -> Result<(), FieldValueError> {
        let value = value.trim();
        match field {
            EditField::Name => {
                if value.is_empty() {
                    return Err(FieldValueError::EmptyName);
                }
                self.name = value.to_owned();
            }
            EditField::Description => value.clone_into(&mut self.description),
            EditField::Category => value.clone_into(&mut self.category),
            EditField::Icon => {
                self.icon = Some(value.to_owned()).filter(|icon| !icon.is_empty());
            }
            EditField::Media => self.media_urls = parse_media_urls(value),
            EditField::Coordinates => {
                let parsed = parse_coordinates(value)?;
                self.coordinates = match selection {
                    PointSelection::Point(index) => {
                        let [point] = parsed.points() else {
                            return Err(FieldValueError::SinglePointExpected);
                        };
                        self.coordinates.with_point_replaced(index, *point)?
                    }
                    PointSelection::Entity | PointSelection::AllPoints => parsed,
                };
            }
        }
        Ok(())
    }

    fn field_eq(&self, other: &Self, field: EditField) -> bool {
        match field {
            EditField::Name => self.name == other.name,
            EditField::Description => self.description == other.description,
            EditField::Category => self.category == other.category,
            EditField::Icon => self.icon == other.icon,
            EditField::Media => self.media_urls == other.media_urls,
            EditField::Coordinates => self.coordinates == other.coordinates,
        }
    }

    /// All fields whose values differ, in a fixed order.
    pub fn changed_fields(&self, other: &Self) -> Vec<EditField> {
        use strum::IntoEnumIterator as _;
        EditField::iter()
            .filter(|field| !self.field_eq(other, *field))
            .collect()
    }

    /// Copies the given fields into a location.
    pub fn apply_fields(&self, location: &mut Location, fields: &[EditField]) {
        for field in fields {
            match field {
                EditField::Name => location.name.clone_from(&self.name),
                EditField::Description => location.description.clone_from(&self.description),
                EditField::Category => location.category.clone_from(&self.category),
                EditField::Icon => location.icon.clone_from(&self.icon),
                EditField::Media => location.media_urls.clone_from(&self.media_urls),
                EditField::Coordinates => location.coordinates.clone_from(&self.coordinates),
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CoordinatesJson(#[serde(with = "coordinates_json")] Coordinates);

/// JSON representation of coordinates: `[x,y]` or `[[x,y],...]`.
pub fn coordinates_to_json(coordinates: &Coordinates) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&CoordinatesJson(coordinates.clone()))?)
}

pub fn coordinates_from_json(json: &str) -> Result<Coordinates, SnapshotError> {
    let CoordinatesJson(coordinates) = serde_json::from_str(json)?;
    Ok(coordinates)
}

/// Media URLs are separated by whitespace or commas.
pub fn parse_media_urls(value: &str) -> Vec<String> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Extracts the textual values of all readable fields.
///
/// Returns `None` if the input is not a JSON object at all.
/// Fields with unexpected contents are skipped.
pub fn lenient_field_values(json: &str) -> Option<BTreeMap<EditField, String>> {
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(json) else {
        return None;
    };
    let mut values = BTreeMap::new();
    for (key, value) in object {
        let Ok(field) = key.parse::<EditField>() else {
            // id and other metadata
            continue;
        };
        let text = match (field, value) {
            (EditField::Coordinates, value) => {
                match coordinates_json::from_value(value) {
                    Ok(coordinates) => format_coordinates(&coordinates),
                    Err(err) => {
                        log::debug!("Skipping malformed coordinates in snapshot: {err}");
                        continue;
                    }
                }
            }
            (EditField::Media, Value::Array(urls)) => urls
                .into_iter()
                .filter_map(|url| match url {
                    Value::String(url) => Some(url),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            (_, Value::String(s)) => s,
            (_, Value::Null) => String::new(),
            (field, value) => {
                log::debug!("Skipping malformed value of field '{field}' in snapshot: {value}");
                continue;
            }
        };
        values.insert(field, text);
    }
    Some(values)
}

mod coordinates_json {
    use super::*;
    use serde::{de::Error as _, Deserializer, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Single([f64; 2]),
        Multi(Vec<[f64; 2]>),
    }

    impl TryFrom<Repr> for Coordinates {
        type Error = &'static str;
        fn try_from(from: Repr) -> Result<Self, Self::Error> {
            let coordinates = match from {
                Repr::Single(p) => Coordinates::Single(p.into()),
                Repr::Multi(points) => {
                    let points: Vec<Point> = points.into_iter().map(Point::from).collect();
                    Coordinates::Multi(
                        Points::try_from(points).map_err(|_| "empty list of coordinates")?,
                    )
                }
            };
            if !coordinates.points().iter().all(Point::is_finite) {
                return Err("coordinates must be finite numbers");
            }
            Ok(coordinates)
        }
    }

    pub fn serialize<S: Serializer>(c: &Coordinates, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match c {
            Coordinates::Single(p) => Repr::Single((*p).into()),
            Coordinates::Multi(points) => {
                Repr::Multi(points.as_slice().iter().copied().map(Into::into).collect())
            }
        };
        repr.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Coordinates, D::Error> {
        Repr::deserialize(deserializer)?
            .try_into()
            .map_err(D::Error::custom)
    }

    pub fn from_value(value: Value) -> Result<Coordinates, serde_json::Error> {
        deserialize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omc_entities::builders::Builder as _;

    #[test]
    fn parse_single_and_multi_point_snapshots() {
        let s = LocationSnapshot::parse(r#"{"name":"Old Mill","coordinates":[10,20]}"#).unwrap();
        assert_eq!(s.coordinates, Coordinates::Single(Point::new(10.0, 20.0)));
        assert_eq!(s.category, "");
        assert_eq!(s.target_id(), None);

        let s = LocationSnapshot::parse(
            r#"{"id":"abc","name":"Wall","coordinates":[[1,2],[3,4]],"type":"Ruin"}"#,
        )
        .unwrap();
        assert_eq!(s.coordinates.len(), 2);
        assert_eq!(s.category, "Ruin");
        assert_eq!(s.target_id(), Some(Id::from("abc")));
    }

    #[test]
    fn reject_corrupted_snapshots() {
        assert!(LocationSnapshot::parse("{not json").is_err());
        assert!(LocationSnapshot::parse(r#"{"name":"x","coordinates":[]}"#).is_err());
        assert!(LocationSnapshot::parse(r#"{"name":"x"}"#).is_err());
        assert!(LocationSnapshot::parse(r#"{"name":"x","coordinates":"[1,2]"}"#).is_err());
    }

    #[test]
    fn json_keeps_the_shape_of_coordinates() {
        let location = Location::build()
            .id("x")
            .name("Wall")
            .points(&[(1.0, 2.0)])
            .finish();
        let json = LocationSnapshot::from_location(&location).to_json().unwrap();
        assert!(json.contains(r#""coordinates":[[1.0,2.0]]"#));
        let parsed = LocationSnapshot::parse(&json).unwrap();
        assert!(matches!(parsed.coordinates, Coordinates::Multi(_)));
    }

    #[test]
    fn changed_fields_of_identical_snapshots_are_empty() {
        let location = Location::build().name("A").point(1.0, 1.0).finish();
        let a = LocationSnapshot::from_location(&location);
        assert!(a.changed_fields(&a.clone()).is_empty());
        let mut b = a.clone();
        b.description = "changed".into();
        assert_eq!(a.changed_fields(&b), vec![EditField::Description]);
    }

    #[test]
    fn set_single_point_of_multi_point_location() {
        let location = Location::build()
            .name("Wall")
            .points(&[(1.0, 1.0), (2.0, 2.0)])
            .finish();
        let mut s = LocationSnapshot::from_location(&location);
        s.set_field_value(EditField::Coordinates, "[5,5]", PointSelection::Point(1))
            .unwrap();
        assert_eq!(
            s.coordinates.points(),
            &[Point::new(1.0, 1.0), Point::new(5.0, 5.0)]
        );
        assert_eq!(
            s.set_field_value(
                EditField::Coordinates,
                "[5,5],[6,6]",
                PointSelection::Point(0)
            ),
            Err(FieldValueError::SinglePointExpected)
        );
        assert!(s
            .set_field_value(EditField::Coordinates, "[5,5]", PointSelection::Point(7))
            .is_err());
        assert_eq!(
            s.field_value(EditField::Coordinates, PointSelection::Point(1)),
            "[5,5]"
        );
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut s = LocationSnapshot::from_location(&Location::build().name("A").finish());
        assert_eq!(
            s.set_field_value(EditField::Name, "  ", PointSelection::Entity),
            Err(FieldValueError::EmptyName)
        );
    }

    #[test]
    fn lenient_extraction_skips_malformed_fields() {
        let values = lenient_field_values(
            r#"{"id":"x","name":"Mill","coordinates":"oops","type":42,"media":["a",1,"b"],"icon":null}"#,
        )
        .unwrap();
        assert_eq!(values.get(&EditField::Name).unwrap(), "Mill");
        assert_eq!(values.get(&EditField::Media).unwrap(), "a\nb");
        assert_eq!(values.get(&EditField::Icon).unwrap(), "");
        assert!(!values.contains_key(&EditField::Coordinates));
        assert!(!values.contains_key(&EditField::Category));
        assert!(lenient_field_values("name: Mill").is_none());
        assert!(lenient_field_values("[1,2]").is_none());
    }

    #[test]
    fn coordinates_json_keeps_the_shape() {
        let single = Coordinates::Single(Point::new(10.0, 20.0));
        assert_eq!(coordinates_to_json(&single).unwrap(), "[10.0,20.0]");
        let multi = coordinates_from_json("[[1,2]]").unwrap();
        assert_eq!(coordinates_to_json(&multi).unwrap(), "[[1.0,2.0]]");
        assert!(coordinates_from_json("[]").is_err());
        assert!(coordinates_from_json("[1]").is_err());
    }

    #[test]
    fn media_urls_are_split_by_whitespace_and_commas() {
        assert_eq!(
            parse_media_urls("https://a.png, https://b.png\nhttps://c.png"),
            vec!["https://a.png", "https://b.png", "https://c.png"]
        );
    }
}
