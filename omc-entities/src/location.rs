use std::fmt;

use strum::{EnumCount, EnumIter, EnumString};

use crate::{coordinates::*, id::*, time::*};

/// Canonical map entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: Id,
    pub name: String,
    pub coordinates: Coordinates,
    pub category: String,
    pub description: String,
    pub media_urls: Vec<String>,
    pub icon: Option<String>,
    pub approved_by: Option<UserId>,
    pub last_modified: Timestamp,
}

impl Location {
    pub fn is_multi_point(&self) -> bool {
        self.coordinates.is_multi_point()
    }
}

/// The fields of a location that can be changed by a request.
///
/// The string representation is used as field name in forms,
/// snapshots and legacy change descriptions.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumCount, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EditField {
    Name,
    Description,
    #[strum(serialize = "type", serialize = "category")]
    Category,
    Icon,
    Coordinates,
    #[strum(serialize = "media", serialize = "media_urls")]
    Media,
}

impl EditField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Category => "Type",
            Self::Icon => "Icon",
            Self::Coordinates => "Coordinates",
            Self::Media => "Media URLs",
        }
    }

    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "type",
            Self::Icon => "icon",
            Self::Coordinates => "coordinates",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for EditField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_key())
    }
}
