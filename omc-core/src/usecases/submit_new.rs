use super::{prelude::*, *};
use crate::{gateways::classify::ClassifierGateway, util::coordinates::parse_coordinates};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLocationProposal {
    pub name: String,
    pub coordinates: String,
    pub description: String,
}

impl NewLocationProposal {
    /// Recovers a proposal that has been parked in an edit session.
    pub fn from_session(session: &EditSession) -> Self {
        let value = |field| session.new_value(field).unwrap_or_default().to_owned();
        Self {
            name: value(EditField::Name),
            coordinates: value(EditField::Coordinates),
            description: value(EditField::Description),
        }
    }

    /// The proposal as field edits without any previous values.
    pub fn into_field_edits(self, now: Timestamp) -> FieldEdits {
        let Self {
            name,
            coordinates,
            description,
        } = self;
        [
            (EditField::Name, name),
            (EditField::Coordinates, coordinates),
            (EditField::Description, description),
        ]
        .into_iter()
        .map(|(field, new_value)| {
            (
                field,
                FieldEdit {
                    old_value: String::new(),
                    new_value,
                    timestamp: now,
                },
            )
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySettings {
    /// Used whenever the classifier fails.
    pub fallback: String,
    /// Accepted results of the classifier, any result is accepted if empty.
    pub categories: Vec<String>,
}

pub fn validate_new_location(proposal: &NewLocationProposal) -> Result<LocationSnapshot> {
    let name = non_blank(&proposal.name).ok_or(Error::EmptyName)?;
    let coordinates = parse_coordinates(&proposal.coordinates)?;
    Ok(LocationSnapshot {
        id: None,
        name: name.to_owned(),
        coordinates,
        category: String::new(),
        description: proposal.description.trim().to_owned(),
        media_urls: vec![],
        icon: None,
    })
}

/// Infers the type of a new location.
///
/// Never fails: the fallback category is returned if the classifier
/// is unavailable, fails or answers with an unknown category.
pub fn classify_category(
    classifier: Option<&dyn ClassifierGateway>,
    settings: &CategorySettings,
    name: &str,
    description: &str,
) -> String {
    let Some(classifier) = classifier else {
        log::debug!("No classifier configured, using fallback category");
        return settings.fallback.clone();
    };
    let category = match classifier.classify(name, description, &settings.categories) {
        Ok(category) => category,
        Err(err) => {
            log::warn!(
                "Failed to classify '{name}', using fallback category '{}': {err}",
                settings.fallback
            );
            return settings.fallback.clone();
        }
    };
    let category = category.trim();
    if settings.categories.is_empty() {
        if let Some(category) = non_blank(category) {
            return category.to_owned();
        }
    }
    if let Some(known) = settings
        .categories
        .iter()
        .find(|known| known.eq_ignore_ascii_case(category))
    {
        return known.clone();
    }
    log::warn!(
        "Classifier returned unknown category '{category}' for '{name}', using fallback category '{}'",
        settings.fallback
    );
    settings.fallback.clone()
}

/// Prepares a request for a new location.
///
/// If the requester decided to merge the proposal into an existing
/// location, the proposal adopts the name of that location.
pub fn new_location_request(
    requester_id: UserId,
    mut proposal: LocationSnapshot,
    category: String,
    merge_into: Option<&Location>,
) -> NewChangeRequest {
    if let Some(existing) = merge_into {
        proposal.name.clone_from(&existing.name);
    }
    proposal.category = category;
    NewChangeRequest {
        kind: RequestKind::New,
        requester_id,
        reason: None,
        selection: PointSelection::Entity,
        current: None,
        new: Some(proposal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omc_entities::builders::Builder as _;

    struct Classifier(anyhow::Result<&'static str>);

    impl ClassifierGateway for Classifier {
        fn classify(&self, _: &str, _: &str, _: &[String]) -> anyhow::Result<String> {
            match &self.0 {
                Ok(category) => Ok(category.to_string()),
                Err(err) => Err(anyhow::anyhow!("{err}")),
            }
        }
    }

    fn settings() -> CategorySettings {
        CategorySettings {
            fallback: "Landmark".into(),
            categories: vec!["Landmark".into(), "Ruin".into()],
        }
    }

    fn proposal(name: &str, coordinates: &str) -> NewLocationProposal {
        NewLocationProposal {
            name: name.into(),
            coordinates: coordinates.into(),
            description: " Ruins ".into(),
        }
    }

    #[test]
    fn validate_proposal() {
        let snapshot = validate_new_location(&proposal(" Old Mill ", "[10,20]")).unwrap();
        assert_eq!(snapshot.name, "Old Mill");
        assert_eq!(snapshot.description, "Ruins");
        assert_eq!(snapshot.coordinates, Coordinates::Single(Point::new(10.0, 20.0)));
        assert!(matches!(
            validate_new_location(&proposal(" ", "[10,20]")),
            Err(Error::EmptyName)
        ));
        assert!(matches!(
            validate_new_location(&proposal("Mill", "10,20")),
            Err(Error::Coordinates(_))
        ));
    }

    #[test]
    fn classifier_failures_fall_back() {
        let settings = settings();
        let unreachable = Classifier(Err(anyhow::anyhow!("connection refused")));
        assert_eq!(
            classify_category(Some(&unreachable), &settings, "Old Mill", "Ruins"),
            "Landmark"
        );
        assert_eq!(classify_category(None, &settings, "Old Mill", ""), "Landmark");
        let unknown = Classifier(Ok("Spaceport"));
        assert_eq!(
            classify_category(Some(&unknown), &settings, "Old Mill", ""),
            "Landmark"
        );
        let known = Classifier(Ok(" ruin "));
        assert_eq!(classify_category(Some(&known), &settings, "Old Mill", ""), "Ruin");
    }

    #[test]
    fn any_category_is_accepted_without_a_list() {
        let settings = CategorySettings {
            fallback: "Other".into(),
            categories: vec![],
        };
        let classifier = Classifier(Ok("Bridge"));
        assert_eq!(classify_category(Some(&classifier), &settings, "x", ""), "Bridge");
        let classifier = Classifier(Ok(""));
        assert_eq!(classify_category(Some(&classifier), &settings, "x", ""), "Other");
    }

    #[test]
    fn merging_adopts_the_existing_name() {
        let existing = Location::build().name("Old Mill").finish();
        let snapshot = validate_new_location(&proposal("old mill", "[1,1]")).unwrap();
        let request = new_location_request("alice".into(), snapshot, "Ruin".into(), Some(&existing));
        let new = request.new.unwrap();
        assert_eq!(new.name, "Old Mill");
        assert_eq!(new.category, "Ruin");
        assert!(request.current.is_none());
    }

    #[test]
    fn proposals_survive_a_session() {
        let p = proposal("Old Mill", "[10,20]");
        let now = Timestamp::now();
        let mut session = EditSession::empty("alice".into(), EditTarget::draft(), now);
        session.field_edits = p.clone().into_field_edits(now);
        assert_eq!(NewLocationProposal::from_session(&session), p);
    }
}
