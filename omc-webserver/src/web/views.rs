use omc_application::prelude::Approved;
use omc_boundary::{ButtonStyle, Choice, Component, Message, Modal, TextField};
use omc_core::{
    entities::*, usecases::Approval, util::coordinates::format_point, MAX_CHOICES,
};
use strum::IntoEnumIterator as _;

use super::action::{Action, LocationRef};

pub const REASON_FIELD: &str = "reason";

/// Value of the whole-location entry in the removal menu.
pub const ENTITY_CHOICE: &str = "entity";

fn selection_suffix(selection: PointSelection) -> String {
    match selection {
        PointSelection::Entity => String::new(),
        PointSelection::Point(_) => selection
            .ordinal()
            .map(|n| format!(" #{n}"))
            .unwrap_or_default(),
        PointSelection::AllPoints => " (all points)".into(),
    }
}

fn field_choices() -> Vec<Choice> {
    EditField::iter().map(Choice::from).collect()
}

fn edit_lines(session: &EditSession) -> Vec<String> {
    session
        .field_edits
        .iter()
        .map(|(field, edit)| {
            format!(
                "- {}: {} -> {}",
                field.label(),
                edit.old_value,
                edit.new_value
            )
        })
        .collect()
}

pub fn new_details_modal(name: &str) -> Modal {
    Modal {
        custom_id: Action::NewDetails.encode(None).to_string(),
        title: "New location".into(),
        fields: vec![
            TextField {
                name: EditField::Name.as_key().into(),
                label: EditField::Name.label().into(),
                value: name.trim().into(),
                required: true,
                multiline: false,
            },
            TextField {
                name: EditField::Coordinates.as_key().into(),
                label: "Coordinates, e.g. [10,20]".into(),
                value: String::new(),
                required: true,
                multiline: false,
            },
            TextField {
                name: EditField::Description.as_key().into(),
                label: EditField::Description.label().into(),
                value: String::new(),
                required: false,
                multiline: true,
            },
        ],
    }
}

pub fn near_match(user: &UserId, draft: &Id, existing: &Location) -> Message {
    let merge = Action::NewMerge {
        draft: draft.clone(),
        existing: existing.id.clone(),
    };
    let distinct = Action::NewDistinct {
        draft: draft.clone(),
    };
    Message::ephemeral(format!(
        "A location named **{}** already exists. Should your proposal be merged into it?",
        existing.name
    ))
    .with_components(vec![
        Component::button(merge.encode(Some(user)), "Merge", ButtonStyle::Primary),
        Component::button(
            distinct.encode(Some(user)),
            "Create a new location",
            ButtonStyle::Secondary,
        ),
    ])
}

/// Choice of a single point, optionally with the whole
/// location or all points as additional entries.
pub fn point_menu(
    action: &Action,
    user: &UserId,
    location: &Location,
    extra: (&str, &str),
) -> Message {
    let (extra_label, extra_value) = extra;
    let points = location
        .coordinates
        .points()
        .iter()
        .enumerate()
        .map(|(index, point)| Choice {
            label: format!("#{} {}", index + 1, format_point(*point)),
            value: (index + 1).to_string(),
        });
    let options = std::iter::once(Choice {
        label: extra_label.into(),
        value: extra_value.into(),
    })
    .chain(points)
    .take(MAX_CHOICES)
    .collect();
    Message::ephemeral(format!(
        "**{}** has {} points. Which one do you mean?",
        location.name,
        location.coordinates.len()
    ))
    .with_components(vec![Component::select(
        action.encode(Some(user)),
        "Choose a point",
        options,
    )])
}

pub fn edit_menu(user: &UserId, location: &LocationRef, name: &str, session: &EditSession) -> Message {
    let mut lines = vec![format!(
        "Editing **{name}{}**. Choose a field to change.",
        selection_suffix(location.selection)
    )];
    lines.extend(edit_lines(session));
    Message::ephemeral(lines.join("\n")).with_components(vec![
        Component::select(
            Action::EditField(location.clone()).encode(Some(user)),
            "Choose a field",
            field_choices(),
        ),
        Component::button(
            Action::EditSubmit(location.clone()).encode(Some(user)),
            "Submit",
            ButtonStyle::Primary,
        ),
        Component::button(
            Action::EditCancel(location.clone()).encode(Some(user)),
            "Cancel",
            ButtonStyle::Secondary,
        ),
    ])
}

pub fn amendment_menu(moderator: &UserId, message: &MessageId, session: &EditSession) -> Message {
    let mut lines = vec![format!(
        "Modifying the request for **{}** before approval.",
        session.display_name
    )];
    lines.extend(edit_lines(session));
    Message::ephemeral(lines.join("\n")).with_components(vec![
        Component::select(
            Action::AmendField {
                message: message.clone(),
            }
            .encode(Some(moderator)),
            "Choose a field",
            field_choices(),
        ),
        Component::button(
            Action::AmendSave {
                message: message.clone(),
            }
            .encode(Some(moderator)),
            "Save",
            ButtonStyle::Primary,
        ),
        Component::button(
            Action::AmendCancel {
                message: message.clone(),
            }
            .encode(Some(moderator)),
            "Cancel",
            ButtonStyle::Secondary,
        ),
    ])
}

/// Form pre-populated with the current value of a field.
pub fn value_modal(action: &Action, user: &UserId, field: EditField, value: String) -> Modal {
    Modal {
        custom_id: action.encode(Some(user)).to_string(),
        title: format!("Change {}", field.label()),
        fields: vec![TextField {
            name: field.as_key().into(),
            label: field.label().into(),
            value,
            required: field == EditField::Name,
            multiline: matches!(field, EditField::Description | EditField::Media),
        }],
    }
}

pub fn reason_modal(action: &Action, user: Option<&UserId>, title: &str) -> Modal {
    Modal {
        custom_id: action.encode(user).to_string(),
        title: title.into(),
        fields: vec![TextField {
            name: REASON_FIELD.into(),
            label: "Justification".into(),
            value: String::new(),
            required: true,
            multiline: true,
        }],
    }
}

pub fn submitted(request: &ChangeRequest) -> Message {
    Message::ephemeral(format!(
        "Thank you! Your {} request has been submitted for review.",
        request.kind
    ))
}

pub fn approved(moderator: &UserId, approved: &Approved) -> Message {
    let outcome = match &approved.approval {
        Approval::Created(location) => format!("created **{}**", location.name),
        Approval::Merged { location, .. } => format!("merged into **{}**", location.name),
        Approval::Updated { location, changed } => {
            let fields: Vec<_> = changed.iter().map(|f| f.label()).collect();
            format!("updated {} of **{}**", fields.join(", "), location.name)
        }
        Approval::Unchanged => "no changes were necessary".into(),
        Approval::Removed(id) => format!("removed location {id}"),
    };
    Message {
        content: format!(
            "Request {} approved by {moderator}: {outcome}.",
            approved.request.id
        ),
        ephemeral: false,
        components: vec![],
    }
}

pub fn denied(moderator: &UserId, request: &ChangeRequest) -> Message {
    Message {
        content: format!(
            "Request {} dismissed by {moderator}: {}",
            request.id,
            request.review_comment.as_deref().unwrap_or_default()
        ),
        ephemeral: false,
        components: vec![],
    }
}

pub fn reverted(request: &ChangeRequest) -> Message {
    Message::ephemeral(format!(
        "Request {} has been reverted.",
        request.id
    ))
}

pub fn amended(request: &ChangeRequest) -> Message {
    Message::ephemeral(format!(
        "The modifications of request {} have been saved. It can be approved now.",
        request.id
    ))
}

pub fn discarded() -> Message {
    Message::ephemeral("Your changes have been discarded.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use omc_entities::builders::Builder as _;

    #[test]
    fn point_menu_lists_all_points() {
        let location = Location::build()
            .name("Wall")
            .points(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)])
            .finish();
        let action = Action::EditPoint {
            location: location.id.clone(),
        };
        let msg = point_menu(&action, &"u".into(), &location, ("All points", "*"));
        let [Component::Select { options, .. }] = msg.components.as_slice() else {
            panic!("expected a single select menu");
        };
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].value, "*");
        assert_eq!(options[3].value, "3");
        assert_eq!(options[3].label, "#3 [5,6]");
    }

    #[test]
    fn point_menu_is_capped() {
        let points: Vec<_> = (0..40).map(|i| (i as f64, 0.0)).collect();
        let location = Location::build().name("Fence").points(&points).finish();
        let action = Action::RemovePoint {
            location: location.id.clone(),
        };
        let msg = point_menu(&action, &"u".into(), &location, ("Whole location", ENTITY_CHOICE));
        let [Component::Select { options, .. }] = msg.components.as_slice() else {
            panic!("expected a single select menu");
        };
        assert_eq!(options.len(), MAX_CHOICES);
    }

    #[test]
    fn edit_menu_lists_pending_edits() {
        let mut session = EditSession::empty("u".into(), EditTarget::draft(), Timestamp::now());
        session.field_edits.insert(
            EditField::Name,
            FieldEdit {
                old_value: "Mill".into(),
                new_value: "Old Mill".into(),
                timestamp: Timestamp::now(),
            },
        );
        let location = LocationRef {
            id: "loc".into(),
            selection: PointSelection::Point(1),
        };
        let msg = edit_menu(&"u".into(), &location, "Mill", &session);
        assert!(msg.content.contains("**Mill #2**"));
        assert!(msg.content.contains("- Name: Mill -> Old Mill"));
        assert_eq!(msg.components.len(), 3);
    }
}
