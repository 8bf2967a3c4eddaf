use super::prelude::*;
use crate::sessions::SessionStore;

/// The points of a location that are affected by edits of a session.
pub fn session_selection(target: &EditTarget) -> PointSelection {
    match target {
        EditTarget::Location { selection, .. } => *selection,
        EditTarget::Request(_) | EditTarget::Draft(_) => PointSelection::Entity,
    }
}

/// Records the submitted value of a single form field.
///
/// The value is validated against the base snapshot before it is stored.
/// The original value of a field is preserved across repeated edits.
pub fn record_field_edit(
    sessions: &dyn SessionStore,
    user_id: &UserId,
    target: &EditTarget,
    base: &LocationSnapshot,
    field: EditField,
    value: &str,
    now: Timestamp,
) -> Result<EditSession> {
    let selection = session_selection(target);
    let mut probe = base.clone();
    probe.set_field_value(field, value, selection)?;

    let mut session = sessions.get(user_id, target);
    let old_value = session
        .field_edits
        .remove(&field)
        .map(|edit| edit.old_value)
        .unwrap_or_else(|| base.field_value(field, selection));
    session.field_edits.insert(
        field,
        FieldEdit {
            old_value,
            new_value: value.trim().to_owned(),
            timestamp: now,
        },
    );
    let display_name = if session.display_name.is_empty() {
        base.name.as_str()
    } else {
        session.display_name.as_str()
    };
    Ok(sessions.save(user_id, target, display_name, session.field_edits.clone()))
}

/// The value that is shown in the form of a field.
pub fn pending_field_value(session: &EditSession, base: &LocationSnapshot, field: EditField) -> String {
    session
        .new_value(field)
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| base.field_value(field, session_selection(&session.target)))
}
