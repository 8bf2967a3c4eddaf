use std::collections::BTreeMap;

use crate::{coordinates::PointSelection, id::*, location::EditField, time::Timestamp};

/// What an edit session is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditTarget {
    /// An existing location, optionally narrowed to some of its points.
    Location { id: Id, selection: PointSelection },
    /// A pending change request that is amended by a moderator.
    Request(MessageId),
    /// A proposal for a new location that has not been submitted yet.
    Draft(Id),
}

impl EditTarget {
    pub fn location(id: impl Into<Id>, selection: PointSelection) -> Self {
        Self::Location {
            id: id.into(),
            selection,
        }
    }

    /// A new, unique draft.
    pub fn draft() -> Self {
        Self::Draft(Id::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub old_value: String,
    pub new_value: String,
    pub timestamp: Timestamp,
}

pub type FieldEdits = BTreeMap<EditField, FieldEdit>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub user_id: UserId,
    pub target: EditTarget,
    pub display_name: String,
    pub field_edits: FieldEdits,
    pub created_at: Timestamp,
    pub last_accessed_at: Timestamp,
}

impl EditSession {
    /// A session without any edits.
    pub fn empty(user_id: UserId, target: EditTarget, now: Timestamp) -> Self {
        Self {
            user_id,
            target,
            display_name: String::new(),
            field_edits: Default::default(),
            created_at: now,
            last_accessed_at: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.field_edits.is_empty()
    }

    pub fn new_value(&self, field: EditField) -> Option<&str> {
        self.field_edits.get(&field).map(|e| e.new_value.as_str())
    }
}
