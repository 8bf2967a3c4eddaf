//! Typed actions of components and forms.
//!
//! Every custom id is decoded exactly once into an [`Action`].
//! Ids that cannot be decoded yield `None` and are reported
//! to the user as outdated controls.

use omc_boundary::CustomId;
use omc_core::{
    entities::*,
    gateways::chat::{AMEND_ACTION, APPROVE_ACTION, DENY_ACTION},
    util::query::parse_index,
};

pub const NEW_DETAILS: &str = "new_details";
pub const NEW_MERGE: &str = "new_merge";
pub const NEW_DISTINCT: &str = "new_distinct";
pub const EDIT_POINT: &str = "edit_point";
pub const EDIT_FIELD: &str = "edit_field";
pub const EDIT_VALUE: &str = "edit_value";
pub const EDIT_SUBMIT: &str = "edit_submit";
pub const EDIT_REASON: &str = "edit_reason";
pub const EDIT_CANCEL: &str = "edit_cancel";
pub const REMOVE_POINT: &str = "remove_point";
pub const REMOVE_REASON: &str = "remove_reason";
pub const DENY_REASON: &str = "deny_reason";
pub const AMEND_FIELD: &str = "amend_field";
pub const AMEND_VALUE: &str = "amend_value";
pub const AMEND_SAVE: &str = "amend_save";
pub const AMEND_CANCEL: &str = "amend_cancel";

/// A location together with the addressed points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    pub id: Id,
    pub selection: PointSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Form with the details of a new location.
    NewDetails,
    /// Merge a parked draft into an existing location.
    NewMerge { draft: Id, existing: Id },
    /// Submit a parked draft as a distinct location.
    NewDistinct { draft: Id },

    /// Choice of a point of a multi-point location to edit.
    EditPoint { location: Id },
    /// Choice of the field to edit.
    EditField(LocationRef),
    /// Form with the new value of a field.
    EditValue(LocationRef),
    EditSubmit(LocationRef),
    /// Form with the justification of an edit.
    EditReason(LocationRef),
    EditCancel(LocationRef),

    /// Choice of the point to remove.
    RemovePoint { location: Id },
    /// Form with the justification of a removal.
    RemoveReason(LocationRef),

    /// Controls of the moderation message, the request is
    /// identified by the message that carries them.
    Approve,
    Deny,
    Amend,
    /// Form with the justification of a denial.
    DenyReason { message: MessageId },
    AmendField { message: MessageId },
    AmendValue { message: MessageId },
    AmendSave { message: MessageId },
    AmendCancel { message: MessageId },
}

fn encode_selection(selection: PointSelection) -> Option<String> {
    match selection {
        PointSelection::Entity => None,
        PointSelection::Point(_) => selection.ordinal().map(|n| n.to_string()),
        PointSelection::AllPoints => Some("*".into()),
    }
}

fn decode_selection(aux: Option<&str>) -> Option<PointSelection> {
    match aux {
        None => Some(PointSelection::Entity),
        Some(s) => parse_index(s),
    }
}

impl Action {
    /// Decodes an id together with the user it belongs to, if any.
    pub fn decode(id: &CustomId) -> Option<(Self, Option<UserId>)> {
        let target = id.target.as_deref();
        let location_ref = || {
            Some(LocationRef {
                id: Id::from(target?),
                selection: decode_selection(id.aux.as_deref())?,
            })
        };
        let message = || target.map(MessageId::from);
        let action = match id.action.as_str() {
            NEW_DETAILS => Self::NewDetails,
            NEW_MERGE => Self::NewMerge {
                draft: target?.into(),
                existing: id.aux.as_deref()?.into(),
            },
            NEW_DISTINCT => Self::NewDistinct {
                draft: target?.into(),
            },
            EDIT_POINT => Self::EditPoint {
                location: target?.into(),
            },
            EDIT_FIELD => Self::EditField(location_ref()?),
            EDIT_VALUE => Self::EditValue(location_ref()?),
            EDIT_SUBMIT => Self::EditSubmit(location_ref()?),
            EDIT_REASON => Self::EditReason(location_ref()?),
            EDIT_CANCEL => Self::EditCancel(location_ref()?),
            REMOVE_POINT => Self::RemovePoint {
                location: target?.into(),
            },
            REMOVE_REASON => Self::RemoveReason(location_ref()?),
            APPROVE_ACTION => Self::Approve,
            DENY_ACTION => Self::Deny,
            AMEND_ACTION => Self::Amend,
            DENY_REASON => Self::DenyReason { message: message()? },
            AMEND_FIELD => Self::AmendField { message: message()? },
            AMEND_VALUE => Self::AmendValue { message: message()? },
            AMEND_SAVE => Self::AmendSave { message: message()? },
            AMEND_CANCEL => Self::AmendCancel { message: message()? },
            _ => return None,
        };
        Some((action, id.user.as_deref().map(UserId::from)))
    }

    /// Encodes the action bound to the given user.
    pub fn encode(&self, user: Option<&UserId>) -> CustomId {
        let with_location = |action: &str, r: &LocationRef| {
            let id = CustomId::new(action).target(r.id.as_str());
            match encode_selection(r.selection) {
                Some(aux) => id.aux(aux),
                None => id,
            }
        };
        let id = match self {
            Self::NewDetails => CustomId::new(NEW_DETAILS),
            Self::NewMerge { draft, existing } => CustomId::new(NEW_MERGE)
                .target(draft.as_str())
                .aux(existing.as_str()),
            Self::NewDistinct { draft } => CustomId::new(NEW_DISTINCT).target(draft.as_str()),
            Self::EditPoint { location } => CustomId::new(EDIT_POINT).target(location.as_str()),
            Self::EditField(r) => with_location(EDIT_FIELD, r),
            Self::EditValue(r) => with_location(EDIT_VALUE, r),
            Self::EditSubmit(r) => with_location(EDIT_SUBMIT, r),
            Self::EditReason(r) => with_location(EDIT_REASON, r),
            Self::EditCancel(r) => with_location(EDIT_CANCEL, r),
            Self::RemovePoint { location } => {
                CustomId::new(REMOVE_POINT).target(location.as_str())
            }
            Self::RemoveReason(r) => with_location(REMOVE_REASON, r),
            Self::Approve => CustomId::new(APPROVE_ACTION),
            Self::Deny => CustomId::new(DENY_ACTION),
            Self::Amend => CustomId::new(AMEND_ACTION),
            Self::DenyReason { message } => CustomId::new(DENY_REASON).target(message.as_str()),
            Self::AmendField { message } => CustomId::new(AMEND_FIELD).target(message.as_str()),
            Self::AmendValue { message } => CustomId::new(AMEND_VALUE).target(message.as_str()),
            Self::AmendSave { message } => CustomId::new(AMEND_SAVE).target(message.as_str()),
            Self::AmendCancel { message } => {
                CustomId::new(AMEND_CANCEL).target(message.as_str())
            }
        };
        match user {
            Some(user) => id.user(user.as_str()),
            None => id,
        }
    }
}
