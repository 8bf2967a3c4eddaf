//! Transient buffers of in-progress edit proposals.

use std::collections::HashMap;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use regex::Regex;

use crate::{entities::*, snapshot::lenient_field_values};

/// Storage of edit sessions, keyed by user and target.
pub trait SessionStore: Send + Sync {
    /// Never fails: returns an empty session if there is none.
    fn get(&self, user_id: &UserId, target: &EditTarget) -> EditSession;

    /// Creates or replaces the edits of a session.
    ///
    /// The creation time of an existing session is preserved.
    fn save(
        &self,
        user_id: &UserId,
        target: &EditTarget,
        display_name: &str,
        field_edits: FieldEdits,
    ) -> EditSession;

    fn delete(&self, user_id: &UserId, target: &EditTarget);

    /// Evicts all sessions that have been idle for too long.
    ///
    /// Returns the number of evicted sessions.
    fn sweep(&self, now: Timestamp) -> usize;
}

type SessionKey = (UserId, EditTarget);

/// Process-local session store.
#[derive(Debug)]
pub struct InMemorySessionStore {
    ttl: time::Duration,
    sessions: Mutex<HashMap<SessionKey, EditSession>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: time::Duration) -> Self {
        Self {
            ttl,
            sessions: Default::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    fn is_expired(&self, session: &EditSession, now: Timestamp) -> bool {
        now - session.last_accessed_at > self.ttl
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user_id: &UserId, target: &EditTarget) -> EditSession {
        let now = Timestamp::now();
        let key = (user_id.clone(), target.clone());
        self.sessions
            .lock()
            .get(&key)
            .filter(|session| !self.is_expired(session, now))
            .cloned()
            .unwrap_or_else(|| EditSession::empty(user_id.clone(), target.clone(), now))
    }

    fn save(
        &self,
        user_id: &UserId,
        target: &EditTarget,
        display_name: &str,
        field_edits: FieldEdits,
    ) -> EditSession {
        let now = Timestamp::now();
        let key = (user_id.clone(), target.clone());
        let mut sessions = self.sessions.lock();
        let created_at = sessions
            .get(&key)
            .filter(|session| !self.is_expired(session, now))
            .map_or(now, |session| session.created_at);
        let session = EditSession {
            user_id: user_id.clone(),
            target: target.clone(),
            display_name: display_name.to_owned(),
            field_edits,
            created_at,
            last_accessed_at: now,
        };
        sessions.insert(key, session.clone());
        session
    }

    fn delete(&self, user_id: &UserId, target: &EditTarget) {
        self.sessions
            .lock()
            .remove(&(user_id.clone(), target.clone()));
    }

    fn sweep(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.lock();
        let count = sessions.len();
        sessions.retain(|(user_id, target), session| {
            let expired = self.is_expired(session, now);
            if expired {
                log::debug!("Evicting idle edit session of {user_id} for {target:?}");
            }
            !expired
        });
        count - sessions.len()
    }
}

/// Strategies to reconstruct the field edits of a change request.
///
/// They are tried in the order of [`Bootstrap::CHAIN`]. The first
/// strategy that yields any edits wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// Field-by-field comparison of both snapshots.
    StructuredDiff,
    /// Free text with one `field: value` or `field: old -> new` per line.
    LegacyText,
    /// Nothing could be reconstructed.
    Empty,
}

impl Bootstrap {
    pub const CHAIN: [Self; 3] = [Self::StructuredDiff, Self::LegacyText, Self::Empty];

    pub fn reconstruct(self, request: &ChangeRequest, now: Timestamp) -> Option<FieldEdits> {
        let edits = match self {
            Self::StructuredDiff => structured_diff(request, now),
            Self::LegacyText => legacy_text(request, now),
            Self::Empty => return Some(FieldEdits::new()),
        };
        Some(edits).filter(|edits| !edits.is_empty())
    }
}

/// Reconstructs the field edits of a change request.
///
/// Malformed data is skipped and never aborts the reconstruction.
pub fn bootstrap_from_request(request: &ChangeRequest, now: Timestamp) -> (Bootstrap, FieldEdits) {
    for strategy in Bootstrap::CHAIN {
        if let Some(edits) = strategy.reconstruct(request, now) {
            return (strategy, edits);
        }
    }
    (Bootstrap::Empty, FieldEdits::new())
}

fn structured_diff(request: &ChangeRequest, now: Timestamp) -> FieldEdits {
    let Some(new_values) = request.new_data.as_deref().and_then(lenient_field_values) else {
        return FieldEdits::new();
    };
    let current_values = request
        .current_data
        .as_deref()
        .and_then(lenient_field_values)
        .unwrap_or_default();
    new_values
        .into_iter()
        .filter(|(field, new_value)| current_values.get(field) != Some(new_value))
        .map(|(field, new_value)| {
            let old_value = current_values.get(&field).cloned().unwrap_or_default();
            (
                field,
                FieldEdit {
                    old_value,
                    new_value,
                    timestamp: now,
                },
            )
        })
        .collect()
}

lazy_static! {
    static ref LEGACY_LINE: Regex =
        Regex::new(r"^\s*(?:[-*]\s*)?(?P<field>[A-Za-z][A-Za-z_ ]*?)\s*:\s*(?P<value>.*?)\s*$")
            .unwrap();
}

/// A single line of a legacy change description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyChange {
    pub field: EditField,
    pub old_value: Option<String>,
    pub new_value: String,
}

pub fn parse_legacy_changes(text: &str) -> Vec<LegacyChange> {
    text.lines()
        .filter_map(|line| LEGACY_LINE.captures(line))
        .filter_map(|caps| {
            let field = caps["field"]
                .trim()
                .to_lowercase()
                .replace(' ', "_")
                .parse::<EditField>()
                .ok()?;
            let value = &caps["value"];
            let (old_value, new_value) = match value.split_once(" -> ") {
                Some((old, new)) => (Some(old.trim().to_owned()), new.trim().to_owned()),
                None => (None, value.to_owned()),
            };
            Some(LegacyChange {
                field,
                old_value,
                new_value,
            })
        })
        .collect()
}

fn legacy_text(request: &ChangeRequest, now: Timestamp) -> FieldEdits {
    let Some(text) = request.new_data.as_deref() else {
        return FieldEdits::new();
    };
    parse_legacy_changes(text)
        .into_iter()
        .map(|change| {
            (
                change.field,
                FieldEdit {
                    old_value: change.old_value.unwrap_or_default(),
                    new_value: change.new_value,
                    timestamp: now,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use omc_entities::builders::Builder as _;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new(time::Duration::minutes(30))
    }

    fn edits(field: EditField, old: &str, new: &str) -> FieldEdits {
        let mut edits = FieldEdits::new();
        edits.insert(
            field,
            FieldEdit {
                old_value: old.into(),
                new_value: new.into(),
                timestamp: Timestamp::now(),
            },
        );
        edits
    }

    #[test]
    fn get_unseen_session_returns_empty_sentinel() {
        let store = store();
        let target = EditTarget::location("x", PointSelection::Entity);
        let session = store.get(&"alice".into(), &target);
        assert!(session.is_empty());
        assert_eq!(session.target, target);
        assert!(store.is_empty());
    }

    #[test]
    fn save_preserves_creation_time() {
        let store = store();
        let user = UserId::from("alice");
        let target = EditTarget::location("x", PointSelection::Entity);
        let first = store.save(&user, &target, "Mill", edits(EditField::Name, "a", "b"));
        let second = store.save(&user, &target, "Mill", edits(EditField::Icon, "", "x"));
        assert_eq!(first.created_at, second.created_at);
        assert!(second.last_accessed_at >= first.last_accessed_at);
        assert_eq!(store.get(&user, &target).new_value(EditField::Icon), Some("x"));
        assert_eq!(store.get(&user, &target).new_value(EditField::Name), None);
    }

    #[test]
    fn sessions_are_separated_by_user_and_target() {
        let store = store();
        let target = EditTarget::location("x", PointSelection::Point(0));
        store.save(&"alice".into(), &target, "", edits(EditField::Name, "a", "b"));
        assert!(store.get(&"bob".into(), &target).is_empty());
        let other = EditTarget::location("x", PointSelection::Point(1));
        assert!(store.get(&"alice".into(), &other).is_empty());
    }

    #[test]
    fn delete_is_idempotent() {
        let store = store();
        let user = UserId::from("alice");
        let target = EditTarget::draft();
        store.save(&user, &target, "", edits(EditField::Name, "", "b"));
        store.delete(&user, &target);
        store.delete(&user, &target);
        assert!(store.get(&user, &target).is_empty());
    }

    #[test]
    fn sweep_evicts_idle_sessions() {
        let store = store();
        let target = EditTarget::draft();
        store.save(&"alice".into(), &target, "", edits(EditField::Name, "", "b"));
        assert_eq!(store.sweep(Timestamp::now()), 0);
        assert_eq!(store.len(), 1);
        let later = Timestamp::now() + time::Duration::minutes(31);
        assert_eq!(store.sweep(later), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn bootstrap_from_structured_snapshots() {
        let request = ChangeRequest::build()
            .kind(RequestKind::Edit)
            .current_data(Some(r#"{"id":"x","name":"Mill","coordinates":[1,2],"type":"Ruin"}"#))
            .new_data(Some(r#"{"id":"x","name":"Old Mill","coordinates":[1,2],"type":"Ruin"}"#))
            .finish();
        let (strategy, edits) = bootstrap_from_request(&request, Timestamp::now());
        assert_eq!(strategy, Bootstrap::StructuredDiff);
        assert_eq!(edits.len(), 1);
        let edit = &edits[&EditField::Name];
        assert_eq!(edit.old_value, "Mill");
        assert_eq!(edit.new_value, "Old Mill");
    }

    #[test]
    fn bootstrap_skips_malformed_fields() {
        let request = ChangeRequest::build()
            .current_data(Some("garbage"))
            .new_data(Some(r#"{"name":"Mill","coordinates":"oops"}"#))
            .finish();
        let (strategy, edits) = bootstrap_from_request(&request, Timestamp::now());
        assert_eq!(strategy, Bootstrap::StructuredDiff);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[&EditField::Name].old_value, "");
    }

    #[test]
    fn bootstrap_falls_back_to_legacy_text() {
        let request = ChangeRequest::build()
            .new_data(Some("Name: Mill -> Old Mill\n- Type: Ruin\nunknown: x\nno colon here"))
            .finish();
        let (strategy, edits) = bootstrap_from_request(&request, Timestamp::now());
        assert_eq!(strategy, Bootstrap::LegacyText);
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[&EditField::Name].old_value, "Mill");
        assert_eq!(edits[&EditField::Name].new_value, "Old Mill");
        assert_eq!(edits[&EditField::Category].new_value, "Ruin");
    }

    #[test]
    fn bootstrap_without_usable_data_is_empty() {
        let request = ChangeRequest::build().new_data(None).finish();
        let (strategy, edits) = bootstrap_from_request(&request, Timestamp::now());
        assert_eq!(strategy, Bootstrap::Empty);
        assert!(edits.is_empty());

        let same = r#"{"name":"Mill","coordinates":[1,2]}"#;
        let request = ChangeRequest::build()
            .current_data(Some(same))
            .new_data(Some(same))
            .finish();
        assert_eq!(
            bootstrap_from_request(&request, Timestamp::now()).0,
            Bootstrap::Empty
        );
    }

    #[test]
    fn parse_legacy_media_field_label() {
        let changes = parse_legacy_changes("Media URLs: https://a.png");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, EditField::Media);
        assert_eq!(changes[0].old_value, None);
    }
}
