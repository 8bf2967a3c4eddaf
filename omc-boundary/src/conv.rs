use super::*;
use omc_entities as e;

impl From<&e::candidate::ResolvedCandidate> for Choice {
    fn from(from: &e::candidate::ResolvedCandidate) -> Self {
        Self {
            label: from.label(),
            value: from.value(),
        }
    }
}

impl From<e::candidate::ResolvedCandidate> for Choice {
    fn from(from: e::candidate::ResolvedCandidate) -> Self {
        (&from).into()
    }
}

impl From<e::location::EditField> for Choice {
    fn from(from: e::location::EditField) -> Self {
        Self {
            label: from.label().to_owned(),
            value: from.as_key().to_owned(),
        }
    }
}
