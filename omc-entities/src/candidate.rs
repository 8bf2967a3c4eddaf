use crate::{coordinates::PointSelection, id::Id};

/// A ranked answer of the name resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCandidate {
    pub name: String,
    pub location_id: Id,
    /// `Entity` for single-point locations.
    pub selection: PointSelection,
    pub is_multi_point: bool,
    /// 0 is the best match.
    pub rank: usize,
}

impl ResolvedCandidate {
    /// Human readable label, e.g. "Old Mill #2".
    pub fn label(&self) -> String {
        match self.selection {
            PointSelection::Entity => self.name.clone(),
            PointSelection::Point(index) => format!("{} #{}", self.name, index + 1),
            PointSelection::AllPoints => format!("{} (all points)", self.name),
        }
    }

    /// Opaque value that is handed back by choice menus: "name", "name|N" or "name|*".
    pub fn value(&self) -> String {
        match self.selection {
            PointSelection::Entity => self.name.clone(),
            PointSelection::Point(index) => format!("{}|{}", self.name, index + 1),
            PointSelection::AllPoints => format!("{}|*", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(selection: PointSelection) -> ResolvedCandidate {
        ResolvedCandidate {
            name: "Old Mill".into(),
            location_id: "x".into(),
            selection,
            is_multi_point: true,
            rank: 0,
        }
    }

    #[test]
    fn labels_and_values() {
        let c = candidate(PointSelection::Point(1));
        assert_eq!(c.label(), "Old Mill #2");
        assert_eq!(c.value(), "Old Mill|2");
        let c = candidate(PointSelection::AllPoints);
        assert_eq!(c.value(), "Old Mill|*");
        let c = candidate(PointSelection::Entity);
        assert_eq!(c.value(), "Old Mill");
    }
}
