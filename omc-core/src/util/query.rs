use lazy_static::lazy_static;
use omc_entities::coordinates::PointSelection;
use regex::Regex;

lazy_static! {
    static ref INDEX_SUFFIX: Regex = Regex::new(r"^(?P<name>.*\S)\s+#(?P<index>\d+|\*)$").unwrap();
}

/// A name optionally followed by a point index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    pub name: String,
    pub selection: Option<PointSelection>,
}

/// Splits index markers from free text.
///
/// Recognized forms are `"name #N"`, `"name #*"`, `"name|N"` and `"name|*"`
/// with 1-based indexes. Anything else after the last `|` or `#` stays
/// part of the name, so names like `"Bar | Grill"` remain addressable.
pub fn parse_name_query(input: &str) -> NameQuery {
    let input = input.trim();
    if let Some((name, index)) = input.rsplit_once('|') {
        if let Some(selection) = parse_index(index.trim()) {
            return NameQuery {
                name: name.trim().to_owned(),
                selection: Some(selection),
            };
        }
    }
    if let Some(caps) = INDEX_SUFFIX.captures(input) {
        if let Some(selection) = parse_index(&caps["index"]) {
            return NameQuery {
                name: caps["name"].trim().to_owned(),
                selection: Some(selection),
            };
        }
    }
    NameQuery {
        name: input.to_owned(),
        selection: None,
    }
}

/// The key for comparing names regardless of their case.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Parses an external index: `*` or a 1-based ordinal.
pub fn parse_index(s: &str) -> Option<PointSelection> {
    if s == "*" {
        return Some(PointSelection::AllPoints);
    }
    s.parse::<usize>()
        .ok()
        .and_then(PointSelection::from_ordinal)
}
