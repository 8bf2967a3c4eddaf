//! Ranking of location names against free text.

use std::collections::BTreeMap;

use crate::{
    entities::*,
    gateways::name_match::NameMatchGateway,
    repositories::{Error as RepoError, LocationRepo},
    util::query::{name_key, parse_name_query, NameQuery},
    MAX_CHOICES,
};

type Result<T> = std::result::Result<T, RepoError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Exact,
    Prefix,
    Substring,
}

fn match_tier(key: &str, query: &str) -> Option<Tier> {
    if key == query {
        Some(Tier::Exact)
    } else if key.starts_with(query) {
        Some(Tier::Prefix)
    } else if key.contains(query) {
        Some(Tier::Substring)
    } else {
        None
    }
}

/// The preferred location for each distinct name (ignoring case).
///
/// Multi-point locations win over single-point locations with the same name.
fn locations_by_name(locations: Vec<Location>) -> BTreeMap<String, Location> {
    let mut by_name = BTreeMap::<String, Location>::new();
    for location in locations {
        let key = name_key(&location.name);
        match by_name.get(&key) {
            Some(existing) if existing.is_multi_point() || !location.is_multi_point() => {}
            _ => {
                by_name.insert(key, location);
            }
        }
    }
    by_name
}

// Keys ordered by tier, alphabetically within each tier
fn direct_matches(by_name: &BTreeMap<String, Location>, query: &str) -> Vec<String> {
    let mut matches: Vec<_> = by_name
        .keys()
        .filter_map(|key| match_tier(key, query).map(|tier| (tier, key)))
        .collect();
    // BTreeMap keys are already sorted, a stable sort keeps that order
    matches.sort_by_key(|(tier, _)| *tier);
    matches.into_iter().map(|(_, key)| key.clone()).collect()
}

fn expand(location: &Location, selection: Option<PointSelection>, rank: usize) -> Vec<ResolvedCandidate> {
    let candidate = |selection| ResolvedCandidate {
        name: location.name.clone(),
        location_id: location.id.clone(),
        selection,
        is_multi_point: location.is_multi_point(),
        rank,
    };
    if !location.is_multi_point() {
        return vec![candidate(PointSelection::Entity)];
    }
    match selection {
        Some(PointSelection::Point(index)) if index < location.coordinates.len() => {
            vec![candidate(PointSelection::Point(index))]
        }
        Some(PointSelection::AllPoints) => vec![candidate(PointSelection::AllPoints)],
        _ => (0..location.coordinates.len())
            .map(PointSelection::Point)
            .chain(std::iter::once(PointSelection::AllPoints))
            .map(candidate)
            .collect(),
    }
}

/// Resolves free text into a ranked list of candidates.
///
/// If fewer names than `limit` match directly the semantic matcher is
/// consulted with the remaining names. Its failures only reduce the
/// number of results.
pub fn resolve_candidates<R>(
    repo: &R,
    matcher: Option<&dyn NameMatchGateway>,
    query: &str,
    limit: usize,
) -> Result<Vec<ResolvedCandidate>>
where
    R: LocationRepo,
{
    let limit = limit.min(MAX_CHOICES);
    let NameQuery { name, selection } = parse_name_query(query);
    let query = name_key(&name);
    let by_name = locations_by_name(repo.all_locations()?);
    let mut names = direct_matches(&by_name, &query);

    if names.len() < limit && !query.is_empty() {
        if let Some(matcher) = matcher {
            let remaining: Vec<_> = by_name
                .iter()
                .filter(|(key, _)| !names.contains(*key))
                .map(|(_, location)| location.name.clone())
                .collect();
            if !remaining.is_empty() {
                match matcher.closest_names(&name, &remaining, limit - names.len()) {
                    Ok(closest) => {
                        for closest in closest {
                            let key = name_key(&closest);
                            if by_name.contains_key(&key) && !names.contains(&key) {
                                names.push(key);
                            }
                        }
                    }
                    Err(err) => {
                        log::warn!("Semantic name matching failed, using direct matches only: {err}");
                    }
                }
            }
        }
    }

    Ok(names
        .iter()
        .filter_map(|key| by_name.get(key))
        .enumerate()
        .flat_map(|(rank, location)| expand(location, selection, rank))
        .take(limit)
        .collect())
}

/// The best direct match for the proposed name of a new location.
///
/// The semantic matcher is never consulted.
pub fn find_near_match<R>(repo: &R, name: &str) -> Result<Option<Location>>
where
    R: LocationRepo,
{
    let query = name_key(name.trim());
    if query.is_empty() {
        return Ok(None);
    }
    // Every direct tier is a substring match
    let mut by_name = locations_by_name(repo.search_locations(&query, usize::MAX)?);
    Ok(direct_matches(&by_name, &query)
        .into_iter()
        .next()
        .and_then(|key| by_name.remove(&key)))
}

/// Looks up the location addressed by a query like `"Old Mill #2"`.
///
/// Returns the requested point selection, if any.
pub fn resolve_target<R>(repo: &R, query: &str) -> Result<(Location, Option<PointSelection>)>
where
    R: LocationRepo,
{
    let NameQuery { name, selection } = parse_name_query(query);
    let mut locations = repo.find_locations_by_name(&name)?;
    if locations.is_empty() {
        return Err(RepoError::NotFound);
    }
    // Prefer the multi-point variant
    locations.sort_by_key(|location| !location.is_multi_point());
    let location = locations.remove(0);
    let selection = match selection {
        Some(PointSelection::Point(index)) if index >= location.coordinates.len() => {
            return Err(RepoError::NotFound);
        }
        Some(selection) if location.is_multi_point() => Some(selection),
        Some(_) | None => None,
    };
    Ok((location, selection))
}
