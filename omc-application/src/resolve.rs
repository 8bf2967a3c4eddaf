use super::*;

use omc_core::{gateways::name_match::NameMatchGateway, resolver};

pub fn resolve_candidates(
    connections: &sqlite::Connections,
    matcher: Option<&dyn NameMatchGateway>,
    query: &str,
    limit: usize,
) -> Result<Vec<ResolvedCandidate>> {
    Ok(resolver::resolve_candidates(
        &connections.shared()?,
        matcher,
        query,
        limit,
    )?)
}

/// Finds the location that a user selected by name.
pub fn resolve_target(
    connections: &sqlite::Connections,
    query: &str,
) -> Result<(Location, Option<PointSelection>)> {
    Ok(resolver::resolve_target(&connections.shared()?, query)?)
}

pub fn get_location(connections: &sqlite::Connections, id: &Id) -> Result<Location> {
    Ok(connections.shared()?.get_location(id.as_str())?)
}
