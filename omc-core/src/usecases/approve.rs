use super::{prelude::*, *};

/// The effect of an approved request on the location store.
#[derive(Debug, Clone, PartialEq)]
pub enum Approval {
    Created(Location),
    Merged {
        location: Location,
        /// The state before the merge.
        previous: LocationSnapshot,
    },
    Updated {
        location: Location,
        changed: Vec<EditField>,
    },
    /// Both snapshots are identical.
    Unchanged,
    Removed(Id),
}

impl Approval {
    /// The location that has been modified, if any.
    pub fn location_id(&self) -> Option<&Id> {
        match self {
            Self::Created(location)
            | Self::Merged { location, .. }
            | Self::Updated { location, .. } => Some(&location.id),
            Self::Removed(id) => Some(id),
            Self::Unchanged => None,
        }
    }
}

fn parse_snapshot(json: Option<&str>) -> Result<LocationSnapshot> {
    let json = json.ok_or(Error::MissingSnapshot)?;
    Ok(LocationSnapshot::parse(json)?)
}

/// Applies a pending request to the location store.
///
/// The status of the request is not modified, see [`mark_request_implemented`].
pub fn apply_approved_request<R>(
    repo: &R,
    moderator: &Actor,
    request: &ChangeRequest,
    now: Timestamp,
) -> Result<Approval>
where
    R: LocationRepo,
{
    authorize_moderator(moderator)?;
    if !request.is_pending() {
        return Err(Error::InvalidStatus(request.status));
    }
    let approval = match request.kind {
        RequestKind::New => {
            let proposal = parse_snapshot(request.new_data.as_deref())?;
            approve_new(repo, moderator, proposal, now)?
        }
        RequestKind::Edit => {
            let current = parse_snapshot(request.current_data.as_deref())?;
            let new = parse_snapshot(request.new_data.as_deref())?;
            approve_edit(repo, moderator, &current, &new, now)?
        }
        RequestKind::Remove => {
            let current = parse_snapshot(request.current_data.as_deref())?;
            let new = request
                .new_data
                .as_deref()
                .map(LocationSnapshot::parse)
                .transpose()?;
            approve_remove(repo, moderator, &current, new, now)?
        }
    };
    log::info!(
        "Approved {} request {} by {}: {}",
        request.kind,
        request.id,
        moderator.id,
        match &approval {
            Approval::Created(location) => format!("created location {}", location.id),
            Approval::Merged { location, .. } => format!("merged into location {}", location.id),
            Approval::Updated { location, changed } =>
                format!("changed {} field(s) of location {}", changed.len(), location.id),
            Approval::Unchanged => "no changes".to_owned(),
            Approval::Removed(id) => format!("removed location {id}"),
        }
    );
    Ok(approval)
}

fn approve_new<R: LocationRepo>(
    repo: &R,
    moderator: &Actor,
    proposal: LocationSnapshot,
    now: Timestamp,
) -> Result<Approval> {
    let mut matches = repo.find_locations_by_name(&proposal.name)?;
    // Prefer the multi-point variant
    matches.sort_by_key(|location| !location.is_multi_point());
    let Some(mut location) = matches.into_iter().next() else {
        let location = proposal.into_location(Id::new(), Some(moderator.id.clone()), now);
        repo.create_location(&location)?;
        return Ok(Approval::Created(location));
    };
    let previous = LocationSnapshot::from_location(&location);
    merge_into(&mut location, proposal);
    location.approved_by = Some(moderator.id.clone());
    location.last_modified = now;
    repo.update_location(&location)?;
    Ok(Approval::Merged { location, previous })
}

/// Merges a proposal into an existing location.
///
/// Points are appended without deduplication, media URLs are
/// united and description and type are only replaced by
/// non-empty proposals.
pub fn merge_into(location: &mut Location, proposal: LocationSnapshot) {
    let LocationSnapshot {
        coordinates,
        category,
        description,
        media_urls,
        ..
    } = proposal;
    location.coordinates = merge_coordinates(&location.coordinates, &coordinates);
    for url in media_urls {
        if !location.media_urls.contains(&url) {
            location.media_urls.push(url);
        }
    }
    if !description.is_empty() && description != location.description {
        location.description = description;
    }
    if !category.is_empty() && category != location.category {
        location.category = category;
    }
}

fn approve_edit<R: LocationRepo>(
    repo: &R,
    moderator: &Actor,
    current: &LocationSnapshot,
    new: &LocationSnapshot,
    now: Timestamp,
) -> Result<Approval> {
    let changed = current.changed_fields(new);
    if changed.is_empty() {
        return Ok(Approval::Unchanged);
    }
    let id = new.target_id().ok_or(Error::UntargetedSnapshot)?;
    let mut location = repo.get_location(id.as_str())?;
    new.apply_fields(&mut location, &changed);
    location.approved_by = Some(moderator.id.clone());
    location.last_modified = now;
    repo.update_location(&location)?;
    Ok(Approval::Updated { location, changed })
}

fn approve_remove<R: LocationRepo>(
    repo: &R,
    moderator: &Actor,
    current: &LocationSnapshot,
    new: Option<LocationSnapshot>,
    now: Timestamp,
) -> Result<Approval> {
    let id = current.target_id().ok_or(Error::UntargetedSnapshot)?;
    let Some(new) = new else {
        repo.delete_location(id.as_str())?;
        return Ok(Approval::Removed(id));
    };
    let mut location = repo.get_location(id.as_str())?;
    location.coordinates = new.coordinates;
    location.approved_by = Some(moderator.id.clone());
    location.last_modified = now;
    repo.update_location(&location)?;
    Ok(Approval::Updated {
        location,
        changed: vec![EditField::Coordinates],
    })
}

/// Marks a request as implemented after it has been applied.
pub fn mark_request_implemented<R>(
    repo: &R,
    mut request: ChangeRequest,
    moderator: &Actor,
    approval: &Approval,
    now: Timestamp,
) -> Result<ChangeRequest>
where
    R: ChangeRequestRepo,
{
    transition(&mut request, RequestStatus::Implemented, moderator, now)?;
    if let Approval::Merged { previous, .. } = approval {
        // Allows to undo the merge
        request.current_data = Some(previous.to_json()?);
    }
    repo.update_change_request(&request)?;
    Ok(request)
}
