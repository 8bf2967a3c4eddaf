use super::*;

use omc_core::{gateways::classify::ClassifierGateway, resolver};
use usecases::{CategorySettings, NewLocationProposal};

/// The outcome of the details form of a new location.
#[derive(Debug, Clone, PartialEq)]
pub enum NewLocationDraft {
    /// No similar location exists.
    Unique(LocationSnapshot),
    /// The proposal has been parked until the requester
    /// decided whether to merge it into the existing location.
    NearMatch { draft: Id, existing: Location },
}

pub fn prepare_new_location(
    connections: &sqlite::Connections,
    sessions: &dyn SessionStore,
    requester_id: &UserId,
    proposal: NewLocationProposal,
) -> Result<NewLocationDraft> {
    let snapshot = usecases::validate_new_location(&proposal)?;
    let near_match = resolver::find_near_match(&connections.shared()?, &snapshot.name)?;
    let Some(existing) = near_match else {
        return Ok(NewLocationDraft::Unique(snapshot));
    };
    let draft = Id::new();
    let edits = proposal.into_field_edits(Timestamp::now());
    sessions.save(
        requester_id,
        &EditTarget::Draft(draft.clone()),
        &snapshot.name,
        edits,
    );
    debug!(
        "Parked proposal '{}' of {requester_id} similar to location {}",
        snapshot.name, existing.id
    );
    Ok(NewLocationDraft::NearMatch { draft, existing })
}

/// Reads a parked proposal from the session store.
pub fn resume_new_location(
    sessions: &dyn SessionStore,
    requester_id: &UserId,
    draft: &Id,
) -> Result<LocationSnapshot> {
    let session = sessions.get(requester_id, &EditTarget::Draft(draft.clone()));
    if session.is_empty() {
        // Expired or already submitted
        return Err(RepoError::NotFound.into());
    }
    let proposal = NewLocationProposal::from_session(&session);
    Ok(usecases::validate_new_location(&proposal)?)
}

/// Submits a parked proposal for review.
///
/// The draft is discarded after the request has been stored.
#[allow(clippy::too_many_arguments)]
pub fn submit_parked_location(
    connections: &sqlite::Connections,
    channel: &dyn ModerationChannel,
    classifier: Option<&dyn ClassifierGateway>,
    settings: &CategorySettings,
    sessions: &dyn SessionStore,
    requester_id: &UserId,
    draft: &Id,
    merge_into: Option<&Id>,
) -> Result<ChangeRequest> {
    let proposal = resume_new_location(sessions, requester_id, draft)?;
    let stored = submit_new_location(
        connections,
        channel,
        classifier,
        settings,
        requester_id.clone(),
        proposal,
        merge_into,
    )?;
    sessions.delete(requester_id, &EditTarget::Draft(draft.clone()));
    Ok(stored)
}

/// Classifies the proposal and submits it for review.
///
/// Approving a proposal that has been merged into an
/// existing location will update that location.
pub fn submit_new_location(
    connections: &sqlite::Connections,
    channel: &dyn ModerationChannel,
    classifier: Option<&dyn ClassifierGateway>,
    settings: &CategorySettings,
    requester_id: UserId,
    proposal: LocationSnapshot,
    merge_into: Option<&Id>,
) -> Result<ChangeRequest> {
    let existing = match merge_into {
        Some(id) => Some(connections.shared()?.get_location(id.as_str())?),
        None => None,
    };
    let category =
        usecases::classify_category(classifier, settings, &proposal.name, &proposal.description);
    let request =
        usecases::new_location_request(requester_id, proposal, category, existing.as_ref());
    post_and_store(connections, channel, request)
}
