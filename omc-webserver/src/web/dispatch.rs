use omc_application::prelude::{self as flows, NewLocationDraft};
use omc_boundary::{
    AutocompleteInteraction, Choice, CommandInteraction, ComponentInteraction, CustomId,
    Interaction, InteractionContext, InteractionResponse, Message, ModalInteraction,
};
use omc_core::{
    entities::*,
    snapshot::LocationSnapshot,
    usecases::{self, NewLocationProposal},
    util::query::parse_index,
    MAX_CHOICES,
};

use super::{
    action::{Action, LocationRef},
    error::{Error, ParameterError},
    views, Backend,
};

pub const REQUEST_NEW: &str = "request new";
pub const REQUEST_EDIT: &str = "request edit";
pub const REQUEST_REMOVE: &str = "request remove";
pub const ADMIN_UNDO: &str = "admin undo";

pub const NAME_OPTION: &str = "name";
pub const TARGET_OPTION: &str = "target";
pub const ID_OPTION: &str = "id";

type Result<T> = std::result::Result<T, Error>;

/// Handles a single interaction synchronously.
pub fn handle(backend: &Backend, interaction: Interaction) -> Result<InteractionResponse> {
    match interaction {
        Interaction::Command(c) => command(backend, c),
        Interaction::Component(c) => component(backend, c),
        Interaction::Modal(m) => modal(backend, m),
        Interaction::Autocomplete(a) => {
            let choices = autocomplete(backend, &a).unwrap_or_else(|err| {
                warn!("No suggestions for '{}': {err}", a.value);
                vec![]
            });
            Ok(InteractionResponse::Choices { choices })
        }
    }
}

fn message(msg: Message) -> Result<InteractionResponse> {
    Ok(InteractionResponse::Message(msg))
}

fn user_of(ctx: &InteractionContext) -> UserId {
    ctx.user_id.as_str().into()
}

fn actor_of(backend: &Backend, ctx: &InteractionContext) -> Actor {
    Actor::new(ctx.user_id.as_str(), backend.cfg.role_of(&ctx.roles))
}

fn option<'a>(c: &'a CommandInteraction, name: &'static str) -> Result<&'a str> {
    c.options
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or(Error::MissingOption(name))
}

/// Decodes a custom id and checks that it belongs to the user.
fn decode(custom_id: &str, ctx: &InteractionContext) -> Result<Action> {
    let (action, owner) = Action::decode(&CustomId::parse(custom_id))
        .ok_or_else(|| Error::UnknownAction(custom_id.to_owned()))?;
    if let Some(owner) = owner {
        if owner.as_str() != ctx.user_id {
            warn!(
                "User {} used control '{custom_id}' of {owner}",
                ctx.user_id
            );
            return Err(Error::NotYourControl);
        }
    }
    Ok(action)
}

/// The first form field that names an editable field.
fn field_value(fields: &std::collections::BTreeMap<String, String>) -> Result<(EditField, &str)> {
    fields
        .iter()
        .find_map(|(key, value)| Some((key.parse::<EditField>().ok()?, value.as_str())))
        .ok_or(Error::MissingField)
}

fn command(backend: &Backend, c: CommandInteraction) -> Result<InteractionResponse> {
    let user = user_of(&c.context);
    match c.name.as_str() {
        REQUEST_NEW => {
            let name = c.options.get(NAME_OPTION).map(String::as_str);
            Ok(InteractionResponse::Modal(views::new_details_modal(
                name.unwrap_or_default(),
            )))
        }
        REQUEST_EDIT => {
            let (location, selection) =
                flows::resolve_target(&backend.db, option(&c, TARGET_OPTION)?)?;
            match selection {
                None if location.is_multi_point() => {
                    let action = Action::EditPoint {
                        location: location.id.clone(),
                    };
                    message(views::point_menu(&action, &user, &location, ("All points", "*")))
                }
                selection => {
                    let target = LocationRef {
                        id: location.id.clone(),
                        selection: selection.unwrap_or(PointSelection::Entity),
                    };
                    message(edit_menu(backend, &user, &target, &location.name))
                }
            }
        }
        REQUEST_REMOVE => {
            let (location, selection) =
                flows::resolve_target(&backend.db, option(&c, TARGET_OPTION)?)?;
            match selection {
                Some(PointSelection::AllPoints) => Err(ParameterError::WildcardRemoval.into()),
                None if location.is_multi_point() => {
                    let action = Action::RemovePoint {
                        location: location.id.clone(),
                    };
                    message(views::point_menu(
                        &action,
                        &user,
                        &location,
                        ("Whole location", views::ENTITY_CHOICE),
                    ))
                }
                selection => {
                    let action = Action::RemoveReason(LocationRef {
                        id: location.id,
                        selection: selection.unwrap_or(PointSelection::Entity),
                    });
                    Ok(InteractionResponse::Modal(views::reason_modal(
                        &action,
                        Some(&user),
                        "Why should it be removed?",
                    )))
                }
            }
        }
        ADMIN_UNDO => {
            let admin = actor_of(backend, &c.context);
            let request = flows::undo_request(
                &backend.db,
                &*backend.gateways.notify,
                &admin,
                option(&c, ID_OPTION)?,
            )?;
            message(views::reverted(&request))
        }
        _ => Err(Error::UnknownCommand(c.name.clone())),
    }
}

fn edit_menu(backend: &Backend, user: &UserId, target: &LocationRef, name: &str) -> Message {
    let session = backend.sessions.get(
        user,
        &EditTarget::location(target.id.clone(), target.selection),
    );
    views::edit_menu(user, target, name, &session)
}

fn submit_new(
    backend: &Backend,
    user: UserId,
    proposal: LocationSnapshot,
) -> Result<InteractionResponse> {
    let request = flows::submit_new_location(
        &backend.db,
        &*backend.gateways.channel,
        backend.classifier(),
        &backend.cfg.category_settings,
        user,
        proposal,
        None,
    )?;
    message(views::submitted(&request))
}

fn submit_parked(
    backend: &Backend,
    user: &UserId,
    draft: &Id,
    merge_into: Option<&Id>,
) -> Result<InteractionResponse> {
    let request = flows::submit_parked_location(
        &backend.db,
        &*backend.gateways.channel,
        backend.classifier(),
        &backend.cfg.category_settings,
        &*backend.sessions,
        user,
        draft,
        merge_into,
    )?;
    message(views::submitted(&request))
}

fn component(backend: &Backend, c: ComponentInteraction) -> Result<InteractionResponse> {
    let action = decode(&c.custom_id, &c.context)?;
    let user = user_of(&c.context);
    let choice = || c.values.first().map(String::as_str).ok_or(Error::MissingChoice);
    let message_id = || {
        c.message_id
            .as_deref()
            .map(MessageId::from)
            .ok_or(Error::MissingMessage)
    };
    let sessions = &*backend.sessions;
    match action {
        Action::NewMerge { draft, existing } => {
            submit_parked(backend, &user, &draft, Some(&existing))
        }
        Action::NewDistinct { draft } => submit_parked(backend, &user, &draft, None),
        Action::EditPoint { location } => {
            let selection = parse_index(choice()?).ok_or(Error::MissingChoice)?;
            let location = flows::get_location(&backend.db, &location)?;
            let target = LocationRef {
                id: location.id.clone(),
                selection,
            };
            message(edit_menu(backend, &user, &target, &location.name))
        }
        Action::EditField(target) => {
            let field = choice()?
                .parse::<EditField>()
                .map_err(|_| Error::MissingChoice)?;
            let value = flows::location_field_value(
                &backend.db,
                sessions,
                &user,
                &EditTarget::location(target.id.clone(), target.selection),
                field,
            )?;
            Ok(InteractionResponse::Modal(views::value_modal(
                &Action::EditValue(target),
                &user,
                field,
                value,
            )))
        }
        Action::EditSubmit(target) => {
            let session = sessions.get(
                &user,
                &EditTarget::location(target.id.clone(), target.selection),
            );
            if session.is_empty() {
                return Err(ParameterError::NoChanges.into());
            }
            Ok(InteractionResponse::Modal(views::reason_modal(
                &Action::EditReason(target),
                Some(&user),
                "Why should it be changed?",
            )))
        }
        Action::EditCancel(target) => {
            flows::discard_location_edit(sessions, &user, &target.id, target.selection);
            message(views::discarded())
        }
        Action::RemovePoint { location } => {
            let selection = match choice()? {
                views::ENTITY_CHOICE => PointSelection::Entity,
                value => parse_index(value)
                    .filter(|s| *s != PointSelection::AllPoints)
                    .ok_or(Error::MissingChoice)?,
            };
            let action = Action::RemoveReason(LocationRef {
                id: location,
                selection,
            });
            Ok(InteractionResponse::Modal(views::reason_modal(
                &action,
                Some(&user),
                "Why should it be removed?",
            )))
        }
        Action::Approve => {
            let moderator = actor_of(backend, &c.context);
            let approved = flows::approve_request(
                &backend.db,
                &*backend.gateways.notify,
                &moderator,
                &message_id()?,
            )?;
            message(views::approved(&moderator.id, &approved))
        }
        Action::Deny => {
            let moderator = actor_of(backend, &c.context);
            usecases::authorize_moderator(&moderator)?;
            let action = Action::DenyReason {
                message: message_id()?,
            };
            Ok(InteractionResponse::Modal(views::reason_modal(
                &action,
                None,
                "Why is it dismissed?",
            )))
        }
        Action::Amend => {
            let moderator = actor_of(backend, &c.context);
            let message_id = message_id()?;
            let session =
                flows::start_amendment(&backend.db, sessions, &moderator, &message_id)?;
            message(views::amendment_menu(&moderator.id, &message_id, &session))
        }
        Action::AmendField { message } => {
            let moderator = actor_of(backend, &c.context);
            usecases::authorize_moderator(&moderator)?;
            let field = choice()?
                .parse::<EditField>()
                .map_err(|_| Error::MissingChoice)?;
            let value = flows::location_field_value(
                &backend.db,
                sessions,
                &moderator.id,
                &EditTarget::Request(message.clone()),
                field,
            )?;
            Ok(InteractionResponse::Modal(views::value_modal(
                &Action::AmendValue { message },
                &moderator.id,
                field,
                value,
            )))
        }
        Action::AmendSave { message } => {
            let moderator = actor_of(backend, &c.context);
            let request = flows::save_amendment(&backend.db, sessions, &moderator, &message)?;
            self::message(views::amended(&request))
        }
        Action::AmendCancel { message } => {
            let moderator = actor_of(backend, &c.context);
            flows::discard_amendment(sessions, &moderator, &message);
            self::message(views::discarded())
        }
        Action::NewDetails
        | Action::EditValue(_)
        | Action::EditReason(_)
        | Action::RemoveReason(_)
        | Action::DenyReason { .. }
        | Action::AmendValue { .. } => Err(Error::UnknownAction(c.custom_id)),
    }
}

fn modal(backend: &Backend, m: ModalInteraction) -> Result<InteractionResponse> {
    let action = decode(&m.custom_id, &m.context)?;
    let user = user_of(&m.context);
    let text = |name: &str| m.fields.get(name).cloned().unwrap_or_default();
    let reason = text(views::REASON_FIELD);
    let sessions = &*backend.sessions;
    match action {
        Action::NewDetails => {
            let proposal = NewLocationProposal {
                name: text(EditField::Name.as_key()),
                coordinates: text(EditField::Coordinates.as_key()),
                description: text(EditField::Description.as_key()),
            };
            match flows::prepare_new_location(&backend.db, sessions, &user, proposal)? {
                NewLocationDraft::Unique(proposal) => submit_new(backend, user, proposal),
                NewLocationDraft::NearMatch { draft, existing } => {
                    message(views::near_match(&user, &draft, &existing))
                }
            }
        }
        Action::EditValue(target) => {
            let (field, value) = field_value(&m.fields)?;
            let session = flows::record_location_edit(
                &backend.db,
                sessions,
                &user,
                &target.id,
                target.selection,
                field,
                value,
            )?;
            message(views::edit_menu(
                &user,
                &target,
                &session.display_name,
                &session,
            ))
        }
        Action::EditReason(target) => {
            let request = flows::submit_location_edit(
                &backend.db,
                &*backend.gateways.channel,
                sessions,
                &user,
                &target.id,
                target.selection,
                &reason,
            )?;
            message(views::submitted(&request))
        }
        Action::RemoveReason(target) => {
            let request = flows::submit_removal(
                &backend.db,
                &*backend.gateways.channel,
                user,
                &target.id,
                target.selection,
                &reason,
            )?;
            message(views::submitted(&request))
        }
        Action::DenyReason { message } => {
            let moderator = actor_of(backend, &m.context);
            let request = flows::deny_request(&backend.db, &moderator, &message, &reason)?;
            self::message(views::denied(&moderator.id, &request))
        }
        Action::AmendValue { message } => {
            let moderator = actor_of(backend, &m.context);
            let (field, value) = field_value(&m.fields)?;
            let session =
                flows::record_amendment(&backend.db, sessions, &moderator, &message, field, value)?;
            self::message(views::amendment_menu(&moderator.id, &message, &session))
        }
        Action::NewMerge { .. }
        | Action::NewDistinct { .. }
        | Action::EditPoint { .. }
        | Action::EditField(_)
        | Action::EditSubmit(_)
        | Action::EditCancel(_)
        | Action::RemovePoint { .. }
        | Action::Approve
        | Action::Deny
        | Action::Amend
        | Action::AmendField { .. }
        | Action::AmendSave { .. }
        | Action::AmendCancel { .. } => Err(Error::UnknownAction(m.custom_id)),
    }
}

fn autocomplete(backend: &Backend, a: &AutocompleteInteraction) -> Result<Vec<Choice>> {
    let for_removal = match (a.command.as_str(), a.focused.as_str()) {
        (REQUEST_EDIT, TARGET_OPTION) => false,
        (REQUEST_REMOVE, TARGET_OPTION) => true,
        _ => return Ok(vec![]),
    };
    let candidates =
        flows::resolve_candidates(&backend.db, backend.name_matcher(), &a.value, MAX_CHOICES)?;
    Ok(candidates
        .iter()
        .filter(|c| !(for_removal && c.selection == PointSelection::AllPoints))
        .map(Choice::from)
        .collect())
}
