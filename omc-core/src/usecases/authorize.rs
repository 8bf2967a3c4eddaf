use super::prelude::*;
use crate::authorization::authorize_role;

pub fn authorize_moderator(actor: &Actor) -> Result<()> {
    authorize(actor, Role::Moderator)
}

pub fn authorize_admin(actor: &Actor) -> Result<()> {
    authorize(actor, Role::Admin)
}

fn authorize(actor: &Actor, min_required_role: Role) -> Result<()> {
    authorize_role(actor, min_required_role).map_err(|_| {
        log::warn!(
            "Member {} with role {:?} is not authorized (required: {:?})",
            actor.id,
            actor.role,
            min_required_role
        );
        Error::Forbidden
    })
}
