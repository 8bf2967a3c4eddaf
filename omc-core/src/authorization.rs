use omc_entities::user::{Actor, Role};

use std::result::Result as StdResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unauthorized role")]
    UnauthorizedRole,
}

pub type Result<T> = StdResult<T, Error>;

pub fn authorize_role(actor: &Actor, min_required_role: Role) -> Result<()> {
    if actor.role < min_required_role {
        return Err(Error::UnauthorizedRole);
    }
    Ok(())
}
