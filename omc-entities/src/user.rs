use num_derive::{FromPrimitive, ToPrimitive};

use crate::id::UserId;

#[rustfmt::skip]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum Role {
    #[default]
    Member    = 0,
    Moderator = 1,
    Admin     = 2,
}

/// The member who triggered an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn member(id: impl Into<UserId>) -> Self {
        Self::new(id, Role::Member)
    }
}
