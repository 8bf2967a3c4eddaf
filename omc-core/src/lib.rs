pub mod authorization;
pub mod gateways;
pub mod repositories;
pub mod resolver;
pub mod sessions;
pub mod snapshot;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use omc_entities::{
        candidate::*, coordinates::*, id::*, location::*, request::*, session::*, time::*,
        user::*,
    };
}

pub use repositories::Error as RepoError;

/// Maximum number of entries in any choice list of the interactive surface.
pub const MAX_CHOICES: usize = 25;
