mod amend;
mod approve;
mod authorize;
mod change_request;
mod deny;
mod error;
mod reconcile;
mod record_field_edit;
mod submit_edit;
mod submit_new;
mod submit_remove;
mod undo;

#[cfg(test)]
pub mod tests;

pub use self::{
    amend::*, approve::*, authorize::*, change_request::*, deny::*, error::Error, reconcile::*,
    record_field_edit::*, submit_edit::*, submit_new::*, submit_remove::*, undo::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, repositories::*, snapshot::LocationSnapshot, RepoError};
}

// Trimmed text or `None` if blank
fn non_blank(text: &str) -> Option<&str> {
    Some(text.trim()).filter(|text| !text.is_empty())
}
