// Low-level database access traits.
// Each repository is responsible for a single entity.
// Related entities are only referenced by their id and
// never modified or loaded by another repository.

use crate::entities::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub trait LocationRepo {
    fn get_location(&self, id: &str) -> Result<Location>;

    // Exact match, ignoring case
    fn find_locations_by_name(&self, name: &str) -> Result<Vec<Location>>;

    // Substring match, ignoring case
    fn search_locations(&self, text: &str, limit: usize) -> Result<Vec<Location>>;

    fn all_locations(&self) -> Result<Vec<Location>>;

    fn create_location(&self, location: &Location) -> Result<()>;
    fn update_location(&self, location: &Location) -> Result<()>;
    fn delete_location(&self, id: &str) -> Result<()>;

    // Create or replace
    fn restore_location(&self, location: &Location) -> Result<()> {
        match self.get_location(location.id.as_str()) {
            Ok(_) => self.update_location(location),
            Err(Error::NotFound) => self.create_location(location),
            Err(err) => Err(err),
        }
    }
}

pub trait ChangeRequestRepo {
    // Fails with `AlreadyExists` if the message id is already in use
    fn create_change_request(&self, request: &ChangeRequest) -> Result<()>;

    fn get_change_request(&self, id: &str) -> Result<ChangeRequest>;
    fn get_change_request_by_message_id(&self, message_id: &MessageId) -> Result<ChangeRequest>;

    fn update_change_request(&self, request: &ChangeRequest) -> Result<()>;

    fn delete_change_request_by_message_id(&self, message_id: &MessageId) -> Result<()>;

    // Ordered by creation time, oldest first
    fn change_requests_by_status(&self, status: RequestStatus) -> Result<Vec<ChangeRequest>>;
    fn count_change_requests_by_status(&self, status: RequestStatus) -> Result<usize>;
}
