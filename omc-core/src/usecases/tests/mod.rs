use super::prelude::*;
use crate::util::query::name_key;

use std::cell::{Cell, RefCell};

type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Default)]
pub struct MockDb {
    pub locations: RefCell<Vec<Location>>,
    pub change_requests: RefCell<Vec<ChangeRequest>>,
    /// Number of updates and deletions of locations
    pub location_updates: Cell<usize>,
}

impl MockDb {
    pub fn add_location(&self, location: Location) {
        self.locations.borrow_mut().push(location);
    }
}

impl LocationRepo for MockDb {
    fn get_location(&self, id: &str) -> RepoResult<Location> {
        self.locations
            .borrow()
            .iter()
            .find(|l| l.id.as_str() == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    fn find_locations_by_name(&self, name: &str) -> RepoResult<Vec<Location>> {
        Ok(self
            .locations
            .borrow()
            .iter()
            .filter(|l| name_key(&l.name) == name_key(name))
            .cloned()
            .collect())
    }

    fn search_locations(&self, text: &str, limit: usize) -> RepoResult<Vec<Location>> {
        let text = name_key(text);
        Ok(self
            .locations
            .borrow()
            .iter()
            .filter(|l| name_key(&l.name).contains(&text))
            .take(limit)
            .cloned()
            .collect())
    }

    fn all_locations(&self) -> RepoResult<Vec<Location>> {
        Ok(self.locations.borrow().clone())
    }

    fn create_location(&self, location: &Location) -> RepoResult<()> {
        if self.get_location(location.id.as_str()).is_ok() {
            return Err(RepoError::AlreadyExists);
        }
        self.add_location(location.clone());
        Ok(())
    }

    fn update_location(&self, location: &Location) -> RepoResult<()> {
        let mut locations = self.locations.borrow_mut();
        let existing = locations
            .iter_mut()
            .find(|l| l.id == location.id)
            .ok_or(RepoError::NotFound)?;
        *existing = location.clone();
        self.location_updates.set(self.location_updates.get() + 1);
        Ok(())
    }

    fn delete_location(&self, id: &str) -> RepoResult<()> {
        let mut locations = self.locations.borrow_mut();
        let len = locations.len();
        locations.retain(|l| l.id.as_str() != id);
        if locations.len() == len {
            return Err(RepoError::NotFound);
        }
        self.location_updates.set(self.location_updates.get() + 1);
        Ok(())
    }
}

impl ChangeRequestRepo for MockDb {
    fn create_change_request(&self, request: &ChangeRequest) -> RepoResult<()> {
        let mut requests = self.change_requests.borrow_mut();
        if requests
            .iter()
            .any(|r| r.id == request.id || r.message_id == request.message_id)
        {
            return Err(RepoError::AlreadyExists);
        }
        requests.push(request.clone());
        Ok(())
    }

    fn get_change_request(&self, id: &str) -> RepoResult<ChangeRequest> {
        self.change_requests
            .borrow()
            .iter()
            .find(|r| r.id.as_str() == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    fn get_change_request_by_message_id(&self, message_id: &MessageId) -> RepoResult<ChangeRequest> {
        self.change_requests
            .borrow()
            .iter()
            .find(|r| &r.message_id == message_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    fn update_change_request(&self, request: &ChangeRequest) -> RepoResult<()> {
        let mut requests = self.change_requests.borrow_mut();
        let existing = requests
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or(RepoError::NotFound)?;
        *existing = request.clone();
        Ok(())
    }

    fn delete_change_request_by_message_id(&self, message_id: &MessageId) -> RepoResult<()> {
        let mut requests = self.change_requests.borrow_mut();
        let len = requests.len();
        requests.retain(|r| &r.message_id != message_id);
        if requests.len() == len {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    fn change_requests_by_status(&self, status: RequestStatus) -> RepoResult<Vec<ChangeRequest>> {
        let mut requests: Vec<_> = self
            .change_requests
            .borrow()
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }

    fn count_change_requests_by_status(&self, status: RequestStatus) -> RepoResult<usize> {
        Ok(self.change_requests_by_status(status)?.len())
    }
}
