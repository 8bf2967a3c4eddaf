// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use std::cell::RefMut;

use anyhow::anyhow;
use diesel::{
    self,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};

use omc_core::{
    entities::*,
    repositories::{self as repo, *},
};

use super::*;

mod change_request;
mod location;

type Result<T> = std::result::Result<T, repo::Error>;

pub fn from_diesel_err(err: DieselError) -> repo::Error {
    match err {
        DieselError::NotFound => repo::Error::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            repo::Error::AlreadyExists
        }
        _ => repo::Error::Other(err.into()),
    }
}

// Access to the underlying connection of the different wrappers
trait SqliteAccess {
    fn read(&self) -> RefMut<'_, SqliteConnection>;
    fn write(&self) -> Result<RefMut<'_, SqliteConnection>>;
}

impl SqliteAccess for DbReadOnly<'_> {
    fn read(&self) -> RefMut<'_, SqliteConnection> {
        RefMut::map(self.conn.borrow_mut(), |conn| &mut **conn)
    }
    fn write(&self) -> Result<RefMut<'_, SqliteConnection>> {
        Err(anyhow!("Write access with a read-only connection").into())
    }
}

impl SqliteAccess for DbReadWrite<'_> {
    fn read(&self) -> RefMut<'_, SqliteConnection> {
        RefMut::map(self.conn.borrow_mut(), |conn| &mut **conn)
    }
    fn write(&self) -> Result<RefMut<'_, SqliteConnection>> {
        Ok(self.read())
    }
}

impl SqliteAccess for DbConnection<'_> {
    fn read(&self) -> RefMut<'_, SqliteConnection> {
        RefMut::map(self.conn.borrow_mut(), |conn| &mut **conn)
    }
    fn write(&self) -> Result<RefMut<'_, SqliteConnection>> {
        Ok(self.read())
    }
}

macro_rules! impl_repositories {
    ($($db:ident),+) => {
        $(
            impl LocationRepo for $db<'_> {
                fn get_location(&self, id: &str) -> Result<Location> {
                    location::get_location(&mut self.read(), id)
                }
                fn find_locations_by_name(&self, name: &str) -> Result<Vec<Location>> {
                    location::find_locations_by_name(&mut self.read(), name)
                }
                fn search_locations(&self, text: &str, limit: usize) -> Result<Vec<Location>> {
                    location::search_locations(&mut self.read(), text, limit)
                }
                fn all_locations(&self) -> Result<Vec<Location>> {
                    location::all_locations(&mut self.read())
                }
                fn create_location(&self, l: &Location) -> Result<()> {
                    location::create_location(&mut *self.write()?, l)
                }
                fn update_location(&self, l: &Location) -> Result<()> {
                    location::update_location(&mut *self.write()?, l)
                }
                fn delete_location(&self, id: &str) -> Result<()> {
                    location::delete_location(&mut *self.write()?, id)
                }
            }

            impl ChangeRequestRepo for $db<'_> {
                fn create_change_request(&self, r: &ChangeRequest) -> Result<()> {
                    change_request::create_change_request(&mut *self.write()?, r)
                }
                fn get_change_request(&self, id: &str) -> Result<ChangeRequest> {
                    change_request::get_change_request(&mut self.read(), id)
                }
                fn get_change_request_by_message_id(
                    &self,
                    message_id: &MessageId,
                ) -> Result<ChangeRequest> {
                    change_request::get_change_request_by_message_id(&mut self.read(), message_id)
                }
                fn update_change_request(&self, r: &ChangeRequest) -> Result<()> {
                    change_request::update_change_request(&mut *self.write()?, r)
                }
                fn delete_change_request_by_message_id(&self, message_id: &MessageId) -> Result<()> {
                    change_request::delete_change_request_by_message_id(
                        &mut *self.write()?,
                        message_id,
                    )
                }
                fn change_requests_by_status(
                    &self,
                    status: RequestStatus,
                ) -> Result<Vec<ChangeRequest>> {
                    change_request::change_requests_by_status(&mut self.read(), status)
                }
                fn count_change_requests_by_status(&self, status: RequestStatus) -> Result<usize> {
                    change_request::count_change_requests_by_status(&mut self.read(), status)
                }
            }
        )+
    };
}

impl_repositories!(DbReadOnly, DbReadWrite, DbConnection);
