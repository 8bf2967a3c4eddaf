#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use super::schema::*;

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = locations)]
#[diesel(treat_none_as_null = true)]
pub struct NewLocation<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub name_key: String,
    pub coordinates: String,
    pub category: &'a str,
    pub description: &'a str,
    pub media_urls: String,
    pub icon: Option<&'a str>,
    pub approved_by: Option<&'a str>,
    pub last_modified_at: i64,
}

#[derive(Queryable)]
pub struct LocationEntity {
    pub rowid: i64,
    pub id: String,
    pub name: String,
    pub name_key: String,
    pub coordinates: String,
    pub category: String,
    pub description: String,
    pub media_urls: String,
    pub icon: Option<String>,
    pub approved_by: Option<String>,
    pub last_modified_at: i64,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = change_requests)]
#[diesel(treat_none_as_null = true)]
pub struct NewChangeRequest<'a> {
    pub id: &'a str,
    pub message_id: &'a str,
    pub requester_id: &'a str,
    pub kind: i16,
    pub reason: Option<&'a str>,
    pub current_data: Option<&'a str>,
    pub new_data: Option<&'a str>,
    pub status: i16,
    pub approver_id: Option<&'a str>,
    pub approved_at: Option<i64>,
    pub review_comment: Option<&'a str>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Queryable)]
pub struct ChangeRequestEntity {
    pub rowid: i64,
    pub id: String,
    pub message_id: String,
    pub requester_id: String,
    pub kind: i16,
    pub reason: Option<String>,
    pub current_data: Option<String>,
    pub new_data: Option<String>,
    pub status: i16,
    pub approver_id: Option<String>,
    pub approved_at: Option<i64>,
    pub review_comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
