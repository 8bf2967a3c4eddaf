///////////////////////////////////////////////////////////////////////
// Locations
///////////////////////////////////////////////////////////////////////

table! {
    locations (rowid) {
        rowid -> BigInt,
        id -> Text,
        name -> Text,
        name_key -> Text,
        coordinates -> Text,
        category -> Text,
        description -> Text,
        media_urls -> Text,
        icon -> Nullable<Text>,
        approved_by -> Nullable<Text>,
        last_modified_at -> BigInt,
    }
}

///////////////////////////////////////////////////////////////////////
// Change requests
///////////////////////////////////////////////////////////////////////

table! {
    change_requests (rowid) {
        rowid -> BigInt,
        id -> Text,
        message_id -> Text,
        requester_id -> Text,
        kind -> SmallInt,
        reason -> Nullable<Text>,
        current_data -> Nullable<Text>,
        new_data -> Nullable<Text>,
        status -> SmallInt,
        approver_id -> Nullable<Text>,
        approved_at -> Nullable<BigInt>,
        review_comment -> Nullable<Text>,
        created_at -> BigInt,
        updated_at -> BigInt,
    }
}
