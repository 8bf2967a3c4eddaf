pub mod chat;
pub mod classify;
pub mod name_match;
pub mod notify;
