pub mod coordinates;
pub mod query;
