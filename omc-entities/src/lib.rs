#![deny(missing_debug_implementations)]

//! # omc-entities
//!
//! Reusable, agnostic domain entities for OpenMapCurator.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod candidate;
pub mod coordinates;
pub mod id;
pub mod location;
pub mod request;
pub mod session;
pub mod time;
pub mod user;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
