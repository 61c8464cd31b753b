//! Class management feature
//!
//! Classes, enrollment rosters, subjects, and subject files. All writes
//! are owner-scoped to the teacher who created the class; lookups that miss
//! because of ownership render the same as lookups that miss entirely.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::classes_routes;
