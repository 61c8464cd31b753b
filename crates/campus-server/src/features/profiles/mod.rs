//! Profile feature
//!
//! Reads and role-whitelisted updates of the per-account profile bag,
//! plus photo upload/removal backed by local-disk storage.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::profiles_routes;
