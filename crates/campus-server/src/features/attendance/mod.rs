//! Attendance feature
//!
//! A daily ledger keyed by (day, class, student). Saving is an upsert, so
//! re-marking a day is last-write-wins, and the marking roster is explicit
//! enrollment only.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::attendance_routes;
