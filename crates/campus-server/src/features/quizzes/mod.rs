//! Quiz feature
//!
//! Quiz lifecycle (Draft → Published → Closed), single-attempt
//! enforcement, and auto-grading. The one-attempt-per-student rule is
//! ultimately held by a unique index on `(quiz_id, student_id)`; handler
//! checks are fast paths, not the guarantee.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::quizzes_routes;
