//! Campus Server Library
//!
//! HTTP backend for a school-management system: accounts, class and subject
//! rosters, file-backed course materials, attendance capture and reporting,
//! and a quiz subsystem with authoring, publishing, single-attempt taking,
//! auto-grading, and results aggregation.
//!
//! # Architecture
//!
//! Functionality is organized as vertical feature slices under [`features`],
//! each with its own `commands/` (write operations), `queries/` (read
//! operations), and `routes.rs`. Handlers are standalone async functions
//! taking a `PgPool` plus a command or query struct; per-operation error
//! enums keep failure modes explicit at each call site.
//!
//! Invariants that matter under concurrent requests are enforced by the
//! database schema, not by in-process locking:
//!
//! - one quiz attempt per (quiz, student)
//! - one attendance record per (day, class, student)
//! - one class name per teacher
//! - one account per email
//!
//! # Framework Stack
//!
//! - **Axum** for HTTP routing and extraction
//! - **SQLx** for PostgreSQL access
//! - **Tower / tower-http** for middleware (tracing, CORS, static uploads)

pub mod api;
pub mod config;
pub mod db;
pub mod features;
pub mod middleware;
pub mod models;
pub mod storage;

// Re-export commonly used types
pub use api::response::AppError;
