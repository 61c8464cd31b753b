//! Feature modules implementing the campus API
//!
//! Each feature is organized as a vertical slice with its own commands,
//! queries, and routes.
//!
//! # Features
//!
//! - **accounts**: Signup, login, and password changes
//! - **profiles**: Role-specific profile data and photo management
//! - **classes**: Class rosters, subjects, and subject files
//! - **quizzes**: Quiz lifecycle, attempts, and grading
//! - **attendance**: Daily attendance ledger and reports
//! - **assistant**: Knowledge-grounded study helper backed by an external
//!   language-model API
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Shared types (if needed)
//!
//! Handlers are standalone functions taking the pool and a command/query
//! struct, so they can be exercised from tests without going through HTTP.

pub mod accounts;
pub mod assistant;
pub mod attendance;
pub mod classes;
pub mod profiles;
pub mod quizzes;
pub mod shared;

use crate::features::assistant::Assistant;
use crate::middleware::auth::AuthKeys;
use crate::storage::Storage;
use axum::extract::FromRef;
use axum::Router;

/// Shared state for all feature routes
#[derive(Clone, FromRef)]
pub struct FeatureState {
    /// PostgreSQL connection pool for database operations
    pub db: sqlx::PgPool,
    /// Local-disk storage backend for uploaded files
    pub storage: Storage,
    /// Token signing/verification keys for bearer auth
    pub auth: AuthKeys,
    /// Assistant client with its knowledge base loaded at startup
    pub assistant: Assistant,
}

/// Creates the main API router with all feature routes mounted
///
/// Each feature is mounted under its own path prefix:
/// - `/auth` - Signup, login, password changes
/// - `/profile` - Profile reads, updates, and photos
/// - `/classes` - Classes, rosters, subjects, and subject files
/// - `/quizzes` - Quiz lifecycle, attempts, and results
/// - `/attendance` - Attendance ledger and reports
/// - `/assistant` - Study helper
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/auth", accounts::accounts_routes())
        .nest("/profile", profiles::profiles_routes())
        .nest("/classes", classes::classes_routes())
        .nest("/quizzes", quizzes::quizzes_routes())
        .nest("/attendance", attendance::attendance_routes())
        .nest("/assistant", assistant::assistant_routes())
        .with_state(state)
}
