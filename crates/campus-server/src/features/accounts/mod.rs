//! Account management feature
//!
//! Signup, login, and password changes. Tokens are issued here; the
//! extractor in `middleware::auth` verifies them on every protected route.

pub mod commands;
pub mod routes;
pub mod types;

pub use routes::accounts_routes;
