//! Login command
//!
//! Hash-and-compare authentication. Every failure path (unknown email,
//! wrong password, role mismatch) collapses into one uniform
//! `InvalidCredentials` so responses never reveal which part was wrong.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::accounts::types::{verify_password, AccountInfo};
use crate::models::{Role, UserProfile};

/// Command to authenticate an existing account
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
    /// Expected role; a valid password for the wrong portal still fails
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountInfo,
}

/// Errors that can occur during login
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to issue token: {0}")]
    Token(#[from] crate::middleware::auth::TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    profile: Json<UserProfile>,
}

/// Handler function for login
#[tracing::instrument(skip(pool, auth, command), fields(email = %command.email))]
pub async fn handle(
    pool: PgPool,
    auth: crate::middleware::auth::AuthKeys,
    command: LoginCommand,
) -> Result<LoginResponse, LoginError> {
    let email = command.email.trim().to_lowercase();

    let row = sqlx::query_as::<_, CredentialRow>(
        r#"
        SELECT id, username, email, password_hash, role, profile
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await?
    .ok_or(LoginError::InvalidCredentials)?;

    if !verify_password(&command.password, &row.password_hash) {
        tracing::info!(user_id = %row.id, "Password mismatch");
        return Err(LoginError::InvalidCredentials);
    }

    let role: Role = row
        .role
        .parse()
        .map_err(|_| LoginError::InvalidCredentials)?;
    if command.role.parse::<Role>() != Ok(role) {
        tracing::info!(user_id = %row.id, "Role mismatch at login");
        return Err(LoginError::InvalidCredentials);
    }

    let token = auth.issue(row.id, role)?;

    tracing::info!(user_id = %row.id, "Login succeeded");

    Ok(LoginResponse {
        token,
        user: AccountInfo {
            id: row.id,
            username: row.username,
            email: row.email,
            role,
            profile: row.profile.0,
        },
    })
}
