//! Get own profile query

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::accounts::types::AccountInfo;
use crate::models::{Role, UserProfile};

/// Errors that can occur when fetching a profile
#[derive(Debug, thiserror::Error)]
pub enum GetProfileError {
    #[error("Account not found")]
    NotFound,

    #[error("Stored role is invalid")]
    CorruptRole,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    username: String,
    email: String,
    role: String,
    profile: Json<UserProfile>,
}

/// Fetch the caller's own account view. The password hash is never
/// selected, so it cannot leak through serialization.
#[tracing::instrument(skip(pool), fields(user_id = %user_id))]
pub async fn handle(pool: PgPool, user_id: Uuid) -> Result<AccountInfo, GetProfileError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, username, email, role, profile FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetProfileError::NotFound)?;

    let role: Role = row.role.parse().map_err(|_| GetProfileError::CorruptRole)?;

    Ok(AccountInfo {
        id: row.id,
        username: row.username,
        email: row.email,
        role,
        profile: row.profile.0,
    })
}
