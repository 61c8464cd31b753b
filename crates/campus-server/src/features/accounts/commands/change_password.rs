//! Change password command

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::accounts::types::{hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 6;

/// Command to change the authenticated account's password
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

/// Errors that can occur when changing a password
#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("New password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Account not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for changing a password
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn handle(
    pool: PgPool,
    user_id: Uuid,
    command: ChangePasswordCommand,
) -> Result<(), ChangePasswordError> {
    if command.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ChangePasswordError::PasswordTooShort);
    }

    let stored: Option<String> =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?;
    let stored = stored.ok_or(ChangePasswordError::NotFound)?;

    if !verify_password(&command.current_password, &stored) {
        return Err(ChangePasswordError::WrongCurrentPassword);
    }

    sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
        .bind(hash_password(&command.new_password))
        .bind(user_id)
        .execute(&pool)
        .await?;

    tracing::info!("Password changed");
    Ok(())
}
