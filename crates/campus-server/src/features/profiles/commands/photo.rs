//! Profile photo commands
//!
//! Upload stores the new file first, then swaps the reference in the
//! record, then best-effort deletes the previous file. The record update
//! is the commit point; a leaked file on a later crash is garbage, not
//! corruption.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::UserProfile;
use crate::storage::Storage;

/// Errors that can occur for photo operations
#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("No photo file in request")]
    MissingFile,

    #[error("Account not found")]
    NotFound,

    #[error("{0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler: store a new photo and swap the profile reference
#[tracing::instrument(skip(pool, storage, data), fields(user_id = %user_id, size = data.len()))]
pub async fn upload(
    pool: PgPool,
    storage: Storage,
    user_id: Uuid,
    original_name: &str,
    data: &[u8],
) -> Result<String, PhotoError> {
    let current: Option<Json<UserProfile>> =
        sqlx::query_scalar("SELECT profile FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?;
    let mut profile = current.ok_or(PhotoError::NotFound)?.0;

    let stored = storage
        .save(user_id, original_name, data)
        .await
        .map_err(|e| PhotoError::Storage(e.to_string()))?;

    let previous = profile.core().photo.clone();
    profile.core_mut().photo = Some(stored.web_path.clone());

    sqlx::query("UPDATE users SET profile = $1, updated_at = now() WHERE id = $2")
        .bind(Json(&profile))
        .bind(user_id)
        .execute(&pool)
        .await?;

    if let Some(old) = previous {
        storage.delete(&old).await;
    }

    tracing::info!(photo = %stored.web_path, "Profile photo updated");
    Ok(stored.web_path)
}

/// Handler: clear the photo reference, then best-effort delete the file
#[tracing::instrument(skip(pool, storage), fields(user_id = %user_id))]
pub async fn remove(pool: PgPool, storage: Storage, user_id: Uuid) -> Result<(), PhotoError> {
    let current: Option<Json<UserProfile>> =
        sqlx::query_scalar("SELECT profile FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&pool)
            .await?;
    let mut profile = current.ok_or(PhotoError::NotFound)?.0;

    let Some(previous) = profile.core().photo.clone() else {
        return Ok(());
    };
    profile.core_mut().photo = None;

    sqlx::query("UPDATE users SET profile = $1, updated_at = now() WHERE id = $2")
        .bind(Json(&profile))
        .bind(user_id)
        .execute(&pool)
        .await?;

    storage.delete(&previous).await;

    tracing::info!("Profile photo removed");
    Ok(())
}
